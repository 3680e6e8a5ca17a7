//! Document-term and TF-IDF matrices over `lemmatised_text`.
//!
//! Documents are re-tokenized with the usual count-vectorizer rule: lowercase
//! word tokens of at least two characters. The vocabulary is sorted
//! alphabetically, so column `i` always refers to the `i`-th term in order.
//!
//! TF-IDF weights use the smoothed inverse document frequency
//!
//! ```text
//! idf(t) = ln((1 + n) / (1 + df(t))) + 1
//! ```
//!
//! and every document row is L2-normalized.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, instrument};

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid token regex"));

/// Tokens the vectorizer counts in `text`.
pub fn analyze(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN_RE.find_iter(&lower).map(|m| m.as_str().to_string()).collect()
}

/// Sorted term list with a reverse index.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    fn from_terms(terms: BTreeSet<String>) -> Self {
        let terms: Vec<String> = terms.into_iter().collect();
        let index = terms.iter().enumerate().map(|(i, t)| (t.clone(), i)).collect();
        Vocabulary { terms, index }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn get(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn term(&self, index: usize) -> &str {
        &self.terms[index]
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Term counts per document, stored sparsely as `(term index, count)` pairs
/// sorted by term index.
#[derive(Debug, Clone)]
pub struct DocumentTermMatrix {
    pub vocabulary: Vocabulary,
    rows: Vec<Vec<(usize, u32)>>,
}

impl DocumentTermMatrix {
    /// Count the terms of each document.
    #[instrument(level = "info", skip_all, fields(documents = documents.len()))]
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| analyze(d.as_ref())).collect();
        let vocabulary = Vocabulary::from_terms(tokenized.iter().flatten().cloned().collect());

        let rows = tokenized
            .iter()
            .map(|tokens| {
                let mut counts: HashMap<usize, u32> = HashMap::new();
                for token in tokens {
                    if let Some(i) = vocabulary.get(token) {
                        *counts.entry(i).or_default() += 1;
                    }
                }
                let mut row: Vec<(usize, u32)> = counts.into_iter().collect();
                row.sort_unstable_by_key(|(i, _)| *i);
                row
            })
            .collect();

        debug!(terms = vocabulary.len(), "Built document-term matrix");
        DocumentTermMatrix { vocabulary, rows }
    }

    pub fn n_documents(&self) -> usize {
        self.rows.len()
    }

    /// Non-zero `(term index, count)` entries of document `doc`.
    pub fn row(&self, doc: usize) -> &[(usize, u32)] {
        &self.rows[doc]
    }

    /// Dense count row of document `doc`, one entry per vocabulary term.
    pub fn dense_row(&self, doc: usize) -> Vec<u32> {
        let mut dense = vec![0; self.vocabulary.len()];
        for &(i, count) in &self.rows[doc] {
            dense[i] = count;
        }
        dense
    }

    /// Total count of each term over all documents.
    pub fn term_totals(&self) -> Vec<u64> {
        let mut totals = vec![0u64; self.vocabulary.len()];
        for row in &self.rows {
            for &(i, count) in row {
                totals[i] += u64::from(count);
            }
        }
        totals
    }

    /// Number of documents each term occurs in.
    pub fn document_frequencies(&self) -> Vec<usize> {
        let mut df = vec![0usize; self.vocabulary.len()];
        for row in &self.rows {
            for &(i, _) in row {
                df[i] += 1;
            }
        }
        df
    }
}

/// TF-IDF weights per document, stored sparsely like the counts they come from.
#[derive(Debug, Clone)]
pub struct TfIdfMatrix {
    pub vocabulary: Vocabulary,
    pub idf: Vec<f64>,
    rows: Vec<Vec<(usize, f64)>>,
    column_sums: Vec<f64>,
}

impl TfIdfMatrix {
    /// Weight a document-term matrix.
    #[instrument(level = "info", skip_all, fields(documents = dtm.n_documents()))]
    pub fn from_counts(dtm: &DocumentTermMatrix) -> Self {
        let n = dtm.n_documents() as f64;
        let idf: Vec<f64> = dtm
            .document_frequencies()
            .into_iter()
            .map(|df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let mut column_sums = vec![0.0; dtm.vocabulary.len()];
        let rows = (0..dtm.n_documents())
            .map(|doc| {
                let mut row: Vec<(usize, f64)> = dtm
                    .row(doc)
                    .iter()
                    .map(|&(i, count)| (i, f64::from(count) * idf[i]))
                    .collect();
                let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
                if norm > f64::EPSILON {
                    for (_, w) in &mut row {
                        *w /= norm;
                    }
                }
                for &(i, w) in &row {
                    column_sums[i] += w;
                }
                row
            })
            .collect();

        TfIdfMatrix {
            vocabulary: dtm.vocabulary.clone(),
            idf,
            rows,
            column_sums,
        }
    }

    pub fn n_documents(&self) -> usize {
        self.rows.len()
    }

    /// Weight of term index `term` in document `doc` (0 when absent).
    pub fn weight(&self, doc: usize, term: usize) -> f64 {
        self.rows[doc]
            .binary_search_by_key(&term, |(i, _)| *i)
            .map(|pos| self.rows[doc][pos].1)
            .unwrap_or(0.0)
    }

    /// Sum of each term's weights over all documents.
    pub fn column_sums(&self) -> &[f64] {
        &self.column_sums
    }

    /// Term indices ordered by column sum, largest first; ties keep
    /// alphabetical order.
    pub fn ranked_terms(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.vocabulary.len()).collect();
        order.sort_by(|&a, &b| self.column_sums[b].total_cmp(&self.column_sums[a]));
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tfidf(documents: &[&str]) -> TfIdfMatrix {
        TfIdfMatrix::from_counts(&DocumentTermMatrix::fit(documents))
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_analyze_drops_single_characters() {
        assert_eq!(analyze("Fan a World cup X"), vec!["fan", "world", "cup"]);
    }

    #[test]
    fn test_dtm_counts_and_sorted_vocabulary() {
        let dtm = DocumentTermMatrix::fit(&["stadium heat stadium", "heat worker"]);
        assert_eq!(dtm.vocabulary.terms(), &["heat", "stadium", "worker"]);
        assert_eq!(dtm.dense_row(0), vec![1, 2, 0]);
        assert_eq!(dtm.dense_row(1), vec![1, 0, 1]);
        assert_eq!(dtm.term_totals(), vec![2, 2, 1]);
        assert_eq!(dtm.document_frequencies(), vec![2, 1, 1]);
    }

    #[test]
    fn test_smoothed_idf() {
        let tfidf = tfidf(&["stadium heat stadium", "heat worker"]);
        // heat occurs in both documents: ln(3/3) + 1
        assert!(approx(tfidf.idf[0], 1.0));
        // stadium in one: ln(3/2) + 1
        assert!(approx(tfidf.idf[1], (1.5f64).ln() + 1.0));
    }

    #[test]
    fn test_rows_are_unit_length() {
        let tfidf = tfidf(&["stadium heat stadium", "heat worker", "boycott"]);
        for doc in 0..tfidf.n_documents() {
            let norm: f64 = (0..tfidf.vocabulary.len())
                .map(|t| tfidf.weight(doc, t).powi(2))
                .sum::<f64>()
                .sqrt();
            assert!(approx(norm, 1.0), "row {doc} has norm {norm}");
        }
    }

    #[test]
    fn test_single_term_document_weight_is_one() {
        let tfidf = tfidf(&["boycott", "heat worker"]);
        let boycott = tfidf.vocabulary.get("boycott").unwrap();
        assert!(approx(tfidf.weight(0, boycott), 1.0));
        assert!(approx(tfidf.weight(1, boycott), 0.0));
    }

    #[test]
    fn test_ranked_terms_by_column_sum() {
        let tfidf = tfidf(&["boycott", "boycott", "heat worker"]);
        let ranked: Vec<&str> = tfidf
            .ranked_terms()
            .into_iter()
            .map(|i| tfidf.vocabulary.term(i))
            .collect();
        assert_eq!(ranked, vec!["boycott", "heat", "worker"]);
    }

    #[test]
    fn test_empty_documents() {
        let tfidf = tfidf(&["", "x"]);
        assert!(tfidf.vocabulary.is_empty());
        assert_eq!(tfidf.n_documents(), 2);
    }
}
