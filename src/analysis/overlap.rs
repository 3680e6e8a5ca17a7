//! Vocabulary overlap between outlets.

use crate::analysis::OutletAnalysis;
use crate::error::PressError;
use crate::models::Outlet;
use itertools::Itertools;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{info, instrument};

/// Terms of one outlet, restricted to its `top` terms by TF-IDF sum when given.
pub fn vocabulary(analysis: &OutletAnalysis, top: Option<usize>) -> BTreeSet<String> {
    let tfidf = &analysis.tfidf;
    match top {
        Some(n) => tfidf
            .ranked_terms()
            .into_iter()
            .take(n)
            .map(|i| tfidf.vocabulary.term(i).to_string())
            .collect(),
        None => tfidf.vocabulary.terms().iter().cloned().collect(),
    }
}

/// Jaccard similarity `|A ∩ B| / |A ∪ B|`, 0 when both sets are empty.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlapRow {
    pub outlet_a: Outlet,
    pub outlet_b: Outlet,
    pub size_a: usize,
    pub size_b: usize,
    pub intersection: usize,
    pub union: usize,
    pub jaccard: f64,
}

#[derive(Debug, Clone)]
pub struct OverlapReport {
    pub pairs: Vec<OverlapRow>,
    /// Terms found in every outlet's vocabulary, alphabetically.
    pub shared_by_all: Vec<String>,
}

/// Pairwise overlap of every two outlets in `analyses`, in input order.
#[instrument(level = "info", skip(analyses), fields(outlets = analyses.len()))]
pub fn overlap(analyses: &[OutletAnalysis], top: Option<usize>) -> Result<OverlapReport, PressError> {
    if analyses.len() < 2 {
        return Err(PressError::TooFewOutlets(analyses.len()));
    }

    let vocabularies: Vec<(Outlet, BTreeSet<String>)> = analyses
        .iter()
        .map(|a| (a.outlet, vocabulary(a, top)))
        .collect();

    let pairs: Vec<OverlapRow> = vocabularies
        .iter()
        .tuple_combinations()
        .map(|((outlet_a, a), (outlet_b, b))| OverlapRow {
            outlet_a: *outlet_a,
            outlet_b: *outlet_b,
            size_a: a.len(),
            size_b: b.len(),
            intersection: a.intersection(b).count(),
            union: a.union(b).count(),
            jaccard: jaccard(a, b),
        })
        .collect();

    let (_, first) = &vocabularies[0];
    let shared_by_all: Vec<String> = first
        .iter()
        .filter(|term| vocabularies[1..].iter().all(|(_, v)| v.contains(*term)))
        .cloned()
        .collect();

    info!(pairs = pairs.len(), shared = shared_by_all.len(), "Computed vocabulary overlap");
    Ok(OverlapReport { pairs, shared_by_all })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::analysis;

    fn set(terms: &[&str]) -> BTreeSet<String> {
        terms.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_jaccard() {
        assert_eq!(jaccard(&set(&["a", "b"]), &set(&["b", "c"])), 1.0 / 3.0);
        assert_eq!(jaccard(&set(&["a"]), &set(&["a"])), 1.0);
        assert_eq!(jaccard(&set(&[]), &set(&[])), 0.0);
        assert_eq!(jaccard(&set(&["a"]), &set(&[])), 0.0);
    }

    #[test]
    fn test_pairwise_overlap() {
        let analyses = vec![
            analysis(Outlet::Times, &[(None, "boycott stadium worker")]),
            analysis(Outlet::Sun, &[(None, "stadium worker goal")]),
            analysis(Outlet::Mail, &[(None, "stadium heat")]),
        ];
        let report = overlap(&analyses, None).unwrap();

        assert_eq!(report.pairs.len(), 3);
        let times_sun = &report.pairs[0];
        assert_eq!((times_sun.outlet_a, times_sun.outlet_b), (Outlet::Times, Outlet::Sun));
        assert_eq!(times_sun.intersection, 2);
        assert_eq!(times_sun.union, 4);
        assert_eq!(times_sun.jaccard, 0.5);
        assert_eq!(report.shared_by_all, vec!["stadium"]);
    }

    #[test]
    fn test_top_restricts_vocabulary() {
        let a = analysis(Outlet::Times, &[(None, "stadium stadium worker"), (None, "stadium heat")]);
        let top = vocabulary(&a, Some(1));
        assert_eq!(top, set(&["stadium"]));
        assert_eq!(vocabulary(&a, None).len(), 3);
    }

    #[test]
    fn test_single_outlet_is_an_error() {
        let analyses = vec![analysis(Outlet::Times, &[(None, "stadium")])];
        assert!(matches!(overlap(&analyses, None), Err(PressError::TooFewOutlets(1))));
    }
}
