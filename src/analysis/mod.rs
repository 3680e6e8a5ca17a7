//! Corpus statistics built on the per-outlet matrices.
//!
//! # Submodules
//!
//! - [`terms`]: Per-outlet term table
//! - [`trend`]: Normalized TF-IDF of one term over time
//! - [`overlap`]: Jaccard vocabulary overlap between outlets

pub mod overlap;
pub mod terms;
pub mod trend;

use crate::models::{Outlet, ProcessedArticle};
use crate::vectorize::{DocumentTermMatrix, TfIdfMatrix};
use tracing::{info, warn};

/// A preprocessed outlet together with its count and TF-IDF matrices.
///
/// Row `i` of both matrices belongs to `articles[i]`.
#[derive(Debug)]
pub struct OutletAnalysis {
    pub outlet: Outlet,
    pub articles: Vec<ProcessedArticle>,
    pub dtm: DocumentTermMatrix,
    pub tfidf: TfIdfMatrix,
}

impl OutletAnalysis {
    pub fn new(outlet: Outlet, articles: Vec<ProcessedArticle>) -> Self {
        let texts: Vec<&str> = articles.iter().map(|a| a.lemmatised_text.as_str()).collect();
        let dtm = DocumentTermMatrix::fit(&texts);
        let tfidf = TfIdfMatrix::from_counts(&dtm);
        if dtm.vocabulary.is_empty() {
            warn!(outlet = outlet.key(), "No term survived vectorisation");
        }
        info!(
            outlet = outlet.key(),
            documents = tfidf.n_documents(),
            terms = dtm.vocabulary.len(),
            "Vectorised corpus"
        );
        OutletAnalysis {
            outlet,
            articles,
            dtm,
            tfidf,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn processed(date: Option<&str>, text: &str) -> ProcessedArticle {
        let lemmas: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        ProcessedArticle {
            title: Some("t".to_string()),
            date: date.map(str::to_string),
            content: text.to_string(),
            sentences: vec![text.to_string()],
            tokens: lemmas.clone(),
            pos_tags: Vec::new(),
            lemmatised_text: lemmas.join(" "),
            lemmas,
        }
    }

    pub fn analysis(outlet: Outlet, docs: &[(Option<&str>, &str)]) -> OutletAnalysis {
        OutletAnalysis::new(outlet, docs.iter().map(|(d, t)| processed(*d, t)).collect())
    }
}
