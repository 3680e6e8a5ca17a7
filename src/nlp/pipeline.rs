//! The preprocessing pipeline that turns raw articles into lemma lists.
//!
//! Steps, in order:
//!
//! 1. Split content into sentences
//! 2. Tokenize into words, lowercase, drop single punctuation characters
//! 3. Remove stopwords
//! 4. Keep alphabetic tokens only
//! 5. Assign POS tags
//! 6. Lemmatize
//! 7. Remove player-name tokens
//! 8. Remove tokens occurring fewer than `rare_threshold` times across the corpus
//! 9. Drop articles left without any lemma
//! 10. Join the lemmas into `lemmatised_text`
//!
//! The running token count is logged after each filtering step.

use crate::error::PressError;
use crate::models::{ProcessedArticle, RawArticle};
use crate::nlp::{lemmatize, pos, stopwords, tokenize};
use std::collections::{HashMap, HashSet};
use tracing::{info, instrument};

/// Default minimum corpus-wide count for a lemma to be kept.
pub const DEFAULT_RARE_THRESHOLD: usize = 10;

#[derive(Debug, Clone)]
pub struct PreprocessOptions {
    pub rare_threshold: usize,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        PreprocessOptions {
            rare_threshold: DEFAULT_RARE_THRESHOLD,
        }
    }
}

const PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

fn is_punctuation(token: &str) -> bool {
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if PUNCTUATION.contains(c))
}

fn is_alphabetic(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphabetic)
}

fn token_count<'a>(docs: impl Iterator<Item = &'a Vec<String>>) -> usize {
    docs.map(Vec::len).sum()
}

/// Run the pipeline over `articles`.
///
/// `corpus` only names the outlet in log lines and errors. Fails with
/// [`PressError::EmptyCorpus`] when no article keeps a lemma.
#[instrument(level = "info", skip(articles, players, options), fields(articles = articles.len()))]
pub fn preprocess(
    corpus: &str,
    articles: Vec<RawArticle>,
    players: &HashSet<String>,
    options: &PreprocessOptions,
) -> Result<Vec<ProcessedArticle>, PressError> {
    info!("Starting preprocessing newspaper '{corpus}'");

    let mut docs: Vec<ProcessedArticle> = articles
        .into_iter()
        .map(|article| {
            let sentences = tokenize::sentences(&article.content);
            let tokens = tokenize::words(&article.content)
                .into_iter()
                .filter(|w| !is_punctuation(w))
                .map(|w| w.to_lowercase())
                .collect();
            ProcessedArticle {
                title: article.title,
                date: article.date,
                content: article.content,
                sentences,
                tokens,
                pos_tags: Vec::new(),
                lemmas: Vec::new(),
                lemmatised_text: String::new(),
            }
        })
        .collect();
    info!(tokens = token_count(docs.iter().map(|d| &d.tokens)), "Tokenised into sentences and words");

    for doc in &mut docs {
        doc.tokens.retain(|t| !stopwords::is_stopword(t));
    }
    info!(tokens = token_count(docs.iter().map(|d| &d.tokens)), "Removed stopwords");

    for doc in &mut docs {
        doc.tokens.retain(|t| is_alphabetic(t));
    }
    info!(tokens = token_count(docs.iter().map(|d| &d.tokens)), "Removed symbols");

    for doc in &mut docs {
        doc.pos_tags = pos::tag(&doc.tokens);
        doc.lemmas = doc.tokens.iter().map(|t| lemmatize::lemmatize(t)).collect();
    }
    info!(tokens = token_count(docs.iter().map(|d| &d.lemmas)), "Assigned POS tags and lemmatised tokens");

    for doc in &mut docs {
        doc.lemmas.retain(|l| !players.contains(l));
    }
    info!(tokens = token_count(docs.iter().map(|d| &d.lemmas)), "Removed player-name tokens");

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for lemma in docs.iter().flat_map(|d| d.lemmas.iter()) {
        *counts.entry(lemma.as_str()).or_default() += 1;
    }
    let rare: HashSet<String> = counts
        .into_iter()
        .filter(|(_, count)| *count < options.rare_threshold)
        .map(|(lemma, _)| lemma.to_string())
        .collect();
    info!(
        rare_lemmas = rare.len(),
        threshold = options.rare_threshold,
        "Counted lemmas below the rare threshold"
    );
    for doc in &mut docs {
        doc.lemmas.retain(|l| !rare.contains(l));
    }
    info!(tokens = token_count(docs.iter().map(|d| &d.lemmas)), "Removed rare tokens");

    let before = docs.len();
    docs.retain(|d| !d.lemmas.is_empty());
    for doc in &mut docs {
        doc.lemmatised_text = doc.lemmas.join(" ");
    }
    info!(
        kept = docs.len(),
        dropped = before - docs.len(),
        "Rejoined lemmas and dropped empty articles"
    );

    if docs.is_empty() {
        return Err(PressError::EmptyCorpus(corpus.to_string()));
    }
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(content: &str) -> RawArticle {
        RawArticle {
            title: Some("t".to_string()),
            author: None,
            date: Some("2022-11-20T10:00:00Z".to_string()),
            content: content.to_string(),
        }
    }

    fn no_players() -> HashSet<String> {
        HashSet::new()
    }

    #[test]
    fn test_punctuation_and_alpha_checks() {
        assert!(is_punctuation(","));
        assert!(is_punctuation("."));
        assert!(!is_punctuation("..."));
        assert!(!is_punctuation("a"));
        assert!(is_alphabetic("stadium"));
        assert!(!is_alphabetic("2-0"));
        assert!(!is_alphabetic("n't"));
        assert!(!is_alphabetic(""));
    }

    #[test]
    fn test_full_pipeline_without_rare_filter() {
        let options = PreprocessOptions { rare_threshold: 1 };
        let docs = preprocess(
            "test",
            vec![article("The workers didn't get their wages. Stadiums were built in 2022!")],
            &no_players(),
            &options,
        )
        .unwrap();

        let doc = &docs[0];
        assert_eq!(doc.sentences.len(), 2);
        assert_eq!(doc.tokens, vec!["workers", "get", "wages", "stadiums", "built"]);
        assert_eq!(doc.lemmas, vec!["worker", "get", "wage", "stadium", "built"]);
        assert_eq!(doc.lemmatised_text, "worker get wage stadium built");
        assert_eq!(doc.pos_tags[0], ("workers".to_string(), "NNS"));
    }

    #[test]
    fn test_player_names_removed() {
        let players: HashSet<String> = ["messi".to_string()].into_iter().collect();
        let options = PreprocessOptions { rare_threshold: 1 };
        let docs = preprocess("test", vec![article("Messi lifted the trophy.")], &players, &options).unwrap();
        assert_eq!(docs[0].lemmas, vec!["lifted", "trophy"]);
    }

    #[test]
    fn test_rare_tokens_and_empty_articles_dropped() {
        let options = PreprocessOptions { rare_threshold: 2 };
        let docs = preprocess(
            "test",
            vec![
                article("Boycott boycott stadium."),
                article("Stadium heat."),
                article("Heat."),
                article("Unique."),
            ],
            &no_players(),
            &options,
        )
        .unwrap();

        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0].lemmas, vec!["boycott", "boycott", "stadium"]);
        assert_eq!(docs[1].lemmas, vec!["stadium", "heat"]);
        assert_eq!(docs[2].lemmatised_text, "heat");
    }

    #[test]
    fn test_everything_filtered_is_an_error() {
        let err = preprocess("The Sun", vec![article("The and of.")], &no_players(), &PreprocessOptions::default())
            .unwrap_err();
        assert!(matches!(err, PressError::EmptyCorpus(ref name) if name == "The Sun"));
    }
}
