//! The NLTK English stopword list (179 words).

use once_cell::sync::Lazy;
use std::collections::HashSet;
use stop_words::LANGUAGE;

static STOPWORDS: Lazy<HashSet<String>> = Lazy::new(|| {
    stop_words::get(LANGUAGE::English)
        .iter()
        .map(|w| w.to_string())
        .collect()
});

/// Whether `word` (already lowercased) is an English stopword.
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(word)
}
