//! Noun lemmatization.
//!
//! Tokens are lemmatized as nouns (the default part of speech for WordNet
//! style lemmatizers): irregular plurals come from an exception table, the
//! rest go through the inflectional suffix rules `ies→y`, `(s|x|z|ch|sh)es→$1`
//! and `s→`. Without a dictionary to confirm the result, words that only look
//! plural (`status`, `crisis`, `politics`, `glass`) are left untouched.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

static EXCEPTIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("men", "man"),
        ("women", "woman"),
        ("children", "child"),
        ("feet", "foot"),
        ("teeth", "tooth"),
        ("mice", "mouse"),
        ("geese", "goose"),
        ("oxen", "ox"),
        ("lives", "life"),
        ("wives", "wife"),
        ("knives", "knife"),
        ("leaves", "leaf"),
        ("halves", "half"),
        ("wolves", "wolf"),
        ("thieves", "thief"),
        ("shelves", "shelf"),
        ("criteria", "criterion"),
        ("phenomena", "phenomenon"),
        ("analyses", "analysis"),
        ("crises", "crisis"),
        ("theses", "thesis"),
        ("bases", "basis"),
        ("data", "datum"),
        ("media", "medium"),
        ("indices", "index"),
        ("matrices", "matrix"),
        ("movies", "movie"),
        ("cookies", "cookie"),
        ("ties", "tie"),
        ("buses", "bus"),
        ("headaches", "headache"),
        ("niches", "niche"),
    ]
    .into_iter()
    .collect()
});

static INVARIANT: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "news", "series", "species", "politics", "economics", "athletics", "physics",
        "mathematics", "ethics", "tactics", "statistics", "logistics", "olympics", "people",
        "police", "sheep", "deer", "fish", "aircraft", "means", "headquarters", "lens", "bias",
        "chaos", "always", "perhaps", "whereas", "sometimes",
    ]
    .into_iter()
    .collect()
});

/// Lemmatize a lowercase token as a noun.
pub fn lemmatize(word: &str) -> String {
    if let Some(lemma) = EXCEPTIONS.get(word) {
        return lemma.to_string();
    }
    if INVARIANT.contains(word) || word.chars().count() <= 3 {
        return word.to_string();
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix("ies") {
        if stem.chars().count() >= 2 {
            return format!("{stem}y");
        }
    }
    for suffix in ["sses", "xes", "zes", "ches", "shes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    match word.strip_suffix('s') {
        Some(stem) if !stem.ends_with('\'') => stem.to_string(),
        _ => word.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_plurals() {
        assert_eq!(lemmatize("fans"), "fan");
        assert_eq!(lemmatize("stadiums"), "stadium");
        assert_eq!(lemmatize("rights"), "right");
        assert_eq!(lemmatize("countries"), "country");
        assert_eq!(lemmatize("injuries"), "injury");
        assert_eq!(lemmatize("matches"), "match");
        assert_eq!(lemmatize("boxes"), "box");
        assert_eq!(lemmatize("clashes"), "clash");
        assert_eq!(lemmatize("witnesses"), "witness");
    }

    #[test]
    fn test_irregular_plurals() {
        assert_eq!(lemmatize("women"), "woman");
        assert_eq!(lemmatize("children"), "child");
        assert_eq!(lemmatize("lives"), "life");
        assert_eq!(lemmatize("media"), "medium");
    }

    #[test]
    fn test_words_that_look_plural() {
        for word in ["status", "crisis", "glass", "politics", "news", "gas", "his"] {
            assert_eq!(lemmatize(word), word);
        }
    }

    #[test]
    fn test_singular_words_unchanged() {
        assert_eq!(lemmatize("worker"), "worker");
        assert_eq!(lemmatize("qatar"), "qatar");
    }
}
