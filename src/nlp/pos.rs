//! Part-of-speech tagging with the Penn Treebank tagset.
//!
//! A lexicon covers closed-class words and frequent irregular verbs; open
//! class words are tagged from their suffix, falling back to `NN`. The tags
//! are carried through to the CSV export and are not used for filtering.

use once_cell::sync::Lazy;
use std::collections::HashMap;

static LEXICON: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    for w in ["the", "a", "an", "this", "that", "these", "those", "every", "each", "some", "any", "no"] {
        m.insert(w, "DT");
    }
    for w in [
        "in", "on", "at", "by", "for", "with", "about", "against", "between", "into", "through",
        "during", "before", "after", "above", "below", "from", "of", "over", "under", "despite",
        "amid", "since", "without", "within",
    ] {
        m.insert(w, "IN");
    }
    for w in ["i", "you", "he", "she", "it", "we", "they", "me", "him", "us", "them"] {
        m.insert(w, "PRP");
    }
    for w in ["my", "your", "his", "her", "its", "our", "their"] {
        m.insert(w, "PRP$");
    }
    for w in ["can", "could", "may", "might", "must", "shall", "should", "will", "would"] {
        m.insert(w, "MD");
    }
    for w in ["and", "but", "or", "nor", "yet"] {
        m.insert(w, "CC");
    }
    for w in ["not", "never", "very", "too", "also", "just", "now", "then", "here", "there", "still"] {
        m.insert(w, "RB");
    }
    for w in ["is", "does", "has", "says"] {
        m.insert(w, "VBZ");
    }
    for w in ["are", "am", "do", "have"] {
        m.insert(w, "VBP");
    }
    for w in [
        "was", "were", "did", "had", "said", "told", "made", "went", "got", "took", "came", "saw",
        "gave", "found", "left", "lost", "won", "beat", "became", "began", "held", "brought",
        "thought", "knew", "felt", "kept", "met", "paid", "ran", "sent", "spent", "stood", "wrote",
    ] {
        m.insert(w, "VBD");
    }
    for w in ["been", "done", "gone", "given", "taken", "seen", "known", "shown", "written", "chosen"] {
        m.insert(w, "VBN");
    }
    for w in ["be", "make", "take", "get", "give", "go", "see", "say", "win", "play", "host", "boycott"] {
        m.insert(w, "VB");
    }
    m.insert("to", "TO");
    for w in ["who", "whom", "what", "which"] {
        m.insert(w, "WP");
    }
    for w in ["when", "where", "why", "how"] {
        m.insert(w, "WRB");
    }
    for w in ["more", "better", "worse", "less"] {
        m.insert(w, "JJR");
    }
    for w in ["most", "best", "worst", "least"] {
        m.insert(w, "JJS");
    }
    m
});

const NOUN_SUFFIXES: [&str; 12] = [
    "tion", "sion", "ment", "ness", "ity", "ship", "ism", "ist", "ance", "ence", "hood", "dom",
];

const ADJECTIVE_SUFFIXES: [&str; 10] = ["ous", "ful", "able", "ible", "ive", "ical", "less", "ish", "ary", "ic"];

/// Tag a single token.
pub fn tag_word(word: &str) -> &'static str {
    let lower = word.to_lowercase();
    if let Some(tag) = LEXICON.get(lower.as_str()) {
        return *tag;
    }
    if lower.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') && lower.chars().any(|c| c.is_ascii_digit()) {
        return "CD";
    }
    if !lower.chars().any(char::is_alphanumeric) {
        return ".";
    }

    let len = lower.chars().count();
    if len > 4 && lower.ends_with("ly") {
        return "RB";
    }
    if len > 4 && lower.ends_with("ing") {
        return "VBG";
    }
    if len > 3 && lower.ends_with("ed") {
        return "VBD";
    }
    if len > 5 && lower.ends_with("iest") {
        return "JJS";
    }
    if let Some(suffix) = NOUN_SUFFIXES.iter().find(|s| lower.ends_with(*s)) {
        if len > suffix.len() + 1 {
            return "NN";
        }
    }
    if let Some(stem) = lower.strip_suffix('s') {
        if NOUN_SUFFIXES.iter().any(|s| stem.ends_with(s)) {
            return "NNS";
        }
    }
    if len > 4 && ADJECTIVE_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return "JJ";
    }
    if len > 3 && lower.ends_with('s') && !lower.ends_with("ss") && !lower.ends_with("us") && !lower.ends_with("is") {
        return "NNS";
    }
    "NN"
}

/// Tag every token, keeping the token alongside its tag.
pub fn tag(tokens: &[String]) -> Vec<(String, &'static str)> {
    tokens.iter().map(|t| (t.clone(), tag_word(t))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexicon_words() {
        assert_eq!(tag_word("the"), "DT");
        assert_eq!(tag_word("said"), "VBD");
        assert_eq!(tag_word("Should"), "MD");
    }

    #[test]
    fn test_suffix_rules() {
        assert_eq!(tag_word("quickly"), "RB");
        assert_eq!(tag_word("boycotting"), "VBG");
        assert_eq!(tag_word("criticised"), "VBD");
        assert_eq!(tag_word("exploitation"), "NN");
        assert_eq!(tag_word("tournaments"), "NNS");
        assert_eq!(tag_word("dangerous"), "JJ");
        assert_eq!(tag_word("workers"), "NNS");
        assert_eq!(tag_word("stadium"), "NN");
        assert_eq!(tag_word("status"), "NN");
    }

    #[test]
    fn test_numbers_and_punctuation() {
        assert_eq!(tag_word("2022"), "CD");
        assert_eq!(tag_word("6,500"), "CD");
        assert_eq!(tag_word("!"), ".");
    }

    #[test]
    fn test_tag_keeps_tokens() {
        let tokens = vec!["migrant".to_string(), "workers".to_string()];
        assert_eq!(
            tag(&tokens),
            vec![("migrant".to_string(), "NN"), ("workers".to_string(), "NNS")]
        );
    }
}
