//! Sentence and word tokenization.
//!
//! Word tokenization follows the Penn Treebank conventions closely enough for
//! term counting: punctuation is split from words, clitics are split off
//! (`don't` → `do` `n't`, `fan's` → `fan` `'s`), hyphenated words and scores
//! like `2-0` stay whole.

use once_cell::sync::Lazy;
use regex::Regex;

static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+(?:[-']\w+)*|[^\w\s]").expect("valid word regex"));

const CLITICS: [&str; 6] = ["'s", "'re", "'ve", "'ll", "'d", "'m"];

const ABBREVIATIONS: [&str; 20] = [
    "mr", "mrs", "ms", "dr", "st", "vs", "etc", "jr", "sr", "prof", "gen", "gov", "sen", "rep",
    "no", "fig", "inc", "ltd", "co", "mt",
];

/// Split `text` into sentences.
///
/// A sentence ends at `.`, `!` or `?` (plus any closing quotes or brackets)
/// when followed by whitespace and a token that can start a sentence. Titles
/// and single-letter initials before a full stop do not end a sentence.
pub fn sentences(text: &str) -> Vec<String> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut out = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;

    while i < chars.len() {
        let (pos, c) = chars[i];
        if !matches!(c, '.' | '!' | '?') {
            i += 1;
            continue;
        }

        let mut j = i + 1;
        while j < chars.len() && (matches!(chars[j].1, '.' | '!' | '?') || is_closing(chars[j].1)) {
            j += 1;
        }
        if j >= chars.len() || !chars[j].1.is_whitespace() {
            i = j;
            continue;
        }

        let mut k = j;
        while k < chars.len() && chars[k].1.is_whitespace() {
            k += 1;
        }
        let boundary = k < chars.len()
            && can_start_sentence(chars[k].1)
            && !(c == '.' && ends_with_abbreviation(&text[start..pos]));
        if boundary {
            push_trimmed(&mut out, &text[start..chars[j].0]);
            start = chars[k].0;
            i = k;
        } else {
            i = j;
        }
    }

    push_trimmed(&mut out, &text[start..]);
    out
}

fn push_trimmed(out: &mut Vec<String>, sentence: &str) {
    let sentence = sentence.trim();
    if !sentence.is_empty() {
        out.push(sentence.to_string());
    }
}

fn is_closing(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '’' | '”')
}

fn can_start_sentence(c: char) -> bool {
    c.is_uppercase() || c.is_ascii_digit() || matches!(c, '"' | '\'' | '(' | '[' | '‘' | '“')
}

fn ends_with_abbreviation(preceding: &str) -> bool {
    let Some(word) = preceding.split_whitespace().last() else {
        return false;
    };
    let word = word.trim_start_matches(|c: char| !c.is_alphanumeric());
    if word.contains('.') {
        return true;
    }
    let mut letters = word.chars();
    if let (Some(first), None) = (letters.next(), letters.next()) {
        if first.is_alphabetic() {
            return true;
        }
    }
    ABBREVIATIONS.contains(&word.to_lowercase().as_str())
}

/// Split `text` into word and punctuation tokens, preserving case.
pub fn words(text: &str) -> Vec<String> {
    let normalised = text.replace(['’', '‘'], "'");
    let mut out = Vec::new();
    for m in WORD_RE.find_iter(&normalised) {
        split_clitics(m.as_str(), &mut out);
    }
    out
}

fn split_clitics(token: &str, out: &mut Vec<String>) {
    let lower = token.to_lowercase();

    if lower == "cannot" {
        out.push(token[..3].to_string());
        out.push(token[3..].to_string());
        return;
    }
    if lower.ends_with("n't") && token.len() > 3 {
        let cut = token.len() - 3;
        out.push(token[..cut].to_string());
        out.push(token[cut..].to_string());
        return;
    }
    for clitic in CLITICS {
        if lower.ends_with(clitic) && token.len() > clitic.len() {
            let cut = token.len() - clitic.len();
            out.push(token[..cut].to_string());
            out.push(token[cut..].to_string());
            return;
        }
    }
    out.push(token.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentences_basic() {
        let text = "Qatar lost the opener. Ecuador scored twice! Was it fair? \"Yes,\" he said.";
        assert_eq!(
            sentences(text),
            vec![
                "Qatar lost the opener.",
                "Ecuador scored twice!",
                "Was it fair?",
                "\"Yes,\" he said."
            ]
        );
    }

    #[test]
    fn test_sentences_keep_abbreviations() {
        let text = "Mr. Infantino spoke in Doha. He was defiant. Gareth S. Southgate agreed.";
        assert_eq!(
            sentences(text),
            vec![
                "Mr. Infantino spoke in Doha.",
                "He was defiant.",
                "Gareth S. Southgate agreed."
            ]
        );
    }

    #[test]
    fn test_sentences_need_capital_after_stop() {
        let text = "The score was 2.1 on average. fans left early";
        assert_eq!(sentences(text), vec!["The score was 2.1 on average. fans left early"]);
    }

    #[test]
    fn test_sentences_closing_quote() {
        let text = "He said \"we will win.\" They did not.";
        assert_eq!(sentences(text), vec!["He said \"we will win.\"", "They did not."]);
    }

    #[test]
    fn test_sentences_empty() {
        assert!(sentences("   ").is_empty());
    }

    #[test]
    fn test_words_split_punctuation() {
        assert_eq!(
            words("Qatar, the hosts, lost 2-0."),
            vec!["Qatar", ",", "the", "hosts", ",", "lost", "2-0", "."]
        );
    }

    #[test]
    fn test_words_split_clitics() {
        assert_eq!(words("don't"), vec!["do", "n't"]);
        assert_eq!(words("England's fans"), vec!["England", "'s", "fans"]);
        assert_eq!(words("they’re here"), vec!["they", "'re", "here"]);
        assert_eq!(words("Cannot"), vec!["Can", "not"]);
    }

    #[test]
    fn test_words_keep_hyphenated() {
        assert_eq!(words("world-cup build-up"), vec!["world-cup", "build-up"]);
    }
}
