//! Text preprocessing: tokenization, filtering, tagging and lemmatization.
//!
//! # Submodules
//!
//! - [`tokenize`]: Sentence and word tokenizers
//! - [`stopwords`]: English stopword list
//! - [`pos`]: Penn Treebank part-of-speech tagger
//! - [`lemmatize`]: Noun lemmatizer
//! - [`pipeline`]: The full preprocessing sequence over a corpus

pub mod lemmatize;
pub mod pipeline;
pub mod pos;
pub mod stopwords;
pub mod tokenize;
