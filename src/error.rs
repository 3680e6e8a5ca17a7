//! Validation errors raised by the analysis pipeline.
//!
//! I/O and network failures travel as `Box<dyn Error>` like the rest of the
//! application; this enum covers the cases where the input itself is wrong.

/// Errors for invalid input to the crawl and analysis commands.
#[derive(Debug, thiserror::Error)]
pub enum PressError {
    /// The outlet name is not one of the supported newspapers.
    #[error("outlet must be one of \"times\", \"sun\", \"guardian\" or \"mail\", got {0:?}")]
    UnknownOutlet(String),

    /// No articles were found (or none survived preprocessing).
    #[error("no articles available for {0}")]
    EmptyCorpus(String),

    /// The requested term does not occur in any selected vocabulary.
    #[error("term {0:?} is not in the vocabulary of any selected outlet")]
    UnknownTerm(String),

    /// Overlap statistics need at least two outlets.
    #[error("vocabulary overlap needs at least two outlets, got {0}")]
    TooFewOutlets(usize),

    /// A CSS selector from the crawl configuration could not be parsed.
    #[error("invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// A page range that would never terminate or is empty.
    #[error("invalid page range {start}..{end} step {step}")]
    InvalidPageRange { start: u32, end: u32, step: u32 },

    /// The Guardian content API needs a key.
    #[error("missing Guardian API key (pass --guardian-api-key or set GUARDIAN_API_KEY)")]
    MissingApiKey,
}
