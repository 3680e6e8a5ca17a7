//! Command-line interface definitions for press_terms.
//!
//! This module defines the CLI arguments and subcommands using the `clap` crate.
//! Directory and key options can also be provided via environment variables.

use crate::analysis::trend::Bucket;
use crate::error::PressError;
use crate::models::Outlet;
use crate::nlp::pipeline::DEFAULT_RARE_THRESHOLD;
use clap::{Parser, Subcommand};

/// Command-line arguments for press_terms.
///
/// # Examples
///
/// ```sh
/// # Crawl every outlet, then build the Guardian term tables
/// press_terms crawl all --guardian-api-key YOUR_KEY
/// press_terms tfidf guardian
///
/// # Monthly trend of a term across three papers
/// press_terms trend boycott --outlets times,sun,guardian --bucket month
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory holding crawled articles and the player-name cache
    #[arg(short, long, global = true, env = "PRESS_DATA_DIR", default_value = "data")]
    pub data_dir: String,

    /// Directory for CSV tables and plots
    #[arg(short, long, global = true, env = "PRESS_OUTPUT_DIR", default_value = "output")]
    pub output_dir: String,

    /// Optional path to a crawl configuration YAML file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Lemmas occurring fewer times than this across an outlet are dropped
    #[arg(long, global = true, default_value_t = DEFAULT_RARE_THRESHOLD)]
    pub rare_threshold: usize,

    /// Download the squad list again instead of using the cached player names
    #[arg(long, global = true)]
    pub refresh_players: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Crawl search results for one outlet, or `all`
    Crawl {
        target: String,

        /// Guardian content API key
        #[arg(long, env = "GUARDIAN_API_KEY")]
        guardian_api_key: Option<String>,
    },

    /// Download and cache the World Cup squad player names
    Players,

    /// Run the NLP pipeline over an outlet's articles
    Preprocess {
        outlet: Outlet,

        /// Also write the processed articles to `{outlet}.csv`
        #[arg(long)]
        csv: bool,
    },

    /// Write the document-term matrix `{outlet}_dtm.csv`
    Dtm { outlet: Outlet },

    /// Write the TF-IDF matrix `{outlet}_tfidf.csv`
    Tfidf { outlet: Outlet },

    /// Write the per-term table `{outlet}_terms.csv`
    Terms {
        outlet: Outlet,

        /// Keep only the highest ranked terms
        #[arg(long)]
        top: Option<usize>,
    },

    /// Normalized TF-IDF of a term over time, as CSV and SVG
    Trend {
        term: String,

        #[arg(long, value_delimiter = ',', default_values_t = Outlet::ALL)]
        outlets: Vec<Outlet>,

        #[arg(long, value_enum, default_value_t = Bucket::Month)]
        bucket: Bucket,
    },

    /// Jaccard overlap of outlet vocabularies
    Overlap {
        #[arg(long, value_delimiter = ',', default_values_t = Outlet::ALL)]
        outlets: Vec<Outlet>,

        /// Compare only each outlet's highest ranked terms
        #[arg(long)]
        top: Option<usize>,
    },
}

/// Outlets named by a `crawl` target.
pub fn crawl_targets(target: &str) -> Result<Vec<Outlet>, PressError> {
    if target.trim().eq_ignore_ascii_case("all") {
        return Ok(Outlet::ALL.to_vec());
    }
    Ok(vec![target.parse()?])
}
