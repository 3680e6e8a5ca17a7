//! # press_terms
//!
//! Collects newspaper coverage of a search query and compares how the papers
//! write about it.
//!
//! ## Features
//!
//! - Crawls search result pages of The Sun, The Times and the Daily Mail, and
//!   the Guardian content API
//! - Preprocesses articles: tokenization, stopword, symbol, player-name and
//!   rare-token removal, POS tagging, lemmatization
//! - Builds per-outlet document-term and TF-IDF matrices
//! - Plots the normalized TF-IDF of a term over time
//! - Measures vocabulary overlap between outlets with the Jaccard index
//!
//! ## Usage
//!
//! ```sh
//! press_terms crawl all
//! press_terms preprocess guardian --csv
//! press_terms trend boycott --bucket week
//! press_terms overlap --top 500
//! ```
//!
//! ## Architecture
//!
//! 1. **Crawling**: Search pages are walked, links collected, articles fetched
//!    and stored as JSON under the data directory
//! 2. **Preprocessing**: Each outlet's corpus runs through the NLP pipeline
//! 3. **Vectorizing**: Lemmatised text becomes count and TF-IDF matrices
//! 4. **Analysis**: Term tables, trends and overlap are written as CSV and SVG

use clap::Parser;
use std::error::Error;
use std::path::Path;
use std::time::Duration as StdDuration;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod analysis;
mod cli;
mod config;
mod corpus;
mod error;
mod http;
mod models;
mod nlp;
mod outputs;
mod players;
mod scrapers;
mod utils;
mod vectorize;

use analysis::OutletAnalysis;
use cli::{Cli, Command, crawl_targets};
use config::{CrawlConfig, load_config};
use http::{HttpFetcher, RetryFetch};
use models::{Outlet, ProcessedArticle};
use nlp::lemmatize::lemmatize;
use nlp::pipeline::{PreprocessOptions, preprocess};
use outputs::{csv, plot};
use utils::ensure_writable_dir;

fn build_fetcher(config: &CrawlConfig) -> Result<RetryFetch<HttpFetcher>, Box<dyn Error>> {
    let http = HttpFetcher::new(&config.user_agent)?;
    Ok(RetryFetch::new(http, config.max_retries, StdDuration::from_secs(1)))
}

/// Load, filter and lemmatize one outlet's corpus.
#[instrument(level = "info", skip(args))]
async fn preprocess_outlet(args: &Cli, outlet: Outlet) -> Result<Vec<ProcessedArticle>, Box<dyn Error>> {
    let data_dir = Path::new(&args.data_dir);
    let articles = corpus::load(outlet, data_dir).await?;

    let config = load_config(args.config.as_deref()).await?;
    let fetcher = build_fetcher(&config)?;
    let players =
        players::load_player_tokens(&fetcher, &data_dir.join("players.txt"), args.refresh_players).await?;

    let options = PreprocessOptions {
        rare_threshold: args.rare_threshold,
    };
    Ok(preprocess(outlet.display_name(), articles, &players, &options)?)
}

async fn analyse_outlet(args: &Cli, outlet: Outlet) -> Result<OutletAnalysis, Box<dyn Error>> {
    let articles = preprocess_outlet(args, outlet).await?;
    Ok(OutletAnalysis::new(outlet, articles))
}

/// Analyse each outlet, skipping those without a usable corpus.
async fn analyse_outlets(args: &Cli, outlets: &[Outlet]) -> Vec<OutletAnalysis> {
    let mut analyses = Vec::with_capacity(outlets.len());
    for &outlet in outlets {
        match analyse_outlet(args, outlet).await {
            Ok(a) => analyses.push(a),
            Err(e) => warn!(%outlet, error = %e, "Skipping outlet"),
        }
    }
    analyses
}

#[instrument(level = "info", skip(args, guardian_api_key))]
async fn crawl(args: &Cli, target: &str, guardian_api_key: Option<&str>) -> Result<(), Box<dyn Error>> {
    let outlets = crawl_targets(target)?;
    ensure_writable_dir(&args.data_dir).await?;
    let config = load_config(args.config.as_deref()).await?;
    let fetcher = build_fetcher(&config)?;
    let data_dir = Path::new(&args.data_dir);

    let mut first_error = None;
    for outlet in outlets {
        info!(%outlet, query = %config.query, "Starting crawl");
        match scrapers::crawl_outlet(outlet, &config, &fetcher, guardian_api_key, data_dir).await {
            Ok(count) => info!(%outlet, count, "Crawl finished"),
            Err(e) => {
                error!(%outlet, error = %e, "Crawl failed");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }
    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("press_terms starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.data_dir, ?args.output_dir, ?args.command, "Parsed CLI arguments");

    let output_dir = Path::new(&args.output_dir);
    match &args.command {
        Command::Crawl {
            target,
            guardian_api_key,
        } => {
            crawl(&args, target, guardian_api_key.as_deref()).await?;
        }
        Command::Players => {
            ensure_writable_dir(&args.data_dir).await?;
            let config = load_config(args.config.as_deref()).await?;
            let fetcher = build_fetcher(&config)?;
            let cache = Path::new(&args.data_dir).join("players.txt");
            let tokens = players::load_player_tokens(&fetcher, &cache, true).await?;
            info!(count = tokens.len(), "Player-name tokens ready");
        }
        Command::Preprocess { outlet, csv: to_csv } => {
            let articles = preprocess_outlet(&args, *outlet).await?;
            info!(count = articles.len(), "Preprocessed articles");
            if *to_csv {
                ensure_writable_dir(&args.output_dir).await?;
                csv::write_processed(output_dir, *outlet, &articles).await?;
            }
        }
        Command::Dtm { outlet } => {
            ensure_writable_dir(&args.output_dir).await?;
            let analysis = analyse_outlet(&args, *outlet).await?;
            csv::write_dtm(output_dir, &analysis).await?;
        }
        Command::Tfidf { outlet } => {
            ensure_writable_dir(&args.output_dir).await?;
            let analysis = analyse_outlet(&args, *outlet).await?;
            csv::write_tfidf(output_dir, &analysis).await?;
        }
        Command::Terms { outlet, top } => {
            ensure_writable_dir(&args.output_dir).await?;
            let analysis = analyse_outlet(&args, *outlet).await?;
            let rows = analysis::terms::term_table(&analysis, *top);
            for row in rows.iter().take(10) {
                info!(term = %row.term, count = row.count, tfidf_sum = row.tfidf_sum, "Top term");
            }
            csv::write_terms(output_dir, *outlet, &rows).await?;
        }
        Command::Trend {
            term,
            outlets,
            bucket,
        } => {
            ensure_writable_dir(&args.output_dir).await?;
            let lemma = lemmatize(&term.trim().to_lowercase());
            if lemma != *term {
                info!(%term, %lemma, "Looking up the lemma of the term");
            }
            let analyses = analyse_outlets(&args, outlets).await;
            let series = analysis::trend::trends(&analyses, &lemma, *bucket)?;
            csv::write_trend(output_dir, &lemma, &series).await?;
            plot::write_trend_plot(output_dir, &lemma, &series).await?;
        }
        Command::Overlap { outlets, top } => {
            ensure_writable_dir(&args.output_dir).await?;
            let analyses = analyse_outlets(&args, outlets).await;
            let report = analysis::overlap::overlap(&analyses, *top)?;
            for pair in &report.pairs {
                info!(
                    a = %pair.outlet_a,
                    b = %pair.outlet_b,
                    intersection = pair.intersection,
                    union = pair.union,
                    jaccard = pair.jaccard,
                    "Vocabulary overlap"
                );
            }
            info!(count = report.shared_by_all.len(), "Terms shared by all outlets");
            csv::write_overlap(output_dir, &report).await?;
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
