//! Player-name tokens for the tournament squads.
//!
//! Coverage is full of player names, which drown out the vocabulary the
//! analysis is after. The squads page on Wikipedia carries every player in a
//! sortable `th[data-sort-value]` cell ("Surname, Forename" or a plain name);
//! each part becomes a lowercase token that the pipeline removes.
//!
//! The token list is cached in `{data_dir}/players.txt`, one per line.

use crate::http::FetchAsync;
use scraper::{Html, Selector};
use std::collections::{BTreeSet, HashSet};
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

pub const SQUADS_URL: &str = "https://en.wikipedia.org/wiki/2022_FIFA_World_Cup_squads";

/// Extract the lowercase name tokens from a squads page.
pub fn parse_player_tokens(html: &str) -> BTreeSet<String> {
    let document = Html::parse_document(html);
    let mut tokens = BTreeSet::new();
    let Ok(cells) = Selector::parse("th[data-sort-value]") else {
        return tokens;
    };

    for cell in document.select(&cells) {
        let Some(name) = cell.value().attr("data-sort-value") else {
            continue;
        };
        if name.contains(',') {
            tokens.extend(
                name.split(", ")
                    .map(|part| part.trim().to_lowercase())
                    .filter(|part| !part.is_empty()),
            );
        } else {
            tokens.extend(name.split_whitespace().map(str::to_lowercase));
        }
    }
    tokens
}

/// Download the squads page and extract the tokens.
#[instrument(level = "info", skip_all)]
pub async fn fetch_player_tokens<F: FetchAsync>(fetcher: &F) -> Result<BTreeSet<String>, Box<dyn Error>> {
    let html = fetcher.fetch(SQUADS_URL).await?;
    let tokens = parse_player_tokens(&html);
    info!(count = tokens.len(), "Fetched player-name tokens");
    Ok(tokens)
}

/// Read a cached token list.
pub async fn read_player_tokens(path: &Path) -> Result<HashSet<String>, Box<dyn Error>> {
    let text = fs::read_to_string(path).await?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// Write the token list, one per line, sorted.
pub async fn write_player_tokens(path: &Path, tokens: &BTreeSet<String>) -> Result<(), Box<dyn Error>> {
    let mut text = tokens.iter().cloned().collect::<Vec<_>>().join("\n");
    text.push('\n');
    fs::write(path, text).await?;
    Ok(())
}

/// The player tokens, from the cache when present unless `refresh` is set.
#[instrument(level = "info", skip(fetcher, cache))]
pub async fn load_player_tokens<F: FetchAsync>(
    fetcher: &F,
    cache: &Path,
    refresh: bool,
) -> Result<HashSet<String>, Box<dyn Error>> {
    if !refresh && fs::try_exists(cache).await.unwrap_or(false) {
        let tokens = read_player_tokens(cache).await?;
        info!(count = tokens.len(), path = %cache.display(), "Loaded cached player-name tokens");
        return Ok(tokens);
    }
    let tokens = fetch_player_tokens(fetcher).await?;
    write_player_tokens(cache, &tokens).await?;
    info!(path = %cache.display(), "Cached player-name tokens");
    Ok(tokens.into_iter().collect())
}
