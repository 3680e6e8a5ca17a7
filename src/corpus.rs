//! Loading stored articles back for analysis.
//!
//! Search-page outlets keep a single `{outlet}_articles.json` array. The
//! Guardian keeps one file per API page in `guardian_articles/`; every
//! `*.json` file there is read in file-name order and its results flattened.

use crate::error::PressError;
use crate::models::{GuardianPage, Outlet, RawArticle};
use crate::outputs::json::articles_path;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Load every stored article for `outlet`.
#[instrument(level = "info", skip(data_dir), fields(data_dir = %data_dir.display()))]
pub async fn load(outlet: Outlet, data_dir: &Path) -> Result<Vec<RawArticle>, Box<dyn Error>> {
    info!("Starting to load newspaper '{}'", outlet.display_name());
    let articles = match outlet {
        Outlet::Guardian => load_guardian(&data_dir.join("guardian_articles")).await?,
        _ => {
            let path = articles_path(data_dir, outlet);
            let text = fs::read_to_string(&path).await?;
            serde_json::from_str::<Vec<RawArticle>>(&text)?
        }
    };

    if articles.is_empty() {
        return Err(PressError::EmptyCorpus(outlet.display_name().to_string()).into());
    }
    info!(count = articles.len(), "Transformed JSON to article table");
    Ok(articles)
}

async fn load_guardian(dir: &Path) -> Result<Vec<RawArticle>, Box<dyn Error>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();

    let mut articles = Vec::new();
    for path in files {
        let text = fs::read_to_string(&path).await?;
        match serde_json::from_str::<GuardianPage>(&text) {
            Ok(page) => articles.extend(page.response.results.into_iter().map(RawArticle::from)),
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable Guardian page"),
        }
    }
    Ok(articles)
}
