//! The href ledger: every article link a crawl has queued, one per line.
//!
//! The ledger lives at `{data_dir}/{outlet}_hrefList.txt`. A fresh crawl
//! starts from an empty ledger; with slug dedupe enabled a link is skipped
//! when its last path segment is already recorded, which catches the same
//! article appearing under different section paths.

use std::collections::HashSet;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument};

/// Last non-empty path segment of a link, without query or fragment.
pub fn link_slug(link: &str) -> &str {
    let path = link.split(['?', '#']).next().unwrap_or(link);
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(path)
}

/// In-memory view of an outlet's href ledger.
#[derive(Debug)]
pub struct LinkLedger {
    path: PathBuf,
    links: Vec<String>,
    slugs: HashSet<String>,
    dedupe_by_slug: bool,
}

impl LinkLedger {
    /// Start a fresh ledger, removing any file left by a previous crawl.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn fresh(path: impl AsRef<Path>, dedupe_by_slug: bool) -> Result<Self, Box<dyn Error>> {
        let path = path.as_ref().to_path_buf();
        match fs::remove_file(&path).await {
            Ok(()) => info!("Removed previous href ledger"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(Box::new(e)),
        }
        Ok(LinkLedger {
            path,
            links: Vec::new(),
            slugs: HashSet::new(),
            dedupe_by_slug,
        })
    }

    /// Record `link`. Returns `false` when slug dedupe rejects it.
    pub fn admit(&mut self, link: &str) -> bool {
        let slug = link_slug(link).to_string();
        if self.dedupe_by_slug && self.slugs.contains(&slug) {
            debug!(%link, %slug, "Skipping duplicate article link");
            return false;
        }
        self.slugs.insert(slug);
        self.links.push(link.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Rewrite the ledger file with every admitted link.
    pub async fn flush(&self) -> Result<(), Box<dyn Error>> {
        let mut text = self.links.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        fs::write(&self.path, text).await?;
        Ok(())
    }
}
