//! Utility functions for date parsing, string manipulation, and file system operations.
//!
//! This module provides helper functions used throughout the application:
//! - Publication date parsing for the formats each outlet emits
//! - String truncation and slugification for logging and file names
//! - File system validation for output directories

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Parse the publication date of an article.
///
/// The outlets disagree on formats, so several are tried in turn:
///
/// | Outlet | Example |
/// |--------|---------|
/// | Times | `2022-11-20T10:43:26.000Z` |
/// | Guardian | `2022-11-20T16:00:00Z` |
/// | Mail | `2022-11-20T10:43:26+0000` |
/// | Sun | `Published: 14:22, 17 Nov 2022` |
///
/// Returns `None` when nothing matches.
pub fn parse_article_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.fZ") {
        return Some(dt.date());
    }

    // "Published: 14:22, 17 Nov 2022" / "Updated: 9:05, 3 Dec 2022"
    let stripped = s.rsplit_once(": ").map(|(_, rest)| rest).unwrap_or(s).trim();
    for fmt in ["%H:%M, %d %b %Y", "%H:%M, %d %B %Y", "%d %b %Y", "%d %B %Y"] {
        if fmt.starts_with("%H") {
            if let Ok(dt) = NaiveDateTime::parse_from_str(stripped, fmt) {
                return Some(dt.date());
            }
        } else if let Ok(d) = NaiveDate::parse_from_str(stripped, fmt) {
            return Some(d);
        }
    }

    s.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` characters with an ellipsis and
/// byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Convert a term or title to a file-name friendly slug.
///
/// It lowercases the text, removes special characters, and replaces
/// spaces with hyphens.
pub fn slugify_title(title: &str) -> String {
    title
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != ' ' && c != '-', "")
        .replace(' ', "-")
}

/// Ensure a directory exists and is writable.
///
/// This function creates the directory if it doesn't exist, then performs
/// a write test by creating and immediately deleting a scratch file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Try a small sync write using std fs (simpler error surface)
    let scratch_path = format!("{}/..__write_check__", path.trim_end_matches('/'));
    match stdfs::File::create(&scratch_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&scratch_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
