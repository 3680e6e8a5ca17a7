//! Crawl configuration.
//!
//! Search-page outlets are described entirely by data: URL templates, a page
//! range and scrapy-style field selectors (`css::text`, `css::attr(name)`).
//! The built-in defaults reproduce the Sun, Times and Daily Mail search crawls
//! for "qatar world cup" plus the Guardian content API crawl. A YAML file
//! passed with `--config` replaces them wholesale.
//!
//! ```yaml
//! query: qatar world cup
//! user_agent: "Mozilla/5.0 ..."
//! max_retries: 3
//! outlets:
//!   - outlet: sun
//!     first_page_url: "https://www.thesun.co.uk/?s={query_plus}"
//!     page_url: "https://www.thesun.co.uk/page/{page}/?s={query_plus}"
//!     pages: { start: 2, end: 128 }
//!     link_selector: "a.teaser-anchor--search::attr(href)"
//!     title_selector: "h1.article__headline::text"
//!     date_selector: "span.article__timestamp::text"
//!     content_selector: "div.article__content p::text"
//! guardian:
//!   from_date: 2022-02-22
//!   pages: 15
//! ```

use crate::error::PressError;
use crate::models::Outlet;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

/// Browser user agent; the Daily Mail answers 403 to the reqwest default.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.1; WOW64) AppleWebKit/537.1 (KHTML, like Gecko) Chrome/22.0.1207.1 Safari/537.1";

/// Top-level crawl configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CrawlConfig {
    /// Search phrase substituted into every URL template.
    pub query: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Retries per request after the first failure.
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
    /// Article pages fetched concurrently per search page.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default)]
    pub outlets: Vec<SearchOutletConfig>,
    #[serde(default)]
    pub guardian: GuardianConfig,
}

/// A newspaper crawled through its own search result pages.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchOutletConfig {
    pub outlet: Outlet,
    /// First result page when it is shaped differently from the rest.
    #[serde(default)]
    pub first_page_url: Option<String>,
    /// Template for the remaining pages; `{page}` is replaced by the page number.
    pub page_url: String,
    pub pages: PageRange,
    pub link_selector: String,
    /// Prepended to relative article links (the Times and Mail return paths).
    #[serde(default)]
    pub link_prefix: Option<String>,
    pub title_selector: String,
    #[serde(default)]
    pub author_selector: Option<String>,
    pub date_selector: String,
    pub content_selector: String,
    /// Skip links whose last path segment is already in the href ledger.
    #[serde(default)]
    pub dedupe_by_slug: bool,
    /// Keep only articles published inside this window.
    #[serde(default)]
    pub date_window: Option<DateWindow>,
}

/// Page numbers `start..end` advancing by `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
    #[serde(default = "default_step")]
    pub step: u32,
}

impl PageRange {
    /// Expand the range, rejecting a zero step.
    pub fn numbers(&self) -> Result<Vec<u32>, PressError> {
        if self.step == 0 {
            return Err(PressError::InvalidPageRange {
                start: self.start,
                end: self.end,
                step: self.step,
            });
        }
        Ok((self.start..self.end).step_by(self.step as usize).collect())
    }
}

/// Inclusive publication date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }
}

/// Guardian content API crawl parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GuardianConfig {
    #[serde(default = "default_guardian_base")]
    pub base_url: String,
    pub from_date: NaiveDate,
    #[serde(default = "default_guardian_page_size")]
    pub page_size: u32,
    /// Number of result pages, fetched as `1..=pages`.
    pub pages: u32,
}

impl Default for GuardianConfig {
    fn default() -> Self {
        GuardianConfig {
            base_url: default_guardian_base(),
            from_date: NaiveDate::from_ymd_opt(2022, 2, 22).unwrap_or_default(),
            page_size: default_guardian_page_size(),
            pages: 15,
        }
    }
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_max_retries() -> usize {
    3
}

fn default_concurrency() -> usize {
    4
}

fn default_step() -> u32 {
    1
}

fn default_guardian_base() -> String {
    "https://content.guardianapis.com/".to_string()
}

fn default_guardian_page_size() -> u32 {
    200
}

impl Default for CrawlConfig {
    fn default() -> Self {
        let window = match (
            NaiveDate::from_ymd_opt(2022, 9, 1),
            NaiveDate::from_ymd_opt(2023, 2, 28),
        ) {
            (Some(from), Some(to)) => Some(DateWindow { from, to }),
            _ => None,
        };

        CrawlConfig {
            query: "qatar world cup".to_string(),
            user_agent: default_user_agent(),
            max_retries: default_max_retries(),
            concurrency: default_concurrency(),
            outlets: vec![
                SearchOutletConfig {
                    outlet: Outlet::Sun,
                    first_page_url: Some("https://www.thesun.co.uk/?s={query_plus}".to_string()),
                    page_url: "https://www.thesun.co.uk/page/{page}/?s={query_plus}".to_string(),
                    pages: PageRange { start: 2, end: 128, step: 1 },
                    link_selector: "a.teaser-anchor--search::attr(href)".to_string(),
                    link_prefix: None,
                    title_selector: "h1.article__headline::text".to_string(),
                    author_selector: Some("a.article__author-link::text".to_string()),
                    date_selector: "span.article__timestamp::text".to_string(),
                    content_selector: "div.article__content p::text".to_string(),
                    dedupe_by_slug: false,
                    date_window: None,
                },
                SearchOutletConfig {
                    outlet: Outlet::Times,
                    first_page_url: Some(
                        "https://www.thetimes.co.uk/search?filter=past_year&q={query}&source=search-page".to_string(),
                    ),
                    page_url: "https://www.thetimes.co.uk/search?filter=past_year&p={page}&q={query}&source=search-page"
                        .to_string(),
                    pages: PageRange { start: 2, end: 149, step: 1 },
                    link_selector: "ul.SearchResultList>li>div>h2>a::attr(href)".to_string(),
                    link_prefix: Some("https://www.thetimes.co.uk".to_string()),
                    title_selector: "title::text".to_string(),
                    author_selector: Some("meta[name='author']::attr(content)".to_string()),
                    date_selector: "time::attr(datetime)".to_string(),
                    content_selector: ".responsive__Paragraph-sc-1pktst5-0".to_string(),
                    dedupe_by_slug: false,
                    date_window: window,
                },
                SearchOutletConfig {
                    outlet: Outlet::Mail,
                    first_page_url: None,
                    page_url: "https://www.dailymail.co.uk/home/search.html?offset={page}&size=50&sel=site&searchPhrase={query_plus}&type=article&topic=World+Cup&days=last365days"
                        .to_string(),
                    pages: PageRange { start: 0, end: 2650, step: 50 },
                    link_selector: "h3.sch-res-title a::attr(href)".to_string(),
                    link_prefix: Some("https://www.dailymail.co.uk".to_string()),
                    title_selector: "div#js-article-text h2::text".to_string(),
                    author_selector: None,
                    date_selector: "time::attr(datetime)".to_string(),
                    content_selector: "div p.mol-para-with-font::text".to_string(),
                    dedupe_by_slug: true,
                    date_window: None,
                },
            ],
            guardian: GuardianConfig::default(),
        }
    }
}

impl CrawlConfig {
    /// The search-page configuration for `outlet`, if there is one.
    pub fn search_outlet(&self, outlet: Outlet) -> Option<&SearchOutletConfig> {
        self.outlets.iter().find(|o| o.outlet == outlet)
    }
}

/// Load the crawl configuration from `path`, or the built-in defaults.
#[instrument(level = "info")]
pub async fn load_config(path: Option<&str>) -> Result<CrawlConfig, Box<dyn Error>> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path).await?;
            let config: CrawlConfig = serde_yaml::from_str(&text)?;
            info!(path, outlets = config.outlets.len(), "Loaded crawl configuration");
            Ok(config)
        }
        None => {
            info!("Using built-in crawl configuration");
            Ok(CrawlConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_covers_search_outlets() {
        let config = CrawlConfig::default();
        assert!(config.search_outlet(Outlet::Sun).is_some());
        assert!(config.search_outlet(Outlet::Times).is_some());
        assert!(config.search_outlet(Outlet::Mail).is_some());
        assert!(config.search_outlet(Outlet::Guardian).is_none());
        assert_eq!(config.guardian.pages, 15);
        assert_eq!(config.guardian.page_size, 200);
    }

    #[test]
    fn test_mail_offsets() {
        let config = CrawlConfig::default();
        let mail = config.search_outlet(Outlet::Mail).unwrap();
        let pages = mail.pages.numbers().unwrap();
        assert_eq!(pages.first(), Some(&0));
        assert_eq!(pages.get(1), Some(&50));
        assert_eq!(pages.last(), Some(&2600));
        assert_eq!(pages.len(), 53);
    }

    #[test]
    fn test_zero_step_is_rejected() {
        let range = PageRange { start: 1, end: 10, step: 0 };
        assert!(matches!(range.numbers(), Err(PressError::InvalidPageRange { .. })));
    }

    #[test]
    fn test_times_window() {
        let config = CrawlConfig::default();
        let window = config.search_outlet(Outlet::Times).unwrap().date_window.unwrap();
        assert!(window.contains(NaiveDate::from_ymd_opt(2022, 9, 1).unwrap()));
        assert!(window.contains(NaiveDate::from_ymd_opt(2023, 2, 28).unwrap()));
        assert!(!window.contains(NaiveDate::from_ymd_opt(2022, 8, 31).unwrap()));
        assert!(!window.contains(NaiveDate::from_ymd_opt(2023, 3, 1).unwrap()));
    }

    #[test]
    fn test_yaml_overrides() {
        let yaml = r#"
query: euro 2024
outlets:
  - outlet: sun
    page_url: "https://example.com/page/{page}/?s={query_plus}"
    pages: { start: 1, end: 3 }
    link_selector: "a.result::attr(href)"
    title_selector: "h1::text"
    date_selector: "time::attr(datetime)"
    content_selector: "article p"
guardian:
  from_date: 2024-06-01
  pages: 2
"#;
        let config: CrawlConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.query, "euro 2024");
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.max_retries, 3);
        let sun = config.search_outlet(Outlet::Sun).unwrap();
        assert_eq!(sun.pages.numbers().unwrap(), vec![1, 2]);
        assert!(!sun.dedupe_by_slug);
        assert_eq!(config.guardian.page_size, 200);
        assert_eq!(config.guardian.base_url, "https://content.guardianapis.com/");
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("press.yaml");
        std::fs::write(&path, "query: test\n").unwrap();
        let config = load_config(Some(path.to_str().unwrap())).await.unwrap();
        assert_eq!(config.query, "test");
        assert!(config.outlets.is_empty());
        assert_eq!(config.guardian.pages, 15);
    }
}
