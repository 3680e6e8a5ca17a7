//! Guardian content API crawler.
//!
//! Unlike the other outlets the Guardian is queried through its JSON search
//! API with `show-fields=body`, so no result-page scraping is involved. Each
//! API page is stored as-is (with cleansed bodies) under
//! `{data_dir}/guardian_articles/Guardian_page_{n}.json`.
//!
//! # Body cleansing
//!
//! Article bodies arrive as HTML. Figures, captions (`span`) and asides are
//! dropped together with their content; all other markup is unwrapped to its
//! text, with a space wherever a block element ended.

use crate::config::GuardianConfig;
use crate::error::PressError;
use crate::http::FetchAsync;
use crate::models::GuardianPage;
use crate::outputs::json::write_guardian_page;
use crate::utils::truncate_for_log;
use scraper::{ElementRef, Html};
use std::error::Error;
use std::path::Path;
use tracing::{error, info, instrument, warn};
use url::Url;

const DECOMPOSE: [&str; 3] = ["figure", "span", "aside"];
const BLOCKS: [&str; 10] = ["p", "div", "li", "ol", "ul", "h2", "h3", "blockquote", "br", "time"];

/// Strip an article body down to its text.
pub fn cleanse_body(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut out = String::with_capacity(html.len() / 2);
    collect_text(fragment.root_element(), &mut out);
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child) = ElementRef::wrap(child) {
            let name = child.value().name();
            if DECOMPOSE.contains(&name) {
                continue;
            }
            collect_text(child, out);
            if BLOCKS.contains(&name) {
                out.push(' ');
            }
        }
    }
}

/// Build the search URL for one API page.
pub fn search_url(
    config: &GuardianConfig,
    query: &str,
    page: u32,
    api_key: &str,
) -> Result<Url, Box<dyn Error>> {
    let mut url = Url::parse(&config.base_url)?.join("search")?;
    url.query_pairs_mut()
        .append_pair("page-size", &config.page_size.to_string())
        .append_pair("page", &page.to_string())
        .append_pair("from-date", &config.from_date.format("%Y-%m-%d").to_string())
        .append_pair("q", query)
        .append_pair("show-fields", "body")
        .append_pair("api-key", api_key);
    Ok(url)
}

/// Crawl `1..=config.pages` API pages and store them.
///
/// Returns the number of articles written. Stops early once the API reports
/// fewer pages than requested.
#[instrument(level = "info", skip_all, fields(pages = config.pages))]
pub async fn crawl<F: FetchAsync>(
    config: &GuardianConfig,
    query: &str,
    api_key: Option<&str>,
    fetcher: &F,
    data_dir: &Path,
) -> Result<usize, Box<dyn Error>> {
    let api_key = api_key.ok_or(PressError::MissingApiKey)?;
    let out_dir = data_dir.join("guardian_articles");
    let mut total = 0usize;

    for page_number in 1..=config.pages {
        let url = search_url(config, query, page_number, api_key)?;
        // Never log the key.
        info!(page = page_number, "Requesting Guardian search page");

        let body = match fetcher.fetch(url.as_str()).await {
            Ok(body) => body,
            Err(e) => {
                error!(page = page_number, error = %e, "Guardian page fetch failed");
                continue;
            }
        };

        let mut page: GuardianPage = match serde_json::from_str(&body) {
            Ok(page) => page,
            Err(e) => {
                warn!(
                    page = page_number,
                    error = %e,
                    body_preview = %truncate_for_log(&body, 300),
                    "Guardian page was not valid JSON; skipping"
                );
                continue;
            }
        };

        for result in &mut page.response.results {
            result.fields.body = cleanse_body(&result.fields.body);
        }
        total += page.response.results.len();
        let last_page = page.response.pages;
        write_guardian_page(&out_dir, page_number, &page).await?;

        if last_page.is_some_and(|last| page_number >= last) {
            info!(page = page_number, "Reached last Guardian result page");
            break;
        }
    }

    info!(count = total, "Crawled Guardian articles");
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::cell::RefCell;

    #[test]
    fn test_cleanse_body_drops_figures_and_captions() {
        let html = r#"<p>Qatar <strong>opened</strong> the tournament.</p>
            <figure><img src="x.jpg"><figcaption>Photo caption</figcaption></figure>
            <p>Ecuador won <span class="credit">Getty</span>2-0.</p>
            <aside>Read more</aside><ul><li>One</li><li>Two</li></ul>"#;
        assert_eq!(
            cleanse_body(html),
            "Qatar opened the tournament. Ecuador won 2-0. One Two"
        );
    }

    #[test]
    fn test_cleanse_body_empty() {
        assert_eq!(cleanse_body(""), "");
    }

    #[test]
    fn test_search_url() {
        let config = GuardianConfig {
            base_url: "https://content.guardianapis.com/".to_string(),
            from_date: NaiveDate::from_ymd_opt(2022, 2, 22).unwrap(),
            page_size: 200,
            pages: 15,
        };
        let url = search_url(&config, "qatar world cup", 3, "KEY").unwrap();
        assert_eq!(
            url.as_str(),
            "https://content.guardianapis.com/search?page-size=200&page=3&from-date=2022-02-22&q=qatar+world+cup&show-fields=body&api-key=KEY"
        );
    }

    struct CannedApi {
        requested: RefCell<Vec<String>>,
    }

    impl FetchAsync for CannedApi {
        async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>> {
            self.requested.borrow_mut().push(url.to_string());
            Ok(r#"{"response": {"status": "ok", "currentPage": 1, "pages": 1, "results": [
                {"webTitle": "T", "webPublicationDate": "2022-11-20T16:00:00Z",
                 "fields": {"body": "<p>Hello <span>x</span>world</p>"}}]}}"#
                .to_string())
        }
    }

    #[tokio::test]
    async fn test_crawl_writes_cleansed_pages_and_stops_at_last() {
        let tmp = tempfile::tempdir().unwrap();
        let api = CannedApi {
            requested: RefCell::new(Vec::new()),
        };
        let config = GuardianConfig::default();
        let count = crawl(&config, "qatar world cup", Some("KEY"), &api, tmp.path())
            .await
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(api.requested.borrow().len(), 1);

        let stored = std::fs::read_to_string(tmp.path().join("guardian_articles/Guardian_page_1.json")).unwrap();
        let page: GuardianPage = serde_json::from_str(&stored).unwrap();
        assert_eq!(page.response.results[0].fields.body, "Hello world");
    }

    #[tokio::test]
    async fn test_crawl_requires_key() {
        let tmp = tempfile::tempdir().unwrap();
        let api = CannedApi {
            requested: RefCell::new(Vec::new()),
        };
        let err = crawl(&GuardianConfig::default(), "q", None, &api, tmp.path())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Guardian API key"));
    }

    struct FullApiPage;

    impl FetchAsync for FullApiPage {
        async fn fetch(&self, _url: &str) -> Result<String, Box<dyn Error>> {
            Ok(r#"{"response": {"status": "ok", "userTier": "developer", "total": 1,
                "startIndex": 1, "pageSize": 200, "currentPage": 1, "pages": 1,
                "orderBy": "relevance", "results": [
                {"id": "football/x", "type": "article", "sectionName": "Football",
                 "webTitle": "T", "webPublicationDate": "2022-11-20T16:00:00Z",
                 "webUrl": "https://www.theguardian.com/football/x",
                 "apiUrl": "https://content.guardianapis.com/football/x",
                 "pillarName": "Sport",
                 "fields": {"body": "<p>Hello <span>x</span>world</p>"}}]}}"#
                .to_string())
        }
    }

    #[tokio::test]
    async fn test_stored_page_keeps_api_fields() {
        let tmp = tempfile::tempdir().unwrap();
        crawl(&GuardianConfig::default(), "q", Some("KEY"), &FullApiPage, tmp.path())
            .await
            .unwrap();

        let stored = std::fs::read_to_string(tmp.path().join("guardian_articles/Guardian_page_1.json")).unwrap();
        let page: serde_json::Value = serde_json::from_str(&stored).unwrap();
        let response = &page["response"];
        for key in ["status", "userTier", "total", "startIndex", "pageSize", "currentPage", "pages", "orderBy"] {
            assert!(response.get(key).is_some(), "missing response.{key}");
        }
        let result = &response["results"][0];
        assert_eq!(result["type"], "article");
        assert_eq!(result["sectionName"], "Football");
        assert_eq!(result["apiUrl"], "https://content.guardianapis.com/football/x");
        assert_eq!(result["pillarName"], "Sport");
        assert_eq!(result["fields"]["body"], "Hello world");
    }
}
