//! Search-result page crawler.
//!
//! Walks an outlet's search result pages for the configured query, queues
//! every article link through the href ledger, and parses each article into
//! a [`RawArticle`] with the outlet's field selectors.
//!
//! # URL templates
//!
//! | Placeholder | Replaced by |
//! |-------------|-------------|
//! | `{query}` | percent-encoded query (`qatar%20world%20cup`) |
//! | `{query_plus}` | form-encoded query (`qatar+world+cup`) |
//! | `{page}` | page number or offset from the page range |

use crate::config::SearchOutletConfig;
use crate::error::PressError;
use crate::http::FetchAsync;
use crate::models::RawArticle;
use crate::scrapers::links::LinkLedger;
use crate::scrapers::selectors::FieldSelector;
use crate::utils::parse_article_date;
use futures::stream::{self, StreamExt};
use scraper::Html;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Substitute the query (and page, if given) into a URL template.
pub fn fill_template(template: &str, query: &str, page: Option<u32>) -> String {
    let encoded = urlencoding::encode(query);
    let plus = encoded.replace("%20", "+");
    let mut url = template
        .replace("{query_plus}", &plus)
        .replace("{query}", &encoded);
    if let Some(page) = page {
        url = url.replace("{page}", &page.to_string());
    }
    url
}

/// All search result page URLs for an outlet, in crawl order.
pub fn page_urls(config: &SearchOutletConfig, query: &str) -> Result<Vec<String>, PressError> {
    let mut urls = Vec::new();
    if let Some(first) = &config.first_page_url {
        urls.push(fill_template(first, query, None));
    }
    for page in config.pages.numbers()? {
        urls.push(fill_template(&config.page_url, query, Some(page)));
    }
    Ok(urls)
}

/// Turn an href from a result page into an absolute article URL.
///
/// With a prefix, relative links are prefixed verbatim; otherwise they are
/// resolved against the search page URL.
pub fn resolve_link(href: &str, prefix: Option<&str>, page_url: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }
    match prefix {
        Some(prefix) => Some(format!("{}{}", prefix.trim_end_matches('/'), ensure_leading_slash(href))),
        None => Url::parse(page_url)
            .and_then(|base| base.join(href))
            .map(|u| u.to_string())
            .ok(),
    }
}

fn ensure_leading_slash(href: &str) -> String {
    if href.starts_with('/') {
        href.to_string()
    } else {
        format!("/{href}")
    }
}

/// The compiled selectors for one outlet's article pages.
#[derive(Debug, Clone)]
pub struct ArticleSelectors {
    pub links: FieldSelector,
    pub title: FieldSelector,
    pub author: Option<FieldSelector>,
    pub date: FieldSelector,
    pub content: FieldSelector,
}

impl ArticleSelectors {
    pub fn from_config(config: &SearchOutletConfig) -> Result<Self, PressError> {
        Ok(ArticleSelectors {
            links: FieldSelector::parse(&config.link_selector)?,
            title: FieldSelector::parse(&config.title_selector)?,
            author: config
                .author_selector
                .as_deref()
                .map(FieldSelector::parse)
                .transpose()?,
            date: FieldSelector::parse(&config.date_selector)?,
            content: FieldSelector::parse(&config.content_selector)?,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Extract the raw hrefs from a search result page.
pub fn extract_links(html: &str, selectors: &ArticleSelectors) -> Vec<String> {
    let document = Html::parse_document(html);
    selectors.links.all(&document)
}

/// Parse an article page into a [`RawArticle`].
pub fn parse_article(html: &str, selectors: &ArticleSelectors) -> RawArticle {
    let document = Html::parse_document(html);
    RawArticle {
        title: non_empty(selectors.title.first(&document)),
        author: selectors
            .author
            .as_ref()
            .and_then(|sel| non_empty(sel.first(&document))),
        date: non_empty(selectors.date.first(&document)),
        content: selectors.content.all(&document).join(" "),
    }
}

/// Whether an article passes the outlet's date window (if any).
fn within_window(article: &RawArticle, config: &SearchOutletConfig) -> bool {
    let Some(window) = config.date_window else {
        return true;
    };
    article
        .date
        .as_deref()
        .and_then(parse_article_date)
        .is_some_and(|date| window.contains(date))
}

/// Crawl every search page of an outlet and return the parsed articles.
///
/// Failed pages and articles are logged and skipped. The href ledger is
/// written to `{data_dir}/{outlet}_hrefList.txt` after every search page.
#[instrument(level = "info", skip_all, fields(outlet = %config.outlet))]
pub async fn crawl<F: FetchAsync>(
    config: &SearchOutletConfig,
    query: &str,
    concurrency: usize,
    fetcher: &F,
    data_dir: &Path,
) -> Result<Vec<RawArticle>, Box<dyn Error>> {
    let selectors = ArticleSelectors::from_config(config)?;
    let pages = page_urls(config, query)?;
    let ledger_path = data_dir.join(format!("{}_hrefList.txt", config.outlet.key()));
    let mut ledger = LinkLedger::fresh(&ledger_path, config.dedupe_by_slug).await?;
    info!(pages = pages.len(), "Crawling search result pages");

    let mut articles = Vec::new();
    let mut out_of_window = 0usize;

    for page_url in &pages {
        let html = match fetcher.fetch(page_url).await {
            Ok(html) => html,
            Err(e) => {
                error!(error = %e, %page_url, "Search page fetch failed");
                continue;
            }
        };

        let queued: Vec<String> = extract_links(&html, &selectors)
            .iter()
            .filter_map(|href| resolve_link(href, config.link_prefix.as_deref(), page_url))
            .filter(|link| ledger.admit(link))
            .collect();
        ledger.flush().await?;
        debug!(%page_url, count = queued.len(), "Queued article links");

        let selectors = &selectors;
        let fetched: Vec<Option<RawArticle>> = stream::iter(queued)
            .map(|url| async move {
                match fetcher.fetch(&url).await {
                    Ok(body) => {
                        let article = parse_article(&body, selectors);
                        if article.content.trim().is_empty() {
                            warn!(%url, "Article page produced no content");
                        }
                        Some(article)
                    }
                    Err(e) => {
                        error!(error = %e, %url, "Article fetch failed");
                        None
                    }
                }
            })
            .buffered(concurrency.max(1))
            .collect()
            .await;

        for article in fetched.into_iter().flatten() {
            if within_window(&article, config) {
                articles.push(article);
            } else {
                out_of_window += 1;
            }
        }
    }

    info!(
        count = articles.len(),
        links = ledger.len(),
        out_of_window,
        "Crawled outlet"
    );
    Ok(articles)
}
