//! Data models for scraped articles and their processed representations.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Outlet`]: The newspapers the crawlers and the pipeline know about
//! - [`RawArticle`]: A scraped article as stored in `{outlet}_articles.json`
//! - [`GuardianPage`]: A raw page from the Guardian content API
//! - [`ProcessedArticle`]: An article after the NLP pipeline has run
//!
//! The Guardian types use camelCase field names to match the API payload,
//! hence the `#[allow(non_snake_case)]` attributes.

use crate::error::PressError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// A newspaper covered by the crawlers and the analysis pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outlet {
    Times,
    Sun,
    Guardian,
    Mail,
}

impl Outlet {
    /// All outlets, in the order they are reported.
    pub const ALL: [Outlet; 4] = [Outlet::Times, Outlet::Sun, Outlet::Guardian, Outlet::Mail];

    /// The lowercase key used in file names and on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            Outlet::Times => "times",
            Outlet::Sun => "sun",
            Outlet::Guardian => "guardian",
            Outlet::Mail => "mail",
        }
    }

    /// Human readable newspaper name, used in log lines and plot legends.
    pub fn display_name(&self) -> &'static str {
        match self {
            Outlet::Times => "The Times",
            Outlet::Sun => "The Sun",
            Outlet::Guardian => "The Guardian",
            Outlet::Mail => "Daily Mail",
        }
    }
}

impl fmt::Display for Outlet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Outlet {
    type Err = PressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "times" => Ok(Outlet::Times),
            "sun" => Ok(Outlet::Sun),
            "guardian" => Ok(Outlet::Guardian),
            "mail" => Ok(Outlet::Mail),
            _ => Err(PressError::UnknownOutlet(s.to_string())),
        }
    }
}

/// A scraped article as emitted by the search-page crawlers.
///
/// Every field except `content` may be missing on the page, in which case
/// it is stored as `null`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawArticle {
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub date: Option<String>,
    #[serde(default)]
    pub content: String,
}

/// One page of Guardian content API search results.
///
/// Fields not modelled here are carried in `extra` so a page written back to
/// disk keeps everything the API returned.
#[derive(Debug, Deserialize, Serialize)]
pub struct GuardianPage {
    pub response: GuardianResponse,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `response` envelope of a Guardian search call.
///
/// Paging fields are optional so hand-trimmed pages still load.
#[allow(non_snake_case)]
#[derive(Debug, Deserialize, Serialize)]
pub struct GuardianResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currentPage: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
    #[serde(default)]
    pub results: Vec<GuardianResult>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single article in a Guardian search response.
#[allow(non_snake_case)]
#[derive(Debug, Deserialize, Serialize)]
pub struct GuardianResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub webTitle: String,
    pub webPublicationDate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webUrl: Option<String>,
    #[serde(default)]
    pub fields: GuardianFields,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `show-fields` payload; only `body` is requested.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GuardianFields {
    #[serde(default)]
    pub body: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<GuardianResult> for RawArticle {
    fn from(result: GuardianResult) -> Self {
        RawArticle {
            title: Some(result.webTitle),
            author: None,
            date: Some(result.webPublicationDate),
            content: result.fields.body,
        }
    }
}

/// An article after the NLP pipeline.
///
/// Carries the intermediate columns (sentences, tokens, tags) so that the
/// CSV export shows every step of the preprocessing.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedArticle {
    pub title: Option<String>,
    pub date: Option<String>,
    pub content: String,
    pub sentences: Vec<String>,
    pub tokens: Vec<String>,
    pub pos_tags: Vec<(String, &'static str)>,
    pub lemmas: Vec<String>,
    pub lemmatised_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outlet_from_str_is_case_insensitive() {
        assert_eq!("Times".parse::<Outlet>().unwrap(), Outlet::Times);
        assert_eq!("SUN".parse::<Outlet>().unwrap(), Outlet::Sun);
        assert_eq!(" guardian ".parse::<Outlet>().unwrap(), Outlet::Guardian);
        assert_eq!("mail".parse::<Outlet>().unwrap(), Outlet::Mail);
    }

    #[test]
    fn test_outlet_from_str_rejects_unknown() {
        let err = "telegraph".parse::<Outlet>().unwrap_err();
        assert!(matches!(err, PressError::UnknownOutlet(ref s) if s == "telegraph"));
    }

    #[test]
    fn test_raw_article_accepts_nulls() {
        let json = r#"{"title": null, "date": "2022-11-20T10:00:00.000Z", "content": "Text"}"#;
        let article: RawArticle = serde_json::from_str(json).unwrap();
        assert_eq!(article.title, None);
        assert_eq!(article.author, None);
        assert_eq!(article.content, "Text");
    }

    #[test]
    fn test_raw_article_skips_missing_author_on_write() {
        let article = RawArticle {
            title: Some("Headline".to_string()),
            author: None,
            date: None,
            content: "Body".to_string(),
        };
        let json = serde_json::to_string(&article).unwrap();
        assert!(!json.contains("author"));
        assert!(json.contains("\"date\":null"));
    }

    #[test]
    fn test_guardian_result_into_raw_article() {
        let json = r#"{
            "response": {
                "status": "ok",
                "results": [{
                    "webTitle": "Qatar kick off",
                    "webPublicationDate": "2022-11-20T16:00:00Z",
                    "fields": {"body": "Opening match text"}
                }]
            }
        }"#;
        let page: GuardianPage = serde_json::from_str(json).unwrap();
        let article: RawArticle = page.response.results.into_iter().next().unwrap().into();
        assert_eq!(article.title.as_deref(), Some("Qatar kick off"));
        assert_eq!(article.date.as_deref(), Some("2022-11-20T16:00:00Z"));
        assert_eq!(article.content, "Opening match text");
    }

    const API_PAGE: &str = r#"{
        "response": {
            "status": "ok",
            "userTier": "developer",
            "total": 1,
            "startIndex": 1,
            "pageSize": 200,
            "currentPage": 1,
            "pages": 1,
            "orderBy": "relevance",
            "results": [{
                "id": "football/2022/nov/20/qatar-ecuador",
                "type": "article",
                "sectionId": "football",
                "sectionName": "Football",
                "webPublicationDate": "2022-11-20T16:00:00Z",
                "webTitle": "Qatar kick off",
                "webUrl": "https://www.theguardian.com/football/2022/nov/20/qatar-ecuador",
                "apiUrl": "https://content.guardianapis.com/football/2022/nov/20/qatar-ecuador",
                "fields": {"body": "<p>Opening</p>", "wordcount": "812"},
                "isHosted": false,
                "pillarId": "pillar/sport",
                "pillarName": "Sport"
            }]
        }
    }"#;

    #[test]
    fn test_guardian_page_keeps_unmodelled_fields() {
        let original: Value = serde_json::from_str(API_PAGE).unwrap();
        let page: GuardianPage = serde_json::from_str(API_PAGE).unwrap();
        assert_eq!(page.response.extra["orderBy"], "relevance");
        assert_eq!(page.response.results[0].extra["sectionName"], "Football");

        let written = serde_json::to_value(&page).unwrap();
        assert_eq!(written, original);
    }

    #[test]
    fn test_guardian_page_missing_optional_fields_stay_missing() {
        let json = r#"{"response":{"results":[{"webTitle":"T","webPublicationDate":"2022-11-20"}]}}"#;
        let page: GuardianPage = serde_json::from_str(json).unwrap();
        let written = serde_json::to_value(&page).unwrap();
        assert_eq!(
            written,
            serde_json::json!({"response": {"results": [{
                "webTitle": "T",
                "webPublicationDate": "2022-11-20",
                "fields": {"body": ""}
            }]}})
        );
    }
}
