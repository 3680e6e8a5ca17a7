//! Scrapy-style field selectors.
//!
//! A field selector is a CSS selector with an optional extraction suffix:
//!
//! | Form | Yields |
//! |------|--------|
//! | `h1.headline::text` | the element's own text nodes, joined |
//! | `a.result::attr(href)` | the attribute value |
//! | `div.article p` | all descendant text of the element |

use crate::error::PressError;
use scraper::{ElementRef, Html, Selector};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Extract {
    OwnText,
    Attr(String),
    AllText,
}

/// A parsed CSS selector plus what to pull out of each match.
#[derive(Debug, Clone)]
pub struct FieldSelector {
    css: Selector,
    extract: Extract,
}

impl FieldSelector {
    /// Parse `css`, `css::text` or `css::attr(name)`.
    pub fn parse(input: &str) -> Result<Self, PressError> {
        let invalid = |reason: String| PressError::InvalidSelector {
            selector: input.to_string(),
            reason,
        };

        let (css, extract) = match input.rsplit_once("::") {
            Some((css, "text")) => (css, Extract::OwnText),
            Some((css, suffix)) if suffix.starts_with("attr(") && suffix.ends_with(')') => {
                let name = suffix["attr(".len()..suffix.len() - 1].trim();
                if name.is_empty() {
                    return Err(invalid("empty attribute name".to_string()));
                }
                (css, Extract::Attr(name.to_string()))
            }
            Some((_, suffix)) => return Err(invalid(format!("unknown suffix ::{suffix}"))),
            None => (input, Extract::AllText),
        };

        let css = Selector::parse(css.trim()).map_err(|e| invalid(e.to_string()))?;
        Ok(FieldSelector { css, extract })
    }

    fn value(&self, element: ElementRef<'_>) -> Option<String> {
        match &self.extract {
            Extract::Attr(name) => element.value().attr(name).map(str::to_string),
            Extract::OwnText => {
                let text: String = element
                    .children()
                    .filter_map(|child| child.value().as_text().map(|t| String::from(&**t)))
                    .collect();
                Some(text)
            }
            Extract::AllText => Some(element.text().collect::<String>()),
        }
    }

    /// The value from the first matching element.
    pub fn first(&self, document: &Html) -> Option<String> {
        document
            .select(&self.css)
            .find_map(|element| self.value(element))
    }

    /// Values from every matching element, in document order.
    pub fn all(&self, document: &Html) -> Vec<String> {
        document
            .select(&self.css)
            .filter_map(|element| self.value(element))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><head><title>Qatar 2022 | The Times</title>
        <meta name="author" content="Matt Lawton"></head>
        <body>
          <h1 class="article__headline">Kick-off <span>live</span></h1>
          <time datetime="2022-11-20T16:00:00.000Z">20 Nov</time>
          <div class="article__content">
            <p>First paragraph.</p>
            <p>Second <a href="/x">linked</a> paragraph.</p>
          </div>
          <a class="teaser-anchor--search" href="https://a.example/1">one</a>
          <a class="teaser-anchor--search" href="https://a.example/2">two</a>
        </body></html>
    "#;

    #[test]
    fn test_own_text_skips_children() {
        let doc = Html::parse_document(PAGE);
        let sel = FieldSelector::parse("h1.article__headline::text").unwrap();
        assert_eq!(sel.first(&doc).as_deref(), Some("Kick-off "));
    }

    #[test]
    fn test_all_text_includes_children() {
        let doc = Html::parse_document(PAGE);
        let sel = FieldSelector::parse("div.article__content p").unwrap();
        assert_eq!(sel.all(&doc), vec!["First paragraph.", "Second linked paragraph."]);
    }

    #[test]
    fn test_own_text_of_paragraphs() {
        let doc = Html::parse_document(PAGE);
        let sel = FieldSelector::parse("div.article__content p::text").unwrap();
        assert_eq!(sel.all(&doc), vec!["First paragraph.", "Second  paragraph."]);
    }

    #[test]
    fn test_attr_extraction() {
        let doc = Html::parse_document(PAGE);
        let links = FieldSelector::parse("a.teaser-anchor--search::attr(href)").unwrap();
        assert_eq!(links.all(&doc), vec!["https://a.example/1", "https://a.example/2"]);

        let author = FieldSelector::parse("meta[name='author']::attr(content)").unwrap();
        assert_eq!(author.first(&doc).as_deref(), Some("Matt Lawton"));

        let date = FieldSelector::parse("time::attr(datetime)").unwrap();
        assert_eq!(date.first(&doc).as_deref(), Some("2022-11-20T16:00:00.000Z"));
    }

    #[test]
    fn test_missing_match_is_none() {
        let doc = Html::parse_document(PAGE);
        let sel = FieldSelector::parse("h2.missing::text").unwrap();
        assert_eq!(sel.first(&doc), None);
        assert!(sel.all(&doc).is_empty());
    }

    #[test]
    fn test_invalid_selectors() {
        assert!(matches!(
            FieldSelector::parse("h1::html"),
            Err(PressError::InvalidSelector { .. })
        ));
        assert!(matches!(
            FieldSelector::parse("a::attr()"),
            Err(PressError::InvalidSelector { .. })
        ));
        assert!(matches!(
            FieldSelector::parse("###"),
            Err(PressError::InvalidSelector { .. })
        ));
    }
}
