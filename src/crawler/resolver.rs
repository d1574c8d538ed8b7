//! Link resolver for the payroll index page
//!
//! The portal has used two layouts over the years:
//! - Since 2013 every month has its own container, `#arquivos-YYYY-mes-MM`,
//!   holding only that month's files.
//! - Up to 2012 a whole year sits in one list, `ul#arquivos-YYYY`, and the
//!   month is only recognisable from the anchor text ("Março 2012").
//!
//! [`ResolveStrategy`] picks the layout for a period, and [`resolve`] applies it.

use crate::period::Period;
use crate::CrawlerError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Last year published with the single-list-per-year layout
pub const LAYOUT_CHANGE_YEAR: u32 = 2012;

/// A link to a disclosure file found on the index page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkNode {
    /// The raw `href` attribute
    pub href: String,

    /// `href` resolved against the index page URL
    pub url: Url,

    /// Visible anchor text, trimmed
    pub text: String,
}

/// Query used to locate the links of one period
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveStrategy {
    /// Every anchor inside the month's own container
    MonthContainer { container_id: String },

    /// Anchors inside the year list whose text contains the month label
    YearListText { list_id: String, label: String },
}

impl ResolveStrategy {
    /// Selects the strategy for a period
    pub fn for_period(period: Period) -> Self {
        if period.year() > LAYOUT_CHANGE_YEAR {
            Self::MonthContainer {
                container_id: format!(
                    "arquivos-{:04}-mes-{:02}",
                    period.year(),
                    period.month()
                ),
            }
        } else {
            Self::YearListText {
                list_id: format!("arquivos-{:04}", period.year()),
                label: period.label(),
            }
        }
    }

    /// CSS selector for the candidate anchors
    pub fn selector(&self) -> String {
        match self {
            Self::MonthContainer { container_id } => {
                format!("[id=\"{}\"] a[href]", container_id)
            }
            Self::YearListText { list_id, .. } => format!("ul[id=\"{}\"] a[href]", list_id),
        }
    }

    /// Returns true if a candidate anchor belongs to the period
    fn accepts(&self, element: &ElementRef<'_>) -> bool {
        match self {
            Self::MonthContainer { .. } => true,
            Self::YearListText { label, .. } => element.text().collect::<String>().contains(label),
        }
    }
}

/// Resolves the disclosure links of a period on the index page
///
/// Links are returned in document order. Anchors whose `href` cannot be
/// turned into an http(s) URL are skipped.
///
/// # Arguments
///
/// * `document` - The parsed index page
/// * `page_url` - URL the document was fetched from, for relative hrefs
/// * `period` - The period to look up
///
/// # Returns
///
/// * `Ok(Vec<LinkNode>)` - At least one link
/// * `Err(CrawlerError::NotFound)` - Nothing on the page matched the period
///
/// # Example
///
/// ```
/// use tjpb_crawler::crawler::resolve;
/// use tjpb_crawler::period::Period;
/// use scraper::Html;
/// use url::Url;
///
/// let html = r#"<div id="arquivos-2021-mes-03"><a href="/servidores/x.pdf">x</a></div>"#;
/// let document = Html::parse_document(html);
/// let page_url = Url::parse("https://example.com/folha").unwrap();
///
/// let links = resolve(&document, &page_url, Period::new(3, 2021).unwrap()).unwrap();
/// assert_eq!(links[0].url.as_str(), "https://example.com/servidores/x.pdf");
/// ```
pub fn resolve(
    document: &Html,
    page_url: &Url,
    period: Period,
) -> Result<Vec<LinkNode>, CrawlerError> {
    let strategy = ResolveStrategy::for_period(period);
    let selector_text = strategy.selector();
    tracing::debug!("Resolving {} with {:?} ({})", period, strategy, selector_text);

    let selector = Selector::parse(&selector_text).map_err(|e| CrawlerError::HtmlParse {
        url: page_url.to_string(),
        message: format!("invalid selector '{}': {}", selector_text, e),
    })?;

    let links: Vec<LinkNode> = document
        .select(&selector)
        .filter(|element| strategy.accepts(element))
        .filter_map(|element| link_node(&element, page_url))
        .collect();

    if links.is_empty() {
        return Err(CrawlerError::NotFound { period });
    }

    Ok(links)
}

/// Builds a link node from an anchor element
fn link_node(element: &ElementRef<'_>, page_url: &Url) -> Option<LinkNode> {
    let href = element.value().attr("href")?.trim();
    if href.is_empty() {
        return None;
    }

    let url = match page_url.join(href) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => url,
        _ => {
            tracing::debug!("Skipping unusable href '{}'", href);
            return None;
        }
    };

    Some(LinkNode {
        href: href.to_string(),
        url,
        text: element.text().collect::<String>().trim().to_string(),
    })
}
