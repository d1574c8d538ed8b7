//! Output naming for resolved links
//!
//! Every downloaded file gets a name derived from its link target and the
//! crawled period alone, so the same link always lands in the same file.

use crate::crawler::resolver::LinkNode;
use crate::period::Period;
use std::fmt;

/// Extension of every persisted file
pub const OUTPUT_EXTENSION: &str = "pdf";

/// Semantic category of a payroll file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Judges' payroll ("magistrados")
    Magistrates,
    /// Court staff payroll ("servidores")
    ServerStaff,
    /// Anything else published for the period
    Unclassified,
}

impl Category {
    /// Categories checked against a link target, highest priority first
    const MATCH_ORDER: [Category; 2] = [Category::Magistrates, Category::ServerStaff];

    /// Classifies a link target by substring match
    pub fn from_href(href: &str) -> Self {
        Self::MATCH_ORDER
            .into_iter()
            .find(|category| category.keyword().is_some_and(|k| href.contains(k)))
            .unwrap_or(Self::Unclassified)
    }

    /// The keyword that identifies this category in a link target
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            Self::Magistrates => Some("magistrados"),
            Self::ServerStaff => Some("servidores"),
            Self::Unclassified => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword().unwrap_or("unclassified"))
    }
}

/// Canonical file name stem, e.g. `remuneracoes-servidores-tjpb-03-2021`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OutputName(String);

impl OutputName {
    /// Builds the stem for a category and period
    pub fn new(category: Category, period: Period) -> Self {
        let name = match category.keyword() {
            Some(keyword) => format!(
                "remuneracoes-{}-tjpb-{:02}-{:04}",
                keyword,
                period.month(),
                period.year()
            ),
            None => format!(
                "remuneracoes-tjpb-{:02}-{:04}",
                period.month(),
                period.year()
            ),
        };
        Self(name)
    }

    /// Returns a copy with a numeric disambiguation suffix
    pub fn with_suffix(&self, n: usize) -> Self {
        Self(format!("{}-{}", self.0, n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name on disk: the stem plus `.pdf`
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.0, OUTPUT_EXTENSION)
    }
}

impl fmt::Display for OutputName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Classifies a resolved link and derives its output name
///
/// Pure and infallible; [`Category::Unclassified`] is a normal outcome.
pub fn classify(link: &LinkNode, period: Period) -> (Category, OutputName) {
    classify_href(&link.href, period)
}

/// Same as [`classify`], working on a bare link target
///
/// # Example
///
/// ```
/// use tjpb_crawler::crawler::{classify_href, Category};
/// use tjpb_crawler::period::Period;
///
/// let (category, name) = classify_href("/files/servidores/x.pdf", Period::new(3, 2021).unwrap());
/// assert_eq!(category, Category::ServerStaff);
/// assert_eq!(name.as_str(), "remuneracoes-servidores-tjpb-03-2021");
/// ```
pub fn classify_href(href: &str, period: Period) -> (Category, OutputName) {
    let category = Category::from_href(href);
    (category, OutputName::new(category, period))
}
