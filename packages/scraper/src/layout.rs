//! Page layout conventions of the lookup site.
//!
//! [`PageLayout`] is the serializable description (it lives in the site
//! definition TOML); [`CompiledLayout`] holds the parsed selectors the
//! parsers actually use.

use scraper::Selector;
use serde::Deserialize;

use crate::ScrapeError;
use crate::table::TableRole;

/// Class carried by label cells and table header cells.
pub const DEFAULT_LABEL_CLASS: &str = "bodysmallbold";

/// `id` prefix of roster result rows (`row0`, `row1`, ...).
pub const DEFAULT_ROSTER_ROW_PREFIX: &str = "row";

/// Attribute on a roster row holding its UI action string.
pub const DEFAULT_ROW_ACTION_ATTRIBUTE: &str = "onclick";

/// Selector for the banner that shows the inmate's name on a detail page.
pub const DEFAULT_NAME_BANNER_SELECTOR: &str = ".bodylargebold";

/// Prefix stripped from the banner text.
pub const DEFAULT_NAME_PREFIX: &str = "Name:";

/// How the lookup site marks up its pages.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    /// Class carried by label cells and section header cells.
    pub label_class: String,
    /// `id` prefix of roster result rows.
    pub roster_row_prefix: String,
    /// Attribute of a roster row that holds the UI action string.
    pub row_action_attribute: String,
    /// CSS selector for the detail page name banner.
    pub name_banner_selector: String,
    /// Prefix stripped from the banner text, when present.
    pub name_prefix: String,
    /// Header words that must all appear in the charges table header.
    pub charges_header_tokens: Vec<String>,
    /// Header words that must all appear in the bonds table header.
    pub bonds_header_tokens: Vec<String>,
    /// Header words that must all appear in the detainer table header.
    pub detainers_header_tokens: Vec<String>,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            label_class: DEFAULT_LABEL_CLASS.to_owned(),
            roster_row_prefix: DEFAULT_ROSTER_ROW_PREFIX.to_owned(),
            row_action_attribute: DEFAULT_ROW_ACTION_ATTRIBUTE.to_owned(),
            name_banner_selector: DEFAULT_NAME_BANNER_SELECTOR.to_owned(),
            name_prefix: DEFAULT_NAME_PREFIX.to_owned(),
            charges_header_tokens: vec!["Offense Date".to_owned(), "Code".to_owned()],
            bonds_header_tokens: vec!["Bond Type".to_owned(), "Amount".to_owned()],
            detainers_header_tokens: vec!["Comp".to_owned()],
        }
    }
}

impl PageLayout {
    /// Parses every selector the parsers need.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Selector`] if a configured class, prefix or
    /// selector does not produce valid CSS.
    pub fn compile(&self) -> Result<CompiledLayout, ScrapeError> {
        let class = &self.label_class;
        Ok(CompiledLayout {
            tables: parse_selector("table")?,
            cells: parse_selector("td")?,
            label_cells: parse_selector(&format!("td.{class}, th.{class}"))?,
            roster_rows: parse_selector(&format!(
                "tr[id^=\"{}\"]",
                self.roster_row_prefix.replace('"', "\\\"")
            ))?,
            name_banner: parse_selector(&self.name_banner_selector)?,
            layout: self.clone(),
        })
    }
}

/// Parses a CSS selector string, returning a [`ScrapeError`] on failure.
fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector).map_err(|e| ScrapeError::Selector {
        selector: selector.to_owned(),
        message: e.to_string(),
    })
}

/// A [`PageLayout`] with its selectors parsed.
#[derive(Debug, Clone)]
pub struct CompiledLayout {
    layout: PageLayout,
    pub(crate) tables: Selector,
    pub(crate) cells: Selector,
    pub(crate) label_cells: Selector,
    pub(crate) roster_rows: Selector,
    pub(crate) name_banner: Selector,
}

impl CompiledLayout {
    /// Returns the layout this was compiled from.
    #[must_use]
    pub const fn layout(&self) -> &PageLayout {
        &self.layout
    }

    /// Class carried by label and header cells.
    #[must_use]
    pub fn label_class(&self) -> &str {
        &self.layout.label_class
    }

    /// Header words identifying the table for `role`.
    #[must_use]
    pub fn header_tokens(&self, role: TableRole) -> &[String] {
        match role {
            TableRole::Charges => &self.layout.charges_header_tokens,
            TableRole::Bonds => &self.layout.bonds_header_tokens,
            TableRole::Detainers => &self.layout.detainers_header_tokens,
        }
    }
}

impl Default for CompiledLayout {
    fn default() -> Self {
        PageLayout::default()
            .compile()
            .unwrap_or_else(|_| unreachable!())
    }
}
