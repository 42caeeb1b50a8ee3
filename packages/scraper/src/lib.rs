#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Markup adapter for inmate lookup pages.
//!
//! Everything that depends on how the lookup site lays out its HTML lives in
//! this crate: which class marks a label cell, how roster rows are named,
//! where the internal identifier hides inside a row's UI action, and which
//! header words identify the charges, bonds and detainer tables. The rest of
//! the toolchain only sees the record types from [`inmate_roster_models`].
//!
//! * [`layout`] describes and compiles the page conventions.
//! * [`table`] locates a table by its header text and maps detainer columns.
//! * [`rows`] turns the body rows of a located table into records.
//! * [`detail`] and [`roster`] parse whole pages.
//!
//! Parsing never fails on unexpected markup. Missing sections come back
//! empty and malformed rows are dropped with a `debug` log line.

pub mod detail;
pub mod layout;
pub mod roster;
pub mod rows;
pub mod table;

pub use detail::parse_detail_page;
pub use layout::{CompiledLayout, PageLayout};
pub use roster::parse_roster_page;

use scraper::ElementRef;

/// Errors that can occur while preparing the markup adapter.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// A CSS selector built from the page layout did not parse.
    #[error("Invalid CSS selector '{selector}': {message}")]
    Selector {
        /// The selector text.
        selector: String,
        /// Parser message.
        message: String,
    },
}

/// Returns the element's text with whitespace runs (including `&nbsp;`)
/// collapsed to single spaces and the ends trimmed.
#[must_use]
pub fn element_text(element: ElementRef<'_>) -> String {
    let text = element.text().collect::<String>();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns `Some(value)` for non-empty text.
#[must_use]
pub fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::*;

    #[test]
    fn collapses_whitespace_and_nbsp() {
        let html = Html::parse_fragment("<p>  DOE,&nbsp;&nbsp;JOHN\n <b>Q</b> </p>");
        let p = Selector::parse("p").unwrap();
        let element = html.select(&p).next().unwrap();
        assert_eq!(element_text(element), "DOE, JOHN Q");
    }

    #[test]
    fn non_empty_trims() {
        assert_eq!(non_empty("  X100 "), Some("X100".to_string()));
        assert_eq!(non_empty("   "), None);
    }
}
