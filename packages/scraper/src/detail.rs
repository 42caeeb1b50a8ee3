//! Inmate detail page parsing.
//!
//! A detail page carries the inmate's name in a banner, a block of
//! label/value cells (personal and incarceration information) and up to
//! three section tables. Each part is optional on the page and parsed
//! independently.

use std::collections::BTreeMap;

use inmate_roster_models::DetailRecord;
use scraper::{ElementRef, Html};

use crate::element_text;
use crate::layout::CompiledLayout;
use crate::rows;
use crate::table::{TableRole, resolve};

/// Parses a detail page.
///
/// Sections whose table is not on the page come back as empty lists.
#[must_use]
pub fn parse_detail_page(html: &str, layout: &CompiledLayout) -> DetailRecord {
    let document = Html::parse_document(html);

    DetailRecord {
        name: extract_name(&document, layout),
        details: extract_details(&document, layout),
        charges: resolve(&document, layout, TableRole::Charges)
            .map(|table| rows::charges(&table))
            .unwrap_or_default(),
        bonds: resolve(&document, layout, TableRole::Bonds)
            .map(|table| rows::bonds(&table))
            .unwrap_or_default(),
        detainers: resolve(&document, layout, TableRole::Detainers)
            .map(|table| rows::detainers(&table))
            .unwrap_or_default(),
    }
}

/// Reads the name banner, dropping the `Name:` prefix.
fn extract_name(document: &Html, layout: &CompiledLayout) -> Option<String> {
    let banner = document.select(&layout.name_banner).next()?;
    let text = element_text(banner);
    let prefix = &layout.layout().name_prefix;
    let name = text.strip_prefix(prefix.as_str()).unwrap_or(&text).trim();
    (!name.is_empty()).then(|| name.to_owned())
}

/// Normalises a label cell's text: trims it and drops a trailing colon.
fn normalize_label(text: &str) -> &str {
    text.trim().trim_end_matches(':').trim_end()
}

/// Scans every label cell and pairs it with the next sibling cell.
///
/// Empty labels are skipped and a repeated label keeps its last value. The
/// value cell may carry the label class too; it is still the value.
fn extract_details(document: &Html, layout: &CompiledLayout) -> BTreeMap<String, String> {
    let mut details = BTreeMap::new();

    for label_cell in document.select(&layout.label_cells) {
        let text = element_text(label_cell);
        let label = normalize_label(&text);
        if label.is_empty() {
            continue;
        }

        let Some(value_cell) = next_cell(label_cell) else {
            continue;
        };

        details.insert(label.to_owned(), element_text(value_cell));
    }

    details
}

/// The next `td` or `th` sibling of `cell`.
fn next_cell(cell: ElementRef<'_>) -> Option<ElementRef<'_>> {
    cell.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| matches!(sibling.value().name(), "td" | "th"))
}
