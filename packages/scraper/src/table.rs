//! Header-indexed table resolution.
//!
//! Detail pages nest tables inside layout tables and reuse the same classes
//! everywhere, so a section table is found by its header text rather than
//! by position: the first table (in document order) whose header row
//! contains every required token wins. Only a table's own rows and cells
//! are considered, never those of tables nested inside it.

use std::collections::BTreeMap;

use inmate_roster_models::DetainerColumn;
use scraper::{ElementRef, Html};

use crate::element_text;
use crate::layout::CompiledLayout;

/// Which section table is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableRole {
    /// Charges.
    Charges,
    /// Bonds.
    Bonds,
    /// Detainers.
    Detainers,
}

/// A section table located on a page.
#[derive(Debug, Clone)]
pub struct ResolvedTable<'a> {
    /// The section this table was resolved for.
    pub role: TableRole,
    /// The row identified as the header.
    pub header_row: ElementRef<'a>,
    /// Detainer column positions read from the header row. Empty for the
    /// positional sections.
    pub columns: BTreeMap<DetainerColumn, usize>,
    rows: Vec<ElementRef<'a>>,
    header_position: usize,
}

impl<'a> ResolvedTable<'a> {
    /// Every row of the table except the header row, in document order.
    pub fn body_rows(&self) -> impl Iterator<Item = ElementRef<'a>> + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != self.header_position)
            .map(|(_, row)| *row)
    }
}

/// Returns the `<tr>` elements belonging directly to `table`, looking
/// through `thead`/`tbody`/`tfoot` but not into nested tables.
#[must_use]
pub fn own_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut rows = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => rows.extend(
                child
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|el| el.value().name() == "tr"),
            ),
            _ => {}
        }
    }
    rows
}

/// Returns the `<td>`/`<th>` cells belonging directly to `row`.
#[must_use]
pub fn own_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "td" | "th"))
        .collect()
}

/// Returns the text of each of the row's own cells.
#[must_use]
pub fn cell_texts(row: ElementRef<'_>) -> Vec<String> {
    own_cells(row).into_iter().map(element_text).collect()
}

fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

/// A header row carries the label class, either on the row or on one of
/// its cells.
fn is_header_row(row: ElementRef<'_>, class: &str) -> bool {
    has_class(row, class) || own_cells(row).into_iter().any(|cell| has_class(cell, class))
}

/// Finds the table for `role` by matching its header tokens.
///
/// Returns `None` when no table on the page has a matching header row,
/// which is normal for inmates without charges, bonds or detainers.
#[must_use]
pub fn resolve<'a>(
    document: &'a Html,
    layout: &CompiledLayout,
    role: TableRole,
) -> Option<ResolvedTable<'a>> {
    let tokens = layout.header_tokens(role);
    let class = layout.label_class();

    for table in document.select(&layout.tables) {
        let rows = own_rows(table);
        let Some((header_position, header_row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| is_header_row(**row, class))
            .map(|(i, row)| (i, *row))
        else {
            continue;
        };

        let header_text = cell_texts(header_row).join(" ");
        if !tokens.iter().all(|token| header_text.contains(token.as_str())) {
            continue;
        }

        let columns = if role == TableRole::Detainers {
            let columns = detainer_columns(header_row);
            // "Comp" also matches labels like "Complexion"; a detainer
            // table must have a commitment number column.
            if !columns.contains_key(&DetainerColumn::CompNumber) {
                continue;
            }
            columns
        } else {
            BTreeMap::new()
        };

        return Some(ResolvedTable {
            role,
            header_row,
            columns,
            rows,
            header_position,
        });
    }

    log::debug!("No {role:?} table found on page");
    None
}

/// Maps each recognised detainer column to the position of its header
/// cell. Unrecognised header cells are ignored; if a column appears twice
/// the first occurrence is kept.
#[must_use]
pub fn detainer_columns(header_row: ElementRef<'_>) -> BTreeMap<DetainerColumn, usize> {
    let mut columns = BTreeMap::new();
    for (index, text) in cell_texts(header_row).iter().enumerate() {
        if let Some(column) = DetainerColumn::from_header(text) {
            columns.entry(column).or_insert(index);
        }
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    const NESTED: &str = r#"
        <html><body>
        <table class="layout"><tr><td>
            <table>
                <tr><td class="bodysmallbold">Bond Type</td><td class="bodysmallbold">Amount</td></tr>
                <tr><td>CASH</td><td>$500</td></tr>
            </table>
            <table>
                <tr><td class="bodysmallbold">Case #</td><td class="bodysmallbold">Offense Date</td><td class="bodysmallbold">Code</td></tr>
                <tr><td>C-1</td><td>2024-01-01</td><td>X100</td></tr>
            </table>
        </td></tr></table>
        </body></html>
    "#;

    #[test]
    fn resolves_nested_table_by_header_tokens() {
        let document = Html::parse_document(NESTED);
        let layout = CompiledLayout::default();

        let charges = resolve(&document, &layout, TableRole::Charges).unwrap();
        assert_eq!(cell_texts(charges.header_row)[1], "Offense Date");
        let body: Vec<Vec<String>> = charges.body_rows().map(cell_texts).collect();
        assert_eq!(body, vec![vec!["C-1", "2024-01-01", "X100"]]);

        let bonds = resolve(&document, &layout, TableRole::Bonds).unwrap();
        assert_eq!(cell_texts(bonds.header_row)[0], "Bond Type");
    }

    #[test]
    fn outer_table_does_not_claim_nested_rows() {
        let document = Html::parse_document(NESTED);
        let outer = document
            .select(&CompiledLayout::default().tables)
            .next()
            .unwrap();
        assert_eq!(own_rows(outer).len(), 1);
    }

    #[test]
    fn missing_section_is_none() {
        let document = Html::parse_document(NESTED);
        assert!(resolve(&document, &CompiledLayout::default(), TableRole::Detainers).is_none());
    }

    #[test]
    fn maps_reordered_detainer_columns() {
        let html = r#"<table>
            <tr class="bodysmallbold"><td>Set By</td><td>Remarks</td><td>Comp No</td><td>Total</td></tr>
        </table>"#;
        let document = Html::parse_document(html);
        let table = resolve(&document, &CompiledLayout::default(), TableRole::Detainers).unwrap();

        assert_eq!(table.columns.get(&DetainerColumn::SetBy), Some(&0));
        assert_eq!(table.columns.get(&DetainerColumn::CompNumber), Some(&2));
        assert_eq!(table.columns.get(&DetainerColumn::Total), Some(&3));
        assert!(!table.columns.contains_key(&DetainerColumn::IssuedBy));
    }

    #[test]
    fn detainer_match_requires_comp_number_column() {
        let html = r#"<table>
            <tr><td class="bodysmallbold">Complexion:</td><td>FAIR</td></tr>
        </table>
        <table>
            <tr><td class="bodysmallbold">Comp Date</td><td class="bodysmallbold">Set By</td></tr>
        </table>
        <table>
            <tr><td class="bodysmallbold">Comp Number</td><td class="bodysmallbold">Set By</td></tr>
            <tr><td>D-1</td><td>JUDGE</td></tr>
        </table>"#;
        let document = Html::parse_document(html);
        let table = resolve(&document, &CompiledLayout::default(), TableRole::Detainers).unwrap();
        assert_eq!(cell_texts(table.header_row)[0], "Comp Number");
    }

    #[test]
    fn header_row_need_not_be_first() {
        let html = r#"<table>
            <tr><td colspan="3">Charges</td></tr>
            <tr><td class="bodysmallbold">Offense Date</td><td class="bodysmallbold">Code</td></tr>
            <tr><td>2024-01-01</td><td>X100</td></tr>
        </table>"#;
        let document = Html::parse_document(html);
        let table = resolve(&document, &CompiledLayout::default(), TableRole::Charges).unwrap();
        assert_eq!(table.body_rows().count(), 2);
    }
}
