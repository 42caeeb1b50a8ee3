//! Roster (search results) page parsing.

use inmate_roster_models::RosterEntry;
use scraper::Html;

use crate::element_text;
use crate::layout::CompiledLayout;

/// Cells a roster row must have: name, booking number, permanent id, date
/// of birth and release date.
pub const ROSTER_MIN_CELLS: usize = 5;

/// Parses every roster row on a search results page, in page order.
///
/// Rows with fewer than [`ROSTER_MIN_CELLS`] cells are skipped. A row whose
/// action attribute is missing or unparseable still produces an entry, just
/// without a system identifier.
#[must_use]
pub fn parse_roster_page(html: &str, layout: &CompiledLayout) -> Vec<RosterEntry> {
    let document = Html::parse_document(html);
    let action_attribute = layout.layout().row_action_attribute.as_str();
    let mut entries = Vec::new();

    for row in document.select(&layout.roster_rows) {
        let cells: Vec<String> = row.select(&layout.cells).map(element_text).collect();
        let row_id = row.value().id().unwrap_or_default();

        if cells.len() < ROSTER_MIN_CELLS {
            log::debug!(
                "Roster row '{row_id}': {} cells, need {ROSTER_MIN_CELLS}, skipping",
                cells.len(),
            );
            continue;
        }

        let system_id = row.value().attr(action_attribute).and_then(parse_system_id);
        if system_id.is_none() {
            log::debug!("Roster row '{row_id}': no system id in {action_attribute}");
        }

        let mut cells = cells.into_iter();
        let mut next = || cells.next().unwrap_or_default();
        entries.push(RosterEntry {
            name: next(),
            booking_number: next(),
            permanent_id: next(),
            date_of_birth: next(),
            release_date: next(),
            system_id,
        });
    }

    entries
}

/// Pulls the system identifier out of a row action such as
/// `rowClicked('0','12345','1')`: the second quoted argument, i.e. the
/// fourth piece when the string is split on `'`.
#[must_use]
pub fn parse_system_id(action: &str) -> Option<String> {
    action
        .split('\'')
        .nth(3)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body><table>
            <tr><td class="bodysmallbold">Name</td><td>Booking #</td><td>PIN</td><td>DOB</td><td>Release</td></tr>
            <tr id="row0" onclick="rowClicked('0','1001','1')">
                <td>DOE, JOHN</td><td>B-1</td><td>P-1</td><td>01/01/1980</td><td></td>
            </tr>
            <tr id="row1">
                <td>ROE, JANE</td><td>B-2</td><td>P-2</td><td>02/02/1990</td><td>03/03/2024</td>
            </tr>
            <tr id="row2" onclick="rowClicked('2')">
                <td>POE, EDGAR</td><td>B-3</td><td>P-3</td><td>04/04/1970</td><td></td>
            </tr>
            <tr id="row3" onclick="rowClicked('3','1004','1')"><td>SHORT</td><td>B-4</td></tr>
            <tr id="header"><td>a</td><td>b</td><td>c</td><td>d</td><td>e</td></tr>
        </table></body></html>
    "#;

    #[test]
    fn parses_marked_rows_with_five_cells() {
        let entries = parse_roster_page(PAGE, &CompiledLayout::default());
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["DOE, JOHN", "ROE, JANE", "POE, EDGAR"]);

        let first = &entries[0];
        assert_eq!(first.booking_number, "B-1");
        assert_eq!(first.permanent_id, "P-1");
        assert_eq!(first.date_of_birth, "01/01/1980");
        assert_eq!(first.release_date, "");
        assert_eq!(first.system_id.as_deref(), Some("1001"));
        assert_eq!(entries[1].release_date, "03/03/2024");
    }

    #[test]
    fn missing_or_malformed_action_omits_system_id() {
        let entries = parse_roster_page(PAGE, &CompiledLayout::default());
        assert_eq!(entries[1].system_id, None);
        assert_eq!(entries[2].system_id, None);
    }

    #[test]
    fn empty_page_yields_nothing() {
        let entries = parse_roster_page(
            "<html><body><p>No inmates found</p></body></html>",
            &CompiledLayout::default(),
        );
        assert!(entries.is_empty());
    }

    #[test]
    fn parses_system_id_from_action() {
        assert_eq!(
            parse_system_id("rowClicked('0','12345','1')"),
            Some("12345".to_string())
        );
        assert_eq!(parse_system_id("rowClicked('0','','1')"), None);
        assert_eq!(parse_system_id("rowClicked()"), None);
        assert_eq!(parse_system_id(""), None);
    }
}
