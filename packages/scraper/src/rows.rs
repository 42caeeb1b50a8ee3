//! Row extraction for resolved section tables.
//!
//! Charges and bonds are read by fixed cell position; detainers are read
//! through the column map built from their header row. Rows with too few
//! cells, and rows that fail their section's retention check, are dropped.
//! Surviving rows keep page order.

use inmate_roster_models::{BondEntry, ChargeEntry, DetainerColumn, DetainerEntry};

use crate::non_empty;
use crate::table::{ResolvedTable, TableRole, cell_texts};

/// Cells a charges row must have.
pub const CHARGE_MIN_CELLS: usize = 6;

/// Cells a bonds row must have.
pub const BOND_MIN_CELLS: usize = 9;

/// Converts every body row of `table` with at least `min_cells` cells into a
/// record with `build`, keeping the ones `keep` accepts.
pub fn extract_rows<T>(
    table: &ResolvedTable<'_>,
    min_cells: usize,
    build: impl Fn(&[String]) -> T,
    keep: impl Fn(&T) -> bool,
) -> Vec<T> {
    let mut records = Vec::new();

    for (index, row) in table.body_rows().enumerate() {
        let cells = cell_texts(row);
        if cells.len() < min_cells {
            log::debug!(
                "{:?} row {index}: {} cells, need {min_cells}, skipping",
                table.role,
                cells.len(),
            );
            continue;
        }

        let record = build(&cells);
        if keep(&record) {
            records.push(record);
        } else {
            log::debug!("{:?} row {index}: missing key fields, skipping", table.role);
        }
    }

    records
}

fn cell(cells: &[String], index: usize) -> Option<String> {
    cells.get(index).and_then(|value| non_empty(value))
}

/// Extracts charges: case number, offense date, code, description, grade,
/// degree.
#[must_use]
pub fn charges(table: &ResolvedTable<'_>) -> Vec<ChargeEntry> {
    debug_assert_eq!(table.role, TableRole::Charges);
    extract_rows(
        table,
        CHARGE_MIN_CELLS,
        |cells| ChargeEntry {
            case_number: cell(cells, 0),
            offense_date: cell(cells, 1),
            code: cell(cells, 2),
            description: cell(cells, 3),
            grade: cell(cells, 4),
            degree: cell(cells, 5),
        },
        ChargeEntry::is_retained,
    )
}

/// Extracts bonds: case number, bond type, amount, status, percent, set by,
/// additional, set date, total.
#[must_use]
pub fn bonds(table: &ResolvedTable<'_>) -> Vec<BondEntry> {
    debug_assert_eq!(table.role, TableRole::Bonds);
    extract_rows(
        table,
        BOND_MIN_CELLS,
        |cells| BondEntry {
            case_number: cell(cells, 0),
            bond_type: cell(cells, 1).unwrap_or_default(),
            amount: cell(cells, 2),
            status: cell(cells, 3),
            percent: cell(cells, 4),
            set_by: cell(cells, 5),
            additional: cell(cells, 6),
            set_date: cell(cells, 7),
            total: cell(cells, 8),
        },
        BondEntry::is_retained,
    )
}

/// Extracts detainers through the header column map. A table without a
/// commitment number column yields nothing.
#[must_use]
pub fn detainers(table: &ResolvedTable<'_>) -> Vec<DetainerEntry> {
    if !table.columns.contains_key(&DetainerColumn::CompNumber) {
        log::debug!("Detainer table has no commitment number column");
        return Vec::new();
    }

    let min_cells = table.columns.values().max().map_or(0, |max| max + 1);

    extract_rows(
        table,
        min_cells,
        |cells| {
            DetainerEntry(
                table
                    .columns
                    .iter()
                    .map(|(column, index)| (*column, cells[*index].clone()))
                    .collect(),
            )
        },
        DetainerEntry::is_retained,
    )
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::*;
    use crate::layout::CompiledLayout;
    use crate::table::resolve;

    fn header(cells: &[&str]) -> String {
        let cells: String = cells
            .iter()
            .map(|c| format!("<td class=\"bodysmallbold\">{c}</td>"))
            .collect();
        format!("<tr>{cells}</tr>")
    }

    fn row(cells: &[&str]) -> String {
        let cells: String = cells.iter().map(|c| format!("<td>{c}</td>")).collect();
        format!("<tr>{cells}</tr>")
    }

    fn table(rows: &[String]) -> Html {
        Html::parse_document(&format!("<table>{}</table>", rows.concat()))
    }

    #[test]
    fn extracts_charge_positionally() {
        let document = table(&[
            header(&["Case #", "Offense Date", "Code", "Description", "Grade", "Degree"]),
            row(&["C-1", "2024-01-01", "X100", "Theft", "M", "1"]),
        ]);
        let resolved = resolve(&document, &CompiledLayout::default(), TableRole::Charges).unwrap();

        assert_eq!(
            charges(&resolved),
            vec![ChargeEntry {
                case_number: Some("C-1".to_string()),
                offense_date: Some("2024-01-01".to_string()),
                code: Some("X100".to_string()),
                description: Some("Theft".to_string()),
                grade: Some("M".to_string()),
                degree: Some("1".to_string()),
            }]
        );
    }

    #[test]
    fn drops_short_and_keyless_charge_rows() {
        let document = table(&[
            header(&["Case #", "Offense Date", "Code", "Description", "Grade", "Degree"]),
            row(&["C-1", "2024-01-01", "X100"]),
            row(&["C-2", "", "", "Remark only", "", ""]),
            row(&["C-3", "", "Y200", "Burglary", "F", "2"]),
            row(&["C-4", "2024-03-03", "", "Trespass", "M", "2"]),
        ]);
        let resolved = resolve(&document, &CompiledLayout::default(), TableRole::Charges).unwrap();

        let cases: Vec<_> = charges(&resolved)
            .into_iter()
            .map(|c| c.case_number.unwrap())
            .collect();
        assert_eq!(cases, vec!["C-3", "C-4"]);
    }

    #[test]
    fn extracts_bonds_and_drops_untyped() {
        let document = table(&[
            header(&[
                "Case #",
                "Bond Type",
                "Amount",
                "Status",
                "Percent",
                "Set By",
                "Additional",
                "Set Date",
                "Total",
            ]),
            row(&[
                "C-1", "CASH", "$500", "POSTED", "10", "COURT", "$0", "01/05/2024", "$500",
            ]),
            row(&["C-2", " ", "$100", "", "", "", "", "", "$100"]),
            row(&["C-3", "SURETY", "$900"]),
        ]);
        let resolved = resolve(&document, &CompiledLayout::default(), TableRole::Bonds).unwrap();
        let bonds = bonds(&resolved);

        assert_eq!(bonds.len(), 1);
        assert_eq!(bonds[0].bond_type, "CASH");
        assert_eq!(bonds[0].set_date.as_deref(), Some("01/05/2024"));
        assert_eq!(bonds[0].total.as_deref(), Some("$500"));
    }

    #[test]
    fn assigns_reordered_detainer_cells_by_header() {
        let document = table(&[
            header(&["Set By", "Comp No", "Total"]),
            row(&["JUDGE SMITH", "D-77", "$1,000"]),
            row(&["JUDGE JONES", "", "$5"]),
        ]);
        let resolved =
            resolve(&document, &CompiledLayout::default(), TableRole::Detainers).unwrap();
        let detainers = detainers(&resolved);

        assert_eq!(detainers.len(), 1);
        let detainer = &detainers[0];
        assert_eq!(detainer.get(DetainerColumn::SetBy), Some("JUDGE SMITH"));
        assert_eq!(detainer.get(DetainerColumn::CompNumber), Some("D-77"));
        assert_eq!(detainer.get(DetainerColumn::Total), Some("$1,000"));
        assert_eq!(detainer.get(DetainerColumn::IssuedBy), None);
    }

    #[test]
    fn detainer_rows_shorter_than_mapped_columns_are_dropped() {
        let document = table(&[
            header(&["Comp Number", "Comp Date", "Issued By"]),
            row(&["D-1", "2024-02-02"]),
            row(&["D-2", "2024-02-03", "ICE"]),
        ]);
        let resolved =
            resolve(&document, &CompiledLayout::default(), TableRole::Detainers).unwrap();
        let detainers = detainers(&resolved);

        assert_eq!(detainers.len(), 1);
        assert_eq!(detainers[0].comp_number(), Some("D-2"));
        assert_eq!(detainers[0].get(DetainerColumn::IssuedBy), Some("ICE"));
    }
}
