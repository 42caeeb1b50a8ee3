//! Flat CSV export.
//!
//! One row per inmate. Charges and detainers collapse to their codes and
//! commitment numbers joined with `;`; the rest of their fields only live in
//! the checkpoint.

use std::io::Write;
use std::path::Path;

use inmate_roster_models::{DetailLabel, InmateRecord};
use serde::Serialize;

use crate::ExportError;

/// Separator for list-valued columns.
pub const LIST_SEPARATOR: &str = ";";

/// Column headers, in [`ExportRow`] field order.
pub const HEADERS: [&str; 8] = [
    "Name",
    "Booking Number",
    "ICE Number",
    "Commitment Date",
    "Citizen",
    "Country of Birth",
    "Charge Code",
    "Detainer Comp Number",
];

/// One CSV row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    /// Name.
    pub name: String,
    /// Booking number.
    pub booking_number: String,
    /// ICE number from the detail page.
    pub ice_number: String,
    /// Commitment date from the detail page.
    pub commitment_date: String,
    /// Citizenship from the detail page.
    pub citizen: String,
    /// Country of birth from the detail page.
    pub country_of_birth: String,
    /// Charge codes joined with [`LIST_SEPARATOR`].
    pub charge_codes: String,
    /// Detainer commitment numbers joined with [`LIST_SEPARATOR`].
    pub detainer_comp_numbers: String,
}

impl From<&InmateRecord> for ExportRow {
    fn from(record: &InmateRecord) -> Self {
        let detail = |label| record.detail(label).unwrap_or_default().to_owned();
        Self {
            name: record.name.clone(),
            booking_number: record.booking_number.clone(),
            ice_number: detail(DetailLabel::IceNumber),
            commitment_date: detail(DetailLabel::CommitmentDate),
            citizen: detail(DetailLabel::Citizen),
            country_of_birth: detail(DetailLabel::CountryOfBirth),
            charge_codes: record
                .charge_codes()
                .collect::<Vec<_>>()
                .join(LIST_SEPARATOR),
            detainer_comp_numbers: record
                .detainer_comp_numbers()
                .collect::<Vec<_>>()
                .join(LIST_SEPARATOR),
        }
    }
}

/// Writes `records` as CSV. The header row is written even when there are
/// no records.
///
/// # Errors
///
/// Returns [`ExportError`] if writing fails.
pub fn write_csv<W: Write>(writer: W, records: &[InmateRecord]) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(HEADERS)?;
    for record in records {
        csv_writer.serialize(ExportRow::from(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes `records` to a CSV file at `path`.
///
/// # Errors
///
/// Returns [`ExportError`] if the file cannot be written.
pub fn export_csv(path: &Path, records: &[InmateRecord]) -> Result<(), ExportError> {
    let file = std::fs::File::create(path)?;
    write_csv(file, records)?;
    log::info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}
