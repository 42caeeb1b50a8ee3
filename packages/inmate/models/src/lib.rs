#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Record types shared across the inmate roster toolchain.
//!
//! A crawl produces one [`RosterEntry`] per row of the paginated search
//! results and, for entries that carry a system identifier, one
//! [`DetailRecord`] scraped from the inmate's detail page. The two are
//! combined into an [`InmateRecord`], which is what the JSON checkpoint
//! stores and what the CSV export flattens.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumIter};

/// One row of a roster (search results) page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    /// Inmate name as listed in the results table.
    pub name: String,
    /// Booking number.
    pub booking_number: String,
    /// Permanent identifier assigned by the facility.
    pub permanent_id: String,
    /// Date of birth, verbatim.
    pub date_of_birth: String,
    /// Release date, verbatim. Empty for inmates still in custody.
    pub release_date: String,
    /// Internal identifier parsed out of the row's UI action. Without it the
    /// detail page cannot be requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_id: Option<String>,
}

/// One row of the charges table on a detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeEntry {
    /// Case number (`Case #`).
    pub case_number: Option<String>,
    /// Offense date.
    pub offense_date: Option<String>,
    /// Statute or offense code.
    pub code: Option<String>,
    /// Offense description.
    pub description: Option<String>,
    /// Grade (e.g. `M`, `F`).
    pub grade: Option<String>,
    /// Degree.
    pub degree: Option<String>,
}

impl ChargeEntry {
    /// A charge row is kept only when it names an offense date or a code.
    #[must_use]
    pub const fn is_retained(&self) -> bool {
        self.offense_date.is_some() || self.code.is_some()
    }
}

/// One row of the bonds table on a detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BondEntry {
    /// Case number the bond was set on.
    pub case_number: Option<String>,
    /// Bond type. Rows without one are discarded.
    pub bond_type: String,
    /// Bond amount, verbatim (currency formatting is left alone).
    pub amount: Option<String>,
    /// Bond status.
    pub status: Option<String>,
    /// Percent required.
    pub percent: Option<String>,
    /// Who set the bond.
    pub set_by: Option<String>,
    /// Additional amount.
    pub additional: Option<String>,
    /// Date the bond was set.
    pub set_date: Option<String>,
    /// Total amount.
    pub total: Option<String>,
}

impl BondEntry {
    /// A bond row is kept only when its bond type is non-empty.
    #[must_use]
    pub const fn is_retained(&self) -> bool {
        !self.bond_type.is_empty()
    }
}

/// The detainer columns the toolchain knows how to read.
///
/// Detainer tables list these in no fixed order and may omit any of them;
/// a column is identified by matching its header text against
/// [`DetainerColumn::header_tokens`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter)]
pub enum DetainerColumn {
    /// Commitment number.
    #[serde(rename = "Comp No")]
    CompNumber,
    /// Commitment date.
    #[serde(rename = "Comp Date")]
    CompDate,
    /// Issuing agency.
    #[serde(rename = "Issued By")]
    IssuedBy,
    /// Who set the detainer.
    #[serde(rename = "Set By")]
    SetBy,
    /// Total amount.
    #[serde(rename = "Total")]
    Total,
}

impl DetainerColumn {
    /// Header spellings that identify this column.
    #[must_use]
    pub const fn header_tokens(self) -> &'static [&'static str] {
        match self {
            Self::CompNumber => &["Comp No", "Comp Number", "Comp #"],
            Self::CompDate => &["Comp Date"],
            Self::IssuedBy => &["Issued By"],
            Self::SetBy => &["Set By"],
            Self::Total => &["Total"],
        }
    }

    /// Identifies the column a header cell belongs to, ignoring case.
    ///
    /// Returns `None` for header cells that are not detainer columns the
    /// toolchain reads.
    #[must_use]
    pub fn from_header(text: &str) -> Option<Self> {
        use strum::IntoEnumIterator as _;

        let text = text.to_ascii_lowercase();
        Self::iter().find(|column| {
            column
                .header_tokens()
                .iter()
                .any(|token| text.contains(&token.to_ascii_lowercase()))
        })
    }
}

/// One row of the detainer table, keyed by the columns present on the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetainerEntry(pub BTreeMap<DetainerColumn, String>);

impl DetainerEntry {
    /// Returns the value for a column, if the page had that column.
    #[must_use]
    pub fn get(&self, column: DetainerColumn) -> Option<&str> {
        self.0.get(&column).map(String::as_str)
    }

    /// Returns the commitment number.
    #[must_use]
    pub fn comp_number(&self) -> Option<&str> {
        self.get(DetainerColumn::CompNumber)
    }

    /// A detainer row is kept only when it has a non-empty commitment number.
    #[must_use]
    pub fn is_retained(&self) -> bool {
        self.comp_number().is_some_and(|value| !value.is_empty())
    }
}

/// Labels from the personal/incarceration section that the export reads.
///
/// The scraped details map keeps every label found on the page; these are
/// the ones with a fixed place in the flattened export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AsRefStr)]
pub enum DetailLabel {
    /// ICE (immigration) number.
    #[strum(serialize = "ICE Number")]
    IceNumber,
    /// Commitment date.
    #[strum(serialize = "Commitment Date")]
    CommitmentDate,
    /// Citizenship.
    #[strum(serialize = "Citizen")]
    Citizen,
    /// Country of birth.
    #[strum(serialize = "Country of Birth")]
    CountryOfBirth,
}

/// Everything scraped from a single detail page.
///
/// Sections that were not found on the page are empty rather than absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailRecord {
    /// Name from the page banner, when the banner was present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Label/value pairs from the personal and incarceration sections.
    #[serde(default)]
    pub details: BTreeMap<String, String>,
    /// Charges in page order.
    #[serde(default)]
    pub charges: Vec<ChargeEntry>,
    /// Bonds in page order.
    #[serde(default)]
    pub bonds: Vec<BondEntry>,
    /// Detainers in page order.
    #[serde(default)]
    pub detainers: Vec<DetainerEntry>,
}

/// Looks up a details value by label, falling back to a case-insensitive
/// match.
fn lookup_detail<'a>(details: &'a BTreeMap<String, String>, label: DetailLabel) -> Option<&'a str> {
    let key = label.as_ref();
    details
        .get(key)
        .or_else(|| {
            details
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v)
        })
        .map(String::as_str)
}

impl DetailRecord {
    /// Returns the value for one of the well-known labels.
    #[must_use]
    pub fn detail(&self, label: DetailLabel) -> Option<&str> {
        lookup_detail(&self.details, label)
    }
}

/// A roster entry merged with its detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InmateRecord {
    /// Name; the detail page's banner wins over the roster listing.
    pub name: String,
    /// Booking number.
    pub booking_number: String,
    /// Permanent identifier.
    pub permanent_id: String,
    /// Date of birth.
    pub date_of_birth: String,
    /// Release date.
    pub release_date: String,
    /// Internal system identifier, when the roster row exposed one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_id: Option<String>,
    /// Label/value pairs from the detail page.
    #[serde(default)]
    pub details: BTreeMap<String, String>,
    /// Charges.
    #[serde(default)]
    pub charges: Vec<ChargeEntry>,
    /// Bonds.
    #[serde(default)]
    pub bonds: Vec<BondEntry>,
    /// Detainers.
    #[serde(default)]
    pub detainers: Vec<DetainerEntry>,
}

impl InmateRecord {
    /// Builds a record from a roster entry alone, with empty detail sections.
    #[must_use]
    pub fn from_roster(entry: RosterEntry) -> Self {
        Self::merge(entry, DetailRecord::default())
    }

    /// Merges a detail page into its roster entry. Detail values win where
    /// both sides carry the same field.
    #[must_use]
    pub fn merge(entry: RosterEntry, detail: DetailRecord) -> Self {
        Self {
            name: detail.name.unwrap_or(entry.name),
            booking_number: entry.booking_number,
            permanent_id: entry.permanent_id,
            date_of_birth: entry.date_of_birth,
            release_date: entry.release_date,
            system_id: entry.system_id,
            details: detail.details,
            charges: detail.charges,
            bonds: detail.bonds,
            detainers: detail.detainers,
        }
    }

    /// Returns the value for one of the well-known detail labels.
    #[must_use]
    pub fn detail(&self, label: DetailLabel) -> Option<&str> {
        lookup_detail(&self.details, label)
    }

    /// Charge codes in page order, skipping charges without one.
    pub fn charge_codes(&self) -> impl Iterator<Item = &str> {
        self.charges.iter().filter_map(|c| c.code.as_deref())
    }

    /// Detainer commitment numbers in page order.
    pub fn detainer_comp_numbers(&self) -> impl Iterator<Item = &str> {
        self.detainers.iter().filter_map(DetainerEntry::comp_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(system_id: Option<&str>) -> RosterEntry {
        RosterEntry {
            name: "DOE, JOHN".to_string(),
            booking_number: "B-100".to_string(),
            permanent_id: "P-200".to_string(),
            date_of_birth: "01/02/1980".to_string(),
            release_date: String::new(),
            system_id: system_id.map(ToString::to_string),
        }
    }

    #[test]
    fn detail_name_wins_on_merge() {
        let detail = DetailRecord {
            name: Some("DOE, JOHN Q".to_string()),
            ..DetailRecord::default()
        };
        let merged = InmateRecord::merge(entry(Some("42")), detail);
        assert_eq!(merged.name, "DOE, JOHN Q");
        assert_eq!(merged.booking_number, "B-100");
        assert_eq!(merged.system_id.as_deref(), Some("42"));
    }

    #[test]
    fn roster_name_kept_without_banner() {
        let merged = InmateRecord::merge(entry(Some("42")), DetailRecord::default());
        assert_eq!(merged.name, "DOE, JOHN");
    }

    #[test]
    fn from_roster_has_empty_sections() {
        let record = InmateRecord::from_roster(entry(None));
        assert!(record.charges.is_empty());
        assert!(record.bonds.is_empty());
        assert!(record.detainers.is_empty());
        assert!(record.details.is_empty());
        assert_eq!(record.charge_codes().count(), 0);
    }

    #[test]
    fn detainer_columns_match_header_variants() {
        assert_eq!(
            DetainerColumn::from_header("Comp Number"),
            Some(DetainerColumn::CompNumber)
        );
        assert_eq!(
            DetainerColumn::from_header(" comp no "),
            Some(DetainerColumn::CompNumber)
        );
        assert_eq!(
            DetainerColumn::from_header("Comp Date"),
            Some(DetainerColumn::CompDate)
        );
        assert_eq!(
            DetainerColumn::from_header("Issued By"),
            Some(DetainerColumn::IssuedBy)
        );
        assert_eq!(DetainerColumn::from_header("Remarks"), None);
    }

    #[test]
    fn detainer_requires_comp_number() {
        let mut detainer = DetainerEntry::default();
        detainer.0.insert(DetainerColumn::SetBy, "JUDGE".to_string());
        assert!(!detainer.is_retained());

        detainer.0.insert(DetainerColumn::CompNumber, String::new());
        assert!(!detainer.is_retained());

        detainer.0.insert(DetainerColumn::CompNumber, "C-9".to_string());
        assert!(detainer.is_retained());
    }

    #[test]
    fn detainer_serializes_with_column_labels() {
        let mut detainer = DetainerEntry::default();
        detainer.0.insert(DetainerColumn::CompNumber, "C-9".to_string());
        detainer.0.insert(DetainerColumn::SetBy, "JUDGE".to_string());

        let json = serde_json::to_value(&detainer).unwrap();
        assert_eq!(json, serde_json::json!({"Comp No": "C-9", "Set By": "JUDGE"}));
    }

    #[test]
    fn charge_retained_with_code_or_date() {
        let mut charge = ChargeEntry::default();
        assert!(!charge.is_retained());
        charge.code = Some("X100".to_string());
        assert!(charge.is_retained());
        charge.code = None;
        charge.offense_date = Some("2024-01-01".to_string());
        assert!(charge.is_retained());
    }

    #[test]
    fn detail_lookup_ignores_case() {
        let mut details = BTreeMap::new();
        details.insert("COUNTRY OF BIRTH".to_string(), "USA".to_string());
        details.insert("Citizen".to_string(), "Y".to_string());
        let record = DetailRecord {
            details,
            ..DetailRecord::default()
        };
        assert_eq!(record.detail(DetailLabel::CountryOfBirth), Some("USA"));
        assert_eq!(record.detail(DetailLabel::Citizen), Some("Y"));
        assert_eq!(record.detail(DetailLabel::IceNumber), None);
    }
}
