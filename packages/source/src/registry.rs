//! Site registry. Loads the lookup site definitions embedded at compile
//! time.
//!
//! Each `.toml` file in `packages/source/sites/` is baked into the binary
//! via [`include_str!`]. Adding a site means adding a TOML file and listing
//! it below.

use crate::site_def::{SiteDefinition, parse_site_toml};

/// TOML configs embedded at compile time.
const SITE_TOMLS: &[(&str, &str)] = &[("default", include_str!("../sites/default.toml"))];

/// Returns all embedded site definitions.
///
/// # Panics
///
/// Panics if an embedded TOML config is malformed (the configs ship with
/// the binary, so this is caught by the tests below).
#[must_use]
pub fn all_sites() -> Vec<SiteDefinition> {
    SITE_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_site_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Looks up an embedded site definition by id.
#[must_use]
pub fn find_site(id: &str) -> Option<SiteDefinition> {
    all_sites().into_iter().find(|site| site.id == id)
}
