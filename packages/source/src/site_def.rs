//! Config-driven lookup site definition.
//!
//! [`SiteDefinition`] captures the endpoints, form fields and page layout of
//! one inmate lookup deployment, so pointing the crawler at another
//! deployment of the same software means writing a TOML file rather than
//! code.

use std::collections::BTreeMap;
use std::path::Path;

use inmate_roster_scraper::{CompiledLayout, PageLayout};
use serde::Deserialize;

use crate::SourceError;

const fn default_page_size() -> usize {
    10
}

/// A complete lookup site definition.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteDefinition {
    /// Unique identifier (e.g. `"default"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Root URL every path is appended to, including the trailing slash.
    pub base_url: String,
    /// Rows requested per search page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Home page that establishes the session.
    pub home: HomeConfig,
    /// Search (roster) form.
    pub search: SearchConfig,
    /// Detail page form.
    pub detail: DetailConfig,
    /// Page markup conventions.
    #[serde(default)]
    pub layout: PageLayout,
}

/// The home page.
#[derive(Debug, Clone, Deserialize)]
pub struct HomeConfig {
    /// Path relative to `base_url`.
    pub path: String,
}

/// The search form that returns roster pages.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Path relative to `base_url`.
    pub path: String,
    /// Form field carrying the page size.
    pub page_size_field: String,
    /// Form field carrying the starting offset on follow-up pages.
    pub offset_field: String,
    /// Fields sent with every search.
    #[serde(default)]
    pub form: BTreeMap<String, String>,
    /// Fields that replace or extend `form` on follow-up pages.
    #[serde(default)]
    pub next_page_form: BTreeMap<String, String>,
}

/// The detail page form.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailConfig {
    /// Path relative to `base_url`.
    pub path: String,
    /// Form field carrying the system identifier.
    pub id_field: String,
    /// Fields sent with every detail request.
    #[serde(default)]
    pub form: BTreeMap<String, String>,
}

impl SiteDefinition {
    /// Joins `path` onto the base URL.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Builds the search form for the page starting at `offset`.
    ///
    /// The first page (offset 0) sends the plain search form; later pages
    /// overlay `next_page_form` and add the offset field.
    #[must_use]
    pub fn search_form(&self, offset: usize) -> BTreeMap<String, String> {
        let mut form = self.search.form.clone();
        form.insert(
            self.search.page_size_field.clone(),
            self.page_size.to_string(),
        );
        if offset > 0 {
            form.extend(self.search.next_page_form.clone());
            form.insert(self.search.offset_field.clone(), offset.to_string());
        }
        form
    }

    /// Builds the detail form for one inmate.
    #[must_use]
    pub fn detail_form(&self, system_id: &str) -> BTreeMap<String, String> {
        let mut form = self.detail.form.clone();
        form.insert(self.detail.id_field.clone(), system_id.to_owned());
        form
    }

    /// Compiles the page layout.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Layout`] if a layout selector is invalid.
    pub fn compile_layout(&self) -> Result<CompiledLayout, SourceError> {
        Ok(self.layout.compile()?)
    }
}

/// Parses a site definition from a TOML string.
///
/// # Errors
///
/// Returns [`SourceError::Config`] if the TOML is malformed or missing
/// required fields.
pub fn parse_site_toml(toml_str: &str) -> Result<SiteDefinition, SourceError> {
    toml::de::from_str(toml_str).map_err(|e| SourceError::Config {
        message: e.to_string(),
    })
}

/// Reads and parses a site definition file.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be read or parsed.
pub fn load_site_file(path: &Path) -> Result<SiteDefinition, SourceError> {
    let contents = std::fs::read_to_string(path)?;
    parse_site_toml(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        id = "test"
        name = "Test lookup"
        base_url = "http://lookup.test/app/"

        [home]
        path = "IML"

        [search]
        path = "/IML"
        page_size_field = "quantity"
        offset_field = "currentStart"
        form = { flow_action = "searchbyname", searchtype = "PIN" }
        next_page_form = { flow_action = "next" }

        [detail]
        path = "IML"
        id_field = "sysID"
        form = { flow_action = "edit" }
    "#;

    #[test]
    fn minimal_definition_uses_defaults() {
        let site = parse_site_toml(MINIMAL).unwrap();
        assert_eq!(site.page_size, 10);
        assert_eq!(site.layout, PageLayout::default());
        assert!(site.compile_layout().is_ok());
    }

    #[test]
    fn joins_urls_without_double_slashes() {
        let site = parse_site_toml(MINIMAL).unwrap();
        assert_eq!(site.url(&site.search.path), "http://lookup.test/app/IML");
    }

    #[test]
    fn first_search_page_has_no_offset() {
        let site = parse_site_toml(MINIMAL).unwrap();
        let form = site.search_form(0);
        assert_eq!(form.get("flow_action").map(String::as_str), Some("searchbyname"));
        assert_eq!(form.get("quantity").map(String::as_str), Some("10"));
        assert!(!form.contains_key("currentStart"));
    }

    #[test]
    fn later_search_pages_overlay_next_page_form() {
        let site = parse_site_toml(MINIMAL).unwrap();
        let form = site.search_form(11);
        assert_eq!(form.get("flow_action").map(String::as_str), Some("next"));
        assert_eq!(form.get("currentStart").map(String::as_str), Some("11"));
        assert_eq!(form.get("searchtype").map(String::as_str), Some("PIN"));
    }

    #[test]
    fn detail_form_carries_system_id() {
        let site = parse_site_toml(MINIMAL).unwrap();
        let form = site.detail_form("1001");
        assert_eq!(form.get("sysID").map(String::as_str), Some("1001"));
        assert_eq!(form.get("flow_action").map(String::as_str), Some("edit"));
    }

    #[test]
    fn rejects_missing_sections() {
        let err = parse_site_toml("id = \"x\"\nname = \"x\"\nbase_url = \"http://x/\"").unwrap_err();
        assert!(matches!(err, SourceError::Config { .. }));
    }

    #[test]
    fn bad_layout_selector_is_a_layout_error() {
        let toml = format!("{MINIMAL}\n[layout]\nname_banner_selector = \"[[\"\n");
        let site = parse_site_toml(&toml).unwrap();
        assert!(matches!(
            site.compile_layout(),
            Err(SourceError::Layout(_))
        ));
    }
}
