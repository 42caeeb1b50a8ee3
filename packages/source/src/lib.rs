#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Inmate lookup site access and the roster/detail crawl.
//!
//! A lookup site is described by a [`site_def::SiteDefinition`] loaded from
//! TOML and reached through the [`site::InmateSite`] trait. The
//! [`crawl`] module walks every roster page, then fetches one detail page per
//! inmate and merges the two into [`inmate_roster_models::InmateRecord`]s.

pub mod crawl;
pub mod progress;
pub mod registry;
pub mod site;
pub mod site_def;

/// Errors that can occur while talking to a lookup site.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error (reading a site definition file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The site definition is malformed.
    #[error("Site config error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },

    /// The site's page layout could not be compiled.
    #[error("Layout error: {0}")]
    Layout(#[from] inmate_roster_scraper::ScrapeError),
}
