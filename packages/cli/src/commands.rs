//! The operations behind each subcommand, shared with the interactive menu.

use std::path::Path;

use inmate_roster_cli_utils::{IndicatifProgress, MultiProgress};
use inmate_roster_export::checkpoint::{Checkpoint, load_checkpoint, save_checkpoint};
use inmate_roster_export::csv_export::export_csv;
use inmate_roster_models::RosterEntry;
use inmate_roster_source::crawl::{CrawlOptions, CrawlSummary, crawl_roster};
use inmate_roster_source::registry::{all_sites, find_site};
use inmate_roster_source::site::{HttpInmateSite, InmateSite};
use inmate_roster_source::site_def::{SiteDefinition, load_site_file};

pub const DEFAULT_SITE_ID: &str = "default";
pub const DEFAULT_CHECKPOINT: &str = "inmates.json";
pub const DEFAULT_CSV: &str = "inmates.csv";

/// Where the site definition comes from.
pub enum SiteSelection<'a> {
    /// An embedded definition, by id.
    Embedded(&'a str),
    /// A TOML file on disk.
    File(&'a Path),
}

/// Resolves a [`SiteSelection`] to its definition.
///
/// # Errors
///
/// Returns an error if the id is unknown or the file cannot be loaded.
pub fn resolve_site(
    selection: SiteSelection<'_>,
) -> Result<SiteDefinition, Box<dyn std::error::Error>> {
    match selection {
        SiteSelection::Embedded(id) => {
            Ok(find_site(id).ok_or_else(|| format!("Unknown site: {id}"))?)
        }
        SiteSelection::File(path) => Ok(load_site_file(path)?),
    }
}

/// Crawls the site, saves the checkpoint, then writes the CSV.
///
/// The checkpoint is written before the CSV so a failed export can be
/// redone with [`export`].
///
/// # Errors
///
/// Returns an error if the site cannot be resolved, the crawl fails, or
/// either file cannot be written.
pub async fn crawl(
    multi: &MultiProgress,
    selection: SiteSelection<'_>,
    options: &CrawlOptions,
    checkpoint_path: &Path,
    csv_path: &Path,
) -> Result<CrawlSummary, Box<dyn std::error::Error>> {
    let site = resolve_site(selection)?;
    let layout = site.compile_layout()?;
    log::info!("Crawling {} ({})", site.name, site.base_url);

    let client = HttpInmateSite::new(site)?;
    let roster_progress = IndicatifProgress::roster_spinner(multi, "Fetching roster");
    let detail_progress = IndicatifProgress::details_bar(multi, "Fetching details");

    let outcome = inmate_roster_source::crawl::crawl(
        &client,
        &layout,
        options,
        &roster_progress,
        &detail_progress,
    )
    .await?;

    let summary = outcome.summary;
    if summary.without_system_id > 0 {
        log::warn!(
            "{} roster entries had no system id and were exported without details",
            summary.without_system_id
        );
    }

    let checkpoint = Checkpoint::new(&client.site().id, outcome.records);
    save_checkpoint(checkpoint_path, &checkpoint)?;
    export_csv(csv_path, &checkpoint.records)?;

    log::info!(
        "Done: {} pages, {} inmates, {} detail pages",
        summary.pages_fetched,
        summary.roster_size,
        summary.details_fetched
    );
    Ok(summary)
}

/// Crawls only the roster pages.
///
/// # Errors
///
/// Returns an error if the site cannot be resolved or a fetch fails.
pub async fn roster(
    multi: &MultiProgress,
    selection: SiteSelection<'_>,
    max_pages: Option<u32>,
) -> Result<Vec<RosterEntry>, Box<dyn std::error::Error>> {
    let site = resolve_site(selection)?;
    let layout = site.compile_layout()?;
    let client = HttpInmateSite::new(site)?;

    let progress = IndicatifProgress::roster_spinner(multi, "Fetching roster");
    let options = CrawlOptions {
        max_pages,
        skip_details: true,
    };

    client.open_home().await?;
    let (roster, _pages) = crawl_roster(&client, &layout, &options, &progress).await?;
    Ok(roster)
}

/// Writes the CSV export from a saved checkpoint.
///
/// # Errors
///
/// Returns an error if the checkpoint cannot be read or the CSV cannot be
/// written.
pub fn export(checkpoint_path: &Path, csv_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let checkpoint = load_checkpoint(checkpoint_path)?;
    if let Some(site_id) = &checkpoint.site_id {
        log::info!("Checkpoint is from site {site_id}");
    }
    export_csv(csv_path, &checkpoint.records)?;
    Ok(())
}

/// Prints the embedded site definitions as a table.
pub fn print_sites() {
    println!("{:<20} {:<40} URL", "ID", "NAME");
    println!("{}", "-".repeat(90));
    for site in all_sites() {
        println!("{:<20} {:<40} {}", site.id, site.name, site.base_url);
    }
}
