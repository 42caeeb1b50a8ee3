//! Menu-driven mode used when no subcommand is given.

use std::path::PathBuf;

use dialoguer::{Confirm, Input, Select};
use inmate_roster_cli_utils::MultiProgress;
use inmate_roster_source::crawl::CrawlOptions;
use inmate_roster_source::registry::all_sites;

use crate::commands::{self, SiteSelection};

/// Top-level actions in the interactive menu.
enum Action {
    Crawl,
    Roster,
    Export,
    ListSites,
}

impl Action {
    const ALL: &[Self] = &[Self::Crawl, Self::Roster, Self::Export, Self::ListSites];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Crawl => "Crawl roster and details",
            Self::Roster => "Crawl roster only (print JSON)",
            Self::Export => "Export CSV from checkpoint",
            Self::ListSites => "List sites",
        }
    }
}

/// Prompts for an action and its settings, then runs it.
///
/// # Errors
///
/// Returns an error if a prompt fails or the selected operation fails.
pub async fn run(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    println!("Inmate Roster");
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();
    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Action::ALL[idx] {
        Action::Crawl => {
            let site_id = prompt_site()?;
            let max_pages = prompt_max_pages()?;
            let skip_details = !Confirm::new()
                .with_prompt("Fetch detail pages?")
                .default(true)
                .interact()?;
            let checkpoint = prompt_path("Checkpoint file", commands::DEFAULT_CHECKPOINT)?;
            let output = prompt_path("CSV file", commands::DEFAULT_CSV)?;

            let options = CrawlOptions {
                max_pages,
                skip_details,
            };
            commands::crawl(
                multi,
                SiteSelection::Embedded(&site_id),
                &options,
                &checkpoint,
                &output,
            )
            .await?;
        }
        Action::Roster => {
            let site_id = prompt_site()?;
            let max_pages = prompt_max_pages()?;
            let roster =
                commands::roster(multi, SiteSelection::Embedded(&site_id), max_pages).await?;
            println!("{}", serde_json::to_string_pretty(&roster)?);
        }
        Action::Export => {
            let checkpoint = prompt_path("Checkpoint file", commands::DEFAULT_CHECKPOINT)?;
            let output = prompt_path("CSV file", commands::DEFAULT_CSV)?;
            commands::export(&checkpoint, &output)?;
        }
        Action::ListSites => commands::print_sites(),
    }

    Ok(())
}

/// Picks an embedded site, skipping the prompt when there is only one.
fn prompt_site() -> Result<String, Box<dyn std::error::Error>> {
    let sites = all_sites();
    if sites.len() <= 1 {
        return Ok(sites
            .into_iter()
            .next()
            .map_or_else(|| commands::DEFAULT_SITE_ID.to_string(), |s| s.id));
    }

    let labels: Vec<String> = sites
        .iter()
        .map(|s| format!("{} ({})", s.id, s.name))
        .collect();
    let idx = Select::new()
        .with_prompt("Which site?")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(sites[idx].id.clone())
}

/// Empty input means no cap.
fn prompt_max_pages() -> Result<Option<u32>, Box<dyn std::error::Error>> {
    let input: String = Input::new()
        .with_prompt("Max roster pages (empty for no limit)")
        .allow_empty(true)
        .interact_text()?;
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.parse()?))
    }
}

fn prompt_path(prompt: &str, default: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;
    Ok(PathBuf::from(input))
}
