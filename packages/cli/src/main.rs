#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the inmate roster crawler.
//!
//! Crawls a lookup site into a JSON checkpoint plus a flat CSV, prints the
//! bare roster, or re-exports an existing checkpoint. Without a subcommand
//! it falls back to an interactive menu.

mod commands;
mod interactive;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use inmate_roster_source::crawl::CrawlOptions;

use crate::commands::SiteSelection;

#[derive(Parser)]
#[command(name = "inmate_roster", about = "Inmate roster crawler and exporter")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Which site definition to use.
#[derive(clap::Args)]
struct SiteArgs {
    /// Embedded site definition id (see `sites`)
    #[arg(long, default_value = commands::DEFAULT_SITE_ID)]
    site: String,
    /// Load the site definition from a TOML file instead
    #[arg(long)]
    site_config: Option<PathBuf>,
}

impl SiteArgs {
    fn selection(&self) -> SiteSelection<'_> {
        self.site_config.as_deref().map_or(
            SiteSelection::Embedded(&self.site),
            SiteSelection::File,
        )
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl the roster and every detail page, then write the checkpoint and CSV
    Crawl {
        #[command(flatten)]
        site: SiteArgs,
        /// Where to write the JSON checkpoint
        #[arg(long, default_value = commands::DEFAULT_CHECKPOINT)]
        checkpoint: PathBuf,
        /// Where to write the CSV export
        #[arg(long, default_value = commands::DEFAULT_CSV)]
        output: PathBuf,
        /// Stop after this many roster pages
        #[arg(long)]
        max_pages: Option<u32>,
        /// Skip detail pages and export roster fields only
        #[arg(long)]
        skip_details: bool,
    },
    /// Crawl only the roster and print it as JSON
    Roster {
        #[command(flatten)]
        site: SiteArgs,
        /// Stop after this many roster pages
        #[arg(long)]
        max_pages: Option<u32>,
    },
    /// Write the CSV export from an existing checkpoint
    Export {
        /// Checkpoint written by `crawl`
        #[arg(long, default_value = commands::DEFAULT_CHECKPOINT)]
        checkpoint: PathBuf,
        /// Where to write the CSV export
        #[arg(long, default_value = commands::DEFAULT_CSV)]
        output: PathBuf,
    },
    /// List the embedded site definitions
    Sites,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = inmate_roster_cli_utils::init_logger();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive::run(&multi).await;
    };

    match command {
        Commands::Crawl {
            site,
            checkpoint,
            output,
            max_pages,
            skip_details,
        } => {
            let options = CrawlOptions {
                max_pages,
                skip_details,
            };
            commands::crawl(&multi, site.selection(), &options, &checkpoint, &output).await?;
        }
        Commands::Roster { site, max_pages } => {
            let roster = commands::roster(&multi, site.selection(), max_pages).await?;
            println!("{}", serde_json::to_string_pretty(&roster)?);
        }
        Commands::Export { checkpoint, output } => {
            commands::export(&checkpoint, &output)?;
        }
        Commands::Sites => commands::print_sites(),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn crawl_defaults() {
        let cli = Cli::try_parse_from(["inmate_roster", "crawl"]).unwrap();
        let Some(Commands::Crawl {
            site,
            checkpoint,
            output,
            max_pages,
            skip_details,
        }) = cli.command
        else {
            panic!("expected crawl");
        };
        assert_eq!(site.site, commands::DEFAULT_SITE_ID);
        assert!(site.site_config.is_none());
        assert_eq!(checkpoint, PathBuf::from(commands::DEFAULT_CHECKPOINT));
        assert_eq!(output, PathBuf::from(commands::DEFAULT_CSV));
        assert_eq!(max_pages, None);
        assert!(!skip_details);
    }

    #[test]
    fn site_config_overrides_embedded_site() {
        let cli = Cli::try_parse_from([
            "inmate_roster",
            "roster",
            "--site-config",
            "other.toml",
            "--max-pages",
            "2",
        ])
        .unwrap();
        let Some(Commands::Roster { site, max_pages }) = cli.command else {
            panic!("expected roster");
        };
        assert_eq!(max_pages, Some(2));
        assert!(matches!(
            site.selection(),
            SiteSelection::File(path) if path == std::path::Path::new("other.toml")
        ));
    }

    #[test]
    fn no_subcommand_is_interactive() {
        let cli = Cli::try_parse_from(["inmate_roster"]).unwrap();
        assert!(cli.command.is_none());
    }
}
