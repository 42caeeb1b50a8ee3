//! The roster and detail crawl.
//!
//! The roster is discovered by repeatedly running the search with an
//! advancing offset. The site gives no "last page" signal, so the crawl
//! stops at the first page that contributes no new entries. Once the roster
//! is complete, every entry with a system identifier gets one detail fetch
//! and is merged with what that page holds.
//!
//! ```text
//! Start -> Fetching(offset) -> Merging -> Continue(next offset) -> Fetching ...
//!                                     \-> Done
//! ```
//!
//! All fetches are sequential: the site keeps a single server-side session
//! per client, so requests must not overlap.

use std::collections::BTreeSet;
use std::sync::Arc;

use inmate_roster_models::{InmateRecord, RosterEntry};
use inmate_roster_scraper::{CompiledLayout, parse_detail_page, parse_roster_page};

use crate::SourceError;
use crate::progress::ProgressCallback;
use crate::site::InmateSite;

/// Options for a crawl.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrawlOptions {
    /// Stop after this many roster pages even if the site has more.
    pub max_pages: Option<u32>,
    /// Skip detail pages and export the roster alone.
    pub skip_details: bool,
}

/// Where the roster crawl is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlState {
    /// Nothing fetched yet.
    Start,
    /// About to fetch the page starting at `offset`.
    Fetching {
        /// Offset sent with the search.
        offset: usize,
    },
    /// A page came back and its entries are about to be merged.
    Merging {
        /// Offset the page was fetched with.
        offset: usize,
        /// Entries parsed from the page.
        entries: Vec<RosterEntry>,
    },
    /// The page added entries; fetch the next one.
    Continue {
        /// Offset for the next search.
        next_offset: usize,
    },
    /// The roster is complete.
    Done,
}

/// The roster accumulated so far.
///
/// Entries are only ever appended. An entry whose system identifier has
/// already been seen is not appended again.
#[derive(Debug, Default)]
pub struct RosterAccumulator {
    entries: Vec<RosterEntry>,
    seen: BTreeSet<String>,
}

impl RosterAccumulator {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of accumulated entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been accumulated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The accumulated entries, in discovery order.
    #[must_use]
    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    /// Consumes the accumulator, returning its entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<RosterEntry> {
        self.entries
    }

    /// Appends a page of entries, returning how many were new.
    pub fn merge_page(&mut self, page: Vec<RosterEntry>) -> usize {
        let before = self.entries.len();
        for entry in page {
            if let Some(id) = &entry.system_id
                && !self.seen.insert(id.clone())
            {
                log::warn!(
                    "Duplicate system id {id} ({}), already in roster, skipping",
                    entry.name
                );
                continue;
            }
            self.entries.push(entry);
        }
        self.entries.len() - before
    }

    /// Offset of the next search: one past the number of entries so far.
    #[must_use]
    pub fn next_offset(&self) -> usize {
        self.entries.len() + 1
    }
}

impl CrawlState {
    /// Merges a fetched page into `roster` and decides what comes next.
    ///
    /// A page that adds nothing (empty, or only duplicates) ends the crawl,
    /// however many entries were accumulated before it.
    #[must_use]
    pub fn after_merge(entries: Vec<RosterEntry>, roster: &mut RosterAccumulator) -> Self {
        if entries.is_empty() {
            return Self::Done;
        }
        match roster.merge_page(entries) {
            0 => {
                log::warn!("Page added no new entries, treating it as the end of the roster");
                Self::Done
            }
            _ => Self::Continue {
                next_offset: roster.next_offset(),
            },
        }
    }
}

/// What a crawl did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Roster pages fetched, including the final empty one.
    pub pages_fetched: u32,
    /// Entries in the final roster.
    pub roster_size: usize,
    /// Detail pages fetched.
    pub details_fetched: usize,
    /// Entries without a system identifier (exported without details).
    pub without_system_id: usize,
}

/// Merged records plus a summary of the crawl.
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// One record per roster entry, in roster order.
    pub records: Vec<InmateRecord>,
    /// Counts describing the crawl.
    pub summary: CrawlSummary,
}

/// Fetches every roster page.
///
/// Returns the roster and the number of pages fetched.
///
/// # Errors
///
/// Returns the first [`SourceError`] from the site; nothing fetched so far
/// is kept.
pub async fn crawl_roster<S: InmateSite + ?Sized>(
    site: &S,
    layout: &CompiledLayout,
    options: &CrawlOptions,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<(Vec<RosterEntry>, u32), SourceError> {
    let mut roster = RosterAccumulator::new();
    let mut pages: u32 = 0;
    let mut state = CrawlState::Start;

    loop {
        state = match state {
            CrawlState::Start => CrawlState::Fetching { offset: 0 },
            CrawlState::Fetching { offset } => {
                if let Some(max) = options.max_pages
                    && pages >= max
                {
                    log::info!("Reached max pages ({max}), stopping");
                    CrawlState::Done
                } else {
                    let html = site.search(offset).await?;
                    pages += 1;
                    let entries = parse_roster_page(&html, layout);
                    log::info!(
                        "Roster page at offset {offset}: {} entries",
                        entries.len()
                    );
                    CrawlState::Merging { offset, entries }
                }
            }
            CrawlState::Merging { offset, entries } => {
                let before = roster.len();
                let next = CrawlState::after_merge(entries, &mut roster);
                progress.inc((roster.len() - before) as u64);
                progress.set_message(format!("Roster: {} inmates", roster.len()));
                log::debug!("Merged page at offset {offset}, roster now {}", roster.len());
                next
            }
            CrawlState::Continue { next_offset } => CrawlState::Fetching {
                offset: next_offset,
            },
            CrawlState::Done => break,
        };
    }

    log::info!(
        "Roster complete: {} inmates over {pages} pages",
        roster.len()
    );
    progress.finish(format!(
        "Roster complete: {} inmates over {pages} pages",
        roster.len()
    ));

    Ok((roster.into_entries(), pages))
}

/// Fetches one detail page per roster entry that has a system identifier
/// and merges it in. Entries without one are kept with empty details.
///
/// Returns the merged records and the number of detail pages fetched.
///
/// # Errors
///
/// Returns the first [`SourceError`] from the site.
pub async fn crawl_details<S: InmateSite + ?Sized>(
    site: &S,
    layout: &CompiledLayout,
    roster: Vec<RosterEntry>,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<(Vec<InmateRecord>, usize), SourceError> {
    let with_id = roster.iter().filter(|e| e.system_id.is_some()).count();
    progress.set_total(with_id as u64);

    let mut records = Vec::with_capacity(roster.len());
    let mut fetched = 0;

    for entry in roster {
        let Some(system_id) = entry.system_id.clone() else {
            log::debug!("No system id for {}, exporting without details", entry.name);
            records.push(InmateRecord::from_roster(entry));
            continue;
        };

        let html = site.fetch_detail(&system_id).await?;
        let detail = parse_detail_page(&html, layout);
        log::debug!(
            "Detail {system_id}: {} charges, {} bonds, {} detainers",
            detail.charges.len(),
            detail.bonds.len(),
            detail.detainers.len(),
        );
        records.push(InmateRecord::merge(entry, detail));
        fetched += 1;
        progress.inc(1);
    }

    progress.finish(format!("Fetched {fetched} detail pages"));
    Ok((records, fetched))
}

/// Runs a full crawl: opens the home page, walks the roster, then fetches
/// details unless [`CrawlOptions::skip_details`] is set.
///
/// # Errors
///
/// Returns the first [`SourceError`] from the site. A transport failure
/// aborts the whole crawl.
pub async fn crawl<S: InmateSite + ?Sized>(
    site: &S,
    layout: &CompiledLayout,
    options: &CrawlOptions,
    roster_progress: &Arc<dyn ProgressCallback>,
    detail_progress: &Arc<dyn ProgressCallback>,
) -> Result<CrawlOutcome, SourceError> {
    site.open_home().await?;

    let (roster, pages_fetched) = crawl_roster(site, layout, options, roster_progress).await?;
    let roster_size = roster.len();
    let without_system_id = roster.iter().filter(|e| e.system_id.is_none()).count();

    let (records, details_fetched) = if options.skip_details {
        detail_progress.finish_and_clear();
        (
            roster.into_iter().map(InmateRecord::from_roster).collect(),
            0,
        )
    } else {
        crawl_details(site, layout, roster, detail_progress).await?
    };

    let summary = CrawlSummary {
        pages_fetched,
        roster_size,
        details_fetched,
        without_system_id,
    };
    log::info!("Crawl complete: {summary:?}");

    Ok(CrawlOutcome { records, summary })
}
