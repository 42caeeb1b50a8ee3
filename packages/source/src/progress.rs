//! Progress hooks for the two crawl phases.
//!
//! The roster phase never knows how many pages remain, so it only bumps a
//! counter and updates its message. The detail phase learns its length from
//! the finished roster and calls [`ProgressCallback::set_total`] first.
//! Rendering is left to the caller; the CLI draws `indicatif` bars.

use std::sync::Arc;

/// Sink for crawl progress.
///
/// Shared as `Arc<dyn ProgressCallback>` with the crawl future, hence
/// `Send + Sync`.
pub trait ProgressCallback: Send + Sync {
    /// Number of detail pages that will be fetched.
    fn set_total(&self, total: u64);

    /// Counts `delta` more roster entries or detail pages.
    fn inc(&self, delta: u64);

    /// Replaces the status line, e.g. the running roster size.
    fn set_message(&self, msg: String);

    /// Ends the phase, leaving `msg` on screen.
    fn finish(&self, msg: String);

    /// Ends a phase that did not run, e.g. details with `skip_details`.
    fn finish_and_clear(&self);
}

/// Discards everything. Used by tests and library callers.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
    fn finish_and_clear(&self) {}
}

#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
