use jobscout_core::JobRecord;
use thiserror::Error;

use crate::driver::DriveError;

/// Result of driving one URL to a rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Content region present; the DOM snapshot is ready for extraction.
    Loaded(String),
    /// Recognized expired/removed-posting page. Retrying cannot help.
    ErrorPage,
    /// All attempts exhausted, or the block page never cleared.
    Failed(LoadFailure),
    /// A stop request was observed during a wait.
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoadFailure {
    #[error("page did not load after {attempts} attempts")]
    Exhausted { attempts: u32 },
    #[error("block page still present after the wait window")]
    UnresolvedBlock,
}

/// Terminal result of processing one URL. Every non-interrupted variant
/// carries a full record so the session emits exactly one row per URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Extraction ran on a loaded page.
    Completed(JobRecord),
    /// Non-site URL: pass-through record, no navigation performed.
    External(JobRecord),
    /// Recognized error page; sentinel record, no retry.
    Skipped(JobRecord),
    /// Load never produced content; sentinel record with the reason.
    Failed {
        record: JobRecord,
        reason: JobFailure,
    },
    /// Stop observed mid-job; nothing is emitted for this URL.
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum JobFailure {
    #[error("URL does not address a job detail page")]
    InvalidUrl,
    #[error(transparent)]
    Load(#[from] LoadFailure),
}

impl JobFailure {
    /// True for the unresolved-block case, where the session must leave the
    /// browser open for manual resolution instead of releasing it.
    pub fn leaves_browser_open(self) -> bool {
        matches!(self, Self::Load(LoadFailure::UnresolvedBlock))
    }
}

/// The one session-fatal failure class: the browser resource itself.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("browser resource unavailable: {0}")]
    BrowserUnavailable(#[from] DriveError),
}

/// Bookkeeping for one finished (or stopped) session run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSummary {
    pub total: usize,
    /// Rows actually emitted; equals `total` unless the run was stopped.
    pub completed: usize,
    pub done: usize,
    pub external: usize,
    pub skipped: usize,
    pub failed: usize,
    pub stopped: bool,
    /// Set when an unresolved block page requested the manual-resolution
    /// escape hatch.
    pub browser_detached: bool,
}
