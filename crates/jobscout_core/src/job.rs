/// Lifecycle of a single URL within a session.
///
/// Terminal statuses persist only in the emitted progress event; there is
/// no job store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Loading,
    CaptchaWait,
    Extracting,
    Done,
    Skipped,
    Failed,
    Stopped,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Done | Self::Skipped | Self::Failed | Self::Stopped
        )
    }
}

/// The processing of one URL within a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub original_url: String,
    pub canonical_url: Option<String>,
    pub status: JobStatus,
}

impl Job {
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            canonical_url: None,
            status: JobStatus::Pending,
        }
    }
}
