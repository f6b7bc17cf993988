use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::JobRecord;

/// Opaque token identifying one batch run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One unit of a session's output stream, in the wire-visible shape.
///
/// Ordering within one session is the job-processing order; no ordering is
/// guaranteed across sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ProgressEvent {
    /// Announces a freshly accepted batch.
    #[serde(rename_all = "camelCase")]
    SessionStart { session_id: SessionId },
    /// One terminal row per input URL.
    #[serde(rename_all = "camelCase")]
    NewJob {
        progress: u8,
        data: JobRecord,
        session_id: SessionId,
    },
    /// Informational notices (e.g. a user-requested stop).
    #[serde(rename_all = "camelCase")]
    Info {
        message: String,
        session_id: SessionId,
    },
    /// Fatal session errors.
    #[serde(rename_all = "camelCase")]
    Error {
        message: String,
        session_id: SessionId,
    },
}

impl ProgressEvent {
    pub fn session_id(&self) -> &SessionId {
        match self {
            Self::SessionStart { session_id }
            | Self::NewJob { session_id, .. }
            | Self::Info { session_id, .. }
            | Self::Error { session_id, .. } => session_id,
        }
    }
}

/// Control message accepted from any connected observer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ControlMessage {
    #[serde(rename_all = "camelCase")]
    Stop { session_id: SessionId },
}

/// Percentage of the batch completed, rounded to the nearest integer.
pub fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u8
}
