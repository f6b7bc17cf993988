use std::path::Path;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum DriveError {
    #[error("browser launch failed: {0}")]
    Launch(String),
    #[error("navigation failed: {0}")]
    Navigation(String),
    #[error("navigation timed out after {0:?}")]
    NavigationTimeout(Duration),
    #[error("page evaluation failed: {0}")]
    Evaluation(String),
    #[error("screenshot failed: {0}")]
    Screenshot(String),
}

/// One browser tab, as offered by the automation collaborator.
///
/// Field extraction runs host-side on the snapshot returned by
/// [`PageDriver::content`]; the driver is never handed extraction scripts.
#[async_trait::async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigates and waits for the page to settle, bounded by `timeout`.
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), DriveError>;

    /// Current document title.
    async fn title(&self) -> Result<String, DriveError>;

    /// Serialized snapshot of the rendered DOM.
    async fn content(&self) -> Result<String, DriveError>;

    /// Moves the pointer, for the human-like interaction step.
    async fn move_pointer(&self, x: f64, y: f64) -> Result<(), DriveError>;

    /// Clicks the first element matching `selector`; `false` when no
    /// element matched.
    async fn click_first(&self, selector: &str) -> Result<bool, DriveError>;

    /// Writes a full-page screenshot to `path`.
    async fn screenshot(&self, path: &Path) -> Result<(), DriveError>;
}

/// An exclusive browser instance, owned by a single session for its
/// lifetime.
#[async_trait::async_trait]
pub trait BrowserDriver: Send + Sync {
    async fn new_page(&self) -> Result<Box<dyn PageDriver>, DriveError>;

    /// Releases the underlying browser.
    async fn close(&self);

    /// Drops the automation handle but leaves the browser running, so a
    /// human can resolve a block page manually.
    async fn detach(&self);
}

/// Launches browser instances. Failure here is the one session-fatal error.
#[async_trait::async_trait]
pub trait BrowserProvider: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserDriver>, DriveError>;
}
