//! One batch run over a list of URLs.

use std::sync::Arc;
use std::time::Duration;

use jobscout_core::{progress_percent, ProgressEvent, SessionId};
use scout_logging::{scout_debug, scout_error, scout_info, scout_warn};
use tokio_util::sync::CancellationToken;

use crate::broadcast::ProgressSink;
use crate::driver::{BrowserDriver, BrowserProvider};
use crate::loader::{sleep_cancellable, PageLoader};
use crate::processor::{JobProcessor, ScreenshotLimiter};
use crate::registry::SessionRegistry;
use crate::types::{JobOutcome, SessionError, SessionSummary};
use crate::{LoadSettings, ScreenshotPolicy};

#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Inter-job throttle window; the actual delay is drawn uniformly.
    pub throttle_min: Duration,
    pub throttle_max: Duration,
    pub load: LoadSettings,
    pub screenshots: ScreenshotPolicy,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            throttle_min: Duration::from_millis(500),
            throttle_max: Duration::from_millis(1000),
            load: LoadSettings::default(),
            screenshots: ScreenshotPolicy::default(),
        }
    }
}

/// One batch run: owns the stop token, a single sequential worker and an
/// exclusive browser resource. Sessions share nothing but the registry.
pub struct Session {
    id: SessionId,
    cancel: CancellationToken,
    registry: Arc<SessionRegistry>,
    sink: Arc<dyn ProgressSink>,
    processor: JobProcessor,
    settings: SessionSettings,
}

impl Session {
    /// Registers a fresh session and binds it to its event sink.
    pub fn new(
        registry: Arc<SessionRegistry>,
        sink: Arc<dyn ProgressSink>,
        settings: SessionSettings,
    ) -> Self {
        let (id, cancel) = registry.register();
        let loader = PageLoader::new(settings.load.clone());
        let screenshots = Arc::new(ScreenshotLimiter::new(settings.screenshots.clone()));
        let processor = JobProcessor::new(loader, screenshots);
        Self {
            id,
            cancel,
            registry,
            sink,
            processor,
            settings,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Runs the batch to completion, a stop, or a fatal browser failure.
    /// Consumes the session; runs are not restartable. The browser is
    /// released on every exit path except the unresolved-block escape
    /// hatch, where it is detached instead.
    pub async fn run(
        self,
        provider: &dyn BrowserProvider,
        urls: Vec<String>,
    ) -> Result<SessionSummary, SessionError> {
        self.emit(ProgressEvent::SessionStart {
            session_id: self.id.clone(),
        });
        scout_info!("session {} started with {} URLs", self.id, urls.len());

        let browser = match provider.launch().await {
            Ok(browser) => browser,
            Err(err) => {
                scout_error!("session {}: browser launch failed: {err}", self.id);
                self.emit(ProgressEvent::Error {
                    message: format!("Failed to acquire a browser: {err}"),
                    session_id: self.id.clone(),
                });
                self.registry.remove(&self.id);
                return Err(SessionError::BrowserUnavailable(err));
            }
        };

        let outcome = self.drive(browser.as_ref(), &urls).await;

        match &outcome {
            Ok(summary) if summary.browser_detached => {
                scout_warn!(
                    "session {}: leaving browser open for manual resolution",
                    self.id
                );
                browser.detach().await;
            }
            _ => browser.close().await,
        }
        self.registry.remove(&self.id);

        if let Err(err) = &outcome {
            self.emit(ProgressEvent::Error {
                message: format!("An error occurred during scraping: {err}"),
                session_id: self.id.clone(),
            });
        }
        outcome
    }

    async fn drive(
        &self,
        browser: &dyn BrowserDriver,
        urls: &[String],
    ) -> Result<SessionSummary, SessionError> {
        let page = browser.new_page().await?;
        let total = urls.len();
        let mut summary = SessionSummary {
            total,
            ..SessionSummary::default()
        };

        for (index, url) in urls.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return Ok(self.stopped(summary));
            }
            scout_info!("session {}: processing job {}/{total}", self.id, index + 1);

            let outcome = self.processor.process(page.as_ref(), url, &self.cancel).await;

            let mut throttled = true;
            let record = match outcome {
                JobOutcome::Interrupted => return Ok(self.stopped(summary)),
                JobOutcome::Completed(record) => {
                    summary.done += 1;
                    record
                }
                JobOutcome::External(record) => {
                    // No request was made, so no throttle is owed either.
                    summary.external += 1;
                    throttled = false;
                    record
                }
                JobOutcome::Skipped(record) => {
                    summary.skipped += 1;
                    record
                }
                JobOutcome::Failed { record, reason } => {
                    summary.failed += 1;
                    if reason.leaves_browser_open() {
                        summary.browser_detached = true;
                    }
                    record
                }
            };

            // A stop that lands while a job is finishing still suppresses
            // its row.
            if self.cancel.is_cancelled() {
                return Ok(self.stopped(summary));
            }

            summary.completed += 1;
            self.emit(ProgressEvent::NewJob {
                progress: progress_percent(summary.completed, total),
                data: record,
                session_id: self.id.clone(),
            });

            if throttled && summary.completed < total && !self.throttle().await {
                return Ok(self.stopped(summary));
            }
        }

        scout_info!(
            "session {} finished: {}/{} rows emitted",
            self.id,
            summary.completed,
            total
        );
        Ok(summary)
    }

    fn stopped(&self, mut summary: SessionSummary) -> SessionSummary {
        summary.stopped = true;
        scout_info!("session {}: stop requested, ending run", self.id);
        self.emit(ProgressEvent::Info {
            message: "Scraping stopped by user".to_string(),
            session_id: self.id.clone(),
        });
        summary
    }

    /// Randomized inter-job delay; itself a cancellation checkpoint.
    async fn throttle(&self) -> bool {
        let min = self.settings.throttle_min.as_millis() as u64;
        let max = self.settings.throttle_max.as_millis() as u64;
        let wait = Duration::from_millis(if max > min { fastrand::u64(min..=max) } else { min });
        scout_debug!("session {}: waiting {wait:?} before next job", self.id);
        sleep_cancellable(wait, &self.cancel).await
    }

    fn emit(&self, event: ProgressEvent) {
        self.sink.emit(event);
    }
}
