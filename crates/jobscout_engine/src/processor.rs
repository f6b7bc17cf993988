//! Drives one URL end-to-end to a structured record or a typed failure.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;
use jobscout_core::{canonicalize, CanonicalUrl, Job, JobRecord, JobStatus};
use scout_logging::{scout_debug, scout_info, scout_warn};
use sha2::{Digest, Sha256};
use tokio_util::sync::CancellationToken;

use crate::driver::PageDriver;
use crate::extract::extract_record;
use crate::loader::PageLoader;
use crate::types::{JobFailure, JobOutcome, LoadOutcome};

#[derive(Debug, Clone)]
pub struct ScreenshotPolicy {
    pub dir: PathBuf,
    /// Run-wide budget; a failing batch must not fill the disk.
    pub max_per_run: usize,
}

impl Default for ScreenshotPolicy {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./screenshots"),
            max_per_run: 1,
        }
    }
}

/// Run-wide diagnostic screenshot limiter, shared across jobs.
pub struct ScreenshotLimiter {
    policy: ScreenshotPolicy,
    taken: AtomicUsize,
}

impl ScreenshotLimiter {
    pub fn new(policy: ScreenshotPolicy) -> Self {
        Self {
            policy,
            taken: AtomicUsize::new(0),
        }
    }

    pub fn taken(&self) -> usize {
        self.taken.load(Ordering::SeqCst)
    }

    /// Captures a diagnostic screenshot unless the budget is spent. The
    /// slot is reserved before the capture so concurrent sessions sharing
    /// a limiter cannot overshoot.
    pub async fn capture(&self, page: &dyn PageDriver, url: &str) {
        let reserved = self
            .taken
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |taken| {
                (taken < self.policy.max_per_run).then_some(taken + 1)
            });
        if reserved.is_err() {
            scout_debug!("screenshot budget spent, skipping {url}");
            return;
        }
        let path = self.policy.dir.join(screenshot_filename(url));
        match page.screenshot(&path).await {
            Ok(()) => scout_info!("diagnostic screenshot saved to {}", path.display()),
            Err(err) => scout_warn!("screenshot failed for {url}: {err}"),
        }
    }
}

fn screenshot_filename(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    let short: String = digest.iter().take(8).map(|byte| format!("{byte:02x}")).collect();
    let stamp = Utc::now().format("%Y%m%dT%H%M%SZ");
    format!("error_{stamp}_{short}.png")
}

pub struct JobProcessor {
    loader: PageLoader,
    screenshots: Arc<ScreenshotLimiter>,
}

impl JobProcessor {
    pub fn new(loader: PageLoader, screenshots: Arc<ScreenshotLimiter>) -> Self {
        Self {
            loader,
            screenshots,
        }
    }

    /// Processes one URL. Every non-interrupted outcome carries a full
    /// record so the session can emit exactly one row per URL.
    pub async fn process(
        &self,
        page: &dyn PageDriver,
        url: &str,
        cancel: &CancellationToken,
    ) -> JobOutcome {
        let mut job = Job::new(url);
        match canonicalize(url) {
            CanonicalUrl::External => {
                scout_info!("external URL, passing through without navigation: {url}");
                transition(&mut job, JobStatus::Skipped);
                JobOutcome::External(JobRecord::external(url))
            }
            CanonicalUrl::Invalid => {
                scout_warn!("no job identifier found in URL: {url}");
                transition(&mut job, JobStatus::Failed);
                JobOutcome::Failed {
                    record: JobRecord::not_found(url),
                    reason: JobFailure::InvalidUrl,
                }
            }
            CanonicalUrl::Detail(canonical) => {
                if canonical != url {
                    scout_info!("canonicalized {url} -> {canonical}");
                }
                job.canonical_url = Some(canonical);
                self.process_detail(page, job, cancel).await
            }
        }
    }

    async fn process_detail(
        &self,
        page: &dyn PageDriver,
        mut job: Job,
        cancel: &CancellationToken,
    ) -> JobOutcome {
        let url = job.original_url.clone();
        match self.loader.load(page, &mut job, cancel).await {
            LoadOutcome::Loaded(html) => {
                if cancel.is_cancelled() {
                    transition(&mut job, JobStatus::Stopped);
                    return JobOutcome::Interrupted;
                }
                transition(&mut job, JobStatus::Extracting);
                let record = extract_record(&html, &url);
                if record.all_unresolved() {
                    scout_warn!("extraction yielded only placeholders for {url}");
                    self.screenshots.capture(page, &url).await;
                }
                transition(&mut job, JobStatus::Done);
                JobOutcome::Completed(record)
            }
            LoadOutcome::ErrorPage => {
                transition(&mut job, JobStatus::Skipped);
                JobOutcome::Skipped(JobRecord::not_found(&url))
            }
            LoadOutcome::Failed(reason) => {
                transition(&mut job, JobStatus::Failed);
                JobOutcome::Failed {
                    record: JobRecord::not_found(&url),
                    reason: reason.into(),
                }
            }
            LoadOutcome::Interrupted => {
                transition(&mut job, JobStatus::Stopped);
                JobOutcome::Interrupted
            }
        }
    }
}

pub(crate) fn transition(job: &mut Job, status: JobStatus) {
    if status.is_terminal() {
        scout_debug!("job {} finished as {:?}", job.original_url, status);
    } else {
        scout_debug!(
            "job {}: {:?} -> {:?}",
            job.original_url,
            job.status,
            status
        );
    }
    job.status = status;
}
