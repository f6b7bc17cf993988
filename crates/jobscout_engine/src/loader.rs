//! Page loading with bounded retries, backoff and block-page handling.

use std::time::Duration;

use jobscout_core::{Job, JobStatus};
use scout_logging::{scout_debug, scout_info, scout_warn};
use tokio_util::sync::CancellationToken;

use crate::driver::PageDriver;
use crate::extract::{classify_page, PageStatus};
use crate::processor::transition;
use crate::selectors;
use crate::types::{LoadFailure, LoadOutcome};

#[derive(Debug, Clone)]
pub struct LoadSettings {
    pub max_retries: u32,
    /// Per-attempt navigation bound.
    pub navigation_timeout: Duration,
    /// Attempt `n` waits `backoff_unit * n` before the next try.
    pub backoff_unit: Duration,
    /// How long a detected block page is given to clear.
    pub captcha_wait: Duration,
    /// Base pause of the human-like interaction step.
    pub interaction_pause: Duration,
    /// Random extra on top of `interaction_pause`.
    pub interaction_jitter: Duration,
    /// Settle time after dismissing a cookie banner.
    pub cookie_settle: Duration,
    /// Title signatures of anti-automation block pages.
    pub block_page_titles: Vec<String>,
}

impl Default for LoadSettings {
    fn default() -> Self {
        Self {
            max_retries: 3,
            navigation_timeout: Duration::from_secs(30),
            backoff_unit: Duration::from_millis(2000),
            captcha_wait: Duration::from_secs(120),
            interaction_pause: Duration::from_millis(500),
            interaction_jitter: Duration::from_millis(1000),
            cookie_settle: Duration::from_millis(1000),
            block_page_titles: selectors::BLOCK_PAGE_TITLES
                .iter()
                .map(|title| (*title).to_string())
                .collect(),
        }
    }
}

enum BlockCheck {
    Clear,
    Unresolved,
    Interrupted,
}

pub struct PageLoader {
    settings: LoadSettings,
}

impl PageLoader {
    pub fn new(settings: LoadSettings) -> Self {
        Self { settings }
    }

    /// Drives one navigation to a usable DOM snapshot.
    ///
    /// Terminal after `max_retries` attempts; a recognized error page ends
    /// the job immediately since retrying cannot help. All waits are
    /// cancellation checkpoints.
    pub async fn load(
        &self,
        page: &dyn PageDriver,
        job: &mut Job,
        cancel: &CancellationToken,
    ) -> LoadOutcome {
        let url = job
            .canonical_url
            .clone()
            .unwrap_or_else(|| job.original_url.clone());
        transition(job, JobStatus::Loading);

        for attempt in 1..=self.settings.max_retries {
            scout_debug!("loading {url} (attempt {attempt})");

            if let Err(err) = page.navigate(&url, self.settings.navigation_timeout).await {
                scout_warn!("navigation failed for {url}: {err}");
                if !self.backoff(attempt, cancel).await {
                    return LoadOutcome::Interrupted;
                }
                continue;
            }

            self.human_interaction(page).await;
            self.dismiss_cookie_banner(page).await;

            match self.check_block_page(page, job, cancel).await {
                BlockCheck::Clear => {}
                BlockCheck::Unresolved => {
                    return LoadOutcome::Failed(LoadFailure::UnresolvedBlock)
                }
                BlockCheck::Interrupted => return LoadOutcome::Interrupted,
            }

            let html = match page.content().await {
                Ok(html) => html,
                Err(err) => {
                    scout_warn!("snapshot failed for {url}: {err}");
                    if !self.backoff(attempt, cancel).await {
                        return LoadOutcome::Interrupted;
                    }
                    continue;
                }
            };

            match classify_page(&html) {
                PageStatus::Ready => return LoadOutcome::Loaded(html),
                PageStatus::ErrorPage => {
                    scout_info!("error page detected for {url}, skipping");
                    return LoadOutcome::ErrorPage;
                }
                PageStatus::NotReady => {
                    scout_debug!("content not ready for {url}");
                    if !self.backoff(attempt, cancel).await {
                        return LoadOutcome::Interrupted;
                    }
                }
            }
        }

        scout_warn!(
            "giving up on {url} after {} attempts",
            self.settings.max_retries
        );
        LoadOutcome::Failed(LoadFailure::Exhausted {
            attempts: self.settings.max_retries,
        })
    }

    /// Per-attempt backoff. Returns `false` when a stop request arrived
    /// during the wait.
    async fn backoff(&self, attempt: u32, cancel: &CancellationToken) -> bool {
        sleep_cancellable(self.settings.backoff_unit * attempt, cancel).await
    }

    /// Best-effort human-like interaction to reduce bot-detection false
    /// positives. Failures are swallowed.
    async fn human_interaction(&self, page: &dyn PageDriver) {
        let x = fastrand::f64() * 100.0;
        let y = fastrand::f64() * 100.0;
        if let Err(err) = page.move_pointer(x, y).await {
            scout_debug!("pointer move failed: {err}");
        }
        let jitter = self.settings.interaction_jitter.as_millis() as u64;
        let pause =
            self.settings.interaction_pause + Duration::from_millis(fastrand::u64(0..=jitter));
        tokio::time::sleep(pause).await;
    }

    /// Best-effort cookie-banner dismissal. Failures are swallowed.
    async fn dismiss_cookie_banner(&self, page: &dyn PageDriver) {
        match page.click_first(r#"button[id*="cookie"]"#).await {
            Ok(true) => {
                scout_debug!("cookie banner dismissed");
                tokio::time::sleep(self.settings.cookie_settle).await;
            }
            Ok(false) => {}
            Err(err) => scout_debug!("cookie banner click failed: {err}"),
        }
    }

    /// Block pages replace the document title wholesale, so the title is
    /// the signature. When blocked, the page gets one wait window to clear
    /// (manually or via the site's own challenge).
    async fn check_block_page(
        &self,
        page: &dyn PageDriver,
        job: &mut Job,
        cancel: &CancellationToken,
    ) -> BlockCheck {
        if !self.is_block_title(page).await {
            return BlockCheck::Clear;
        }
        scout_warn!(
            "block page detected for {}, waiting {:?}",
            job.original_url,
            self.settings.captcha_wait
        );
        transition(job, JobStatus::CaptchaWait);
        if !sleep_cancellable(self.settings.captcha_wait, cancel).await {
            return BlockCheck::Interrupted;
        }
        if self.is_block_title(page).await {
            BlockCheck::Unresolved
        } else {
            scout_info!("block page cleared for {}", job.original_url);
            transition(job, JobStatus::Loading);
            BlockCheck::Clear
        }
    }

    async fn is_block_title(&self, page: &dyn PageDriver) -> bool {
        match page.title().await {
            Ok(title) => {
                let lowered = title.to_lowercase();
                self.settings
                    .block_page_titles
                    .iter()
                    .any(|signature| lowered.contains(&signature.to_lowercase()))
            }
            Err(err) => {
                scout_debug!("title read failed: {err}");
                false
            }
        }
    }
}

/// Sleeps `duration` unless the token fires first. Returns `true` when the
/// sleep ran to completion.
pub(crate) async fn sleep_cancellable(duration: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}
