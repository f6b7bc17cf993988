//! Scripted driver fakes shared by the engine's integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use jobscout_core::ProgressEvent;
use jobscout_engine::{
    BrowserDriver, BrowserProvider, DriveError, LoadSettings, PageDriver, ProgressSink,
    ScreenshotPolicy, SessionSettings,
};

/// A page driver that serves scripted navigation results, titles and DOM
/// snapshots. Queues repeat their last entry once drained.
#[derive(Default)]
pub struct FakePage {
    nav_results: Mutex<VecDeque<Result<(), DriveError>>>,
    titles: Mutex<VecDeque<String>>,
    contents: Mutex<VecDeque<String>>,
    pub nav_count: AtomicUsize,
    pub screenshot_count: AtomicUsize,
    pub clicked: Mutex<Vec<String>>,
}

impl FakePage {
    /// A page that loads immediately and serves `html` forever.
    pub fn serving(html: impl Into<String>) -> Self {
        let page = Self::default();
        page.contents.lock().unwrap().push_back(html.into());
        page.titles.lock().unwrap().push_back("Job page".to_string());
        page
    }

    /// Prepends `count` failing navigation attempts.
    pub fn with_nav_failures(self, count: usize) -> Self {
        {
            let mut results = self.nav_results.lock().unwrap();
            for _ in 0..count {
                results.push_back(Err(DriveError::Navigation("connection reset".to_string())));
            }
            results.push_back(Ok(()));
        }
        self
    }

    /// Replaces the scripted title sequence.
    pub fn with_titles(self, titles: &[&str]) -> Self {
        *self.titles.lock().unwrap() = titles.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Replaces the scripted snapshot sequence.
    pub fn with_contents(self, contents: &[&str]) -> Self {
        *self.contents.lock().unwrap() = contents.iter().map(|c| c.to_string()).collect();
        self
    }
}

fn next_or_repeat(queue: &Mutex<VecDeque<String>>, default: &str) -> String {
    let mut queue = queue.lock().unwrap();
    match queue.len() {
        0 => default.to_string(),
        1 => queue.front().cloned().unwrap_or_default(),
        _ => queue.pop_front().unwrap_or_default(),
    }
}

#[async_trait::async_trait]
impl PageDriver for FakePage {
    async fn navigate(&self, _url: &str, _timeout: Duration) -> Result<(), DriveError> {
        self.nav_count.fetch_add(1, Ordering::SeqCst);
        match self.nav_results.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Ok(()),
        }
    }

    async fn title(&self) -> Result<String, DriveError> {
        Ok(next_or_repeat(&self.titles, "Job page"))
    }

    async fn content(&self) -> Result<String, DriveError> {
        Ok(next_or_repeat(&self.contents, ""))
    }

    async fn move_pointer(&self, _x: f64, _y: f64) -> Result<(), DriveError> {
        Ok(())
    }

    async fn click_first(&self, selector: &str) -> Result<bool, DriveError> {
        self.clicked.lock().unwrap().push(selector.to_string());
        Ok(false)
    }

    async fn screenshot(&self, _path: &Path) -> Result<(), DriveError> {
        self.screenshot_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct PageHandle(Arc<FakePage>);

#[async_trait::async_trait]
impl PageDriver for PageHandle {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), DriveError> {
        self.0.navigate(url, timeout).await
    }

    async fn title(&self) -> Result<String, DriveError> {
        self.0.title().await
    }

    async fn content(&self) -> Result<String, DriveError> {
        self.0.content().await
    }

    async fn move_pointer(&self, x: f64, y: f64) -> Result<(), DriveError> {
        self.0.move_pointer(x, y).await
    }

    async fn click_first(&self, selector: &str) -> Result<bool, DriveError> {
        self.0.click_first(selector).await
    }

    async fn screenshot(&self, path: &Path) -> Result<(), DriveError> {
        self.0.screenshot(path).await
    }
}

pub struct FakeBrowser {
    page: Arc<FakePage>,
    closed: Arc<AtomicBool>,
    detached: Arc<AtomicBool>,
}

#[async_trait::async_trait]
impl BrowserDriver for FakeBrowser {
    async fn new_page(&self) -> Result<Box<dyn PageDriver>, DriveError> {
        Ok(Box::new(PageHandle(self.page.clone())))
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    async fn detach(&self) {
        self.detached.store(true, Ordering::SeqCst);
    }
}

/// Hands out one scripted browser and records how it was released.
pub struct FakeProvider {
    pub page: Arc<FakePage>,
    pub closed: Arc<AtomicBool>,
    pub detached: Arc<AtomicBool>,
    fail_launch: bool,
}

impl FakeProvider {
    pub fn with_page(page: FakePage) -> Self {
        Self {
            page: Arc::new(page),
            closed: Arc::new(AtomicBool::new(false)),
            detached: Arc::new(AtomicBool::new(false)),
            fail_launch: false,
        }
    }

    pub fn failing() -> Self {
        let mut provider = Self::with_page(FakePage::default());
        provider.fail_launch = true;
        provider
    }

    pub fn nav_count(&self) -> usize {
        self.page.nav_count.load(Ordering::SeqCst)
    }

    pub fn was_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn was_detached(&self) -> bool {
        self.detached.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl BrowserProvider for FakeProvider {
    async fn launch(&self) -> Result<Box<dyn BrowserDriver>, DriveError> {
        if self.fail_launch {
            return Err(DriveError::Launch("no usable chrome installation".to_string()));
        }
        Ok(Box::new(FakeBrowser {
            page: self.page.clone(),
            closed: self.closed.clone(),
            detached: self.detached.clone(),
        }))
    }
}

/// Records every emitted event, in order.
#[derive(Default)]
pub struct CollectingSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl CollectingSink {
    pub fn snapshot(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressSink for CollectingSink {
    fn emit(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Settings with millisecond waits so paused-clock tests stay instant even
/// when a sleep is reached on the real clock.
pub fn fast_load_settings() -> LoadSettings {
    LoadSettings {
        backoff_unit: Duration::from_millis(2),
        captcha_wait: Duration::from_millis(10),
        interaction_pause: Duration::from_millis(1),
        interaction_jitter: Duration::from_millis(1),
        cookie_settle: Duration::from_millis(1),
        ..LoadSettings::default()
    }
}

pub fn fast_session_settings() -> SessionSettings {
    SessionSettings {
        throttle_min: Duration::from_millis(1),
        throttle_max: Duration::from_millis(2),
        load: fast_load_settings(),
        screenshots: ScreenshotPolicy::default(),
    }
}

/// A minimal page that classifies as loaded and extracts cleanly.
pub const JOB_PAGE: &str = r#"
<html>
  <head><title>Job page</title></head>
  <body>
    <h1 class="jobsearch-JobInfoHeader-title">Senior Rust Engineer</h1>
    <div data-company-name="true">Acme Robotics</div>
    <div data-testid="inlineHeader-companyLocation">Basel, BS</div>
    <div id="jobDescriptionText"><p>Build scrapers.</p><ul><li>Ship</li><li>Iterate</li></ul></div>
  </body>
</html>
"#;

/// Renders as loaded (description marker) but no extraction locator
/// resolves, so every field degrades to its sentinel.
pub const UNEXTRACTABLE_PAGE: &str = r#"
<html>
  <head><title>Job page</title></head>
  <body>
    <div class="jobsearch-layout description-panel">
      This posting uses a fully custom layout that keeps enough prose in the
      panel to count as rendered content for the readiness check, while
      offering none of the structural hooks extraction relies on.
    </div>
  </body>
</html>
"#;

/// A recognized expired-posting page.
pub const EXPIRED_PAGE: &str = r#"
<html>
  <head><title>Job page</title></head>
  <body><p>Sorry, this job has expired and is no longer accepting applications.</p></body>
</html>
"#;
