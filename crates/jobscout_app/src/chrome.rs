//! Chrome-backed implementation of the engine's driver traits.
//!
//! `headless_chrome` is a blocking API, so every call hops onto the
//! blocking pool. Tabs are `Arc`-shared and safe to move across threads.

use std::ffi::OsStr;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptions, Tab};
use jobscout_engine::{BrowserDriver, BrowserProvider, DriveError, PageDriver};
use scout_logging::scout_info;
use tokio::task;

#[derive(Debug, Clone, Default)]
pub struct ChromeProvider {
    pub headful: bool,
}

#[async_trait::async_trait]
impl BrowserProvider for ChromeProvider {
    async fn launch(&self) -> Result<Box<dyn BrowserDriver>, DriveError> {
        let headless = !self.headful;
        let browser = task::spawn_blocking(move || {
            let options = LaunchOptions::default_builder()
                .headless(headless)
                .window_size(Some((1920, 1080)))
                .args(vec![
                    OsStr::new("--no-sandbox"),
                    OsStr::new("--disable-setuid-sandbox"),
                    OsStr::new("--disable-web-security"),
                    OsStr::new("--disable-features=IsolateOrigins"),
                    OsStr::new("--disable-site-isolation-trials"),
                ])
                .build()
                .map_err(|err| DriveError::Launch(err.to_string()))?;
            Browser::new(options).map_err(|err| DriveError::Launch(err.to_string()))
        })
        .await
        .map_err(|err| DriveError::Launch(err.to_string()))??;

        scout_info!("browser launched (headless: {headless})");
        Ok(Box::new(ChromeBrowser {
            inner: Arc::new(Mutex::new(Some(browser))),
        }))
    }
}

pub struct ChromeBrowser {
    inner: Arc<Mutex<Option<Browser>>>,
}

#[async_trait::async_trait]
impl BrowserDriver for ChromeBrowser {
    async fn new_page(&self) -> Result<Box<dyn PageDriver>, DriveError> {
        let inner = self.inner.clone();
        let tab = task::spawn_blocking(move || {
            let guard = inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            let browser = guard
                .as_ref()
                .ok_or_else(|| DriveError::Launch("browser already released".to_string()))?;
            browser
                .new_tab()
                .map_err(|err| DriveError::Launch(err.to_string()))
        })
        .await
        .map_err(|err| DriveError::Launch(err.to_string()))??;
        Ok(Box::new(ChromeTab { tab }))
    }

    async fn close(&self) {
        let inner = self.inner.clone();
        // Dropping the handle terminates the browser process.
        let _ = task::spawn_blocking(move || {
            inner
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .take()
        })
        .await;
        scout_info!("browser released");
    }

    async fn detach(&self) {
        let inner = self.inner.clone();
        // Forgetting the handle skips its Drop, so the process survives for
        // manual block-page resolution.
        let _ = task::spawn_blocking(move || {
            if let Some(browser) = inner
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .take()
            {
                std::mem::forget(browser);
            }
        })
        .await;
        scout_info!("browser detached; process left running");
    }
}

struct ChromeTab {
    tab: Arc<Tab>,
}

#[async_trait::async_trait]
impl PageDriver for ChromeTab {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), DriveError> {
        let tab = self.tab.clone();
        let url = url.to_string();
        task::spawn_blocking(move || {
            tab.set_default_timeout(timeout);
            tab.navigate_to(&url)
                .map_err(|err| DriveError::Navigation(err.to_string()))?;
            tab.wait_until_navigated()
                .map_err(|_| DriveError::NavigationTimeout(timeout))?;
            Ok(())
        })
        .await
        .map_err(|err| DriveError::Navigation(err.to_string()))?
    }

    async fn title(&self) -> Result<String, DriveError> {
        let tab = self.tab.clone();
        task::spawn_blocking(move || {
            tab.get_title()
                .map_err(|err| DriveError::Evaluation(err.to_string()))
        })
        .await
        .map_err(|err| DriveError::Evaluation(err.to_string()))?
    }

    async fn content(&self) -> Result<String, DriveError> {
        let tab = self.tab.clone();
        task::spawn_blocking(move || {
            tab.get_content()
                .map_err(|err| DriveError::Evaluation(err.to_string()))
        })
        .await
        .map_err(|err| DriveError::Evaluation(err.to_string()))?
    }

    async fn move_pointer(&self, x: f64, y: f64) -> Result<(), DriveError> {
        let tab = self.tab.clone();
        let expression = format!(
            "window.dispatchEvent(new MouseEvent('mousemove', {{clientX: {x}, clientY: {y}}}))"
        );
        task::spawn_blocking(move || {
            tab.evaluate(&expression, false)
                .map(|_| ())
                .map_err(|err| DriveError::Evaluation(err.to_string()))
        })
        .await
        .map_err(|err| DriveError::Evaluation(err.to_string()))?
    }

    async fn click_first(&self, selector: &str) -> Result<bool, DriveError> {
        let tab = self.tab.clone();
        let selector = selector.to_string();
        task::spawn_blocking(move || {
            let Ok(element) = tab.find_element(&selector) else {
                return Ok(false);
            };
            element
                .click()
                .map(|_| true)
                .map_err(|err| DriveError::Evaluation(err.to_string()))
        })
        .await
        .map_err(|err| DriveError::Evaluation(err.to_string()))?
    }

    async fn screenshot(&self, path: &Path) -> Result<(), DriveError> {
        let tab = self.tab.clone();
        let path = path.to_path_buf();
        task::spawn_blocking(move || {
            let bytes = tab
                .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
                .map_err(|err| DriveError::Screenshot(err.to_string()))?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|err| DriveError::Screenshot(err.to_string()))?;
            }
            std::fs::write(&path, bytes).map_err(|err| DriveError::Screenshot(err.to_string()))
        })
        .await
        .map_err(|err| DriveError::Screenshot(err.to_string()))?
    }
}
