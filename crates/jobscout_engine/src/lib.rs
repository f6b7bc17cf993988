//! JobScout engine: browser-driven scraping orchestration.
mod broadcast;
mod description;
mod driver;
mod extract;
mod loader;
mod processor;
mod registry;
mod salary;
pub mod selectors;
mod session;
mod types;

pub use broadcast::{EventBroadcaster, ProgressSink};
pub use driver::{BrowserDriver, BrowserProvider, DriveError, PageDriver};
pub use extract::{
    classify_page, extract_description, extract_field, extract_record, FieldKind, PageStatus,
};
pub use loader::{LoadSettings, PageLoader};
pub use processor::{JobProcessor, ScreenshotLimiter, ScreenshotPolicy};
pub use registry::SessionRegistry;
pub use session::{Session, SessionSettings};
pub use types::{
    JobFailure, JobOutcome, LoadFailure, LoadOutcome, SessionError, SessionSummary,
};
