use std::sync::atomic::Ordering;
use std::sync::Arc;

use jobscout_engine::{
    JobFailure, JobOutcome, JobProcessor, PageLoader, ScreenshotLimiter, ScreenshotPolicy,
};
use tokio_util::sync::CancellationToken;

mod common;
use common::{fast_load_settings, FakePage, JOB_PAGE, UNEXTRACTABLE_PAGE};

fn processor(limit: usize) -> (JobProcessor, Arc<ScreenshotLimiter>) {
    let limiter = Arc::new(ScreenshotLimiter::new(ScreenshotPolicy {
        max_per_run: limit,
        ..ScreenshotPolicy::default()
    }));
    (
        JobProcessor::new(PageLoader::new(fast_load_settings()), limiter.clone()),
        limiter,
    )
}

#[tokio::test(start_paused = true)]
async fn scrapes_a_detail_page_into_a_record() {
    let page = FakePage::serving(JOB_PAGE);
    let (processor, _) = processor(1);

    let outcome = processor
        .process(&page, "https://www.indeed.com/viewjob?jk=abc123", &CancellationToken::new())
        .await;

    let JobOutcome::Completed(record) = outcome else {
        panic!("expected a completed record, got {outcome:?}");
    };
    assert_eq!(record.title, "Senior Rust Engineer");
    assert_eq!(record.company, "Acme Robotics");
    assert_eq!(record.location, "Basel, BS");
    assert_eq!(record.url, "https://www.indeed.com/viewjob?jk=abc123");
}

#[tokio::test(start_paused = true)]
async fn external_urls_skip_navigation_entirely() {
    let page = FakePage::serving(JOB_PAGE);
    let (processor, _) = processor(1);

    let outcome = processor
        .process(&page, "https://jobs.example.org/posting/7", &CancellationToken::new())
        .await;

    let JobOutcome::External(record) = outcome else {
        panic!("expected an external pass-through, got {outcome:?}");
    };
    assert_eq!(record.is_external, Some(true));
    assert_eq!(record.title, "External link");
    assert!(record.description.text.contains("https://jobs.example.org/posting/7"));
    assert_eq!(page.nav_count.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn site_urls_without_an_identifier_fail_without_navigation() {
    let page = FakePage::serving(JOB_PAGE);
    let (processor, _) = processor(1);

    let outcome = processor
        .process(&page, "https://ch.indeed.com/jobs?q=rust", &CancellationToken::new())
        .await;

    let JobOutcome::Failed { record, reason } = outcome else {
        panic!("expected a failed job, got {outcome:?}");
    };
    assert_eq!(reason, JobFailure::InvalidUrl);
    assert!(record.all_unresolved());
    assert_eq!(page.nav_count.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn all_sentinel_extraction_triggers_one_diagnostic_screenshot() {
    let page = FakePage::serving(UNEXTRACTABLE_PAGE);
    let (processor, limiter) = processor(1);
    let cancel = CancellationToken::new();

    let first = processor
        .process(&page, "https://www.indeed.com/viewjob?jk=a1", &cancel)
        .await;
    let second = processor
        .process(&page, "https://www.indeed.com/viewjob?jk=a2", &cancel)
        .await;

    assert!(matches!(first, JobOutcome::Completed(_)));
    assert!(matches!(second, JobOutcome::Completed(_)));
    // Both jobs qualified, but the run-wide budget admits only one shot.
    assert_eq!(page.screenshot_count.load(Ordering::SeqCst), 1);
    assert_eq!(limiter.taken(), 1);
}

#[tokio::test(start_paused = true)]
async fn successful_extraction_takes_no_screenshot() {
    let page = FakePage::serving(JOB_PAGE);
    let (processor, limiter) = processor(1);

    let _ = processor
        .process(&page, "https://www.indeed.com/viewjob?jk=abc123", &CancellationToken::new())
        .await;

    assert_eq!(page.screenshot_count.load(Ordering::SeqCst), 0);
    assert_eq!(limiter.taken(), 0);
}
