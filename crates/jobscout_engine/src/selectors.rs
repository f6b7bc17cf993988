//! Locator configuration for the selector strategy engine.
//!
//! Target markup is third-party and changes without notice; each field
//! keeps an ordered candidate list, most specific/stable first, so a new
//! locator can be appended without touching the strategy's control flow.

/// One rule for finding a field's value on a rendered page.
#[derive(Debug, Clone, Copy)]
pub struct Locator {
    pub css: &'static str,
    /// Upper bound on accepted text length, to reject container
    /// accumulation noise.
    pub max_text_len: Option<usize>,
    /// Lowercased substrings that disqualify a candidate's text.
    pub reject: &'static [&'static str],
}

impl Locator {
    pub const fn css(css: &'static str) -> Self {
        Self {
            css,
            max_text_len: None,
            reject: &[],
        }
    }

    pub const fn bounded(css: &'static str, max_text_len: usize) -> Self {
        Self {
            css,
            max_text_len: Some(max_text_len),
            reject: &[],
        }
    }

    pub const fn rejecting(css: &'static str, reject: &'static [&'static str]) -> Self {
        Self {
            css,
            max_text_len: None,
            reject,
        }
    }
}

pub const TITLE_LOCATORS: &[Locator] = &[
    Locator::css(r#"[data-testid="jobsearch-JobInfoHeader-title"]"#),
    Locator::css("h1.jobsearch-JobInfoHeader-title"),
    Locator::css(".jobsearch-JobInfoHeader-title"),
    Locator::css(r#"h1[class*="JobInfoHeader"]"#),
    Locator::css(r#"h1[class*="jobtitle"]"#),
    Locator::css(".jobsearch-ViewJobLayout-jobDisplay h1"),
    // Generic heading sweep; suggestion carousels carry headings too.
    Locator::rejecting("h2", &["suggestions", "similar jobs"]),
];

pub const COMPANY_LOCATORS: &[Locator] = &[
    Locator::css(r#"[data-company-name="true"]"#),
    Locator::css(r#"[data-testid*="company-name"]"#),
    Locator::css(r#"[data-testid*="employer-name"]"#),
    Locator::css(r#"a[href*="/cmp/"]"#),
    Locator::css(r#"a[href*="/company/"]"#),
    Locator::bounded(r#"div[class*="company"]"#, 50),
    Locator::bounded(r#"span[class*="company"]"#, 50),
];

pub const LOCATION_LOCATORS: &[Locator] = &[
    Locator::css(r#"[data-testid="jobsearch-JobInfoHeader-locationText"]"#),
    Locator::css(r#"[data-testid="inlineHeader-companyLocation"]"#),
    Locator::css(r#"[data-testid="jobsearch-JobInfoHeader-companyLocation"]"#),
    Locator::css(".jobsearch-JobInfoHeader-companyLocation"),
    Locator::css(r#"[class*="jobsearch-JobInfoHeader-companyLocation"]"#),
    Locator::css(r#"[data-testid*="companyLocation"]"#),
    Locator::css(".companyLocation"),
    Locator::css(r#"[data-testid="job-location"]"#),
    Locator::css(".job-location"),
];

pub const DESCRIPTION_LOCATORS: &[Locator] = &[
    Locator::css("#jobDescriptionText"),
    Locator::css("#jobsearch-JobComponent-description"),
    Locator::css(r#"[data-testid="jobsearch-JobComponent-description"]"#),
    Locator::css(".jobsearch-jobDescriptionText"),
    Locator::css(r#"div[id*="jobDescriptionText"]"#),
];

/// Selectors proving the header region rendered.
pub const LOADED_TITLE_MARKERS: &[&str] = &[
    "h1.jobsearch-JobInfoHeader-title",
    r#"h2[class*="jobsearch"]"#,
    r#"h2[class*="css-"]"#,
    r#"div[class*="jobsearch"] h2"#,
];

/// Selectors proving the description region rendered.
pub const LOADED_DESCRIPTION_MARKERS: &[&str] = &[
    "#jobsearch-JobComponent-description",
    "#job-description",
    r#"[data-testid="jobsearch-JobComponent-description"]"#,
    ".jobsearch-jobDescriptionText",
    r#"div[class*="jobsearch"][class*="description"]"#,
    r#"div[id*="jobDescriptionText"]"#,
];

/// Minimum text length for a description marker to count as rendered.
pub const LOADED_DESCRIPTION_MIN_LEN: usize = 100;

/// Body markers of an expired/removed posting. Only consulted when no
/// valid content region is present.
pub const ERROR_PAGE_MARKERS: &[&str] = &[
    "this job has expired",
    "page not found",
    "404",
    "this job is no longer available",
];

/// Title signatures of anti-automation block pages.
pub const BLOCK_PAGE_TITLES: &[&str] = &[
    "just a moment",
    "additional verification required",
    "verify you are human",
];
