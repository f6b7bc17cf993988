//! First-match selector strategy engine.
//!
//! Every field kind runs the same shape: an ordered candidate list, the
//! first locator resolving to a non-empty text node wins, then a
//! field-specific normalization. No scoring, no merging.

use jobscout_core::{
    Description, JobRecord, COMPANY_NOT_FOUND, LOCATION_NOT_FOUND, TITLE_NOT_FOUND,
};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use scout_logging::scout_debug;

use crate::description;
use crate::salary;
use crate::selectors::{self, Locator};

/// `City, XX` with a two-letter region code.
static REGION_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^,]+),\s*([A-Z]{2})").expect("region code pattern"));

/// Labelled location mentions inside the description body, tried when no
/// header locator matches.
static LOCATION_LABELS: Lazy<Vec<Regex>> = Lazy::new(|| {
    ["Location:", "Standort:", "Based in:", "Office in:"]
        .iter()
        .map(|label| {
            Regex::new(&format!(r"(?i){}\s*([^.]+)", regex::escape(label)))
                .expect("location label pattern")
        })
        .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Title,
    Company,
    Location,
    Salary,
}

/// Best-effort value for a named field. Returns the field's sentinel when
/// no candidate matches; never fails to the caller.
pub fn extract_field(doc: &Html, kind: FieldKind) -> String {
    match kind {
        FieldKind::Title => first_match(doc, selectors::TITLE_LOCATORS)
            .unwrap_or_else(|| TITLE_NOT_FOUND.to_string()),
        FieldKind::Company => first_match(doc, selectors::COMPANY_LOCATORS)
            .unwrap_or_else(|| COMPANY_NOT_FOUND.to_string()),
        FieldKind::Location => extract_location(doc),
        FieldKind::Salary => salary::extract(doc),
    }
}

/// Sanitized dual representation of the description region.
pub fn extract_description(doc: &Html) -> Description {
    description::extract(doc)
}

/// Extracts every field from a rendered page snapshot. A miss on one field
/// never aborts extraction of the others.
pub fn extract_record(html: &str, url: &str) -> JobRecord {
    let doc = Html::parse_document(html);
    let record = JobRecord {
        title: extract_field(&doc, FieldKind::Title),
        company: extract_field(&doc, FieldKind::Company),
        location: extract_field(&doc, FieldKind::Location),
        salary: extract_field(&doc, FieldKind::Salary),
        description: extract_description(&doc),
        url: url.to_string(),
        is_external: None,
    };
    if record.all_unresolved() {
        scout_debug!("no locator resolved anything for {url}");
    }
    record
}

fn extract_location(doc: &Html) -> String {
    if let Some(text) = first_match(doc, selectors::LOCATION_LOCATORS) {
        return normalize_location(&text);
    }
    location_from_description(doc).unwrap_or_else(|| LOCATION_NOT_FOUND.to_string())
}

/// Applies the `City, XX` pattern, falling back to the raw trimmed text
/// when it does not match.
fn normalize_location(text: &str) -> String {
    match REGION_CODE.captures(text) {
        Some(caps) => format!("{}, {}", caps[1].trim(), &caps[2]),
        None => text.to_string(),
    }
}

fn location_from_description(doc: &Html) -> Option<String> {
    let container = selectors::DESCRIPTION_LOCATORS.iter().find_map(|locator| {
        let selector = Selector::parse(locator.css).ok()?;
        doc.select(&selector).next()
    })?;
    let body = element_text(&container);
    for pattern in LOCATION_LABELS.iter() {
        if let Some(caps) = pattern.captures(&body) {
            let found = collapse_whitespace(&caps[1]);
            if !found.is_empty() {
                scout_debug!("location recovered from description body: {found}");
                return Some(found);
            }
        }
    }
    None
}

/// Tries each locator in order; the first resolving to a non-empty text
/// node wins. Unparseable locators are skipped rather than failing the
/// whole chain.
fn first_match(doc: &Html, locators: &[Locator]) -> Option<String> {
    for locator in locators {
        let Ok(selector) = Selector::parse(locator.css) else {
            scout_debug!("unparseable locator skipped: {}", locator.css);
            continue;
        };
        for element in doc.select(&selector) {
            let text = element_text(&element);
            if text.is_empty() {
                continue;
            }
            if locator.max_text_len.is_some_and(|max| text.len() > max) {
                continue;
            }
            let lowered = text.to_lowercase();
            if locator.reject.iter().any(|marker| lowered.contains(marker)) {
                continue;
            }
            return Some(text);
        }
    }
    None
}

/// Whitespace-collapsed text content of an element subtree.
pub(crate) fn element_text(element: &ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// How the loader reads a freshly navigated page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    /// A valid title or description region rendered.
    Ready,
    /// Known error-page markers with no valid content. Retrying cannot help.
    ErrorPage,
    /// Neither content nor an error marker; treated as transient.
    NotReady,
}

/// Classifies a DOM snapshot for the load state machine.
pub fn classify_page(html: &str) -> PageStatus {
    let doc = Html::parse_document(html);

    let has_title = selectors::LOADED_TITLE_MARKERS
        .iter()
        .any(|css| marker_text_len(&doc, css) > 0);
    let has_description = selectors::LOADED_DESCRIPTION_MARKERS
        .iter()
        .any(|css| marker_text_len(&doc, css) > selectors::LOADED_DESCRIPTION_MIN_LEN);
    if has_title || has_description {
        return PageStatus::Ready;
    }

    let body = body_text_lowercase(&doc);
    if selectors::ERROR_PAGE_MARKERS
        .iter()
        .any(|marker| body.contains(marker))
    {
        return PageStatus::ErrorPage;
    }
    PageStatus::NotReady
}

fn marker_text_len(doc: &Html, css: &str) -> usize {
    let Ok(selector) = Selector::parse(css) else {
        return 0;
    };
    doc.select(&selector)
        .next()
        .map(|element| element_text(&element).len())
        .unwrap_or(0)
}

fn body_text_lowercase(doc: &Html) -> String {
    let Ok(selector) = Selector::parse("body") else {
        return String::new();
    };
    doc.select(&selector)
        .next()
        .map(|body| body.text().collect::<String>().to_lowercase())
        .unwrap_or_default()
}
