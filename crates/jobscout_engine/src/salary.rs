//! Salary extraction.
//!
//! Salary rarely sits behind a stable selector, so the search runs over
//! the small-leaf-node space (elements with few children and short text)
//! to reject container accumulation noise, preferring a direct pattern hit
//! over a keyword-adjacency search.

use jobscout_core::SALARY_NOT_SPECIFIED;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};
use scout_logging::scout_debug;

use crate::extract::element_text;

const MAX_LEAF_CHILDREN: usize = 3;
const MAX_LEAF_TEXT_LEN: usize = 100;

const CURRENCY_MARKERS: &[&str] = &["CHF", "€", "EUR"];
const SALARY_KEYWORDS: &[&str] = &["salary", "salaire", "gehalt", "compensation", "wage", "pay"];

/// Captures the clean salary phrase out of surrounding text.
static SALARY_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)((?:CHF|EUR|€)\s*[\d.,]+(?:\s*-\s*(?:CHF|EUR|€)\s*[\d.,]+)?(?:\s*k)?\s*(?:par |per |a |/)?(?:year|month|hour|an|mois|heure))",
    )
    .expect("salary value pattern")
});

/// Shapes that qualify a text node as salary-bearing: currency-first and
/// amount-first notations.
static SALARY_SHAPES: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        Regex::new(
            r"(?i)(?:CHF|EUR|€)\s*[\d.,]+(?:\s*-\s*(?:CHF|EUR|€)\s*[\d.,]+)?(?:\s*k)?\s*(?:par |per |a |/)?(?:year|month|hour|an|mois|heure)",
        )
        .expect("currency-first salary shape"),
        Regex::new(
            r"(?i)[\d.,]+(?:\s*-\s*[\d.,]+)?\s*(?:CHF|EUR|€)(?:\s*k)?\s*(?:par |per |a |/)?(?:year|month|hour|an|mois|heure)",
        )
        .expect("amount-first salary shape"),
    ]
});

/// Best-effort salary for the page, or the fixed sentinel.
pub(crate) fn extract(doc: &Html) -> String {
    if let Some(found) = leaf_pattern_scan(doc) {
        scout_debug!("salary found by pattern match: {found}");
        return found;
    }
    if let Some(found) = currency_marker_scan(doc) {
        scout_debug!("salary found by currency marker: {found}");
        return found;
    }
    if let Some(found) = keyword_adjacency_scan(doc) {
        scout_debug!("salary found near keyword: {found}");
        return found;
    }
    SALARY_NOT_SPECIFIED.to_string()
}

/// Strategy 1: direct pattern hit over small leaf nodes.
fn leaf_pattern_scan(doc: &Html) -> Option<String> {
    for element in all_elements(doc) {
        if child_element_count(&element) > MAX_LEAF_CHILDREN {
            continue;
        }
        let text = element_text(&element);
        if text.is_empty() || text.len() > MAX_LEAF_TEXT_LEN {
            continue;
        }
        if let Some(value) = salary_value(&text) {
            return Some(value);
        }
    }
    None
}

/// Strategy 2: any element mentioning a currency marker.
fn currency_marker_scan(doc: &Html) -> Option<String> {
    for element in all_elements(doc) {
        let text = element_text(&element);
        if !CURRENCY_MARKERS.iter().any(|marker| text.contains(marker)) {
            continue;
        }
        if let Some(value) = salary_value(&text) {
            return Some(value);
        }
    }
    None
}

/// Strategy 3: siblings of elements mentioning a salary keyword.
fn keyword_adjacency_scan(doc: &Html) -> Option<String> {
    for element in all_elements(doc) {
        let lowered = element_text(&element).to_lowercase();
        if !SALARY_KEYWORDS
            .iter()
            .any(|keyword| lowered.contains(keyword))
        {
            continue;
        }
        let Some(parent) = element.parent().and_then(ElementRef::wrap) else {
            continue;
        };
        for sibling in parent.children().filter_map(ElementRef::wrap) {
            let text = element_text(&sibling);
            if let Some(value) = salary_value(&text) {
                return Some(value);
            }
        }
    }
    None
}

fn salary_value(text: &str) -> Option<String> {
    if !SALARY_SHAPES.iter().any(|shape| shape.is_match(text)) {
        return None;
    }
    SALARY_VALUE
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
}

fn all_elements<'a>(doc: &'a Html) -> impl Iterator<Item = ElementRef<'a>> {
    doc.root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
}

fn child_element_count(element: &ElementRef) -> usize {
    element
        .children()
        .filter(|child| child.value().is_element())
        .count()
}
