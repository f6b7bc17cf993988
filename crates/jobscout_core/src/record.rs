use serde::{Deserialize, Serialize};

/// Fixed placeholder returned when no title locator matches.
pub const TITLE_NOT_FOUND: &str = "Title not found";
/// Fixed placeholder returned when no company locator matches.
pub const COMPANY_NOT_FOUND: &str = "Company not found";
/// Fixed placeholder returned when no location locator matches.
pub const LOCATION_NOT_FOUND: &str = "Location not found";
/// Fixed placeholder returned when no salary pattern matches.
pub const SALARY_NOT_SPECIFIED: &str = "Salary not specified";
/// Fixed placeholder returned when no description container matches.
pub const DESCRIPTION_NOT_FOUND: &str = "Description not found";

/// The two wire representations of a job description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    pub html: String,
    pub text: String,
}

impl Description {
    pub fn not_found() -> Self {
        Self {
            html: format!("<p>{DESCRIPTION_NOT_FOUND}</p>"),
            text: DESCRIPTION_NOT_FOUND.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.text == DESCRIPTION_NOT_FOUND
    }
}

/// One scraped job posting in the wire-visible shape.
///
/// Fields degrade to fixed sentinels instead of being absent, so consumers
/// never have to distinguish missing keys from failed extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub description: Description,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_external: Option<bool>,
}

impl JobRecord {
    /// A record where every field carries its sentinel. Used for jobs whose
    /// page never yielded content (failed load, expired posting).
    pub fn not_found(url: impl Into<String>) -> Self {
        Self {
            title: TITLE_NOT_FOUND.to_string(),
            company: COMPANY_NOT_FOUND.to_string(),
            location: LOCATION_NOT_FOUND.to_string(),
            salary: SALARY_NOT_SPECIFIED.to_string(),
            description: Description::not_found(),
            url: url.into(),
            is_external: None,
        }
    }

    /// The pass-through record for URLs outside the supported site family.
    /// No navigation is performed for these.
    pub fn external(url: impl Into<String>) -> Self {
        let url = url.into();
        let escaped = escape_html(&url);
        Self {
            title: "External link".to_string(),
            company: "External".to_string(),
            location: "-".to_string(),
            salary: "-".to_string(),
            description: Description {
                html: format!(
                    "<p>External link: <a href=\"{escaped}\" target=\"_blank\">{escaped}</a></p>"
                ),
                text: format!("External link: {url}"),
            },
            url,
            is_external: Some(true),
        }
    }

    /// True when every extractable field still carries its sentinel.
    pub fn all_unresolved(&self) -> bool {
        self.title == TITLE_NOT_FOUND
            && self.company == COMPANY_NOT_FOUND
            && self.location == LOCATION_NOT_FOUND
            && self.salary == SALARY_NOT_SPECIFIED
            && self.description.is_not_found()
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
