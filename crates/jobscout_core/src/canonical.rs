use url::Url;

/// Query parameter carrying the job identifier on search/listing URLs.
const JOB_KEY_PARAM: &str = "vjk";
/// Tracking parameter every canonical detail URL must carry exactly once.
const TRACKING_KEY: &str = "from";
const TRACKING_VALUE: &str = "shareddesktop";
/// Path marker of a direct detail page.
const DETAIL_PATH: &str = "viewjob";

/// Outcome of normalizing an input URL into a direct detail-page address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalUrl {
    /// A direct detail-page URL, tracking parameter present exactly once.
    Detail(String),
    /// The URL does not belong to the supported site family.
    External,
    /// A site URL that cannot be resolved to a detail page.
    Invalid,
}

/// Maps a search/listing URL to its canonical detail-page URL.
///
/// Idempotent on detail URLs: canonicalizing an already-canonical URL
/// yields the same URL.
pub fn canonicalize(raw: &str) -> CanonicalUrl {
    let Ok(url) = Url::parse(raw.trim()) else {
        return CanonicalUrl::Invalid;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return CanonicalUrl::Invalid;
    }
    let Some(host) = url.host_str() else {
        return CanonicalUrl::Invalid;
    };
    if !is_supported_host(host) {
        return CanonicalUrl::External;
    }

    if url.path().contains(DETAIL_PATH) {
        return CanonicalUrl::Detail(with_tracking_param(url));
    }

    let job_key = url
        .query_pairs()
        .find(|(key, _)| key == JOB_KEY_PARAM)
        .map(|(_, value)| value.into_owned());
    match job_key {
        Some(key) if !key.is_empty() => CanonicalUrl::Detail(detail_url(&url, &key)),
        _ => CanonicalUrl::Invalid,
    }
}

fn is_supported_host(host: &str) -> bool {
    host == "indeed.com" || host.ends_with(".indeed.com")
}

/// Synthesizes the detail URL from the scheme+host of the input plus the
/// job identifier.
fn detail_url(origin: &Url, job_key: &str) -> String {
    let mut url = origin.clone();
    url.set_path(&format!("/{DETAIL_PATH}"));
    url.set_fragment(None);
    url.set_query(None);
    url.query_pairs_mut()
        .append_pair("jk", job_key)
        .append_pair(TRACKING_KEY, TRACKING_VALUE);
    url.into()
}

/// Appends the tracking parameter, replacing any existing `from` value so
/// the parameter appears exactly once.
fn with_tracking_param(mut url: Url) -> String {
    let tracking: Vec<String> = url
        .query_pairs()
        .filter(|(key, _)| key == TRACKING_KEY)
        .map(|(_, value)| value.into_owned())
        .collect();
    if tracking.len() == 1 && tracking[0] == TRACKING_VALUE {
        return url.into();
    }

    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != TRACKING_KEY)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        pairs.append_pair(TRACKING_KEY, TRACKING_VALUE);
    }
    url.into()
}
