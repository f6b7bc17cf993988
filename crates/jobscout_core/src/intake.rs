/// The URLs accepted from one uploaded batch, in row order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UrlBatch {
    pub urls: Vec<String>,
    /// Rows that contained no usable URL. Reported, never fatal.
    pub dropped_rows: usize,
}

impl UrlBatch {
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Parses a delimited upload into an ordered URL batch.
///
/// Each row contributes at most one URL: the first comma-separated cell
/// starting with `http`, with anything after a `;` discarded. Blank lines
/// are ignored; rows without a URL count as dropped.
pub fn parse_url_batch(raw: &str) -> UrlBatch {
    let mut batch = UrlBatch::default();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match first_url_cell(line) {
            Some(url) => batch.urls.push(url),
            None => batch.dropped_rows += 1,
        }
    }
    batch
}

fn first_url_cell(line: &str) -> Option<String> {
    line.split(',')
        .map(str::trim)
        .find(|cell| cell.starts_with("http"))
        .map(|cell| cell.split(';').next().unwrap_or(cell).trim().to_string())
}
