//! Front-matter parsing
//!
//! Post metadata lives in a `---`-fenced block of fixed-key lines at the top
//! of `index.md`. The keys are matched textually, not parsed as YAML: the
//! format is exactly `title:`, `date:`, `thumbnail:`, `tags:`, `categories:`,
//! with list values separated by commas. Missing keys yield empty values,
//! never errors.

use chrono::{NaiveDate, NaiveDateTime};

/// Metadata scanned from the front-matter block of a post file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostMeta {
    pub title: String,
    pub date: String,
    pub thumbnail: Option<String>,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
}

impl PostMeta {
    /// Parse front-matter from content.
    /// Returns (meta, body); content without a fenced block is all body.
    pub fn parse(content: &str) -> (Self, &str) {
        let trimmed = content.trim_start();

        let Some(rest) = trimmed.strip_prefix("---") else {
            return (PostMeta::default(), content);
        };
        let rest = rest.trim_start_matches(['\n', '\r']);

        let Some(end_pos) = rest.find("\n---") else {
            // No closing fence, treat as no front-matter
            return (PostMeta::default(), content);
        };

        let block = &rest[..end_pos];
        let body = rest[end_pos + 4..].trim_start_matches(['\n', '\r']);

        let mut meta = PostMeta::default();
        for line in block.lines() {
            if let Some(value) = scalar_value(line, "title:") {
                meta.title = value.to_string();
            } else if let Some(value) = scalar_value(line, "date:") {
                meta.date = value.to_string();
            } else if let Some(value) = scalar_value(line, "thumbnail:") {
                if !value.is_empty() {
                    meta.thumbnail = Some(value.to_string());
                }
            } else if let Some(value) = scalar_value(line, "tags:") {
                meta.tags = list_value(value);
            } else if let Some(value) = scalar_value(line, "categories:") {
                meta.categories = list_value(value);
            }
        }

        (meta, body)
    }
}

/// Extract the value of a `key: value` line, or None if the key doesn't match
fn scalar_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    line.trim_start().strip_prefix(key).map(str::trim)
}

/// Split a comma-delimited list value into its entries
fn list_value(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a date string into a sortable key.
///
/// Post dates are compared as strings when they don't parse; this covers the
/// common formats so that mixed `-`/`/` separators still order correctly.
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
    ];

    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}
