// src/models/lifecycle.rs
// DOCUMENTATION: Behaviour shared by every persisted record
// PURPOSE: Canonical URLs, timestamp pairs and slug derivation

use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use unicode_normalization::UnicodeNormalization;

/// Characters left as-is in stored names and page paths
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'/');

/// A record that can be linked to
pub trait CanonicalUrl {
    /// Absolute path of the page showing this record (e.g. "/mission-district/")
    fn absolute_url(&self) -> String;
}

/// A record carrying system-managed timestamps
pub trait Timestamped {
    /// Set once, when the record is inserted
    fn created(&self) -> DateTime<Utc>;

    /// Set on every save. Records that are never edited return None.
    fn modified(&self) -> Option<DateTime<Utc>> {
        None
    }
}

/// Generate a URL-safe slug from a title
///
/// The title is NFKC-normalised first, so composed and decomposed forms (and
/// compatibility ligatures) give the same slug.
/// Unicode letters and digits are kept and lowercased; other characters are
/// dropped except whitespace and hyphens, whose runs collapse into a single
/// `-`. Leading and trailing hyphens or underscores are stripped.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;

    for c in title.nfkc().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() || c == '_' {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else if c == '-' || c.is_whitespace() {
            pending_separator = true;
        }
    }

    slug.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// Percent-encode a relative path as UTF-8, keeping `/` separators
pub fn encode_path(path: &str) -> String {
    utf8_percent_encode(path, PATH_SEGMENT).to_string()
}

/// Path of the borough details page for `slug`
pub fn borough_path(slug: &str) -> String {
    format!("/{}/", encode_path(slug))
}

/// True when `created` falls within the 24 hours ending at `now`
pub fn within_last_day(created: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - chrono::Duration::days(1) <= created && created <= now
}
