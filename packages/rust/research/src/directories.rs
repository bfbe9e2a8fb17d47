//! Directory profiles: search-URL patterns and listing-presence matching.
//!
//! Each configured directory base URL becomes a [`DirectoryProfile`] with a
//! normalized identifier and a directory-specific search URL. Known
//! directories get their real search endpoints; everything else falls back
//! to a generic `/search?q=` pattern.

use scraper::{Html, Selector};
use tracing::warn;
use url::{Url, form_urlencoded};

use napcite_shared::BusinessRecord;

/// Listing-title selectors tried against directory search results.
const LISTING_SELECTORS: &[&str] = &[
    "h3.business-name",
    "a.business-name",
    ".listing-title",
    ".business-title",
    "h2.title",
    ".business-link",
    ".listing-title a",
    ".biz-name",
    ".result-title",
];

/// Minimum street-segment length for the address fallback match.
/// Shorter segments ("12 Main") produce too many false positives.
const MIN_STREET_MATCH_LEN: usize = 10;

// ---------------------------------------------------------------------------
// DirectoryProfile
// ---------------------------------------------------------------------------

/// A single third-party directory to check for business presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryProfile {
    /// Normalized identifier, e.g. `yelp` for `https://www.yelp.com`.
    pub id: String,
    /// Directory base URL as configured.
    pub base_url: String,
}

impl DirectoryProfile {
    /// Build a profile from a configured base URL.
    /// Returns `None` when the URL cannot be parsed or has no host.
    pub fn from_base_url(base_url: &str) -> Option<Self> {
        let id = directory_id(base_url)?;
        Some(Self {
            id,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The search URL for `query` on this directory.
    ///
    /// Known directories use their real search endpoints; the rest use a
    /// generic `/search?q=` pattern.
    pub fn search_url(&self, query: &str) -> String {
        let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();

        match self.id.as_str() {
            "yelp" => format!("{}/search?find_desc={encoded}", self.base_url),
            "yellowpages" => format!("{}/search?search_terms={encoded}", self.base_url),
            "bbb" => format!("{}/search?find_text={encoded}", self.base_url),
            "foursquare" => format!("{}/search?query={encoded}", self.base_url),
            _ => format!("{}/search?q={encoded}", self.base_url),
        }
    }
}

/// Normalize a directory base URL to its identifier: the first label of the
/// host with any `www.` prefix removed (`https://www.yelp.com` → `yelp`).
pub fn directory_id(base_url: &str) -> Option<String> {
    let url = Url::parse(base_url).ok()?;
    let host = url.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    let label = host.split('.').next()?;
    if label.is_empty() {
        None
    } else {
        Some(label.to_string())
    }
}

/// Build profiles for every configured directory URL, preserving order.
/// Unparseable entries are skipped with a warning.
pub fn build_registry(base_urls: &[String]) -> Vec<DirectoryProfile> {
    base_urls
        .iter()
        .filter_map(|u| {
            let profile = DirectoryProfile::from_base_url(u);
            if profile.is_none() {
                warn!(url = %u, "skipping unparseable directory URL");
            }
            profile
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Presence matching
// ---------------------------------------------------------------------------

/// Decide whether a directory search-results page lists the business.
///
/// Primary signal: the lowercased business name appears as a substring of
/// any listing-title element. Fallbacks: the first address segment (when
/// longer than [`MIN_STREET_MATCH_LEN`]) in the lowercased body, or the
/// digits-only phone number anywhere in the raw body.
pub fn listing_matches(body: &str, record: &BusinessRecord) -> bool {
    let doc = Html::parse_document(body);
    let name_lower = record.name.to_lowercase();

    for sel_str in LISTING_SELECTORS {
        let Ok(sel) = Selector::parse(sel_str) else {
            continue;
        };
        for listing in doc.select(&sel) {
            let text = listing.text().collect::<String>().trim().to_lowercase();
            if text.contains(&name_lower) {
                return true;
            }
        }
    }

    if let Some(street) = record.street_segment() {
        let street_lower = street.to_lowercase();
        if street_lower.len() > MIN_STREET_MATCH_LEN && body.to_lowercase().contains(&street_lower)
        {
            return true;
        }
    }

    if record.has_phone() {
        let digits: String = record.phone.chars().filter(|c| c.is_ascii_digit()).collect();
        if !digits.is_empty() && body.contains(&digits) {
            return true;
        }
    }

    false
}
