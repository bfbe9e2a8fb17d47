//! Core domain types for the NAP citation pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Placeholder used when extraction could not recover an address.
pub const ADDRESS_UNAVAILABLE: &str = "Address unavailable";

/// Placeholder used when extraction could not recover a phone number.
pub const PHONE_UNAVAILABLE: &str = "Phone unavailable";

/// Placeholder substituted by the citation builder for an empty address.
pub const ADDRESS_PENDING: &str = "Address pending verification";

/// Placeholder substituted by the citation builder for an empty phone.
pub const PHONE_PENDING: &str = "Phone pending verification";

// ---------------------------------------------------------------------------
// BusinessRecord
// ---------------------------------------------------------------------------

/// Normalized NAP data for a single business.
///
/// Created once after extraction and immutable thereafter. The address and
/// phone fields are always non-empty: missing values carry the explicit
/// [`ADDRESS_UNAVAILABLE`] / [`PHONE_UNAVAILABLE`] placeholders so that
/// downstream templating never sees an absent field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessRecord {
    /// Business name (required, non-empty).
    pub name: String,
    /// Street address, or [`ADDRESS_UNAVAILABLE`].
    pub address: String,
    /// Phone number, or [`PHONE_UNAVAILABLE`].
    pub phone: String,
    /// The map-listing URL the record was extracted from.
    pub source_url: String,
}

impl BusinessRecord {
    /// Build a record from raw extraction output, filling placeholders for
    /// missing fields. The name must be present.
    pub fn from_extraction(extraction: &ExtractionResult) -> Option<Self> {
        let name = extraction.name.as_deref()?.trim();
        if name.is_empty() {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            address: extraction
                .address
                .clone()
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| ADDRESS_UNAVAILABLE.to_string()),
            phone: extraction
                .phone
                .clone()
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| PHONE_UNAVAILABLE.to_string()),
            source_url: extraction.source_url.clone(),
        })
    }

    /// Whether a real (non-placeholder) address is known.
    pub fn has_address(&self) -> bool {
        self.address != ADDRESS_UNAVAILABLE && self.address != ADDRESS_PENDING
    }

    /// Whether a real (non-placeholder) phone number is known.
    pub fn has_phone(&self) -> bool {
        self.phone != PHONE_UNAVAILABLE && self.phone != PHONE_PENDING
    }

    /// First comma-delimited segment of the address (the street part),
    /// if a real address is known.
    pub fn street_segment(&self) -> Option<&str> {
        if !self.has_address() {
            return None;
        }
        self.address.split(',').next().map(str::trim)
    }
}

// ---------------------------------------------------------------------------
// ExtractionResult
// ---------------------------------------------------------------------------

/// Raw output of the extraction stage.
///
/// `success` requires all three NAP fields; `partial_success` at least one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// All of name, address, and phone were recovered.
    pub success: bool,
    /// At least one of name, address, or phone was recovered.
    pub partial_success: bool,
    /// Extracted business name.
    pub name: Option<String>,
    /// Extracted street address.
    pub address: Option<String>,
    /// Extracted phone number.
    pub phone: Option<String>,
    /// The map-listing URL that was processed.
    pub source_url: String,
    /// Error message when the fetch itself failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionResult {
    /// A failed extraction carrying only the error message.
    pub fn failed(source_url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Research types
// ---------------------------------------------------------------------------

/// Outcome of a single directory presence check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryCheck {
    /// Base URL of the directory that was checked.
    pub url: String,
    /// Whether the business appears to be listed.
    pub exists: bool,
    /// Error message when the check itself failed (recorded as missing).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Full output of the research stage.
///
/// `directories_checked` is total over the configured directory list:
/// every configured directory gets an entry, even when its check failed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResearchResult {
    /// Per-directory check outcome, keyed by directory id.
    pub directories_checked: BTreeMap<String, DirectoryCheck>,
    /// Directory ids where the business was not found, in check order.
    pub missing_directories: Vec<String>,
    /// Up to two ids sampled from `missing_directories` for citation building.
    pub selected_directories: Vec<String>,
}

/// Directory id → formatted citation text.
pub type CitationSet = BTreeMap<String, String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_from_full_extraction() {
        let extraction = ExtractionResult {
            success: true,
            partial_success: true,
            name: Some("Joe's Cafe".into()),
            address: Some("123 Main St, Springfield, IL 62701".into()),
            phone: Some("(555) 123-4567".into()),
            source_url: "https://maps.example.com/place/joes".into(),
            error: None,
        };

        let record = BusinessRecord::from_extraction(&extraction).expect("record");
        assert_eq!(record.name, "Joe's Cafe");
        assert!(record.has_address());
        assert!(record.has_phone());
        assert_eq!(record.street_segment(), Some("123 Main St"));
    }

    #[test]
    fn record_fills_placeholders() {
        let extraction = ExtractionResult {
            success: false,
            partial_success: true,
            name: Some("Joe's Cafe".into()),
            address: None,
            phone: Some("  ".into()),
            source_url: "https://maps.example.com/place/joes".into(),
            error: None,
        };

        let record = BusinessRecord::from_extraction(&extraction).expect("record");
        assert_eq!(record.address, ADDRESS_UNAVAILABLE);
        assert_eq!(record.phone, PHONE_UNAVAILABLE);
        assert!(!record.has_address());
        assert!(!record.has_phone());
        assert_eq!(record.street_segment(), None);
    }

    #[test]
    fn record_requires_name() {
        let extraction = ExtractionResult {
            partial_success: true,
            address: Some("123 Main St".into()),
            source_url: "https://maps.example.com/place".into(),
            ..ExtractionResult::default()
        };
        assert!(BusinessRecord::from_extraction(&extraction).is_none());

        let blank_name = ExtractionResult {
            name: Some("   ".into()),
            ..extraction
        };
        assert!(BusinessRecord::from_extraction(&blank_name).is_none());
    }

    #[test]
    fn research_result_serializes() {
        let mut result = ResearchResult::default();
        result.directories_checked.insert(
            "yelp".into(),
            DirectoryCheck {
                url: "https://www.yelp.com".into(),
                exists: false,
                error: Some("HTTP 503".into()),
            },
        );
        result.missing_directories.push("yelp".into());

        let json = serde_json::to_string(&result).expect("serialize");
        let parsed: ResearchResult = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.missing_directories, vec!["yelp".to_string()]);
        assert!(parsed.directories_checked["yelp"].error.is_some());
    }
}
