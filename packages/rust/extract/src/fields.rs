//! Per-field extraction strategies for map-listing pages.
//!
//! Each field carries an ordered selector list tuned to the listing page's
//! markup, plus a regex fallback over the raw source. Selectors go stale
//! when the page's obfuscated class names change; the regex fallbacks are
//! the stable last resort.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use napcite_shared::{ExtractionResult, clean_whitespace};

/// Name selectors, most specific first.
const NAME_SELECTORS: &[&str] = &[
    "h1.DUwDvf",
    "h1.fontHeadlineLarge",
    "h1",
    "div.fontHeadlineLarge",
    "div[role='main'] div.lMbq3e",
    "div[role='main'] div.qBF1Pd",
    "div.qBF1Pd",
];

/// Address selectors, most specific first.
const ADDRESS_SELECTORS: &[&str] = &[
    "button[data-item-id='address']",
    "button[aria-label^='Address']",
    "div.Io6YTe",
];

/// Phone selectors, most specific first.
const PHONE_SELECTORS: &[&str] = &[
    "button[data-item-id^='phone:']",
    "button[aria-label^='Phone']",
];

/// US street address: number, street, city, region + postal.
static ADDRESS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\d+\s+[A-Za-z\s]+(?:Road|Street|Avenue|Lane|Drive|Blvd|Boulevard|Ave|St|Rd|Dr|Ln|Way|Place|Pl|Court|Ct),\s+[A-Za-z\s]+,\s+[A-Za-z\s]+\s+[\d-]+)",
    )
    .expect("valid regex")
});

/// US phone number in its common display forms.
static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\(\d{3}\)\s*\d{3}-\d{4}|\d{3}-\d{3}-\d{4}|\+\d{1,2}\s*\d{3}\s*\d{3}\s*\d{4})")
        .expect("valid regex")
});

/// Parse all three NAP fields from a fetched listing page.
pub fn parse_listing(body: &str, source_url: &str) -> ExtractionResult {
    let doc = Html::parse_document(body);

    let name = extract_name(&doc);
    let address = extract_address(&doc, body);
    let phone = extract_phone(&doc, body);

    ExtractionResult {
        success: name.is_some() && address.is_some() && phone.is_some(),
        partial_success: name.is_some() || address.is_some() || phone.is_some(),
        name,
        address,
        phone,
        source_url: source_url.to_string(),
        error: None,
    }
}

/// Business name: headline selectors, then the `<title>` split at `" - "`.
fn extract_name(doc: &Html) -> Option<String> {
    if let Some(text) = first_selector_text(doc, NAME_SELECTORS) {
        return Some(text);
    }

    let title_sel = Selector::parse("title").expect("valid selector");
    let title = doc.select(&title_sel).next()?;
    let text = clean_whitespace(&title.text().collect::<String>());
    let name = text.split(" - ").next()?.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Street address: structured selectors, then a regex scan of the source.
fn extract_address(doc: &Html, body: &str) -> Option<String> {
    if let Some(text) = first_selector_text(doc, ADDRESS_SELECTORS) {
        return Some(strip_label(&text, "address:"));
    }

    ADDRESS_PATTERN
        .find(body)
        .map(|m| clean_whitespace(m.as_str()))
}

/// Phone number: structured selectors, then a regex scan of the source.
fn extract_phone(doc: &Html, body: &str) -> Option<String> {
    if let Some(text) = first_selector_text(doc, PHONE_SELECTORS) {
        return Some(strip_label(&text, "phone:"));
    }

    PHONE_PATTERN
        .find(body)
        .map(|m| clean_whitespace(m.as_str()))
}

/// First non-empty text match across an ordered selector list.
fn first_selector_text(doc: &Html, selectors: &[&str]) -> Option<String> {
    for sel_str in selectors {
        let Ok(sel) = Selector::parse(sel_str) else {
            continue;
        };
        for el in doc.select(&sel) {
            let text = clean_whitespace(&el.text().collect::<String>());
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// Strip a leading field label like `"Address:"` if present (case-insensitive).
/// Non-ASCII text can put a char boundary inside the label span, so the slice
/// must be checked, not assumed.
fn strip_label(text: &str, label: &str) -> String {
    match text.get(..label.len()) {
        Some(head) if head.eq_ignore_ascii_case(label) => text[label.len()..].trim().to_string(),
        _ => text.to_string(),
    }
}
