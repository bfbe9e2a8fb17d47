//! Text normalization helpers shared across pipeline stages.

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Collapse runs of whitespace to single spaces and trim the ends.
pub fn clean_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Format a phone number into the canonical `(XXX) XXX-XXXX` display form.
///
/// 10-digit numbers are grouped directly; 11-digit numbers with a leading
/// country digit `1` drop the prefix. Anything else (including placeholder
/// text) is returned unchanged.
pub fn format_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    match digits.len() {
        10 => format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..]),
        11 if digits.starts_with('1') => {
            format!("({}) {}-{}", &digits[1..4], &digits[4..7], &digits[7..])
        }
        _ => phone.to_string(),
    }
}

/// Reduce a business name to a filename-safe stem, capped at 30 characters.
pub fn sanitize_for_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    cleaned.chars().take(30).collect()
}
