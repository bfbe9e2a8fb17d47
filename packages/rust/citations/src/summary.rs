//! Research-summary paragraph generation.
//!
//! Renders a templated natural-language summary of the research stage,
//! bounded to the configured word-count range. Text below the minimum gets
//! one fixed filler sentence appended; text above the maximum is
//! hard-truncated at the word boundary, which can cut a sentence short —
//! accepted behavior, not silently corrected.

use serde::Serialize;
use tracing::{info, instrument};

use napcite_shared::{BusinessRecord, ResearchResult, config::SummaryConfig};

/// How many missing directories are named before "and N others".
const MAX_NAMED_MISSING: usize = 3;

/// A generated summary and its word count.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryResult {
    /// The rendered paragraph.
    pub text: String,
    /// Word count of `text` after bounds were applied.
    pub word_count: usize,
}

/// Generate the research summary for a completed research stage.
#[instrument(skip_all, fields(business = %record.name))]
pub fn generate_summary(
    record: &BusinessRecord,
    research: &ResearchResult,
    bounds: &SummaryConfig,
) -> SummaryResult {
    let name = &record.name;
    let checked = research.directories_checked.len();
    let missing = &research.missing_directories;
    let selected = &research.selected_directories;

    let mut text = format!("Research Summary for {name}\n\n");
    text.push_str(
        "The research process began by extracting the business's Name, Address, and Phone \
         (NAP) information from the source map listing. ",
    );
    text.push_str(&format!(
        "This data was then used to search across {checked} business directories to determine \
         where the business already has listings. "
    ));

    if missing.is_empty() {
        text.push_str(&format!(
            "Interestingly, {name} appears to be present in all checked directories. "
        ));
    } else {
        let named = missing
            .iter()
            .take(MAX_NAMED_MISSING)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        text.push_str(&format!(
            "The research found that {name} is missing from {} directories including {named}",
            missing.len()
        ));
        if missing.len() > MAX_NAMED_MISSING {
            text.push_str(&format!(" and {} others", missing.len() - MAX_NAMED_MISSING));
        }
        text.push_str(". ");
    }

    if selected.is_empty() {
        text.push_str(
            "No directories were selected for citation building as the business appears to be \
             well-represented across the checked platforms. ",
        );
    } else {
        text.push_str(&format!(
            "Based on the findings, NAP citations were prepared for {} as these directories \
             would provide valuable additional visibility for {name}. ",
            selected.join(", ")
        ));
    }

    text.push_str(
        "The final citations were formatted according to each directory's specific requirements \
         to ensure accuracy and consistency of the business information across the web.",
    );

    let text = apply_word_bounds(text, name, bounds);
    let word_count = text.split_whitespace().count();

    info!(word_count, "summary generated");
    SummaryResult { text, word_count }
}

/// Enforce the configured word-count range.
fn apply_word_bounds(text: String, name: &str, bounds: &SummaryConfig) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();

    if words.len() < bounds.min_words {
        return format!(
            "{text} Maintaining consistent NAP information across business directories is \
             crucial for local SEO and helps potential customers find accurate information \
             about {name}."
        );
    }

    if words.len() > bounds.max_words {
        return words[..bounds.max_words].join(" ");
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use napcite_shared::DirectoryCheck;

    fn record() -> BusinessRecord {
        BusinessRecord {
            name: "Joe's Cafe".into(),
            address: "123 Main Street, Springfield, IL 62701".into(),
            phone: "(555) 123-4567".into(),
            source_url: "https://maps.example.com/p".into(),
        }
    }

    fn research(missing: &[&str], selected: &[&str]) -> ResearchResult {
        let mut result = ResearchResult::default();
        for id in missing {
            result.directories_checked.insert(
                id.to_string(),
                DirectoryCheck {
                    url: format!("https://www.{id}.com"),
                    exists: false,
                    error: None,
                },
            );
            result.missing_directories.push(id.to_string());
        }
        result.directories_checked.insert(
            "present".into(),
            DirectoryCheck {
                url: "https://www.present.com".into(),
                exists: true,
                error: None,
            },
        );
        result.selected_directories = selected.iter().map(|s| s.to_string()).collect();
        result
    }

    fn bounds(min: usize, max: usize) -> SummaryConfig {
        SummaryConfig {
            min_words: min,
            max_words: max,
        }
    }

    #[test]
    fn names_up_to_three_missing_directories() {
        let research = research(&["yelp", "bbb", "manta", "tupalo", "hotfrog"], &["yelp", "bbb"]);
        let summary = generate_summary(&record(), &research, &bounds(10, 1000));

        assert!(summary.text.contains("missing from 5 directories"));
        assert!(summary.text.contains("yelp, bbb, manta"));
        assert!(summary.text.contains("and 2 others"));
        assert!(summary.text.contains("prepared for yelp, bbb"));
    }

    #[test]
    fn alternate_sentences_when_nothing_missing() {
        let research = research(&[], &[]);
        let summary = generate_summary(&record(), &research, &bounds(10, 1000));

        assert!(summary.text.contains("present in all checked directories"));
        assert!(summary.text.contains("No directories were selected"));
        assert!(!summary.text.contains("and 0 others"));
    }

    #[test]
    fn filler_appended_below_minimum_strictly_increases_count() {
        let research = research(&["yelp"], &["yelp"]);

        let unpadded = generate_summary(&record(), &research, &bounds(1, 1000));
        let padded = generate_summary(&record(), &research, &bounds(500, 1000));

        assert!(padded.text.contains("crucial for local SEO"));
        assert!(padded.word_count > unpadded.word_count);
    }

    #[test]
    fn truncated_to_exactly_max_words() {
        let research = research(&["yelp", "bbb", "manta"], &["yelp", "bbb"]);
        let summary = generate_summary(&record(), &research, &bounds(1, 20));

        assert_eq!(summary.word_count, 20);
        assert_eq!(summary.text.split_whitespace().count(), 20);
    }

    #[test]
    fn word_count_matches_text() {
        let research = research(&["yelp"], &["yelp"]);
        let summary = generate_summary(&record(), &research, &bounds(100, 150));
        assert_eq!(summary.word_count, summary.text.split_whitespace().count());
    }
}
