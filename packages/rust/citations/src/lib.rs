//! NAP citation formatting for selected directories.
//!
//! Each known directory id maps to a distinct hard-coded citation template
//! through a lookup table; unknown ids use a generic template naming the
//! directory. A missing business name fails the whole call; missing
//! address/phone substitute explicit placeholders.

pub mod summary;

use tracing::{info, instrument, warn};

use napcite_shared::{
    ADDRESS_PENDING, BusinessRecord, CitationSet, NapciteError, PHONE_PENDING, Result,
    format_phone,
};

/// A citation template: (name, address, phone) → formatted text.
type TemplateFn = fn(&str, &str, &str) -> String;

/// Lookup table from directory id to its citation template.
/// Ids not listed here fall back to [`generic_citation`].
fn known_template(directory: &str) -> Option<TemplateFn> {
    match directory {
        "yelp" => Some(yelp_citation),
        "yellowpages" => Some(yellowpages_citation),
        "bbb" => Some(bbb_citation),
        "foursquare" => Some(foursquare_citation),
        "manta" => Some(manta_citation),
        "superpages" => Some(superpages_citation),
        "chamberofcommerce" => Some(chamber_citation),
        _ => None,
    }
}

/// Format citations for every selected directory.
///
/// An empty selection is not an error and returns an empty set. A missing
/// business name is: the name is the one required field.
#[instrument(skip_all, fields(business = %record.name, selected = selected.len()))]
pub fn build_citations(record: &BusinessRecord, selected: &[String]) -> Result<CitationSet> {
    if record.name.trim().is_empty() {
        return Err(NapciteError::validation("missing business name"));
    }

    if selected.is_empty() {
        warn!("no directories selected for citation building");
        return Ok(CitationSet::new());
    }

    let address = if record.address.trim().is_empty() {
        ADDRESS_PENDING
    } else {
        record.address.as_str()
    };

    let phone = if record.phone.trim().is_empty() {
        PHONE_PENDING.to_string()
    } else if record.phone == PHONE_PENDING {
        record.phone.clone()
    } else {
        format_phone(&record.phone)
    };

    let mut citations = CitationSet::new();
    for directory in selected {
        let citation = match known_template(directory) {
            Some(template) => template(&record.name, address, &phone),
            None => generic_citation(&record.name, address, &phone, directory),
        };
        citations.insert(directory.clone(), citation);
    }

    info!(count = citations.len(), "citations built");
    Ok(citations)
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// Generic citation for directories without a dedicated template.
fn generic_citation(name: &str, address: &str, phone: &str, directory: &str) -> String {
    format!(
        "{name}\n{address}\n{phone}\n\nDirectory: {}",
        capitalize(directory)
    )
}

fn yelp_citation(name: &str, address: &str, phone: &str) -> String {
    format!("{name}\n{address}\n{phone}\n\nSubmission for Yelp Business Directory")
}

fn yellowpages_citation(name: &str, address: &str, phone: &str) -> String {
    format!(
        "Business Name: {name}\nFull Address: {address}\nPhone: {phone}\n\nYellow Pages Listing Information"
    )
}

fn bbb_citation(name: &str, address: &str, phone: &str) -> String {
    format!(
        "Company: {name}\nLocation: {address}\nContact: {phone}\n\nBetter Business Bureau Registration Information"
    )
}

fn foursquare_citation(name: &str, address: &str, phone: &str) -> String {
    format!("{name}\nLocated at: {address}\nCall: {phone}\n\nFoursquare Venue Information")
}

fn manta_citation(name: &str, address: &str, phone: &str) -> String {
    format!("Business: {name}\nAddress: {address}\nPhone Number: {phone}\n\nManta Business Listing")
}

fn superpages_citation(name: &str, address: &str, phone: &str) -> String {
    format!("{name}\n{address}\n{phone}\n\nSuperpages Directory Information")
}

fn chamber_citation(name: &str, address: &str, phone: &str) -> String {
    format!(
        "Member Business: {name}\nBusiness Address: {address}\nContact Number: {phone}\n\nChamber of Commerce Directory Listing"
    )
}

/// Uppercase the first character, matching directory display names.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
