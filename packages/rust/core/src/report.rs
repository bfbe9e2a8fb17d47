//! Plain-text report assembly, persistence, and history listing.
//!
//! Reports are flat text files in the configured output directory, named
//! `{sanitized_name}_{YYYYMMDD_HHMMSS}.txt`. History is just that
//! directory read back newest-first; there is no other cross-run state.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use tracing::{debug, info};

use napcite_shared::{BusinessRecord, CitationSet, NapciteError, Result, sanitize_for_filename};

/// A previously generated report on disk.
#[derive(Debug, Clone)]
pub struct ReportEntry {
    /// Absolute path to the report file.
    pub path: PathBuf,
    /// File name, carrying the business name and timestamp.
    pub file_name: String,
    /// Last modification time, used for newest-first ordering.
    pub modified: SystemTime,
}

/// Assemble the full report body.
///
/// Layout: header line with the business name, generation timestamp,
/// business info block, research summary, then one `--- {ID} CITATION ---`
/// section per generated citation.
pub fn assemble_report(
    record: &BusinessRecord,
    summary: &str,
    citations: &CitationSet,
    generated_at: DateTime<Local>,
) -> String {
    let mut content = format!("NAP CITATION REPORT FOR {}\n", record.name);
    content.push_str(&format!(
        "Generated on: {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));

    content.push_str("BUSINESS INFORMATION:\n");
    content.push_str(&format!("Name: {}\n", record.name));
    content.push_str(&format!("Address: {}\n", record.address));
    content.push_str(&format!("Phone: {}\n", record.phone));
    content.push_str(&format!("Source URL: {}\n\n", record.source_url));

    content.push_str("RESEARCH SUMMARY:\n");
    content.push_str(summary);
    content.push_str("\n\n");

    content.push_str("CITATIONS:\n");
    for (directory, citation) in citations {
        content.push_str(&format!("\n--- {} CITATION ---\n", directory.to_uppercase()));
        content.push_str(citation);
        content.push_str("\n-------------------------\n");
    }

    content
}

/// Collision-resistant report filename: sanitized business name + timestamp.
pub fn report_filename(business_name: &str, generated_at: DateTime<Local>) -> String {
    format!(
        "{}_{}.txt",
        sanitize_for_filename(business_name),
        generated_at.format("%Y%m%d_%H%M%S")
    )
}

/// Write a report to the output directory, creating it if needed.
/// Returns the path to the written file.
pub fn save_report(content: &str, file_name: &str, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir).map_err(|e| NapciteError::io(output_dir, e))?;

    let path = output_dir.join(file_name);
    std::fs::write(&path, content).map_err(|e| NapciteError::io(&path, e))?;

    info!(path = %path.display(), "report saved");
    Ok(path)
}

/// List prior reports in the output directory, newest first by
/// modification time. A missing directory is an empty history.
pub fn list_reports(output_dir: &Path) -> Result<Vec<ReportEntry>> {
    if !output_dir.exists() {
        debug!(dir = %output_dir.display(), "output directory absent, empty history");
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    let read_dir = std::fs::read_dir(output_dir).map_err(|e| NapciteError::io(output_dir, e))?;

    for entry in read_dir {
        let entry = entry.map_err(|e| NapciteError::io(output_dir, e))?;
        let path = entry.path();

        if path.extension().and_then(|e| e.to_str()) != Some("txt") {
            continue;
        }

        let metadata = entry.metadata().map_err(|e| NapciteError::io(&path, e))?;
        let modified = metadata.modified().map_err(|e| NapciteError::io(&path, e))?;
        let file_name = entry.file_name().to_string_lossy().into_owned();

        entries.push(ReportEntry {
            path,
            file_name,
            modified,
        });
    }

    entries.sort_by(|a, b| b.modified.cmp(&a.modified));
    Ok(entries)
}

/// Read a stored report back for re-display.
pub fn read_report(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| NapciteError::io(path, e))
}
