//! End-to-end citation workflow: URL → extract → research → citations →
//! summary → report.
//!
//! Stages run strictly in sequence; each is a precondition for the next.
//! A stage failure halts the run immediately and is returned as a
//! [`WorkflowError`] naming the failing stage. No stage is retried.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Local;
use serde::Serialize;
use tracing::{info, instrument, warn};

use napcite_citations::build_citations;
use napcite_citations::summary::generate_summary;
use napcite_extract::Extractor;
use napcite_research::Researcher;
use napcite_shared::{AppConfig, BusinessRecord, CitationSet, ResearchResult};

use crate::report;

// ---------------------------------------------------------------------------
// Stages & errors
// ---------------------------------------------------------------------------

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validation,
    Extraction,
    Research,
    CitationBuilding,
    Summary,
    Output,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Validation => "validation",
            Stage::Extraction => "extraction",
            Stage::Research => "research",
            Stage::CitationBuilding => "citation_building",
            Stage::Summary => "summary",
            Stage::Output => "output",
        };
        f.write_str(name)
    }
}

/// Terminal failure of one workflow run, tagged with the failing stage.
#[derive(Debug, thiserror::Error)]
#[error("{stage} stage failed: {message}")]
pub struct WorkflowError {
    /// The stage that failed.
    pub stage: Stage,
    /// Human-readable reason.
    pub message: String,
}

impl WorkflowError {
    fn new(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// WorkflowResult & progress
// ---------------------------------------------------------------------------

/// Everything produced by one successful workflow run.
#[derive(Debug)]
pub struct WorkflowResult {
    /// Normalized NAP data, placeholders filled.
    pub business: BusinessRecord,
    /// Per-directory presence results.
    pub research: ResearchResult,
    /// Generated citations, one per selected directory.
    pub citations: CitationSet,
    /// Research summary paragraph.
    pub summary: String,
    /// Word count of the summary after bounds were applied.
    pub summary_word_count: usize,
    /// The assembled report body.
    pub report: String,
    /// Path of the persisted report file.
    pub report_path: PathBuf,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Callback surface for reporting live stage progress to a front end.
pub trait ProgressReporter: Send + Sync {
    /// Called when a stage begins.
    fn stage(&self, stage: Stage);
    /// Called once on successful completion.
    fn done(&self, result: &WorkflowResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn stage(&self, _stage: Stage) {}
    fn done(&self, _result: &WorkflowResult) {}
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// Run the complete citation workflow for one map-listing URL.
#[instrument(skip_all, fields(url = %maps_url))]
pub async fn run_workflow(
    maps_url: &str,
    config: &AppConfig,
    progress: &dyn ProgressReporter,
) -> Result<WorkflowResult, WorkflowError> {
    let start = Instant::now();

    // --- Stage 1: validation ---
    progress.stage(Stage::Validation);
    let maps_url = maps_url.trim();
    if maps_url.is_empty() {
        return Err(WorkflowError::new(
            Stage::Validation,
            "map-listing URL cannot be empty",
        ));
    }

    // --- Stage 2: extraction ---
    progress.stage(Stage::Extraction);
    let extractor = Extractor::new(
        Duration::from_secs(config.timeouts.page_load_secs),
        config.user_agent_rotation,
    )
    .map_err(|e| WorkflowError::new(Stage::Extraction, e.to_string()))?;

    let extraction = extractor.run(maps_url).await;

    if !extraction.success && !extraction.partial_success {
        let message = extraction
            .error
            .unwrap_or_else(|| "failed to extract required information".into());
        return Err(WorkflowError::new(Stage::Extraction, message));
    }

    // Partial success is acceptable, but only with a name to anchor the run.
    let business = BusinessRecord::from_extraction(&extraction).ok_or_else(|| {
        WorkflowError::new(
            Stage::Extraction,
            "failed to extract business name, which is required",
        )
    })?;

    if !extraction.success {
        warn!(
            business = %business.name,
            address = %business.address,
            phone = %business.phone,
            "proceeding with partial extraction"
        );
    }
    info!(business = %business.name, "extraction complete");

    // --- Stage 3: research ---
    progress.stage(Stage::Research);
    let mut researcher = Researcher::new(config)
        .map_err(|e| WorkflowError::new(Stage::Research, e.to_string()))?;
    let research = researcher
        .run(&business)
        .await
        .map_err(|e| WorkflowError::new(Stage::Research, e.to_string()))?;

    info!(
        checked = research.directories_checked.len(),
        missing = research.missing_directories.len(),
        "research complete"
    );

    // --- Stage 4: citation building ---
    progress.stage(Stage::CitationBuilding);
    let citations = build_citations(&business, &research.selected_directories)
        .map_err(|e| WorkflowError::new(Stage::CitationBuilding, e.to_string()))?;

    // --- Stage 5: summary ---
    progress.stage(Stage::Summary);
    let summary = generate_summary(&business, &research, &config.summary);

    // --- Stage 6: output ---
    progress.stage(Stage::Output);
    let generated_at = Local::now();
    let report = report::assemble_report(&business, &summary.text, &citations, generated_at);
    let file_name = report::report_filename(&business.name, generated_at);
    let output_dir = PathBuf::from(&config.output.directory);
    let report_path = report::save_report(&report, &file_name, &output_dir)
        .map_err(|e| WorkflowError::new(Stage::Output, e.to_string()))?;

    let result = WorkflowResult {
        business,
        research,
        citations,
        summary: summary.text,
        summary_word_count: summary.word_count,
        report,
        report_path,
        elapsed: start.elapsed(),
    };

    progress.done(&result);

    info!(
        business = %result.business.name,
        report = %result.report_path.display(),
        elapsed_ms = result.elapsed.as_millis(),
        "workflow complete"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use napcite_shared::{ADDRESS_UNAVAILABLE, PHONE_UNAVAILABLE};

    fn temp_output_dir(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::SystemTime::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("napcite-pipeline-{tag}-{nanos}"))
    }

    fn test_config(directories: Vec<String>, output_dir: &std::path::Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.directories = directories;
        config.delay.between_requests_secs = 0;
        config.user_agent_rotation = false;
        config.timeouts.page_load_secs = 5;
        config.timeouts.request_secs = 5;
        config.output.directory = output_dir.to_string_lossy().into_owned();
        config
    }

    #[tokio::test]
    async fn empty_url_fails_validation_before_any_stage() {
        let out = temp_output_dir("validation");
        let config = test_config(vec![], &out);

        let err = run_workflow("   ", &config, &SilentProgress)
            .await
            .expect_err("should fail");
        assert_eq!(err.stage, Stage::Validation);
        assert!(err.message.contains("empty"));
    }

    #[tokio::test]
    async fn malformed_url_is_an_extraction_failure_not_a_rejection() {
        let out = temp_output_dir("malformed");
        let config = test_config(vec![], &out);

        // Only empty input is rejected up front; anything else goes to the
        // fetch and fails there with a stage-tagged error.
        let err = run_workflow("not a url", &config, &SilentProgress)
            .await
            .expect_err("should fail");
        assert_eq!(err.stage, Stage::Extraction);
    }

    #[tokio::test]
    async fn partial_extraction_proceeds_with_placeholders() {
        let maps = wiremock::MockServer::start().await;
        let directory = wiremock::MockServer::start().await;

        // Only a name on the listing page
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/place/joes"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(
                r#"<html><body><h1 class="DUwDvf">Joe's Cafe</h1></body></html>"#,
            ))
            .mount(&maps)
            .await;

        // Directory search finds nothing
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/search"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_string("<html><body>No results</body></html>"),
            )
            .mount(&directory)
            .await;

        let out = temp_output_dir("partial");
        let config = test_config(vec![directory.uri()], &out);

        let url = format!("{}/place/joes", maps.uri());
        let result = run_workflow(&url, &config, &SilentProgress)
            .await
            .expect("workflow");

        assert_eq!(result.business.name, "Joe's Cafe");
        assert_eq!(result.business.address, ADDRESS_UNAVAILABLE);
        assert_eq!(result.business.phone, PHONE_UNAVAILABLE);

        // One directory, missing, therefore selected and cited
        assert_eq!(result.research.missing_directories.len(), 1);
        assert_eq!(
            result.research.selected_directories,
            result.research.missing_directories
        );
        assert_eq!(result.citations.len(), 1);

        // The persisted report shows the exact placeholder strings
        let report = std::fs::read_to_string(&result.report_path).expect("read report");
        assert!(report.contains("Address: Address unavailable"));
        assert!(report.contains("Phone: Phone unavailable"));
        assert!(report.starts_with("NAP CITATION REPORT FOR Joe's Cafe"));

        let _ = std::fs::remove_dir_all(&out);
    }

    #[tokio::test]
    async fn missing_name_halts_at_extraction() {
        let maps = wiremock::MockServer::start().await;
        let directory = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/place/empty"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(
                // Address present but no recoverable name: partial success
                // that must still halt the pipeline.
                r#"<html><body><button data-item-id="address">123 Main Street, Springfield, IL 62701</button></body></html>"#,
            ))
            .mount(&maps)
            .await;

        // Research must never run when extraction fails
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/search"))
            .respond_with(wiremock::ResponseTemplate::new(200))
            .expect(0)
            .mount(&directory)
            .await;

        let out = temp_output_dir("noname");
        let config = test_config(vec![directory.uri()], &out);

        let url = format!("{}/place/empty", maps.uri());
        let err = run_workflow(&url, &config, &SilentProgress)
            .await
            .expect_err("should fail");

        assert_eq!(err.stage, Stage::Extraction);
        assert!(err.message.contains("business name"));
        assert!(!out.exists(), "no report should be written");
    }

    #[tokio::test]
    async fn fetch_failure_is_an_extraction_stage_error() {
        let maps = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/place/down"))
            .respond_with(wiremock::ResponseTemplate::new(500))
            .mount(&maps)
            .await;

        let out = temp_output_dir("down");
        let config = test_config(vec![], &out);

        let url = format!("{}/place/down", maps.uri());
        let err = run_workflow(&url, &config, &SilentProgress)
            .await
            .expect_err("should fail");

        assert_eq!(err.stage, Stage::Extraction);
        assert!(err.message.contains("500"));
    }

    #[tokio::test]
    async fn directory_outage_does_not_fail_the_run() {
        let maps = wiremock::MockServer::start().await;
        let directory = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/place/joes"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(
                r#"<html><body><h1 class="DUwDvf">Joe's Cafe</h1></body></html>"#,
            ))
            .mount(&maps)
            .await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/search"))
            .respond_with(wiremock::ResponseTemplate::new(503))
            .mount(&directory)
            .await;

        let out = temp_output_dir("outage");
        let config = test_config(vec![directory.uri()], &out);

        let url = format!("{}/place/joes", maps.uri());
        let result = run_workflow(&url, &config, &SilentProgress)
            .await
            .expect("workflow survives directory outage");

        let check = result.research.directories_checked.values().next().unwrap();
        assert!(!check.exists);
        assert!(check.error.is_some());
        assert_eq!(result.research.missing_directories.len(), 1);

        let _ = std::fs::remove_dir_all(&out);
    }
}
