//! Workflow orchestration and report output for napcite.
//!
//! Sequences the four pipeline stages (extract → research → citations →
//! summary), maps any stage failure to a stage-tagged error, and assembles
//! and persists the final plain-text report.

pub mod pipeline;
pub mod report;

pub use pipeline::{
    ProgressReporter, SilentProgress, Stage, WorkflowError, WorkflowResult, run_workflow,
};
pub use report::{
    ReportEntry, assemble_report, list_reports, read_report, report_filename, save_report,
};
