//! Shared types, error model, and configuration for napcite.
//!
//! This crate is the foundation depended on by all other napcite crates.
//! It provides:
//! - [`NapciteError`] — the unified error type
//! - Domain types ([`BusinessRecord`], [`ExtractionResult`], [`ResearchResult`])
//! - Configuration ([`AppConfig`], config loading)
//! - Text helpers (whitespace cleanup, phone formatting, user agents)

pub mod config;
pub mod error;
pub mod text;
pub mod types;
pub mod useragent;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DelayConfig, OutputConfig, ProxyConfig, SummaryConfig, TimeoutConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{NapciteError, Result};
pub use text::{clean_whitespace, format_phone, sanitize_for_filename};
pub use types::{
    ADDRESS_PENDING, ADDRESS_UNAVAILABLE, BusinessRecord, CitationSet, DirectoryCheck,
    ExtractionResult, PHONE_PENDING, PHONE_UNAVAILABLE, ResearchResult,
};
pub use useragent::random_user_agent;
