//! Application configuration for napcite.
//!
//! User config lives at `~/.napcite/napcite.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{NapciteError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "napcite.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".napcite";

/// Business directories checked by the research stage, in check order.
const DEFAULT_DIRECTORIES: &[&str] = &[
    "https://www.yelp.com",
    "https://www.yellowpages.com",
    "https://www.bbb.org",
    "https://www.foursquare.com",
    "https://www.manta.com",
    "https://www.superpages.com",
    "https://www.chamberofcommerce.com",
    "https://www.mapquest.com",
    "https://www.citysearch.com",
    "https://www.tripadvisor.com",
    "https://www.hotfrog.in",
    "https://www.provenexpert.com",
    "https://www.businessseek.biz",
    "https://tupalo.com",
];

// ---------------------------------------------------------------------------
// Config structs (matching napcite.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory base URLs to check, in order.
    #[serde(default = "default_directories")]
    pub directories: Vec<String>,

    /// HTTP timeout settings.
    #[serde(default)]
    pub timeouts: TimeoutConfig,

    /// Inter-request pacing.
    #[serde(default)]
    pub delay: DelayConfig,

    /// Report output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Summary word-count bounds.
    #[serde(default)]
    pub summary: SummaryConfig,

    /// Proxy settings (unused unless enabled).
    #[serde(default)]
    pub proxy: ProxyConfig,

    /// Rotate user agents on outgoing requests.
    #[serde(default = "default_true")]
    pub user_agent_rotation: bool,

    /// Extra diagnostic output.
    #[serde(default)]
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            directories: default_directories(),
            timeouts: TimeoutConfig::default(),
            delay: DelayConfig::default(),
            output: OutputConfig::default(),
            summary: SummaryConfig::default(),
            proxy: ProxyConfig::default(),
            user_agent_rotation: true,
            debug: false,
        }
    }
}

fn default_directories() -> Vec<String> {
    DEFAULT_DIRECTORIES.iter().map(|s| s.to_string()).collect()
}

fn default_true() -> bool {
    true
}

/// `[timeouts]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Timeout for fetching the map-listing page, in seconds.
    #[serde(default = "default_page_load_secs")]
    pub page_load_secs: u64,

    /// Timeout for each directory search request, in seconds.
    #[serde(default = "default_request_secs")]
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            page_load_secs: default_page_load_secs(),
            request_secs: default_request_secs(),
        }
    }
}

fn default_page_load_secs() -> u64 {
    30
}
fn default_request_secs() -> u64 {
    10
}

/// `[delay]` section — pacing between directory checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelayConfig {
    /// Base delay between directory requests, in seconds.
    /// Random jitter of 1–3 s is added on top. Zero disables the delay.
    #[serde(default = "default_between_requests_secs")]
    pub between_requests_secs: u64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            between_requests_secs: default_between_requests_secs(),
        }
    }
}

fn default_between_requests_secs() -> u64 {
    3
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory where report files are written.
    #[serde(default = "default_output_dir")]
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
        }
    }
}

fn default_output_dir() -> String {
    "data/output".into()
}

/// `[summary]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Minimum word count; a filler sentence is appended below this.
    #[serde(default = "default_min_words")]
    pub min_words: usize,

    /// Maximum word count; text is hard-truncated above this.
    #[serde(default = "default_max_words")]
    pub max_words: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            min_words: default_min_words(),
            max_words: default_max_words(),
        }
    }
}

fn default_min_words() -> usize {
    100
}
fn default_max_words() -> usize {
    150
}

/// `[proxy]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Route directory requests through a proxy.
    #[serde(default)]
    pub enabled: bool,

    /// Candidate proxy URLs; the first entry is used when enabled.
    #[serde(default)]
    pub proxy_list: Vec<String>,
}

impl ProxyConfig {
    /// The proxy URL to use, if proxying is enabled and one is configured.
    pub fn active_proxy(&self) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.proxy_list.first().map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.napcite/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| NapciteError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.napcite/napcite.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| NapciteError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| NapciteError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| NapciteError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| NapciteError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| NapciteError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
