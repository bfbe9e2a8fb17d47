//! NAP extraction from a map-listing page.
//!
//! Fetches the listing HTML and applies an ordered list of extraction
//! strategies per field: structured CSS selector lookups first, then a
//! regex fallback over the raw page source. The first strategy yielding
//! non-empty text wins; strategies are never merged.

mod fields;

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use reqwest::Client;
use tracing::{error, instrument, warn};

use napcite_shared::{ExtractionResult, NapciteError, Result, random_user_agent, useragent};

pub use fields::parse_listing;

/// Extracts NAP data from a single map-listing URL.
pub struct Extractor {
    client: Client,
}

impl Extractor {
    /// Create an extractor with the given page-load timeout.
    ///
    /// When `rotate_user_agent` is set, each extractor instance identifies
    /// as a randomly chosen desktop browser; otherwise it uses the crate's
    /// own user-agent string.
    pub fn new(page_load_timeout: Duration, rotate_user_agent: bool) -> Result<Self> {
        let user_agent = if rotate_user_agent {
            random_user_agent(&mut StdRng::from_os_rng())
        } else {
            useragent::DEFAULT_USER_AGENT
        };

        let client = Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(page_load_timeout)
            .build()
            .map_err(|e| NapciteError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Extract name, address, and phone from the map-listing page at `url`.
    ///
    /// Never returns an error: an unrecoverable fetch failure is reported
    /// as a failed [`ExtractionResult`] carrying the error message.
    #[instrument(skip(self))]
    pub async fn run(&self, url: &str) -> ExtractionResult {
        let body = match self.fetch(url).await {
            Ok(body) => body,
            Err(e) => {
                error!(url, error = %e, "map-listing fetch failed");
                return ExtractionResult::failed(url, e.to_string());
            }
        };

        let result = parse_listing(&body, url);

        let mut missing = Vec::new();
        if result.name.is_none() {
            missing.push("name");
        }
        if result.address.is_none() {
            missing.push("address");
        }
        if result.phone.is_none() {
            missing.push("phone");
        }
        if !missing.is_empty() {
            warn!(url, missing = missing.join(", "), "incomplete NAP data");
        }

        result
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| NapciteError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NapciteError::Network(format!("{url}: HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| NapciteError::Network(format!("{url}: failed to read body: {e}")))
    }
}
