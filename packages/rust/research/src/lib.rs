//! Directory presence research for a business.
//!
//! For each configured directory, fetches a directory-specific search URL
//! and decides presence by fuzzy matching the response body. Checks run
//! strictly one at a time, in configured order, with a jittered delay
//! between requests. A failed check is conservatively recorded as "missing"
//! and never aborts the stage.

mod directories;

use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use reqwest::Client;
use tracing::{info, instrument, warn};

use napcite_shared::{
    AppConfig, BusinessRecord, DirectoryCheck, NapciteError, ResearchResult, Result,
    random_user_agent,
};

pub use directories::{DirectoryProfile, build_registry, directory_id, listing_matches};

/// How many missing directories to select for citation building.
const SELECTION_SIZE: usize = 2;

/// Jitter added to the configured inter-request delay, in seconds.
const JITTER_RANGE_SECS: std::ops::Range<f64> = 1.0..3.0;

// ---------------------------------------------------------------------------
// Researcher
// ---------------------------------------------------------------------------

/// Checks business presence across the configured directories.
pub struct Researcher {
    client: Client,
    profiles: Vec<DirectoryProfile>,
    base_delay: Duration,
    rotate_user_agent: bool,
    rng: StdRng,
}

impl Researcher {
    /// Create a researcher from the application config, seeded from the OS.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let profiles = build_registry(&config.directories);
        Self::with_profiles(config, profiles, StdRng::from_os_rng())
    }

    /// Create a researcher with an explicit profile list and RNG.
    ///
    /// Deterministic selection and jitter require a seeded RNG, so tests
    /// construct the researcher through this path.
    pub fn with_profiles(
        config: &AppConfig,
        profiles: Vec<DirectoryProfile>,
        rng: StdRng,
    ) -> Result<Self> {
        let mut builder = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(Duration::from_secs(config.timeouts.request_secs));

        if let Some(proxy_url) = config.proxy.active_proxy() {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| NapciteError::config(format!("invalid proxy {proxy_url}: {e}")))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| NapciteError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            profiles,
            base_delay: Duration::from_secs(config.delay.between_requests_secs),
            rotate_user_agent: config.user_agent_rotation,
            rng,
        })
    }

    /// Check every configured directory for `record`, in order, and select
    /// up to two missing directories for citation building.
    #[instrument(skip_all, fields(business = %record.name, directories = self.profiles.len()))]
    pub async fn run(&mut self, record: &BusinessRecord) -> Result<ResearchResult> {
        if record.name.trim().is_empty() {
            return Err(NapciteError::validation("no business name provided"));
        }

        let query = build_search_query(record);
        let mut result = ResearchResult::default();
        let profiles = self.profiles.clone();
        let total = profiles.len();

        for (i, profile) in profiles.iter().enumerate() {
            let search_url = profile.search_url(&query);

            match self.check_directory(&search_url, record).await {
                Ok(exists) => {
                    result.directories_checked.insert(
                        profile.id.clone(),
                        DirectoryCheck {
                            url: profile.base_url.clone(),
                            exists,
                            error: None,
                        },
                    );
                    if !exists {
                        result.missing_directories.push(profile.id.clone());
                    }

                    // Pace requests to avoid rate limiting; skip after the
                    // last directory and entirely in zero-delay (test) mode.
                    if !self.base_delay.is_zero() && i + 1 < total {
                        let jitter = Duration::from_secs_f64(
                            self.rng.random_range(JITTER_RANGE_SECS),
                        );
                        tokio::time::sleep(self.base_delay + jitter).await;
                    }
                }
                Err(e) => {
                    warn!(directory = %profile.id, error = %e, "directory check failed, recording as missing");
                    result.missing_directories.push(profile.id.clone());
                    result.directories_checked.insert(
                        profile.id.clone(),
                        DirectoryCheck {
                            url: profile.base_url.clone(),
                            exists: false,
                            error: Some(e.to_string()),
                        },
                    );
                }
            }
        }

        result.selected_directories =
            select_for_citation(&result.missing_directories, &mut self.rng);

        info!(
            checked = result.directories_checked.len(),
            missing = result.missing_directories.len(),
            selected = result.selected_directories.len(),
            "research complete"
        );

        Ok(result)
    }

    /// Fetch one directory search page and decide presence.
    async fn check_directory(&mut self, search_url: &str, record: &BusinessRecord) -> Result<bool> {
        let user_agent = if self.rotate_user_agent {
            random_user_agent(&mut self.rng)
        } else {
            napcite_shared::useragent::DEFAULT_USER_AGENT
        };

        let response = self
            .client
            .get(search_url)
            .header(reqwest::header::USER_AGENT, user_agent)
            .send()
            .await
            .map_err(|e| NapciteError::Network(format!("{search_url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NapciteError::Network(format!("{search_url}: HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| NapciteError::Network(format!("{search_url}: failed to read body: {e}")))?;

        Ok(listing_matches(&body, record))
    }
}

// ---------------------------------------------------------------------------
// Query construction & selection
// ---------------------------------------------------------------------------

/// Search query: business name plus the first comma-delimited address
/// segment when a real address is known, otherwise name alone.
pub fn build_search_query(record: &BusinessRecord) -> String {
    match record.street_segment() {
        Some(street) => format!("{} {}", record.name, street).trim().to_string(),
        None => record.name.trim().to_string(),
    }
}

/// Sample exactly [`SELECTION_SIZE`] directory ids uniformly without
/// replacement from `missing`; with fewer candidates, select them all.
pub fn select_for_citation(missing: &[String], rng: &mut impl Rng) -> Vec<String> {
    if missing.len() <= SELECTION_SIZE {
        return missing.to_vec();
    }
    missing
        .choose_multiple(rng, SELECTION_SIZE)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use napcite_shared::{ADDRESS_UNAVAILABLE, PHONE_UNAVAILABLE};

    fn record() -> BusinessRecord {
        BusinessRecord {
            name: "Joe's Cafe".into(),
            address: "123 Main Street, Springfield, IL 62701".into(),
            phone: "(555) 123-4567".into(),
            source_url: "https://maps.example.com/p".into(),
        }
    }

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.delay.between_requests_secs = 0;
        config.user_agent_rotation = false;
        config
    }

    #[test]
    fn query_uses_name_and_street_segment() {
        assert_eq!(build_search_query(&record()), "Joe's Cafe 123 Main Street");
    }

    #[test]
    fn query_falls_back_to_name_alone() {
        let mut r = record();
        r.address = ADDRESS_UNAVAILABLE.into();
        assert_eq!(build_search_query(&r), "Joe's Cafe");
    }

    #[test]
    fn selection_of_two_from_many() {
        let missing: Vec<String> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..50 {
            let selected = select_for_citation(&missing, &mut rng);
            assert_eq!(selected.len(), 2);
            assert_ne!(selected[0], selected[1]);
            assert!(selected.iter().all(|s| missing.contains(s)));
        }
    }

    #[test]
    fn selection_takes_all_when_fewer_than_two() {
        let mut rng = StdRng::seed_from_u64(42);

        let one = vec!["only".to_string()];
        assert_eq!(select_for_citation(&one, &mut rng), one);

        let none: Vec<String> = vec![];
        assert!(select_for_citation(&none, &mut rng).is_empty());

        let two = vec!["a".to_string(), "b".to_string()];
        assert_eq!(select_for_citation(&two, &mut rng), two);
    }

    #[tokio::test]
    async fn run_records_presence_and_absence() {
        let present = wiremock::MockServer::start().await;
        let absent = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/search"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(
                r#"<html><body><h3 class="business-name">Joe's Cafe</h3></body></html>"#,
            ))
            .mount(&present)
            .await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/search"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_string("<html><body>No results found</body></html>"),
            )
            .mount(&absent)
            .await;

        let profiles = vec![
            DirectoryProfile {
                id: "alpha".into(),
                base_url: present.uri(),
            },
            DirectoryProfile {
                id: "beta".into(),
                base_url: absent.uri(),
            },
        ];

        let mut researcher =
            Researcher::with_profiles(&test_config(), profiles, StdRng::seed_from_u64(1))
                .expect("build researcher");
        let result = researcher.run(&record()).await.expect("research");

        assert_eq!(result.directories_checked.len(), 2);
        assert!(result.directories_checked["alpha"].exists);
        assert!(!result.directories_checked["beta"].exists);
        assert_eq!(result.missing_directories, vec!["beta".to_string()]);
        assert_eq!(result.selected_directories, vec!["beta".to_string()]);
    }

    #[tokio::test]
    async fn fetch_failure_is_recorded_as_missing_and_loop_continues() {
        let broken = wiremock::MockServer::start().await;
        let healthy = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/search"))
            .respond_with(wiremock::ResponseTemplate::new(503))
            .mount(&broken)
            .await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/search"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(
                r#"<html><body><h3 class="business-name">Joe's Cafe</h3></body></html>"#,
            ))
            .mount(&healthy)
            .await;

        let profiles = vec![
            DirectoryProfile {
                id: "broken".into(),
                base_url: broken.uri(),
            },
            DirectoryProfile {
                id: "healthy".into(),
                base_url: healthy.uri(),
            },
        ];

        let mut researcher =
            Researcher::with_profiles(&test_config(), profiles, StdRng::seed_from_u64(1))
                .expect("build researcher");
        let result = researcher.run(&record()).await.expect("research");

        let broken_check = &result.directories_checked["broken"];
        assert!(!broken_check.exists);
        assert!(broken_check.error.as_deref().unwrap_or("").contains("503"));
        assert!(result.missing_directories.contains(&"broken".to_string()));

        // The failure did not abort the loop: the healthy directory was
        // still checked and found present.
        assert!(result.directories_checked["healthy"].exists);
    }

    #[tokio::test]
    async fn phone_digits_fallback_counts_as_present() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/search"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_string("<html><body>Contact: 5551234567</body></html>"),
            )
            .mount(&server)
            .await;

        let profiles = vec![DirectoryProfile {
            id: "phonely".into(),
            base_url: server.uri(),
        }];

        let mut r = record();
        r.address = ADDRESS_UNAVAILABLE.into();

        let mut researcher =
            Researcher::with_profiles(&test_config(), profiles, StdRng::seed_from_u64(1))
                .expect("build researcher");
        let result = researcher.run(&r).await.expect("research");

        assert!(result.directories_checked["phonely"].exists);
        assert!(result.missing_directories.is_empty());
        assert!(result.selected_directories.is_empty());
    }

    #[tokio::test]
    async fn empty_name_is_a_validation_error() {
        let r = BusinessRecord {
            name: "  ".into(),
            address: ADDRESS_UNAVAILABLE.into(),
            phone: PHONE_UNAVAILABLE.into(),
            source_url: "u".into(),
        };

        let mut researcher =
            Researcher::with_profiles(&test_config(), vec![], StdRng::seed_from_u64(1))
                .expect("build researcher");
        let err = researcher.run(&r).await.expect_err("should fail");
        assert!(err.to_string().contains("business name"));
    }
}
