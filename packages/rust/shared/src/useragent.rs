//! Browser user-agent rotation for outgoing requests.
//!
//! Directory sites rate-limit aggressively; rotating among a handful of
//! common desktop browser strings keeps checks from being trivially
//! fingerprinted. Rotation is opt-out via `user_agent_rotation` in config.

use rand::Rng;
use rand::seq::IndexedRandom;

/// Fallback identity when rotation is disabled.
pub const DEFAULT_USER_AGENT: &str = concat!("napcite/", env!("CARGO_PKG_VERSION"));

/// Common desktop browser user agents, refreshed occasionally by hand.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:127.0) Gecko/20100101 Firefox/127.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
];

/// Pick a random browser user agent.
pub fn random_user_agent(rng: &mut impl Rng) -> &'static str {
    USER_AGENTS.choose(rng).copied().unwrap_or(DEFAULT_USER_AGENT)
}
