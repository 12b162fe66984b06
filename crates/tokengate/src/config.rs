//! Client configuration.

use std::time::Duration;

use tokengate_transport::HttpConfig;

/// Default address of the session service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Settings for a Tokengate client.
///
/// Build one with `ClientConfig::default()` and override the fields you
/// care about, or go through [`TokengateBuilder`](crate::TokengateBuilder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base address of the session service.
    pub base_url: String,

    /// Per-request timeout, in seconds.
    pub timeout_secs: u64,

    /// `User-Agent` sent with every request.
    pub user_agent: String,

    /// How long a denied admin-view check stays on screen before the
    /// console moves back to the login view, in milliseconds.
    pub redirect_delay_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            user_agent: format!("tokengate/{}", env!("CARGO_PKG_VERSION")),
            redirect_delay_ms: 1000,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    /// The transport-level subset of this config.
    pub fn http(&self) -> HttpConfig {
        HttpConfig {
            base_url: self.base_url.clone(),
            timeout: self.timeout(),
            user_agent: self.user_agent.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_local_service() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.redirect_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_http_copies_transport_fields() {
        let config = ClientConfig {
            base_url: "https://auth.example.com".into(),
            timeout_secs: 5,
            ..ClientConfig::default()
        };
        let http = config.http();
        assert_eq!(http.base_url, "https://auth.example.com");
        assert_eq!(http.timeout, Duration::from_secs(5));
        assert_eq!(http.user_agent, config.user_agent);
    }
}
