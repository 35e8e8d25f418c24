//! Gateway Configuration

use std::str::FromStr;
use std::time::Duration;

use crate::error::GatewayError;

/// Gateway region; each region is served from its own endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Uae,
    Saudi,
    Egypt,
    Oman,
    Jordan,
    Global,
}

impl Region {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Region::Uae => "https://secure.paytabs.com",
            Region::Saudi => "https://secure.paytabs.sa",
            Region::Egypt => "https://secure-egypt.paytabs.com",
            Region::Oman => "https://secure-oman.paytabs.com",
            Region::Jordan => "https://secure-jordan.paytabs.com",
            Region::Global => "https://secure-global.paytabs.com",
        }
    }
}

impl FromStr for Region {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ARE" | "UAE" => Ok(Region::Uae),
            "SAU" => Ok(Region::Saudi),
            "EGY" => Ok(Region::Egypt),
            "OMN" => Ok(Region::Oman),
            "JOR" => Ok(Region::Jordan),
            "GLOBAL" => Ok(Region::Global),
            other => Err(GatewayError::Config(format!(
                "Unknown gateway region: {}",
                other
            ))),
        }
    }
}

/// Configuration for the gateway client
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Merchant profile id
    pub profile_id: u64,

    /// Server key sent as the authorization header
    pub server_key: String,

    /// Client key for embedded/managed form flows
    pub client_key: String,

    /// Region determining the API endpoint
    pub region: Region,

    /// Override the region endpoint (used in tests)
    pub base_url: Option<String>,

    /// Request timeout
    pub timeout: Duration,

    /// Maximum retry attempts for retryable failures
    pub retry_attempts: u32,

    /// Initial retry delay, doubled per attempt
    pub retry_delay: Duration,
}

impl GatewayConfig {
    pub fn new(profile_id: u64, server_key: impl Into<String>) -> Self {
        Self {
            profile_id,
            server_key: server_key.into(),
            client_key: String::new(),
            region: Region::Global,
            base_url: None,
            timeout: Duration::from_secs(30),
            retry_attempts: 3,
            retry_delay: Duration::from_millis(200),
        }
    }

    pub fn with_client_key(mut self, client_key: impl Into<String>) -> Self {
        self.client_key = client_key.into();
        self
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, attempts: u32, delay: Duration) -> Self {
        self.retry_attempts = attempts;
        self.retry_delay = delay;
        self
    }

    /// Effective API base URL
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.region.endpoint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_parsing() {
        assert_eq!("ARE".parse::<Region>().unwrap(), Region::Uae);
        assert_eq!("sau".parse::<Region>().unwrap(), Region::Saudi);
        assert_eq!("GLOBAL".parse::<Region>().unwrap(), Region::Global);
        assert!("XX".parse::<Region>().is_err());
    }

    #[test]
    fn test_base_url_override() {
        let config = GatewayConfig::new(1, "key").with_region(Region::Saudi);
        assert_eq!(config.base_url(), "https://secure.paytabs.sa");

        let config = config.with_base_url("http://localhost:9999");
        assert_eq!(config.base_url(), "http://localhost:9999");
    }
}
