//! HTTP client for the scan endpoint.

use crate::config::AppConfig;
use crate::error::{Result, ScanErrorKind, TopoError};
use crate::model::Region;
use reqwest::blocking::Client;
use std::time::Duration;

/// Scan client configuration.
#[derive(Debug, Clone)]
pub struct ScanClientConfig {
    /// Full URL of the topology endpoint
    pub endpoint: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for ScanClientConfig {
    fn default() -> Self {
        Self {
            endpoint: crate::config::DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl From<&AppConfig> for ScanClientConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// Blocking HTTP client for inventory scans.
pub struct ScanClient {
    client: Client,
    config: ScanClientConfig,
}

fn network_error(msg: &str, err: &reqwest::Error, timeout: Duration) -> TopoError {
    if err.is_timeout() {
        TopoError::scan(msg, ScanErrorKind::Timeout(timeout.as_secs()))
    } else {
        TopoError::scan(msg, ScanErrorKind::Network(err.to_string()))
    }
}

impl ScanClient {
    /// Create a new scan client.
    pub fn new(config: ScanClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| network_error("Failed to create HTTP client", &e, config.timeout))?;

        Ok(Self { client, config })
    }

    /// Fetch one full inventory snapshot.
    ///
    /// Any failure here leaves the caller's previous snapshot untouched; the
    /// view keeps showing stale data and reports one coalesced message.
    pub fn fetch_inventory(&self) -> Result<Vec<Region>> {
        tracing::debug!("Scanning {}", self.config.endpoint);

        let response = self
            .client
            .get(&self.config.endpoint)
            .send()
            .map_err(|e| network_error("scan request", &e, self.config.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TopoError::scan(
                format!("scan endpoint {}", self.config.endpoint),
                ScanErrorKind::Status(status.as_u16()),
            ));
        }

        let inventory: Vec<Region> = response.json().map_err(|e| {
            TopoError::scan(
                "decoding inventory payload",
                ScanErrorKind::Decode(e.to_string()),
            )
        })?;

        tracing::info!(
            regions = inventory.len(),
            instances = inventory
                .iter()
                .map(crate::model::Region::instance_count)
                .sum::<usize>(),
            "Scan complete"
        );
        Ok(inventory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_derives_from_app_config() {
        let app = AppConfig {
            endpoint: "https://scan.internal/api/topology".to_string(),
            timeout_secs: 5,
            ..AppConfig::default()
        };
        let config = ScanClientConfig::from(&app);
        assert_eq!(config.endpoint, "https://scan.internal/api/topology");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn client_builds_with_defaults() {
        assert!(ScanClient::new(ScanClientConfig::default()).is_ok());
    }

    #[test]
    fn timeout_kind_reports_configured_seconds() {
        assert_eq!(
            ScanErrorKind::Timeout(7).to_string(),
            "Scan endpoint timed out after 7s"
        );
    }

    #[test]
    fn non_timeout_errors_map_to_network_kind() {
        // A URL without a scheme fails in the request builder, before any
        // network traffic.
        let err = Client::new().get("scan.internal/api/topology").send().unwrap_err();
        let mapped = network_error("scan request", &err, Duration::from_secs(7));
        assert!(matches!(
            mapped,
            TopoError::Scan {
                source: ScanErrorKind::Network(_),
                ..
            }
        ));
    }
}
