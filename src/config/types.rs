use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Taric-Harvest
///
/// Every section is optional in the TOML file; missing keys fall back to
/// the values the public tariff API is known to tolerate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub requests: RequestConfig,
    pub workers: WorkerConfig,
    pub output: OutputConfig,
    pub progress: ProgressConfig,
}

/// Catalog API endpoint configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL that `/chapters` and `/commodities` are appended to
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Value of the `Accept` header sent with every request
    pub accept: String,

    /// Per-attempt request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.trade-tariff.service.gov.uk/api/v2".to_string(),
            accept: "application/vnd.uktt.v2".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Rate limiting and retry policy
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    /// Minimum time between any two outbound requests (milliseconds)
    #[serde(rename = "interval-ms")]
    pub interval_ms: u64,

    /// Maximum attempts per request, including the first one
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Base of the exponential backoff (milliseconds); attempt `i` waits `base * 2^i`
    #[serde(rename = "backoff-base-ms")]
    pub backoff_base_ms: u64,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            interval_ms: 150,
            max_attempts: 4,
            backoff_base_ms: 1000,
        }
    }
}

impl RequestConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }
}

/// Worker pool configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Number of chapters traversed concurrently
    pub count: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self { count: 25 }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the CSV file
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "taric_codes_full.csv".to_string(),
        }
    }
}

/// Progress display configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    pub enabled: bool,

    /// Redraw interval (milliseconds)
    #[serde(rename = "refresh-ms")]
    pub refresh_ms: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            refresh_ms: 100,
        }
    }
}

impl ProgressConfig {
    pub fn refresh(&self) -> Duration {
        Duration::from_millis(self.refresh_ms)
    }
}
