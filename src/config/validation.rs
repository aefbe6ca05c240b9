use crate::config::types::{
    ApiConfig, Config, OutputConfig, ProgressConfig, RequestConfig, WorkerConfig,
};
use crate::ConfigError;
use url::Url;

/// Upper bound on concurrent chapter traversals
pub const MAX_WORKERS: usize = 100;

/// Upper bound on attempts per request
pub const MAX_ATTEMPTS: u32 = 10;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_api_config(&config.api)?;
    validate_request_config(&config.requests)?;
    validate_worker_config(&config.workers)?;
    validate_output_config(&config.output)?;
    validate_progress_config(&config.progress)?;
    Ok(())
}

/// Validates the API endpoint settings
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            config.base_url
        )));
    }

    if config.accept.trim().is_empty() {
        return Err(ConfigError::Validation("accept cannot be empty".to_string()));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout-secs must be at least 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates rate limiting and retry settings
fn validate_request_config(config: &RequestConfig) -> Result<(), ConfigError> {
    if config.interval_ms == 0 {
        return Err(ConfigError::Validation(
            "interval-ms must be at least 1ms".to_string(),
        ));
    }

    if config.max_attempts < 1 || config.max_attempts > MAX_ATTEMPTS {
        return Err(ConfigError::Validation(format!(
            "max-attempts must be between 1 and {}, got {}",
            MAX_ATTEMPTS, config.max_attempts
        )));
    }

    Ok(())
}

fn validate_worker_config(config: &WorkerConfig) -> Result<(), ConfigError> {
    if config.count < 1 || config.count > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "worker count must be between 1 and {}, got {}",
            MAX_WORKERS, config.count
        )));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_progress_config(config: &ProgressConfig) -> Result<(), ConfigError> {
    if config.refresh_ms == 0 {
        return Err(ConfigError::Validation(
            "refresh-ms must be at least 1ms".to_string(),
        ));
    }

    Ok(())
}
