use secrecy::SecretString;
use std::env;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::services::PollPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid OCR endpoint '{value}': {reason}")]
    InvalidEndpoint { value: String, reason: String },

    #[error("Invalid value '{value}' for {var}: expected a non-negative integer")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the OCR service, always ending with `/`
    pub endpoint: Url,
    pub key: SecretString,
    pub port: u16,
    pub poll: PollPolicy,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Build the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(var))
        };
        let number = |var: &'static str, default: u64| -> Result<u64, ConfigError> {
            match lookup(var) {
                Some(value) => value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidNumber { var, value }),
                None => Ok(default),
            }
        };
        let positive = |var: &'static str, default: u64| -> Result<u64, ConfigError> {
            match number(var, default)? {
                0 => Err(ConfigError::Zero(var)),
                n => Ok(n),
            }
        };

        let endpoint = parse_endpoint(&required("ENDPOINT")?)?;
        let key = SecretString::new(required("KEY")?);

        let port = number("PORT", 8000)?;
        let port = u16::try_from(port).map_err(|_| ConfigError::InvalidNumber {
            var: "PORT",
            value: port.to_string(),
        })?;

        let defaults = PollPolicy::default();
        let poll = PollPolicy {
            interval: Duration::from_millis(positive(
                "OCR_POLL_INTERVAL_MS",
                defaults.interval.as_millis() as u64,
            )?),
            max_attempts: number("OCR_MAX_POLL_ATTEMPTS", u64::from(defaults.max_attempts))?
                .clamp(1, u64::from(u32::MAX)) as u32,
            retries: number("OCR_POLL_RETRIES", u64::from(defaults.retries))?
                .min(u64::from(u32::MAX)) as u32,
        };

        Ok(Self {
            endpoint,
            key,
            port,
            poll,
            http_timeout: Duration::from_secs(positive("OCR_HTTP_TIMEOUT_SECS", 30)?),
        })
    }
}

fn parse_endpoint(value: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEndpoint {
        value: value.to_string(),
        reason,
    };

    let mut url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("expected an http or https URL".to_string()));
    }

    // API paths are joined relative to the endpoint
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
