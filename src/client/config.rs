//! Client configuration: endpoint, credentials, timeouts, and retry policy.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use super::error::ClientError;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of attempts (first try included).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// API credentials sent as headers on every request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// `X-Api-Key`.
    pub api_key: String,
    /// `X-Api-Secret`.
    pub api_secret: String,
    /// `X-Customer-Id`.
    pub customer_id: String,
    /// `X-Software-Id`.
    pub software_id: String,
}

impl Credentials {
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        customer_id: impl Into<String>,
        software_id: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            customer_id: customer_id.into(),
            software_id: software_id.into(),
        }
    }

    fn check(&self) -> Result<(), ClientError> {
        for (name, value) in [
            ("api_key", &self.api_key),
            ("api_secret", &self.api_secret),
            ("customer_id", &self.customer_id),
            ("software_id", &self.software_id),
        ] {
            if value.trim().is_empty() {
                return Err(ClientError::Config(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("customer_id", &self.customer_id)
            .field("software_id", &self.software_id)
            .finish()
    }
}

/// Exponential backoff for transient failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. 1 disables retries.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// No retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay after the given failed attempt (0-based):
    /// `min(base_delay * 2^attempt, max_delay)`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

/// Configuration for [`EtsClient`](super::EtsClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL, e.g. "https://api.example.com/v1". No trailing slash needed.
    pub base_url: String,
    pub credentials: Credentials,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            user_agent: format!("ets-rust/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Check the configuration for missing or malformed values.
    pub fn validate(&self) -> Result<(), ClientError> {
        let url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ClientError::Config(format!("invalid base_url '{}': {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "base_url scheme must be http or https, got '{}'",
                url.scheme()
            )));
        }
        self.credentials.check()?;
        if self.retry.max_attempts == 0 {
            return Err(ClientError::Config(
                "retry.max_attempts must be at least 1".into(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(ClientError::Config("timeout must be positive".into()));
        }
        Ok(())
    }

    /// Load from `ETS_*` environment variables.
    ///
    /// Required: `ETS_BASE_URL`, `ETS_API_KEY`, `ETS_API_SECRET`,
    /// `ETS_CUSTOMER_ID`, `ETS_SOFTWARE_ID`.
    /// Optional: `ETS_TIMEOUT_SECS`, `ETS_MAX_ATTEMPTS`.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (used by [`from_env`](Self::from_env)).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ClientError::Config(format!("{key} is not set")))
        };

        let mut config = Self::new(
            required("ETS_BASE_URL")?,
            Credentials::new(
                required("ETS_API_KEY")?,
                required("ETS_API_SECRET")?,
                required("ETS_CUSTOMER_ID")?,
                required("ETS_SOFTWARE_ID")?,
            ),
        );

        if let Some(secs) = lookup("ETS_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|_| ClientError::Config(format!("ETS_TIMEOUT_SECS '{secs}' is not a number")))?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(attempts) = lookup("ETS_MAX_ATTEMPTS") {
            config.retry.max_attempts = attempts.trim().parse().map_err(|_| {
                ClientError::Config(format!("ETS_MAX_ATTEMPTS '{attempts}' is not a number"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML document:
    ///
    /// ```toml
    /// base_url = "https://api.example.com/v1"
    /// timeout_secs = 20
    ///
    /// [credentials]
    /// api_key = "..."
    /// api_secret = "..."
    /// customer_id = "..."
    /// software_id = "..."
    ///
    /// [retry]
    /// max_attempts = 4
    /// base_delay_ms = 250
    /// max_delay_ms = 8000
    /// ```
    pub fn from_toml_str(input: &str) -> Result<Self, ClientError> {
        let file: FileConfig =
            toml::from_str(input).map_err(|e| ClientError::Config(e.to_string()))?;

        let mut config = Self::new(
            file.base_url,
            Credentials::new(
                file.credentials.api_key,
                file.credentials.api_secret,
                file.credentials.customer_id,
                file.credentials.software_id,
            ),
        );
        if let Some(secs) = file.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(agent) = file.user_agent {
            config.user_agent = agent;
        }
        if let Some(retry) = file.retry {
            let defaults = RetryPolicy::default();
            config.retry = RetryPolicy {
                max_attempts: retry.max_attempts.unwrap_or(defaults.max_attempts),
                base_delay: retry
                    .base_delay_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.base_delay),
                max_delay: retry
                    .max_delay_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.max_delay),
            };
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    base_url: String,
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
    credentials: FileCredentials,
    retry: Option<FileRetry>,
}

#[derive(Debug, Deserialize)]
struct FileCredentials {
    api_key: String,
    api_secret: String,
    customer_id: String,
    software_id: String,
}

#[derive(Debug, Deserialize)]
struct FileRetry {
    max_attempts: Option<u32>,
    base_delay_ms: Option<u64>,
    max_delay_ms: Option<u64>,
}
