//! Client configuration with validation.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::auth::Credentials;

/// Main client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// WebSocket endpoint, e.g. `ws://127.0.0.1:8000/rpc`
    pub endpoint: String,
    /// Namespace selected after connect when `auto_use` is set
    pub namespace: Option<String>,
    /// Database selected after connect when `auto_use` is set
    pub database: Option<String>,
    /// Username for `auto_signin`
    pub username: Option<String>,
    /// Password for `auto_signin`
    pub password: Option<String>,
    /// Sign in immediately after the socket opens
    pub auto_signin: bool,
    /// Select namespace and database immediately after signin
    pub auto_use: bool,
    /// Timeout configuration
    pub timeouts: TimeoutConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "ws://127.0.0.1:8000/rpc".into(),
            namespace: None,
            database: None,
            username: None,
            password: None,
            auto_signin: false,
            auto_use: false,
            timeouts: TimeoutConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Configuration for the given endpoint with everything else default.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Set the namespace and database to select on connect.
    pub fn with_namespace(mut self, namespace: impl Into<String>, database: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self.database = Some(database.into());
        self.auto_use = true;
        self
    }

    /// Set root credentials to sign in with on connect.
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self.auto_signin = true;
        self
    }

    /// Override the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.request = timeout;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.is_empty() {
            return Err(ConfigError::MissingEndpoint);
        }

        if !self.endpoint.starts_with("ws://") && !self.endpoint.starts_with("wss://") {
            return Err(ConfigError::InvalidEndpoint(format!(
                "expected a ws:// or wss:// url, got {:?}",
                self.endpoint
            )));
        }

        if self.auto_signin && (self.username.is_none() || self.password.is_none()) {
            return Err(ConfigError::MissingCredentials);
        }

        if self.auto_use && (self.namespace.is_none() || self.database.is_none()) {
            return Err(ConfigError::MissingNamespace);
        }

        if self.timeouts.request.as_millis() == 0 {
            return Err(ConfigError::InvalidTimeout(
                "request timeout cannot be 0".into(),
            ));
        }

        if self.timeouts.connect.as_millis() == 0 {
            return Err(ConfigError::InvalidTimeout(
                "connect timeout cannot be 0".into(),
            ));
        }

        Ok(())
    }

    /// Credentials assembled from the signin fields, when both are present.
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => {
                let mut credentials = Credentials::root(user, pass);
                credentials.namespace = self.namespace.clone();
                credentials.database = self.database.clone();
                Some(credentials)
            }
            _ => None,
        }
    }
}

/// Timeout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// How long a single call may wait for its response
    #[serde(with = "humantime_serde")]
    pub request: Duration,
    /// How long the WebSocket handshake may take
    #[serde(with = "humantime_serde")]
    pub connect: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(30),
            connect: Duration::from_secs(10),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// No endpoint configured
    #[error("no endpoint configured")]
    MissingEndpoint,
    /// Endpoint is not a WebSocket url
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    /// auto_signin requires username and password
    #[error("auto_signin requires username and password")]
    MissingCredentials,
    /// auto_use requires namespace and database
    #[error("auto_use requires namespace and database")]
    MissingNamespace,
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
}

/// Humantime serde module for Duration serialization
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{}s", duration.as_secs()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    fn parse_duration(s: &str) -> Result<Duration, &'static str> {
        let s = s.trim();
        // "ms" must be checked before the bare "s" suffix
        if let Some(ms) = s.strip_suffix("ms") {
            ms.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| "invalid milliseconds")
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid seconds")
        } else if let Some(mins) = s.strip_suffix('m') {
            mins.trim()
                .parse::<u64>()
                .map(|m| Duration::from_secs(m * 60))
                .map_err(|_| "invalid minutes")
        } else {
            // Try parsing as plain seconds
            s.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid duration format")
        }
    }

}
