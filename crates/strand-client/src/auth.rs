//! Credentials and authentication results.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Parameters for `signin` and `signup`.
///
/// Wire field names follow the server's convention: `user`/`pass` identify
/// the account, `NS`/`DB`/`SC` say where its record lives. Root users omit
/// all three scoping fields.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "user")]
    pub username: String,
    #[serde(rename = "pass")]
    pub password: String,
    #[serde(rename = "NS", default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(rename = "DB", default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(rename = "SC", default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl Credentials {
    /// Root-level credentials with no namespace scoping.
    pub fn root(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            namespace: None,
            database: None,
            scope: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Scope-level signin; the server answers these with a token.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }
}

// Debug keeps the password out of logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("namespace", &self.namespace)
            .field("database", &self.database)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Result of a `signin` or `signup` call.
///
/// Root signin answers `null`; scope signin answers a JWT. The driver does
/// not inspect the token, it only carries it for a later `authenticate`.
#[derive(Clone)]
pub struct AuthResponse {
    token: Option<String>,
    elapsed: Duration,
}

impl AuthResponse {
    /// Interpret a resolved signin payload: a non-empty string is a token,
    /// everything else (root signin answers `null`) is a token-less success.
    pub(crate) fn from_value(value: Value, elapsed: Duration) -> Self {
        let token = match value {
            Value::String(token) if !token.is_empty() => Some(token),
            _ => None,
        };
        Self { token, elapsed }
    }

    /// The session token, for scope-level users.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Consume the response and keep only the token.
    pub fn into_token(self) -> Option<String> {
        self.token
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Round-trip time of the auth call.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

// Debug keeps the token out of logs
impl fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResponse")
            .field("has_token", &self.token.is_some())
            .field("elapsed", &self.elapsed)
            .finish()
    }
}
