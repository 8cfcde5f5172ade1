//! RPC verbs understood by the server.
//!
//! Verb strings are case-sensitive on the wire: `create` is a verb,
//! `Create` is not.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The sixteen verbs of the StrandDB RPC protocol.
///
/// The driver classifies verbs three ways when resolving a response:
/// write-style verbs apply the single-record rule, `delete` discards its
/// payload, and everything else passes its payload through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Select the namespace and database for the session
    Use,
    /// Fetch session information
    Info,
    /// Register a record-level user
    Signup,
    /// Authenticate with credentials
    Signin,
    /// Drop the current session authentication
    Invalidate,
    /// Authenticate with a previously issued token
    Authenticate,
    /// Start a live query on a table
    Live,
    /// Stop a live query
    Kill,
    /// Bind a session variable
    Let,
    /// Run one or more statements
    Query,
    /// Read a table or record
    Select,
    /// Create a table row or a specific record
    Create,
    /// Replace a table or record
    Update,
    /// Merge data into a table or record
    Change,
    /// Apply a list of patch operations
    Modify,
    /// Delete a table or record
    Delete,
}

/// All verbs, in wire order.
pub const ALL_METHODS: [Method; 16] = [
    Method::Use,
    Method::Info,
    Method::Signup,
    Method::Signin,
    Method::Invalidate,
    Method::Authenticate,
    Method::Live,
    Method::Kill,
    Method::Let,
    Method::Query,
    Method::Select,
    Method::Create,
    Method::Update,
    Method::Change,
    Method::Modify,
    Method::Delete,
];

impl Method {
    /// The exact string sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Use => "use",
            Method::Info => "info",
            Method::Signup => "signup",
            Method::Signin => "signin",
            Method::Invalidate => "invalidate",
            Method::Authenticate => "authenticate",
            Method::Live => "live",
            Method::Kill => "kill",
            Method::Let => "let",
            Method::Query => "query",
            Method::Select => "select",
            Method::Create => "create",
            Method::Update => "update",
            Method::Change => "change",
            Method::Modify => "modify",
            Method::Delete => "delete",
        }
    }

    /// Verbs whose response obeys the single-record rule: when the first
    /// param addresses one record (`table:key`), the reply sequence is
    /// unwrapped to its first element.
    pub fn is_write_style(&self) -> bool {
        matches!(
            self,
            Method::Create | Method::Update | Method::Change | Method::Modify | Method::Select
        )
    }

    /// Verbs whose response payload is discarded entirely.
    pub fn discards_payload(&self) -> bool {
        matches!(self, Method::Delete)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognized verb string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown method: {0}")]
pub struct UnknownMethod(pub String);

impl FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Case-sensitive on purpose.
        match s {
            "use" => Ok(Method::Use),
            "info" => Ok(Method::Info),
            "signup" => Ok(Method::Signup),
            "signin" => Ok(Method::Signin),
            "invalidate" => Ok(Method::Invalidate),
            "authenticate" => Ok(Method::Authenticate),
            "live" => Ok(Method::Live),
            "kill" => Ok(Method::Kill),
            "let" => Ok(Method::Let),
            "query" => Ok(Method::Query),
            "select" => Ok(Method::Select),
            "create" => Ok(Method::Create),
            "update" => Ok(Method::Update),
            "change" => Ok(Method::Change),
            "modify" => Ok(Method::Modify),
            "delete" => Ok(Method::Delete),
            other => Err(UnknownMethod(other.to_string())),
        }
    }
}

impl Serialize for Method {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Method {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
