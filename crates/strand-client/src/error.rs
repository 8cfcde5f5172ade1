//! Driver error taxonomy.
//!
//! Every fallible operation in this crate returns [`Error`]. The variants
//! keep lifecycle failures (connect, write, read, close), per-call outcomes
//! (timeout, cancellation, server errors), and decode problems distinct, so
//! callers can tell a dead connection from a record that was not found.

use std::time::Duration;

use strand_proto::RequestId;

use crate::config::ConfigError;
use crate::transport::ConnectionState;

/// Result type for driver operations
pub type Result<T> = std::result::Result<T, Error>;

/// All errors surfaced by the driver.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Connection could not be established
    #[error("connect to {endpoint} failed: {message}")]
    Connect { endpoint: String, message: String },

    /// Operation attempted while the connection is not open
    #[error("connection is {state}, not open")]
    NotOpen { state: ConnectionState },

    /// Frame could not be written to the socket
    #[error("write failed: {message}")]
    Write { message: String },

    /// The socket failed while a call was waiting for its response
    #[error("read failed: {message}")]
    Read { message: String },

    /// Close handshake failed
    #[error("close failed: {message}")]
    Close { message: String },

    /// No response arrived within the request timeout
    #[error("{method} timed out after {waited:?}")]
    Timeout { method: String, waited: Duration },

    /// The call was abandoned before a response arrived
    #[error("{method} cancelled: {reason}")]
    Cancelled { method: String, reason: String },

    /// The server answered the call with an error payload, passed through
    /// verbatim
    #[error("server error [{code}] {message}")]
    Protocol { code: i64, message: String },

    /// A write-style operation on a single record came back empty. The
    /// server reports a missing record and a permission denial identically,
    /// so this variant deliberately covers both.
    #[error("no result for {target}: record missing or permission denied")]
    PermissionOrNotFound { target: String },

    /// Response payload did not match the requested type
    #[error("payload did not match the requested type")]
    Decode {
        #[source]
        source: serde_json::Error,
    },

    /// A parameter could not be serialized to JSON
    #[error("could not encode {message}")]
    Encode { message: String },

    /// A statement inside a `query` batch failed
    #[error("statement {index} failed: {message}")]
    Query { index: usize, message: String },

    /// A freshly generated request id collided with one still in flight.
    /// With v7 uuids this indicates a broken id source, not bad input.
    #[error("duplicate request id {id}")]
    DuplicateId { id: RequestId },

    /// Frame arrived that does not fit the response envelope contract
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// Configuration failed validation
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// True for errors that mean the connection itself is unusable.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Connect { .. } | Error::Read { .. } | Error::NotOpen { .. }
        )
    }

    /// True when the server reported the failure (as opposed to the driver
    /// or the transport).
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Protocol { .. } | Error::Query { .. })
    }
}
