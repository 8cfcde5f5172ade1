//! Request and response envelopes.
//!
//! One JSON text frame per envelope. Requests always carry an id; responses
//! usually echo it back, but server push frames (live query notifications)
//! arrive without one and are dropped by the driver's router.

use crate::correlation::RequestId;
use crate::method::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Outgoing request envelope: `{"id": "...", "method": "...", "params": [...]}`.
///
/// Params are positional and verb-specific; this layer treats them as opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    /// Unique per in-flight call
    pub id: RequestId,
    /// The verb being invoked
    pub method: Method,
    /// Positional arguments
    pub params: Vec<Value>,
}

impl RpcRequest {
    /// Build a request with a freshly generated id.
    pub fn new(method: Method, params: Vec<Value>) -> Self {
        Self {
            id: RequestId::generate(),
            method,
            params,
        }
    }

    /// Build a request under a caller-chosen id.
    pub fn with_id(id: RequestId, method: Method, params: Vec<Value>) -> Self {
        Self { id, method, params }
    }

    /// Serialize to the text frame sent on the wire.
    pub fn to_frame(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Error payload of a failed response, surfaced to callers verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("[{code}] {message}")]
pub struct ServerError {
    /// Server-assigned error code
    pub code: i64,
    /// Human-readable message
    pub message: String,
}

impl ServerError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Incoming response envelope.
///
/// A terminal reply populates exactly one of `result`/`error`. JSON cannot
/// distinguish `"result": null` from an absent `result`, so a success with a
/// null payload also deserializes with `result == None`; the driver treats
/// that as a null payload rather than a protocol violation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    /// Echo of the request id; absent on server push frames
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
    /// Success payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Failure payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ServerError>,
}

impl RpcResponse {
    /// Build a success reply for the given request id.
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            id: Some(id),
            result: Some(result),
            error: None,
        }
    }

    /// Build an error reply for the given request id.
    pub fn failure(id: RequestId, error: ServerError) -> Self {
        Self {
            id: Some(id),
            result: None,
            error: Some(error),
        }
    }

    /// True when the server reported an error for this call.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl fmt::Display for RpcResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.id, &self.error) {
            (Some(id), Some(err)) => write!(f, "response {id}: {err}"),
            (Some(id), None) => write!(f, "response {id}: ok"),
            (None, _) => write!(f, "response <no id>"),
        }
    }
}
