//! Shared fixtures for the integration suite.


use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{json, Value};

/// Thread-safe log of (method, params) pairs a responder has observed.
pub type CallLog = Arc<Mutex<Vec<(String, Value)>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// A success envelope echoing the request's correlation id.
pub fn ok_response(request: &Value, result: Value) -> Value {
    json!({ "id": request["id"], "result": result })
}

/// An error envelope echoing the request's correlation id.
pub fn err_response(request: &Value, code: i64, message: &str) -> Value {
    json!({ "id": request["id"], "error": { "code": code, "message": message } })
}

pub fn method_of(request: &Value) -> String {
    request["method"].as_str().unwrap_or_default().to_string()
}

pub fn params_of(request: &Value) -> Value {
    request.get("params").cloned().unwrap_or(Value::Null)
}

/// Install the env-filter subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
