//! Response payload resolution.
//!
//! The server wraps results differently per verb. Write-style verbs
//! (`create`, `update`, `change`, `modify`, `select`) return an array of
//! affected records even when the caller addressed exactly one record by
//! `table:key`. This module normalizes that: single-record operations
//! yield the record itself, and an empty reply becomes
//! [`Error::PermissionOrNotFound`].
//!
//! The empty reply is genuinely ambiguous. The server answers identically
//! whether the record does not exist or the signed-in user may not see it,
//! so the driver cannot tell those cases apart and does not pretend to.

use serde_json::Value;

use strand_proto::Method;

use crate::error::{Error, Result};

/// Normalize a raw result payload according to the verb that produced it.
///
/// `params` are the request params, used to detect whether a write-style
/// verb addressed a single record. `raw` is the result field of the
/// response; `None` (the server sent `null` or nothing) resolves to `Null`
/// for verbs that pass their payload through.
pub(crate) fn resolve(method: Method, params: &[Value], raw: Option<Value>) -> Result<Value> {
    if method.discards_payload() {
        return Ok(Value::Null);
    }

    if method.is_write_style() {
        if let Some(target) = single_record_target(params) {
            return unwrap_single(raw, target);
        }
    }

    Ok(raw.unwrap_or(Value::Null))
}

/// The first param, when it is a string naming a single record.
fn single_record_target(params: &[Value]) -> Option<&str> {
    let first = params.first()?.as_str()?;
    if first.contains(':') {
        Some(first)
    } else {
        None
    }
}

/// A single-record operation must produce a non-empty array; its first
/// element is the record. Anything else means the record was not written
/// or not visible.
fn unwrap_single(raw: Option<Value>, target: &str) -> Result<Value> {
    match raw {
        Some(Value::Array(mut items)) if !items.is_empty() => Ok(items.remove(0)),
        _ => Err(Error::PermissionOrNotFound {
            target: target.to_string(),
        }),
    }
}
