//! JSON-Patch style operations for the `modify` verb.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The operation kind of a single patch entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Remove,
    Replace,
    Change,
}

/// One entry of a patch list. Entries apply in list order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    /// What to do
    pub op: PatchOp,
    /// Field path the operation targets, e.g. `/name`
    pub path: String,
    /// Operand; omitted for `remove`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Patch {
    /// Insert a value at `path`.
    pub fn add(path: impl Into<String>, value: Value) -> Self {
        Self {
            op: PatchOp::Add,
            path: path.into(),
            value: Some(value),
        }
    }

    /// Delete the value at `path`.
    pub fn remove(path: impl Into<String>) -> Self {
        Self {
            op: PatchOp::Remove,
            path: path.into(),
            value: None,
        }
    }

    /// Overwrite the value at `path`.
    pub fn replace(path: impl Into<String>, value: Value) -> Self {
        Self {
            op: PatchOp::Replace,
            path: path.into(),
            value: Some(value),
        }
    }

    /// Apply a textual diff to the string at `path`.
    pub fn change(path: impl Into<String>, diff: impl Into<String>) -> Self {
        Self {
            op: PatchOp::Change,
            path: path.into(),
            value: Some(Value::String(diff.into())),
        }
    }
}
