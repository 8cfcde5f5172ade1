//! Results of a `query` call.
//!
//! A query batch returns one [`StatementResult`] per statement, in
//! statement order. A failed statement does not fail the batch on the
//! wire; it arrives as a statement with an error status, and the accessors
//! here turn it into [`Error::Query`] the moment it is touched.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::decode::decode_payload;
use crate::error::{Error, Result};

const STATUS_OK: &str = "OK";

/// Outcome of a single statement in a query batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementResult {
    /// `"OK"` or an error status
    #[serde(default)]
    pub status: String,
    /// Server-side execution time, e.g. `"71.775µs"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Row payload; absent or an error string on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error description on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl StatementResult {
    /// Whether this statement executed successfully.
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Best available error description. Servers have reported the message
    /// in `detail` or in `result` depending on version.
    pub fn error_message(&self) -> String {
        if let Some(detail) = &self.detail {
            return detail.clone();
        }
        if let Some(Value::String(message)) = &self.result {
            return message.clone();
        }
        self.status.clone()
    }
}

/// All statement results of one query round trip.
#[derive(Debug, Clone)]
pub struct QueryResults {
    statements: Vec<StatementResult>,
    /// Round-trip time measured by the client
    elapsed: Duration,
}

impl QueryResults {
    /// Parse the raw result payload of a `query` response.
    pub(crate) fn from_value(value: Value, elapsed: Duration) -> Result<Self> {
        let statements = serde_json::from_value::<Vec<StatementResult>>(value).map_err(|e| {
            Error::InvalidResponse {
                message: format!("query result was not a statement list: {e}"),
            }
        })?;
        Ok(Self {
            statements,
            elapsed,
        })
    }

    /// Number of statements in the batch.
    pub fn statement_count(&self) -> usize {
        self.statements.len()
    }

    /// True when the first statement produced no rows.
    pub fn is_empty(&self) -> bool {
        match self.statements.first() {
            None => true,
            Some(statement) => match &statement.result {
                None | Some(Value::Null) => true,
                Some(Value::Array(items)) => items.is_empty(),
                Some(_) => false,
            },
        }
    }

    /// True when any statement in the batch failed.
    pub fn has_errors(&self) -> bool {
        self.statements.iter().any(|s| !s.is_ok())
    }

    /// Error out on the first failed statement, if any.
    pub fn check(&self) -> Result<()> {
        for (index, statement) in self.statements.iter().enumerate() {
            if !statement.is_ok() {
                return Err(Error::Query {
                    index,
                    message: statement.error_message(),
                });
            }
        }
        Ok(())
    }

    /// All statement results, in statement order.
    pub fn statements(&self) -> &[StatementResult] {
        &self.statements
    }

    /// One statement result by index.
    pub fn statement(&self, index: usize) -> Option<&StatementResult> {
        self.statements.get(index)
    }

    /// Decode the payload of statement `index`.
    ///
    /// `Ok(None)` means the statement succeeded with no rows. A failed
    /// statement or a missing index is an error.
    pub fn take<T: DeserializeOwned>(&self, index: usize) -> Result<Option<T>> {
        let Some(statement) = self.statements.get(index) else {
            return Err(Error::Query {
                index,
                message: format!(
                    "no statement at index {index}, batch has {}",
                    self.statements.len()
                ),
            });
        };
        if !statement.is_ok() {
            return Err(Error::Query {
                index,
                message: statement.error_message(),
            });
        }

        match &statement.result {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(items)) if items.is_empty() => Ok(None),
            Some(value) => decode_payload(value.clone()).map(Some),
        }
    }

    /// Decode the first row of the first statement.
    pub fn first<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        let Some(statement) = self.statements.first() else {
            return Ok(None);
        };
        if !statement.is_ok() {
            return Err(Error::Query {
                index: 0,
                message: statement.error_message(),
            });
        }

        match &statement.result {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(items)) => match items.first() {
                None => Ok(None),
                Some(row) => decode_payload(row.clone()).map(Some),
            },
            Some(value) => decode_payload(value.clone()).map(Some),
        }
    }

    /// Decode every row of the first statement.
    pub fn all<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        let Some(statement) = self.statements.first() else {
            return Ok(Vec::new());
        };
        if !statement.is_ok() {
            return Err(Error::Query {
                index: 0,
                message: statement.error_message(),
            });
        }

        match &statement.result {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value @ Value::Array(_)) => decode_payload(value.clone()),
            // A scalar row becomes a one-element list
            Some(value) => decode_payload::<T>(value.clone()).map(|one| vec![one]),
        }
    }

    /// Server-side execution time of statement `index`, verbatim.
    pub fn statement_time(&self, index: usize) -> Option<&str> {
        self.statements.get(index)?.time.as_deref()
    }

    /// Client-measured round-trip time for the whole batch.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}
