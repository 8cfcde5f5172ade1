//! Table and record addressing.
//!
//! A target is either a whole table (`user`) or a single record
//! (`user:tobie`). The colon is the discriminator; the server applies the
//! same convention, which is what lets the driver decide whether a
//! write-style reply should be unwrapped to a single record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reference to a single record: table name plus record key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordRef {
    pub table: String,
    pub key: String,
}

impl RecordRef {
    pub fn new(table: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.table, self.key)
    }
}

/// What a data operation addresses: a whole table or one record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Table(String),
    Record(RecordRef),
}

impl Target {
    /// Parse from the wire form. Splits on the first colon only, so record
    /// keys may themselves contain colons.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(':') {
            Some((table, key)) => Target::Record(RecordRef::new(table, key)),
            None => Target::Table(raw.to_owned()),
        }
    }

    /// Table component, regardless of variant.
    pub fn table(&self) -> &str {
        match self {
            Target::Table(table) => table,
            Target::Record(record) => &record.table,
        }
    }

    /// True when this addresses a single record.
    pub fn is_record(&self) -> bool {
        matches!(self, Target::Record(_))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Table(table) => f.write_str(table),
            Target::Record(record) => record.fmt(f),
        }
    }
}

impl FromStr for Target {
    type Err = std::convert::Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(Target::parse(raw))
    }
}

impl From<&str> for Target {
    fn from(raw: &str) -> Self {
        Target::parse(raw)
    }
}

impl From<String> for Target {
    fn from(raw: String) -> Self {
        Target::parse(&raw)
    }
}

impl From<RecordRef> for Target {
    fn from(record: RecordRef) -> Self {
        Target::Record(record)
    }
}

impl Serialize for Target {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Target {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Target::parse(&raw))
    }
}
