//! Fluent SELECT builder.
//!
//! Builds a parameterized statement: every `where` value becomes a named
//! binding instead of being spliced into the text, so user input never
//! touches the statement string.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::grammar;
use super::operators::Operator;
use super::result::QueryResults;
use crate::client::Client;
use crate::error::Result;

/// Sort direction for ORDER BY clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

pub(crate) struct SelectField {
    pub(crate) key: String,
    pub(crate) alias: Option<String>,
}

pub(crate) struct Condition {
    pub(crate) field: String,
    pub(crate) binding: String,
    /// Operator between the field and its binding
    pub(crate) expr: Operator,
    /// Operator joining this condition to the next one
    pub(crate) join: Operator,
}

pub(crate) struct OrderClause {
    pub(crate) field: String,
    pub(crate) direction: OrderDirection,
}

/// A rendered statement plus the bindings it references.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub statement: String,
    pub bindings: BTreeMap<String, Value>,
}

/// Fluent builder for SELECT statements.
///
/// ```ignore
/// let users: Vec<User> = QueryBuilder::new()
///     .from("user")
///     .where_cond("age", Operator::MoreThan, 18)
///     .order_by_desc("age")
///     .limit(20)
///     .fetch_all(&client)
///     .await?;
/// ```
#[derive(Default)]
pub struct QueryBuilder {
    pub(crate) tables: Vec<String>,
    pub(crate) selections: Vec<SelectField>,
    pub(crate) conditions: Vec<Condition>,
    pub(crate) order_clauses: Vec<OrderClause>,
    pub(crate) bindings: BTreeMap<String, Value>,
    pub(crate) fetch: Vec<String>,
    pub(crate) limit: Option<u64>,
    pub(crate) start: Option<u64>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Query a single table.
    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.tables = vec![table.into()];
        self
    }

    /// Query several tables at once.
    pub fn from_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables = tables.into_iter().map(Into::into).collect();
        self
    }

    /// Add a field to the selection. With no selections the statement
    /// selects `*`.
    pub fn select(mut self, field: impl Into<String>) -> Self {
        self.selections.push(SelectField {
            key: field.into(),
            alias: None,
        });
        self
    }

    /// Add a field under an alias (`field AS alias`).
    pub fn select_as(mut self, field: impl Into<String>, alias: impl Into<String>) -> Self {
        self.selections.push(SelectField {
            key: field.into(),
            alias: Some(alias.into()),
        });
        self
    }

    /// Equality condition, joined to the following condition with AND.
    pub fn where_eq(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_cond(field, Operator::Equal, value)
    }

    /// Condition with an explicit operator, joined with AND.
    pub fn where_cond(
        mut self,
        field: impl Into<String>,
        expr: Operator,
        value: impl Into<Value>,
    ) -> Self {
        self.push_condition(field.into(), expr, value.into());
        self
    }

    /// Equality condition reached by OR from the preceding condition.
    pub fn or_where(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        if let Some(previous) = self.conditions.last_mut() {
            previous.join = Operator::Or;
        }
        self.push_condition(field.into(), Operator::Equal, value.into());
        self
    }

    fn push_condition(&mut self, field: String, expr: Operator, value: Value) {
        // Binding names carry a running index so the same field can appear
        // in several conditions
        let binding = format!("whereVar_{}_{}", field, self.bindings.len());
        self.bindings.insert(binding.clone(), value);
        self.conditions.push(Condition {
            field,
            binding,
            expr,
            join: Operator::And,
        });
    }

    /// Ascending order clause.
    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.order_clauses.push(OrderClause {
            field: field.into(),
            direction: OrderDirection::Asc,
        });
        self
    }

    /// Descending order clause.
    pub fn order_by_desc(mut self, field: impl Into<String>) -> Self {
        self.order_clauses.push(OrderClause {
            field: field.into(),
            direction: OrderDirection::Desc,
        });
        self
    }

    pub fn limit(mut self, value: u64) -> Self {
        self.limit = Some(value);
        self
    }

    pub fn start(mut self, value: u64) -> Self {
        self.start = Some(value);
        self
    }

    /// Fetch a linked record field in the same round trip.
    pub fn fetch(mut self, field: impl Into<String>) -> Self {
        self.fetch.push(field.into());
        self
    }

    /// Render the statement and hand back its bindings.
    pub fn build(&self) -> BuiltQuery {
        BuiltQuery {
            statement: grammar::render(self),
            bindings: self.bindings.clone(),
        }
    }

    /// Run the built statement on the given client.
    pub async fn execute(&self, client: &Client) -> Result<QueryResults> {
        let built = self.build();
        client.query(&built.statement, &built.bindings).await
    }

    /// Run with LIMIT 1 and decode the first row, if any.
    pub async fn fetch_one<T: DeserializeOwned>(self, client: &Client) -> Result<Option<T>> {
        let limited = self.limit(1);
        let results = limited.execute(client).await?;
        results.check()?;
        results.first()
    }

    /// Run and decode every row of the first statement.
    pub async fn fetch_all<T: DeserializeOwned>(self, client: &Client) -> Result<Vec<T>> {
        let results = self.execute(client).await?;
        results.check()?;
        results.all()
    }
}
