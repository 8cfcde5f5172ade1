//! Query construction and result handling.

pub mod builder;
pub(crate) mod grammar;
pub mod operators;
pub mod result;

pub use builder::{BuiltQuery, OrderDirection, QueryBuilder};
pub use operators::Operator;
pub use result::{QueryResults, StatementResult};
