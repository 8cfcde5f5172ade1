//! Statement rendering for the query builder.
//!
//! Clause order is fixed: SELECT, FROM, WHERE, ORDER BY, LIMIT, START,
//! FETCH. Absent clauses are omitted entirely.

use super::builder::{Condition, OrderClause, QueryBuilder, SelectField};

pub(crate) fn render(builder: &QueryBuilder) -> String {
    let mut statement = String::from("SELECT ");
    statement.push_str(&render_selections(&builder.selections));
    statement.push_str(" FROM ");
    statement.push_str(&render_tables(&builder.tables));

    if !builder.conditions.is_empty() {
        statement.push_str(" WHERE ");
        statement.push_str(&render_conditions(&builder.conditions));
    }

    if !builder.order_clauses.is_empty() {
        statement.push_str(" ORDER BY ");
        statement.push_str(&render_order_clauses(&builder.order_clauses));
    }

    if let Some(limit) = builder.limit {
        statement.push_str(&format!(" LIMIT {limit}"));
    }

    if let Some(start) = builder.start {
        statement.push_str(&format!(" START {start}"));
    }

    if !builder.fetch.is_empty() {
        statement.push_str(" FETCH ");
        statement.push_str(&builder.fetch.join(", "));
    }

    statement
}

fn render_selections(selections: &[SelectField]) -> String {
    if selections.is_empty() {
        return "*".into();
    }

    selections
        .iter()
        .map(|field| match &field.alias {
            Some(alias) => format!("{} AS {}", field.key, alias),
            None => field.key.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_tables(tables: &[String]) -> String {
    // A single table stands alone; several become a bracketed list
    match tables {
        [table] => table.clone(),
        many => format!("[{}]", many.join(", ")),
    }
}

fn render_conditions(conditions: &[Condition]) -> String {
    let mut rendered = String::new();
    let last = conditions.len() - 1;

    for (idx, condition) in conditions.iter().enumerate() {
        rendered.push_str(&format!(
            "{} {} ${}",
            condition.field, condition.expr, condition.binding
        ));
        // Each condition except the last carries the join to its successor
        if idx != last {
            rendered.push_str(&format!(" {} ", condition.join));
        }
    }

    rendered
}

fn render_order_clauses(clauses: &[OrderClause]) -> String {
    clauses
        .iter()
        .map(|clause| format!("{} {}", clause.field, clause.direction.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}
