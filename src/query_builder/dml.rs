//! Statement assembly for the mapper's single-row operations.
//!
//! Every value travels as a named parameter (`:column`, `:primary`); only identifiers and the
//! caller's optional UPDATE condition are spliced into the text.

use crate::error::{Result, SqlRecordError};
use crate::types::{BoundParam, RowValues};

/// Placeholder the primary key is bound to in WHERE clauses.
pub(crate) const PRIMARY_PLACEHOLDER: &str = ":primary";

/// SQL text plus its bind list.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryAndParams {
    pub query: String,
    pub params: Vec<BoundParam>,
}

impl QueryAndParams {
    fn new(query: String, params: Vec<BoundParam>) -> Self {
        Self { query, params }
    }
}

fn column_param(column: &str, value: &RowValues) -> BoundParam {
    BoundParam::new(format!(":{column}"), value.clone())
}

/// `SELECT <pk>, <columns> FROM <table> WHERE <pk> = :primary LIMIT 1`
pub(crate) fn find_statement(
    table: &str,
    primary_key: &str,
    columns: &[&str],
    key: RowValues,
) -> QueryAndParams {
    let mut select_list = Vec::with_capacity(columns.len() + 1);
    select_list.push(primary_key);
    select_list.extend(columns.iter().copied().filter(|c| *c != primary_key));
    QueryAndParams::new(
        format!(
            "SELECT {} FROM {table} WHERE {primary_key} = {PRIMARY_PLACEHOLDER} LIMIT 1",
            select_list.join(", ")
        ),
        vec![BoundParam::new(PRIMARY_PLACEHOLDER, key)],
    )
}

/// `INSERT INTO <table> (<cols>) VALUES (:<col>, …)` over the set columns only.
pub(crate) fn insert_statement(table: &str, values: &[(&str, RowValues)]) -> Result<QueryAndParams> {
    if values.is_empty() {
        return Err(SqlRecordError::argument(format!(
            "insert into {table}: no columns are set"
        )));
    }
    let columns: Vec<&str> = values.iter().map(|(column, _)| *column).collect();
    let placeholders: Vec<String> = columns.iter().map(|c| format!(":{c}")).collect();
    Ok(QueryAndParams::new(
        format!(
            "INSERT INTO {table} ({}) VALUES ({})",
            columns.join(", "),
            placeholders.join(", ")
        ),
        values.iter().map(|(c, v)| column_param(c, v)).collect(),
    ))
}

/// `UPDATE <table> SET col = :col, … WHERE …`.
///
/// Without `condition` the row is addressed by `<pk> = :primary`. A caller condition is used
/// verbatim and is not parameterized.
pub(crate) fn update_statement(
    table: &str,
    primary_key: &str,
    key: RowValues,
    values: &[(&str, RowValues)],
    condition: Option<&str>,
) -> Result<QueryAndParams> {
    if values.is_empty() {
        return Err(SqlRecordError::argument(format!(
            "update {table}: no columns are set"
        )));
    }
    let assignments: Vec<String> = values.iter().map(|(c, _)| format!("{c} = :{c}")).collect();
    let mut params: Vec<BoundParam> = values.iter().map(|(c, v)| column_param(c, v)).collect();

    let condition = match condition {
        Some(condition) => condition.to_string(),
        None => {
            params.push(BoundParam::new(PRIMARY_PLACEHOLDER, key));
            format!("{primary_key} = {PRIMARY_PLACEHOLDER}")
        }
    };
    Ok(QueryAndParams::new(
        format!("UPDATE {table} SET {} WHERE {condition}", assignments.join(", ")),
        params,
    ))
}

/// `DELETE FROM <table> WHERE <pk> = :primary`
pub(crate) fn delete_statement(table: &str, primary_key: &str, key: RowValues) -> QueryAndParams {
    QueryAndParams::new(
        format!("DELETE FROM {table} WHERE {primary_key} = {PRIMARY_PLACEHOLDER}"),
        vec![BoundParam::new(PRIMARY_PLACEHOLDER, key)],
    )
}
