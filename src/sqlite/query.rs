use std::sync::Arc;

use rusqlite::types::ValueRef;

use crate::error::{ErrorInfo, Result, SqlRecordError};
use crate::results::ResultSet;
use crate::types::RowValues;

/// Extract a `RowValues` from a `SQLite` row.
///
/// # Errors
///
/// Returns an error if the column cannot be read or holds a BLOB, which has no scalar mapping.
pub fn sqlite_extract_value(row: &rusqlite::Row<'_>, idx: usize) -> Result<RowValues> {
    match row.get_ref(idx)? {
        ValueRef::Null => Ok(RowValues::Null),
        ValueRef::Integer(i) => Ok(RowValues::Int(i)),
        ValueRef::Real(f) => Ok(RowValues::Float(f)),
        ValueRef::Text(bytes) => Ok(RowValues::Text(String::from_utf8_lossy(bytes).into_owned())),
        ValueRef::Blob(_) => Err(SqlRecordError::Execution(ErrorInfo::general(format!(
            "column {idx} holds a BLOB, which has no scalar mapping"
        )))),
    }
}

/// Drain every row of an already-bound statement into a [`ResultSet`].
///
/// # Errors
/// Returns an error if stepping the statement or converting a value fails.
pub fn build_result_set(stmt: &mut rusqlite::Statement<'_>) -> Result<ResultSet> {
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let col_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(10);
    result_set.set_column_names(Arc::new(column_names));

    let mut rows = stmt.raw_query();
    while let Some(row) = rows.next()? {
        let mut row_values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            row_values.push(sqlite_extract_value(row, i)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}
