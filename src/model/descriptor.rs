use crate::error::{Result, SqlRecordError};
use crate::types::RowValues;

use super::Record;

/// Reserved for the `:primary` placeholder.
const PRIMARY_NAME: &str = "primary";

/// Table, primary key and column whitelist of an entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDescriptor {
    table: &'static str,
    primary_key: &'static str,
    columns: &'static [&'static str],
}

impl EntityDescriptor {
    /// # Errors
    /// Returns `ConfigError` if the table, primary key or column list is empty, or if a column
    /// other than the key is named `primary`, which would share its placeholder with the key.
    pub fn new(
        table: &'static str,
        primary_key: &'static str,
        columns: &'static [&'static str],
    ) -> Result<Self> {
        if table.trim().is_empty() {
            return Err(SqlRecordError::config("entity has no table name"));
        }
        if primary_key.trim().is_empty() {
            return Err(SqlRecordError::config(format!(
                "entity for {table} has a blank primary key"
            )));
        }
        if columns.is_empty() || columns.iter().any(|c| c.trim().is_empty()) {
            return Err(SqlRecordError::config(format!(
                "entity for {table} declares no columns"
            )));
        }
        if let Some(column) = columns
            .iter()
            .find(|c| **c != primary_key && c.eq_ignore_ascii_case(PRIMARY_NAME))
        {
            return Err(SqlRecordError::config(format!(
                "entity for {table} declares column `{column}`, which clashes with the primary key placeholder"
            )));
        }
        Ok(Self {
            table,
            primary_key,
            columns,
        })
    }

    #[must_use]
    pub fn table(&self) -> &'static str {
        self.table
    }

    #[must_use]
    pub fn primary_key(&self) -> &'static str {
        self.primary_key
    }

    #[must_use]
    pub fn columns(&self) -> &'static [&'static str] {
        self.columns
    }

    /// The record's key, treating an explicit NULL as absent.
    pub(crate) fn key_of(&self, record: &Record) -> Option<RowValues> {
        record
            .get(self.primary_key)
            .filter(|value| !value.is_null())
            .cloned()
    }

    /// Set declared columns in declaration order, the primary key excluded.
    pub(crate) fn set_columns(&self, record: &Record) -> Vec<(&'static str, RowValues)> {
        self.columns
            .iter()
            .copied()
            .filter(|column| *column != self.primary_key)
            .filter_map(|column| record.get(column).map(|value| (column, value.clone())))
            .collect()
    }
}
