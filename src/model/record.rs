use std::collections::BTreeMap;

use serde::Serialize;

use crate::results::Row;
use crate::types::RowValues;

/// Column values held by one entity instance.
///
/// A column is *set* when the record holds an entry for it, an explicit `Null` included.
/// Persistence only looks at the entity's declared columns and primary key; anything else
/// stored here (joined columns, aliases) is carried along and ignored on write.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, RowValues>,
}

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a column.
    pub fn set(&mut self, column: &str, value: impl Into<RowValues>) {
        self.fields.insert(column.to_string(), value.into());
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, column: &str, value: impl Into<RowValues>) -> Self {
        self.set(column, value);
        self
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&RowValues> {
        self.fields.get(column)
    }

    /// Remove a column so it is left out of the next insert or update.
    pub fn unset(&mut self, column: &str) -> Option<RowValues> {
        self.fields.remove(column)
    }

    #[must_use]
    pub fn is_set(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValues)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl From<Row> for Record {
    fn from(row: Row) -> Self {
        let mut record = Record::new();
        let Row {
            column_names,
            values,
            ..
        } = row;
        for (column, value) in column_names.iter().zip(values) {
            // keep the first of duplicated column names, matching `Row::get`
            record.fields.entry(column.clone()).or_insert(value);
        }
        record
    }
}
