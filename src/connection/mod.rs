//! Connection contract the builder and mapper execute against.
//!
//! - `Connection` / `PreparedStatement`: what a backend has to provide
//! - [`Db`]: the shared, serialized handle statements run on
//! - registry: the process-wide handle behind [`Db::acquire`]

mod handle;
mod registry;

pub use handle::Db;

use crate::error::{ErrorInfo, Result, SqlRecordError};
use crate::results::{ResultSet, Row};
use crate::types::{ParamType, RowValues};

/// A single logical database connection.
pub trait Connection: Send {
    /// Compile `sql` into a statement awaiting binds.
    ///
    /// # Errors
    /// Driver failures are reported as `SqlRecordError::Execution`.
    fn prepare<'c>(&'c mut self, sql: &str) -> Result<Box<dyn PreparedStatement + 'c>>;

    /// Short backend name used in logs.
    fn backend_name(&self) -> &'static str {
        "custom"
    }
}

/// A compiled statement owned by the connection layer.
pub trait PreparedStatement {
    /// Bind `value` to the named placeholder (`name` includes its `:` prefix).
    ///
    /// # Errors
    /// `ArgumentError` for an unknown placeholder, `Execution` for driver failures.
    fn bind(&mut self, name: &str, value: &RowValues, ty: ParamType) -> Result<()>;

    /// Run the statement. Driver failures are reported in the outcome, not as `Err`.
    ///
    /// # Errors
    /// Only for failures outside the statement itself (e.g. a broken handle).
    fn execute(&mut self) -> Result<ExecOutcome>;

    /// Every row produced by the last `execute`.
    ///
    /// # Errors
    /// Returns an error if the rows cannot be read or converted.
    fn fetch_all(&mut self) -> Result<ResultSet>;

    /// The next row produced by the last `execute`, if any.
    ///
    /// # Errors
    /// Returns an error if the row cannot be read or converted.
    fn fetch_one(&mut self) -> Result<Option<Row>>;
}

/// What the driver reports after executing a statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExecOutcome {
    pub success: bool,
    /// Rowid of the row a statement inserted, when the driver knows one. `SQLite` reports it
    /// for `INSERT`, `REPLACE` and any other statement that inserted a row, such as a CTE
    /// ending in `INSERT`.
    pub last_insert_id: Option<i64>,
    pub rows_affected: usize,
    pub error_info: Option<ErrorInfo>,
}

impl ExecOutcome {
    #[must_use]
    pub fn succeeded(rows_affected: usize, last_insert_id: Option<i64>) -> Self {
        Self {
            success: true,
            last_insert_id,
            rows_affected,
            error_info: None,
        }
    }

    #[must_use]
    pub fn failed(info: ErrorInfo) -> Self {
        Self {
            success: false,
            last_insert_id: None,
            rows_affected: 0,
            error_info: Some(info),
        }
    }

    /// Turn a failed outcome into `SqlRecordError::Execution` carrying its diagnostics.
    ///
    /// # Errors
    /// Returns `SqlRecordError::Execution` when `success` is false.
    pub fn into_result(self) -> Result<Self> {
        if self.success {
            return Ok(self);
        }
        let info = self
            .error_info
            .unwrap_or_else(|| ErrorInfo::general("statement reported failure without diagnostics"));
        Err(SqlRecordError::Execution(info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_outcome_keeps_driver_diagnostics() {
        let info = ErrorInfo::new("42S02", Some(1), "no such table: products");
        let err = ExecOutcome::failed(info.clone()).into_result().unwrap_err();
        assert_eq!(err.error_info(), Some(&info));

        let bare = ExecOutcome::default().into_result().unwrap_err();
        assert_eq!(bare.error_info().map(|i| i.sqlstate.as_str()), Some("HY000"));

        let ok = ExecOutcome::succeeded(1, Some(4)).into_result().unwrap();
        assert_eq!(ok.last_insert_id, Some(4));
    }
}
