use crate::connection::{ExecOutcome, PreparedStatement};
use crate::error::{ErrorInfo, Result, SqlRecordError};
use crate::results::{ResultSet, Row};
use crate::types::{ParamType, RowValues};

use super::params::row_value_to_sqlite_value;
use super::query::build_result_set;

/// Driver diagnostics for a rusqlite failure.
#[must_use]
pub fn error_info(err: &rusqlite::Error) -> ErrorInfo {
    match err {
        rusqlite::Error::SqliteFailure(ffi, message) => {
            let sqlstate = if ffi.code == rusqlite::ErrorCode::ConstraintViolation {
                "23000"
            } else {
                "HY000"
            };
            let message = message.clone().unwrap_or_else(|| err.to_string());
            ErrorInfo::new(sqlstate, Some(ffi.extended_code), message)
        }
        other => ErrorInfo::general(other.to_string()),
    }
}

fn into_error_info(err: SqlRecordError) -> ErrorInfo {
    match err {
        SqlRecordError::SqliteError(e) => error_info(&e),
        SqlRecordError::Execution(info) => info,
        other => ErrorInfo::general(other.to_string()),
    }
}

fn leading_keyword(sql: &str) -> &str {
    let sql = sql.trim_start();
    let end = sql
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(sql.len());
    &sql[..end]
}

/// A compiled statement borrowed from a [`SqliteConnection`](super::SqliteConnection).
///
/// Rows of a SELECT are read eagerly on `execute` and handed out by the fetch calls.
pub struct SqlitePreparedStatement<'c> {
    conn: &'c rusqlite::Connection,
    stmt: rusqlite::Statement<'c>,
    is_insert: bool,
    pending: ResultSet,
}

impl<'c> SqlitePreparedStatement<'c> {
    pub(crate) fn new(conn: &'c rusqlite::Connection, sql: &str) -> Result<Self> {
        let stmt = conn
            .prepare(sql)
            .map_err(|e| SqlRecordError::Execution(error_info(&e)))?;
        let is_insert = matches!(
            leading_keyword(sql).to_ascii_uppercase().as_str(),
            "INSERT" | "REPLACE"
        );
        Ok(Self {
            conn,
            stmt,
            is_insert,
            pending: ResultSet::default(),
        })
    }
}

impl PreparedStatement for SqlitePreparedStatement<'_> {
    fn bind(&mut self, name: &str, value: &RowValues, ty: ParamType) -> Result<()> {
        let idx = self
            .stmt
            .parameter_index(name)
            .map_err(|e| SqlRecordError::Execution(error_info(&e)))?
            .ok_or_else(|| {
                SqlRecordError::ArgumentError(format!("statement has no placeholder {name}"))
            })?;
        self.stmt
            .raw_bind_parameter(idx, row_value_to_sqlite_value(value, ty))
            .map_err(|e| SqlRecordError::Execution(error_info(&e)))
    }

    fn execute(&mut self) -> Result<ExecOutcome> {
        if self.stmt.column_count() > 0 {
            return Ok(match build_result_set(&mut self.stmt) {
                Ok(rs) => {
                    self.pending = rs;
                    ExecOutcome::succeeded(0, None)
                }
                Err(e) => ExecOutcome::failed(into_error_info(e)),
            });
        }

        // Statements that do not start with INSERT or REPLACE (a CTE, say) still report a key
        // when they moved the connection's last rowid.
        let rowid_before = self.conn.last_insert_rowid();
        Ok(match self.stmt.raw_execute() {
            Ok(affected) => {
                let rowid = self.conn.last_insert_rowid();
                let inserted = self.is_insert || rowid != rowid_before;
                let last_insert_id = (inserted && affected > 0).then_some(rowid);
                ExecOutcome::succeeded(affected, last_insert_id)
            }
            Err(e) => ExecOutcome::failed(error_info(&e)),
        })
    }

    fn fetch_all(&mut self) -> Result<ResultSet> {
        Ok(std::mem::take(&mut self.pending))
    }

    fn fetch_one(&mut self) -> Result<Option<Row>> {
        if self.pending.results.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.pending.results.remove(0)))
    }
}
