//! Prepare → bind → execute → fetch, shared by the builder and the mapper.

use tracing::debug;

use crate::connection::{Db, ExecOutcome, PreparedStatement};
use crate::error::Result;
use crate::results::{ResultSet, Row};
use crate::types::BoundParam;

fn bind_all(stmt: &mut dyn PreparedStatement, params: &[BoundParam]) -> Result<()> {
    for param in params {
        stmt.bind(&param.name, &param.value, param.ty)?;
    }
    Ok(())
}

fn log_statement(db: &Db, sql: &str, params: &[BoundParam]) {
    debug!(backend = db.backend_name(), params = params.len(), sql, "executing statement");
}

/// Run a statement that produces rows and return all of them.
pub(crate) fn query_all(db: &Db, sql: &str, params: &[BoundParam]) -> Result<ResultSet> {
    log_statement(db, sql, params);
    db.with_connection(|conn| {
        let mut stmt = conn.prepare(sql)?;
        bind_all(stmt.as_mut(), params)?;
        stmt.execute()?.into_result()?;
        stmt.fetch_all()
    })
}

/// Run a statement that produces rows and return the first one.
pub(crate) fn query_one(db: &Db, sql: &str, params: &[BoundParam]) -> Result<Option<Row>> {
    log_statement(db, sql, params);
    db.with_connection(|conn| {
        let mut stmt = conn.prepare(sql)?;
        bind_all(stmt.as_mut(), params)?;
        stmt.execute()?.into_result()?;
        stmt.fetch_one()
    })
}

/// Run a DML statement.
pub(crate) fn execute(db: &Db, sql: &str, params: &[BoundParam]) -> Result<ExecOutcome> {
    log_statement(db, sql, params);
    db.with_connection(|conn| {
        let mut stmt = conn.prepare(sql)?;
        bind_all(stmt.as_mut(), params)?;
        stmt.execute()?.into_result()
    })
}
