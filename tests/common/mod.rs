#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use sql_record::{
    Connection, Entity, ExecOutcome, ParamType, PreparedStatement, Record, Result, ResultSet, Row,
    RowValues,
};

/// One statement as seen by [`RecordingConnection`].
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub sql: String,
    pub binds: Vec<(String, RowValues, ParamType)>,
    pub executed: bool,
}

/// Shared view of everything a [`RecordingConnection`] was asked to do.
#[derive(Debug, Clone, Default)]
pub struct Log(Arc<Mutex<Vec<Recorded>>>);

impl Log {
    pub fn statements(&self) -> Vec<Recorded> {
        self.0.lock().unwrap().clone()
    }

    pub fn last(&self) -> Recorded {
        self.statements().pop().expect("no statement recorded")
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

/// Connection double that records SQL and binds instead of talking to a database.
///
/// INSERTs report `next_insert_id`, other DML reports `rows_affected`, SELECTs return `rows`.
pub struct RecordingConnection {
    log: Log,
    pub next_insert_id: i64,
    pub rows_affected: usize,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<RowValues>>,
}

impl RecordingConnection {
    pub fn new() -> (Self, Log) {
        let log = Log::default();
        let conn = Self {
            log: log.clone(),
            next_insert_id: 42,
            rows_affected: 1,
            columns: Vec::new(),
            rows: Vec::new(),
        };
        (conn, log)
    }

    pub fn with_rows(mut self, columns: &[&str], rows: Vec<Vec<RowValues>>) -> Self {
        self.columns = columns.iter().map(|c| (*c).to_string()).collect();
        self.rows = rows;
        self
    }
}

impl Connection for RecordingConnection {
    fn prepare<'c>(&'c mut self, sql: &str) -> Result<Box<dyn PreparedStatement + 'c>> {
        self.log.0.lock().unwrap().push(Recorded {
            sql: sql.to_string(),
            binds: Vec::new(),
            executed: false,
        });
        Ok(Box::new(RecordingStatement {
            conn: self,
            sql: sql.to_string(),
            pending: ResultSet::default(),
        }))
    }

    fn backend_name(&self) -> &'static str {
        "recording"
    }
}

struct RecordingStatement<'c> {
    conn: &'c mut RecordingConnection,
    sql: String,
    pending: ResultSet,
}

impl RecordingStatement<'_> {
    fn with_entry(&self, f: impl FnOnce(&mut Recorded)) {
        let mut log = self.conn.log.0.lock().unwrap();
        f(log.last_mut().expect("prepared statement was recorded"));
    }
}

impl PreparedStatement for RecordingStatement<'_> {
    fn bind(&mut self, name: &str, value: &RowValues, ty: ParamType) -> Result<()> {
        self.with_entry(|entry| entry.binds.push((name.to_string(), value.clone(), ty)));
        Ok(())
    }

    fn execute(&mut self) -> Result<ExecOutcome> {
        self.with_entry(|entry| entry.executed = true);
        if self.sql.starts_with("SELECT") {
            let mut rs = ResultSet::with_capacity(self.conn.rows.len());
            rs.set_column_names(Arc::new(self.conn.columns.clone()));
            for row in &self.conn.rows {
                rs.add_row_values(row.clone());
            }
            self.pending = rs;
            return Ok(ExecOutcome::succeeded(0, None));
        }
        if self.sql.starts_with("INSERT") {
            return Ok(ExecOutcome::succeeded(1, Some(self.conn.next_insert_id)));
        }
        Ok(ExecOutcome::succeeded(self.conn.rows_affected, None))
    }

    fn fetch_all(&mut self) -> Result<ResultSet> {
        Ok(std::mem::take(&mut self.pending))
    }

    fn fetch_one(&mut self) -> Result<Option<Row>> {
        Ok(std::mem::take(&mut self.pending).into_first())
    }
}

/// The entity every integration test works with.
#[derive(Debug)]
pub struct Product(pub Record);

impl Entity for Product {
    const TABLE: &'static str = "products";
    const COLUMNS: &'static [&'static str] = &["name", "price", "sku"];

    fn from_record(record: Record) -> Self {
        Product(record)
    }
    fn record(&self) -> &Record {
        &self.0
    }
    fn record_mut(&mut self) -> &mut Record {
        &mut self.0
    }
}

pub const PRODUCTS_SCHEMA: &str = "CREATE TABLE products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    price REAL,
    sku TEXT
)";
