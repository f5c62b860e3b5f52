use std::fmt;

use tracing::info;

use crate::config::DbConfig;
use crate::connection::{Connection, PreparedStatement};
use crate::error::Result;

use super::config::open_connection;
use super::prepared::SqlitePreparedStatement;

/// [`Connection`] backed by a single rusqlite connection.
pub struct SqliteConnection {
    conn: rusqlite::Connection,
}

impl SqliteConnection {
    /// Open the database described by `config`.
    ///
    /// # Errors
    /// Returns an error if the charset is unsupported or the database cannot be opened.
    pub fn open(config: &DbConfig) -> Result<Self> {
        let conn = open_connection(config)?;
        info!(database = config.database(), "sqlite connection open");
        Ok(Self { conn })
    }

    /// Wrap an already open rusqlite connection.
    #[must_use]
    pub fn from_rusqlite(conn: rusqlite::Connection) -> Self {
        Self { conn }
    }

    /// Run a batch of statements without parameters (schema setup and the like).
    ///
    /// # Errors
    /// Returns `SqlRecordError::SqliteError` if any statement fails.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }
}

impl Connection for SqliteConnection {
    fn prepare<'c>(&'c mut self, sql: &str) -> Result<Box<dyn PreparedStatement + 'c>> {
        Ok(Box::new(SqlitePreparedStatement::new(&self.conn, sql)?))
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

impl fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("path", &self.conn.path())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ParamType, RowValues};

    fn products() -> SqliteConnection {
        let conn = SqliteConnection::open(&DbConfig::default()).unwrap();
        conn.execute_batch(
            "CREATE TABLE products (id INTEGER PRIMARY KEY, name TEXT NOT NULL, price REAL);",
        )
        .unwrap();
        conn
    }

    #[test]
    fn insert_reports_generated_key() {
        let mut conn = products();
        let mut stmt = conn
            .prepare("INSERT INTO products (name, price) VALUES (:name, :price)")
            .unwrap();
        stmt.bind(":name", &"lamp".into(), ParamType::Text).unwrap();
        stmt.bind(":price", &RowValues::Float(5.29), ParamType::Text).unwrap();
        let outcome = stmt.execute().unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.rows_affected, 1);
        assert_eq!(outcome.last_insert_id, Some(1));
    }

    #[test]
    fn replace_and_cte_inserts_report_their_key() {
        let mut conn = products();
        let mut stmt = conn
            .prepare("REPLACE INTO products (id, name) VALUES (7, 'lamp')")
            .unwrap();
        assert_eq!(stmt.execute().unwrap().last_insert_id, Some(7));
        drop(stmt);

        let mut stmt = conn
            .prepare("WITH src(n) AS (SELECT 'desk') INSERT INTO products (name) SELECT n FROM src")
            .unwrap();
        let outcome = stmt.execute().unwrap();
        assert_eq!(outcome.rows_affected, 1);
        assert_eq!(outcome.last_insert_id, Some(8));
        drop(stmt);

        let mut stmt = conn.prepare("UPDATE products SET price = 1.5").unwrap();
        let outcome = stmt.execute().unwrap();
        assert_eq!(outcome.rows_affected, 2);
        assert_eq!(outcome.last_insert_id, None);
    }

    #[test]
    fn select_rows_are_fetched_after_execute() {
        let mut conn = products();
        conn.execute_batch("INSERT INTO products (name, price) VALUES ('a', 1.5), ('b', 2.5);")
            .unwrap();
        let mut stmt = conn
            .prepare("SELECT name, price FROM products WHERE price > :p1 ORDER BY id")
            .unwrap();
        stmt.bind(":p1", &RowValues::Int(1), ParamType::Int).unwrap();
        assert!(stmt.execute().unwrap().success);
        let first = stmt.fetch_one().unwrap().unwrap();
        assert_eq!(first.get("name"), Some(&RowValues::Text("a".into())));
        let rest = stmt.fetch_all().unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest.results[0].get("price"), Some(&RowValues::Float(2.5)));
    }

    #[test]
    fn unknown_placeholder_is_an_argument_error() {
        let mut conn = products();
        let mut stmt = conn.prepare("SELECT * FROM products WHERE id = :primary").unwrap();
        let err = stmt.bind(":nope", &RowValues::Int(1), ParamType::Int).unwrap_err();
        assert!(err.is_argument_error());
    }

    #[test]
    fn driver_failures_carry_diagnostics() {
        let mut conn = products();
        let err = conn.prepare("SELECT * FROM missing").err().unwrap();
        assert!(err.error_info().unwrap().message.contains("missing"));

        let mut stmt = conn
            .prepare("INSERT INTO products (id, name) VALUES (1, NULL)")
            .unwrap();
        let outcome = stmt.execute().unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.error_info.unwrap().sqlstate, "23000");
    }
}
