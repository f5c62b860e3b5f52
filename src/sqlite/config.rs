use rusqlite::OpenFlags;
use tracing::debug;

use crate::config::DbConfig;
use crate::error::{Result, SqlRecordError};

/// Map a configured character set onto a `PRAGMA encoding` value.
///
/// # Errors
/// Returns `SqlRecordError::ConfigError` for character sets SQLite cannot store.
pub fn sqlite_encoding(charset: &str) -> Result<&'static str> {
    match charset.to_ascii_lowercase().replace('-', "").as_str() {
        "utf8" | "utf8mb4" => Ok("UTF-8"),
        "utf16" => Ok("UTF-16"),
        "utf16le" => Ok("UTF-16le"),
        "utf16be" => Ok("UTF-16be"),
        other => Err(SqlRecordError::ConfigError(format!(
            "unsupported SQLite charset '{other}'"
        ))),
    }
}

/// Open a raw rusqlite connection for `config`.
///
/// `database` is the file path (`:memory:` for a private in-memory database). Host and
/// credentials have no meaning for SQLite and are ignored.
///
/// # Errors
/// Returns an error if the charset is unsupported or the file cannot be opened.
pub fn open_connection(config: &DbConfig) -> Result<rusqlite::Connection> {
    let encoding = sqlite_encoding(config.charset())?;
    debug!(
        database = config.database(),
        host = config.host(),
        username = config.username(),
        "opening sqlite connection; host and credentials are ignored by this backend"
    );

    let conn = if config.database() == ":memory:" {
        rusqlite::Connection::open_in_memory()?
    } else {
        rusqlite::Connection::open_with_flags(
            config.database(),
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?
    };

    // Only takes effect on a database that has no content yet.
    conn.execute_batch(&format!("PRAGMA encoding = '{encoding}';"))?;
    Ok(conn)
}
