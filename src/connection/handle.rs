use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use super::Connection;
use crate::error::Result;

/// Shared handle to one connection.
///
/// Cloning is cheap; all clones serialize on the same lock, so exactly one statement is in
/// flight per connection at a time.
#[derive(Clone)]
pub struct Db {
    inner: Arc<Mutex<Box<dyn Connection>>>,
    backend: &'static str,
}

impl Db {
    pub fn new<C>(connection: C) -> Self
    where
        C: Connection + 'static,
    {
        let backend = connection.backend_name();
        Self {
            inner: Arc::new(Mutex::new(Box::new(connection))),
            backend,
        }
    }

    /// Open a `SQLite` connection described by `config`.
    ///
    /// # Errors
    /// Returns `SqlRecordError::SqliteError` if the database cannot be opened.
    #[cfg(feature = "sqlite")]
    pub fn open_sqlite(config: &crate::config::DbConfig) -> Result<Self> {
        Ok(Self::new(crate::sqlite::SqliteConnection::open(config)?))
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend
    }

    /// Run `f` with exclusive access to the connection.
    ///
    /// A panic in an earlier holder does not leave the connection unusable; the lock is
    /// recovered and the next statement proceeds.
    ///
    /// # Errors
    /// Propagates whatever `f` returns.
    pub fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut dyn Connection) -> Result<T>,
    {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(guard.as_mut())
    }

    /// Whether both handles refer to the same connection.
    #[must_use]
    pub fn same_connection(&self, other: &Db) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Db {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Db").field("backend", &self.backend).finish()
    }
}
