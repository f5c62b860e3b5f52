use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use super::Db;
use crate::config::DbConfig;
use crate::error::Result;

#[derive(Default)]
struct Registry {
    config: Option<DbConfig>,
    handle: Option<Db>,
}

static REGISTRY: LazyLock<Mutex<Registry>> = LazyLock::new(|| Mutex::new(Registry::default()));

fn registry() -> MutexGuard<'static, Registry> {
    REGISTRY.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Db {
    /// Register the configuration the process-wide connection is opened with.
    ///
    /// Only affects the next lazy open; an already open connection is kept until
    /// [`Db::reset`].
    pub fn configure(config: DbConfig) {
        debug!(database = config.database(), "registered connection configuration");
        registry().config = Some(config);
    }

    /// The process-wide connection, opened on first use.
    ///
    /// Concurrent first calls are serialized on the registry lock, so the connection is
    /// created exactly once. Without a registered configuration the environment is read
    /// (see [`DbConfig::from_env`]).
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the connection cannot be opened.
    pub fn acquire() -> Result<Db> {
        let mut reg = registry();
        if let Some(db) = &reg.handle {
            return Ok(db.clone());
        }

        let config = match reg.config.take() {
            Some(config) => config,
            None => DbConfig::from_env()?,
        };
        let opened = open_default(&config);
        reg.config = Some(config);
        let db = opened?;
        info!(backend = db.backend_name(), "opened process-wide connection");
        reg.handle = Some(db.clone());
        Ok(db)
    }

    /// Replace the process-wide connection, e.g. with a test double.
    pub fn install(db: Db) {
        debug!(backend = db.backend_name(), "installed process-wide connection");
        registry().handle = Some(db);
    }

    /// Drop the process-wide connection and configuration; the next [`Db::acquire`] starts
    /// from scratch. Clones still held elsewhere stay usable.
    pub fn reset() {
        let mut reg = registry();
        reg.handle = None;
        reg.config = None;
    }
}

#[cfg(feature = "sqlite")]
fn open_default(config: &DbConfig) -> Result<Db> {
    Db::open_sqlite(config)
}

#[cfg(not(feature = "sqlite"))]
fn open_default(_config: &DbConfig) -> Result<Db> {
    Err(crate::error::SqlRecordError::ConfigError(
        "no database backend enabled; install a connection with Db::install".into(),
    ))
}
