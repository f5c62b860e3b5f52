use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::{Result, SqlRecordError};

const ENV_PREFIX: &str = "SQL_RECORD_";

static DSN_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|;)\s*([A-Za-z_]+)\s*=\s*([^;]*)").expect("DSN pattern compiles")
});

/// Static connection parameters.
///
/// Read-only once handed to [`Db::configure`](crate::Db::configure); every field is a plain
/// string. Backends use what applies to them (`SQLite` treats `database` as the file path).
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    host: String,
    database: String,
    username: String,
    password: String,
    charset: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            database: ":memory:".to_string(),
            username: "root".to_string(),
            password: String::new(),
            charset: "utf8".to_string(),
        }
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("charset", &self.charset)
            .finish()
    }
}

impl DbConfig {
    #[must_use]
    pub fn builder() -> DbConfigBuilder {
        DbConfigBuilder::new()
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    #[must_use]
    pub fn charset(&self) -> &str {
        &self.charset
    }

    /// Parse a JSON object; missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns `SqlRecordError::ConfigError` if the JSON is malformed or the result is invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SqlRecordError::config(format!("invalid JSON configuration: {e}")))?;
        config.validate()
    }

    /// Read `SQL_RECORD_HOST`, `SQL_RECORD_DATABASE`, `SQL_RECORD_USERNAME`,
    /// `SQL_RECORD_PASSWORD` and `SQL_RECORD_CHARSET`, falling back to defaults.
    ///
    /// # Errors
    /// Returns `SqlRecordError::ConfigError` if the resulting configuration is invalid.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(format!("{ENV_PREFIX}{key}")).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = DbConfigBuilder::new();
        if let Some(v) = lookup("HOST") {
            builder = builder.host(v);
        }
        if let Some(v) = lookup("DATABASE") {
            builder = builder.database(v);
        }
        if let Some(v) = lookup("USERNAME") {
            builder = builder.username(v);
        }
        if let Some(v) = lookup("PASSWORD") {
            builder = builder.password(v);
        }
        if let Some(v) = lookup("CHARSET") {
            builder = builder.charset(v);
        }
        builder.build()
    }

    /// Parse a PDO-style DSN such as `mysql:host=localhost;dbname=shop;charset=utf8`.
    ///
    /// The driver prefix is optional and ignored. Credentials are not part of a DSN and are
    /// taken from the arguments.
    ///
    /// # Errors
    /// Returns `SqlRecordError::ConfigError` for unknown keys or an invalid result.
    pub fn from_dsn(dsn: &str, username: &str, password: &str) -> Result<Self> {
        let body = match dsn.split_once(':') {
            Some((driver, rest)) if !driver.contains('=') => rest,
            _ => dsn,
        };

        let mut builder = DbConfigBuilder::new().username(username).password(password);
        for caps in DSN_PAIR.captures_iter(body) {
            let value = caps[2].trim().to_string();
            builder = match &caps[1] {
                "host" => builder.host(value),
                "dbname" => builder.database(value),
                "charset" => builder.charset(value),
                "port" | "unix_socket" => builder,
                other => {
                    return Err(SqlRecordError::config(format!("unknown DSN key '{other}'")));
                }
            };
        }
        builder.build()
    }

    fn validate(self) -> Result<Self> {
        if self.database.trim().is_empty() {
            return Err(SqlRecordError::config("database name must not be empty"));
        }
        if self.charset.trim().is_empty() {
            return Err(SqlRecordError::config("charset must not be empty"));
        }
        Ok(self)
    }
}

/// Fluent builder for [`DbConfig`].
#[derive(Debug, Clone, Default)]
pub struct DbConfigBuilder {
    config: DbConfig,
}

impl DbConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    #[must_use]
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.config.database = database.into();
        self
    }

    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.config.username = username.into();
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = password.into();
        self
    }

    #[must_use]
    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.config.charset = charset.into();
        self
    }

    /// # Errors
    /// Returns `SqlRecordError::ConfigError` if the database name or charset is blank.
    pub fn build(self) -> Result<DbConfig> {
        self.config.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let cfg = DbConfig::builder()
            .database("shop.db")
            .charset("utf8mb4")
            .build()
            .unwrap();
        assert_eq!(cfg.database(), "shop.db");
        assert_eq!(cfg.charset(), "utf8mb4");
        assert_eq!(cfg.host(), "localhost");
    }

    #[test]
    fn blank_database_is_rejected() {
        let err = DbConfig::builder().database("  ").build().unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn parses_pdo_dsn() {
        let cfg =
            DbConfig::from_dsn("mysql:host=db.local;dbname=test;charset=utf8", "root", "123")
                .unwrap();
        assert_eq!(cfg.host(), "db.local");
        assert_eq!(cfg.database(), "test");
        assert_eq!(cfg.charset(), "utf8");
        assert_eq!(cfg.username(), "root");
        assert_eq!(cfg.password(), "123");

        let err = DbConfig::from_dsn("mysql:host=x;flavour=y", "", "").unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn json_keeps_defaults_for_missing_keys() {
        let cfg = DbConfig::from_json(r#"{"database": "app.db", "password": "s3cret"}"#).unwrap();
        assert_eq!(cfg.database(), "app.db");
        assert_eq!(cfg.charset(), "utf8");
        assert!(!format!("{cfg:?}").contains("s3cret"));
        assert!(DbConfig::from_json("{not json").unwrap_err().is_config_error());
    }

    #[test]
    fn lookup_reads_prefixed_keys() {
        let cfg = DbConfig::from_lookup(|key| match key {
            "DATABASE" => Some("env.db".to_string()),
            "USERNAME" => Some("app".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(cfg.database(), "env.db");
        assert_eq!(cfg.username(), "app");
        assert_eq!(cfg.host(), "localhost");
    }
}
