//! Fluent SQL statement builder and active-record mapper over a single shared connection.

pub mod config;
pub mod connection;
pub mod error;
pub mod model;
pub mod placeholders;
pub mod prelude;
pub mod query_builder;
pub mod results;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod types;

mod executor;

pub use config::{DbConfig, DbConfigBuilder};
pub use connection::{Connection, Db, ExecOutcome, PreparedStatement};
pub use error::{ErrorInfo, Result, SqlRecordError};
pub use model::{ActiveRecord, Entity, EntityDescriptor, EntityQuery, Record, Saved};
pub use placeholders::{count_markers, rewrite_markers};
pub use query_builder::{JoinKind, QueryAndParams, QueryBuilder};
pub use results::{FromRow, ResultSet, Row};
pub use types::{BoundParam, ParamType, RowValues};

#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteConnection, SqlitePreparedStatement};
