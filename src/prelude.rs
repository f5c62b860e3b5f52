//! Convenient imports for common functionality.
//!
//! `use sql_record::prelude::*;` brings in the builder, the mapper traits and the value types.

pub use crate::config::DbConfig;
pub use crate::connection::Db;
pub use crate::error::{Result, SqlRecordError};
pub use crate::model::{ActiveRecord, Entity, Record, Saved};
pub use crate::query_builder::{JoinKind, QueryBuilder};
pub use crate::results::{ResultSet, Row};
pub use crate::types::RowValues;

#[cfg(feature = "sqlite")]
pub use crate::sqlite::SqliteConnection;
