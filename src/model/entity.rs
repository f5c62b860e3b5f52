use tracing::debug;

use crate::connection::Db;
use crate::error::{Result, SqlRecordError};
use crate::executor;
use crate::query_builder::{
    QueryBuilder, delete_statement, find_statement, insert_statement, update_statement,
};
use crate::results::{FromRow, Row};
use crate::types::RowValues;

use super::{EntityDescriptor, Record};

/// A SELECT over an entity's table that hydrates `E` instead of plain rows.
pub type EntityQuery<E> = QueryBuilder<E>;

/// A record type stored in one table.
///
/// ```rust
/// use sql_record::{Entity, Record};
///
/// struct Product(Record);
///
/// impl Entity for Product {
///     const TABLE: &'static str = "products";
///     const COLUMNS: &'static [&'static str] = &["name", "price"];
///
///     fn from_record(record: Record) -> Self {
///         Product(record)
///     }
///     fn record(&self) -> &Record {
///         &self.0
///     }
///     fn record_mut(&mut self) -> &mut Record {
///         &mut self.0
///     }
/// }
///
/// let product = Product::empty().unwrap();
/// assert!(product.record().is_empty());
/// ```
pub trait Entity: Sized {
    const TABLE: &'static str;
    const PRIMARY_KEY: &'static str = "id";
    const COLUMNS: &'static [&'static str];

    fn from_record(record: Record) -> Self;
    fn record(&self) -> &Record;
    fn record_mut(&mut self) -> &mut Record;

    /// # Errors
    /// Returns `ConfigError` when the table, key or columns are missing.
    fn descriptor() -> Result<EntityDescriptor> {
        EntityDescriptor::new(Self::TABLE, Self::PRIMARY_KEY, Self::COLUMNS)
    }

    /// A fresh instance with nothing set.
    ///
    /// # Errors
    /// Returns `ConfigError` when the descriptor is invalid.
    fn empty() -> Result<Self> {
        Self::descriptor()?;
        Ok(Self::from_record(Record::new()))
    }
}

impl<E: Entity> FromRow for E {
    fn from_row(row: Row) -> Result<Self> {
        Ok(E::from_record(Record::from(row)))
    }
}

/// Outcome of [`ActiveRecord::save`].
#[derive(Debug, Clone, PartialEq)]
pub enum Saved {
    /// The record had no key and was inserted under this one.
    Inserted(RowValues),
    /// The record was updated; `false` when no row matched.
    Updated(bool),
}

/// Persistence operations available on every [`Entity`].
pub trait ActiveRecord: Entity {
    /// Every row of the table.
    ///
    /// # Errors
    /// Returns an error if the descriptor is invalid or the query fails.
    fn all(db: &Db) -> Result<Vec<Self>>;

    /// The row whose primary key equals `key`.
    ///
    /// # Errors
    /// Returns an error if the descriptor is invalid or the query fails.
    fn find(db: &Db, key: impl Into<RowValues>) -> Result<Option<Self>>;

    /// Start a SELECT over the entity's table.
    fn query() -> EntityQuery<Self>;

    /// Insert the set columns and return the row's key.
    ///
    /// A key the caller set is inserted with the row and kept as is. Otherwise the key the
    /// connection generated is stored on the record.
    ///
    /// # Errors
    /// `ArgumentError` when no column is set; execution errors from the connection.
    fn insert(&mut self, db: &Db) -> Result<RowValues>;

    /// Update the set columns of the row addressed by the primary key, or by `condition`.
    ///
    /// `condition` is placed into the statement verbatim and is **not** parameterized; never
    /// build it from untrusted input.
    ///
    /// # Errors
    /// `ArgumentError` when the key or every column is unset; execution errors from the
    /// connection.
    fn update(&mut self, db: &Db, condition: Option<&str>) -> Result<bool>;

    /// Delete the row addressed by the primary key.
    ///
    /// # Errors
    /// `ArgumentError` when the key is unset; execution errors from the connection.
    fn delete(&mut self, db: &Db) -> Result<bool>;

    /// Update when the key is set, insert otherwise.
    ///
    /// # Errors
    /// See [`insert`](Self::insert) and [`update`](Self::update).
    fn save(&mut self, db: &Db) -> Result<Saved>;
}

impl<E: Entity> ActiveRecord for E {
    fn all(db: &Db) -> Result<Vec<Self>> {
        Self::query().fetch(db)
    }

    fn find(db: &Db, key: impl Into<RowValues>) -> Result<Option<Self>> {
        let desc = Self::descriptor()?;
        let stmt = find_statement(desc.table(), desc.primary_key(), desc.columns(), key.into());
        executor::query_one(db, &stmt.query, &stmt.params)?
            .map(Self::from_row)
            .transpose()
    }

    fn query() -> EntityQuery<Self> {
        match Self::descriptor() {
            Ok(desc) => QueryBuilder::with_default_table(Some(desc.table().to_string())),
            Err(err) => QueryBuilder::misconfigured(err.to_string()),
        }
    }

    fn insert(&mut self, db: &Db) -> Result<RowValues> {
        let desc = Self::descriptor()?;
        let explicit_key = desc.key_of(self.record());
        let mut values = Vec::with_capacity(desc.columns().len() + 1);
        if let Some(key) = &explicit_key {
            values.push((desc.primary_key(), key.clone()));
        }
        values.extend(desc.set_columns(self.record()));

        let stmt = insert_statement(desc.table(), &values)?;
        let outcome = executor::execute(db, &stmt.query, &stmt.params)?;
        let key = match explicit_key {
            Some(key) => key,
            None => {
                let id = outcome.last_insert_id.ok_or_else(|| {
                    SqlRecordError::ConnectionError(format!(
                        "insert into {} reported no generated key",
                        desc.table()
                    ))
                })?;
                self.record_mut().set(desc.primary_key(), id);
                RowValues::Int(id)
            }
        };
        debug!(table = desc.table(), key = ?key, "inserted");
        Ok(key)
    }

    fn update(&mut self, db: &Db, condition: Option<&str>) -> Result<bool> {
        let desc = Self::descriptor()?;
        let key = desc.key_of(self.record()).ok_or_else(|| {
            SqlRecordError::argument(format!(
                "update {}: primary key {} is not set",
                desc.table(),
                desc.primary_key()
            ))
        })?;
        let values = desc.set_columns(self.record());
        let stmt = update_statement(desc.table(), desc.primary_key(), key, &values, condition)?;
        let outcome = executor::execute(db, &stmt.query, &stmt.params)?;
        Ok(outcome.rows_affected > 0)
    }

    fn delete(&mut self, db: &Db) -> Result<bool> {
        let desc = Self::descriptor()?;
        let key = desc.key_of(self.record()).ok_or_else(|| {
            SqlRecordError::argument(format!(
                "delete from {}: primary key {} is not set",
                desc.table(),
                desc.primary_key()
            ))
        })?;
        let stmt = delete_statement(desc.table(), desc.primary_key(), key);
        let outcome = executor::execute(db, &stmt.query, &stmt.params)?;
        Ok(outcome.rows_affected > 0)
    }

    fn save(&mut self, db: &Db) -> Result<Saved> {
        let desc = Self::descriptor()?;
        if desc.key_of(self.record()).is_some() {
            self.update(db, None).map(Saved::Updated)
        } else {
            self.insert(db).map(Saved::Inserted)
        }
    }
}

impl<E: Entity> QueryBuilder<E> {
    /// Execute and hydrate the first matching entity.
    ///
    /// # Errors
    /// See [`QueryBuilder::execute`].
    pub fn first(self, db: &Db) -> Result<Option<E>> {
        self.fetch_one(db)
    }

    /// The SELECT composed so far.
    ///
    /// # Errors
    /// See [`QueryBuilder::render`].
    pub fn to_sql(&self) -> Result<String> {
        self.render()
    }
}
