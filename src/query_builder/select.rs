use crate::connection::Db;
use crate::error::{Result, SqlRecordError};
use crate::executor;
use crate::placeholders::rewrite_markers;
use crate::results::{FromRow, ResultSet};
use crate::types::BoundParam;

use super::{Connective, Fragment, QueryAndParams, QueryBuilder};

/// Rewrites markers slot by slot, in rendered order, so placeholder numbers and the bind list
/// both follow the final text.
#[derive(Default)]
struct Binder {
    params: Vec<BoundParam>,
}

impl Binder {
    fn bind(&mut self, fragment: &Fragment) -> String {
        let mut values = fragment.values.iter();
        let params = &mut self.params;
        rewrite_markers(&fragment.text, || {
            let name = format!(":p{}", params.len() + 1);
            if let Some(value) = values.next() {
                params.push(BoundParam::new(name.clone(), value.clone()));
            }
            name
        })
        .into_owned()
    }
}

/// Slot texts with markers rewritten, plus the resulting bind list.
struct BoundSlots {
    joins: Vec<String>,
    predicates: Vec<String>,
    having: Option<String>,
    params: Vec<BoundParam>,
}

impl<T> QueryBuilder<T> {
    fn bind_slots(&self) -> BoundSlots {
        let mut binder = Binder::default();
        let joins = self
            .joins
            .iter()
            .map(|join| {
                let keyword = join.kind.keyword();
                let on = binder.bind(&join.on);
                if on.trim().is_empty() {
                    format!("{keyword} {}", join.table)
                } else {
                    format!("{keyword} {} ON {on}", join.table)
                }
            })
            .collect();
        let predicates = self
            .predicates
            .iter()
            .enumerate()
            .map(|(i, predicate)| {
                let keyword = match (i, predicate.connective) {
                    (0, _) => "WHERE",
                    (_, Connective::And) => "AND",
                    (_, Connective::Or) => "OR",
                };
                format!("{keyword} {}", binder.bind(&predicate.condition))
            })
            .collect();
        let having = self.having.as_ref().map(|having| binder.bind(having));
        BoundSlots {
            joins,
            predicates,
            having,
            params: binder.params,
        }
    }

    /// Assemble the statement text together with its bind list.
    ///
    /// Slots are emitted in SQL order regardless of the order they were set in. Markers are
    /// numbered `:p1`, `:p2`, ... left to right across the whole statement and the bind list
    /// follows the same order. Building does not consume the builder and yields the same
    /// result every time.
    ///
    /// # Errors
    /// Returns the first recorded composition error (`ArgumentError`, or `ConfigError` for an
    /// invalid entity), or `ArgumentError` when no table is known.
    pub fn build(&self) -> Result<QueryAndParams> {
        if let Some(error) = &self.build_error {
            return Err(error.to_error());
        }
        let table = self
            .from
            .as_deref()
            .or(self.default_table.as_deref())
            .ok_or_else(|| SqlRecordError::argument("query has no table; call `from` first"))?;

        let columns = match &self.columns {
            Some(columns) if !columns.is_empty() => columns.join(", "),
            _ => "*".to_string(),
        };

        let slots = self.bind_slots();
        let mut sql = format!("SELECT {columns} FROM {table}");
        for part in slots.joins.iter().chain(&slots.predicates) {
            sql.push(' ');
            sql.push_str(part);
        }

        if let Some(group_by) = &self.group_by {
            sql.push_str(&format!(" GROUP BY {group_by}"));
        }
        if let Some(having) = &slots.having {
            sql.push_str(&format!(" HAVING {having}"));
        }
        if let Some(order_by) = &self.order_by {
            sql.push_str(&format!(" ORDER BY {order_by}"));
        }
        match (self.limit, self.offset) {
            (Some(limit), Some(offset)) => sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}")),
            (Some(limit), None) => sql.push_str(&format!(" LIMIT {limit}")),
            // SQLite needs a LIMIT before OFFSET; -1 means unbounded.
            (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {offset}")),
            (None, None) => {}
        }

        Ok(QueryAndParams {
            query: sql,
            params: slots.params,
        })
    }

    /// The statement text; see [`build`](Self::build).
    ///
    /// # Errors
    /// See [`build`](Self::build).
    pub fn render(&self) -> Result<String> {
        self.build().map(|built| built.query)
    }

    /// Parameters in the order their placeholders appear in the rendered text.
    #[must_use]
    pub fn params(&self) -> Vec<BoundParam> {
        self.bind_slots().params
    }

    /// Render, bind every queued parameter and return the full result set.
    ///
    /// # Errors
    /// Returns the builder's composition error without touching the database, or the
    /// execution error reported by the connection.
    pub fn execute(self, db: &Db) -> Result<ResultSet> {
        let built = self.build()?;
        executor::query_all(db, &built.query, &built.params)
    }
}

impl<T: FromRow> QueryBuilder<T> {
    /// Execute and hydrate every row.
    ///
    /// # Errors
    /// See [`execute`](Self::execute); hydration errors are returned as well.
    pub fn fetch(self, db: &Db) -> Result<Vec<T>> {
        self.execute(db)?.into_iter().map(T::from_row).collect()
    }

    /// Execute and hydrate the first row, if any.
    ///
    /// # Errors
    /// See [`execute`](Self::execute).
    pub fn fetch_one(self, db: &Db) -> Result<Option<T>> {
        let built = self.build()?;
        executor::query_one(db, &built.query, &built.params)?
            .map(T::from_row)
            .transpose()
    }
}
