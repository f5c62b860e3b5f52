use std::fmt;
use std::marker::PhantomData;

use tracing::warn;

use crate::error::SqlRecordError;
use crate::placeholders::{close_line_comment, count_markers};
use crate::results::Row;
use crate::types::RowValues;

mod dml;
mod select;

pub use dml::QueryAndParams;
pub(crate) use dml::{delete_statement, find_statement, insert_statement, update_statement};

/// Join flavours accepted by [`QueryBuilder::join_as`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
    Right,
    FullOuter,
    Cross,
}

impl JoinKind {
    fn keyword(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::FullOuter => "FULL OUTER JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Connective {
    And,
    Or,
}

#[derive(Debug, Clone)]
enum BuildError {
    Argument(String),
    Config(String),
}

impl BuildError {
    fn message(&self) -> &str {
        match self {
            BuildError::Argument(message) | BuildError::Config(message) => message,
        }
    }

    fn to_error(&self) -> SqlRecordError {
        match self {
            BuildError::Argument(message) => SqlRecordError::argument(message.clone()),
            BuildError::Config(message) => SqlRecordError::config(message.clone()),
        }
    }
}

/// A clause fragment as written by the caller, `?` markers intact, with one value per marker.
#[derive(Debug, Clone)]
struct Fragment {
    text: String,
    values: Vec<RowValues>,
}

#[derive(Debug, Clone)]
struct Join {
    kind: JoinKind,
    table: String,
    on: Fragment,
}

#[derive(Debug, Clone)]
struct Predicate {
    connective: Connective,
    condition: Fragment,
}

/// Fluent SELECT builder.
///
/// Every clause lives in its own slot and is only stitched together by [`render`], so the order
/// of calls does not matter except among predicates and among joins, which keep the order they
/// were added in. At render time positional `?` markers are rewritten to `:p1`, `:p2`, ... in
/// the order they appear in the final text, and [`params`] lists their values in that same
/// order.
///
/// Composition mistakes (marker/value count mismatch, setting a single-valued clause twice) are
/// recorded on the builder; the first one is returned by [`render`] and the execute calls, so a
/// broken statement never reaches the database.
///
/// `T` is what [`fetch`] hydrates rows into: plain [`Row`]s by default, entity records when the
/// builder comes from an entity's `query()`.
///
/// ```rust
/// use sql_record::QueryBuilder;
///
/// let sql = QueryBuilder::new()
///     .select(&["id", "name"])
///     .from("products")
///     .and_where_bind("price > ?", 5)
///     .or_where_bind("sku = ?", "PC")
///     .order_by("name")
///     .take(10)
///     .render()
///     .unwrap();
/// assert_eq!(
///     sql,
///     "SELECT id, name FROM products WHERE price > :p1 OR sku = :p2 ORDER BY name LIMIT 10"
/// );
/// ```
///
/// [`render`]: QueryBuilder::render
/// [`params`]: QueryBuilder::params
/// [`fetch`]: QueryBuilder::fetch
pub struct QueryBuilder<T = Row> {
    default_table: Option<String>,
    columns: Option<Vec<String>>,
    from: Option<String>,
    joins: Vec<Join>,
    predicates: Vec<Predicate>,
    group_by: Option<String>,
    having: Option<Fragment>,
    order_by: Option<String>,
    offset: Option<u64>,
    limit: Option<u64>,
    build_error: Option<BuildError>,
    _output: PhantomData<fn() -> T>,
}

impl QueryBuilder<Row> {
    /// A builder with no default table; call [`from`](Self::from) before rendering.
    #[must_use]
    pub fn new() -> Self {
        Self::with_default_table(None)
    }

    /// A builder whose `FROM` defaults to `table`.
    #[must_use]
    pub fn for_table(table: &str) -> Self {
        Self::with_default_table(Some(table.to_string()))
    }
}

impl Default for QueryBuilder<Row> {
    fn default() -> Self {
        Self::new()
    }
}

/// Raw text stored in a slot; a trailing `--` comment must not swallow the next clause.
fn slot_text(text: &str) -> String {
    close_line_comment(text).into_owned()
}

impl<T> QueryBuilder<T> {
    pub(crate) fn with_default_table(default_table: Option<String>) -> Self {
        Self {
            default_table,
            columns: None,
            from: None,
            joins: Vec::new(),
            predicates: Vec::new(),
            group_by: None,
            having: None,
            order_by: None,
            offset: None,
            limit: None,
            build_error: None,
            _output: PhantomData,
        }
    }

    /// A builder that can never render, for entities whose descriptor is invalid.
    pub(crate) fn misconfigured(message: String) -> Self {
        let mut builder = Self::with_default_table(None);
        builder.build_error = Some(BuildError::Config(message));
        builder
    }

    fn fail(&mut self, message: String) {
        if self.build_error.is_none() {
            self.build_error = Some(BuildError::Argument(message));
        }
    }

    /// Check that the fragment has one value per marker.
    /// `None` (with the error recorded) when counts differ or an earlier call already failed.
    fn fragment(&mut self, clause: &str, text: &str, values: Vec<RowValues>) -> Option<Fragment> {
        if self.build_error.is_some() {
            return None;
        }
        let markers = count_markers(text);
        if markers != values.len() {
            self.fail(format!(
                "{clause}: `{text}` has {markers} marker(s) but {} parameter(s) were supplied",
                values.len()
            ));
            return None;
        }
        Some(Fragment {
            text: slot_text(text),
            values,
        })
    }

    /// A lone value with nothing to bind it to is dropped with a warning rather than failing.
    fn single_value(clause: &str, fragment: &str, value: RowValues) -> Vec<RowValues> {
        if count_markers(fragment) == 0 {
            warn!(clause, fragment, "parameter supplied without a `?` marker; ignoring it");
            Vec::new()
        } else {
            vec![value]
        }
    }

    /// Select exactly `columns`, comma-joined in order; an empty slice selects `*`.
    ///
    /// May be called once per statement; a second call is an argument error.
    #[must_use]
    pub fn select(mut self, columns: &[&str]) -> Self {
        if self.columns.is_some() {
            self.fail("select: the select list is already set".to_string());
            return self;
        }
        self.columns = Some(columns.iter().map(|c| slot_text(c)).collect());
        self
    }

    /// Source relation; defaults to the entity's table when never called.
    #[must_use]
    pub fn from(mut self, table: &str) -> Self {
        if self.from.is_some() {
            self.fail("from: the source table is already set".to_string());
            return self;
        }
        self.from = Some(slot_text(table));
        self
    }

    /// `INNER JOIN` without parameters; markers in `on` are an error.
    #[must_use]
    pub fn join(self, table: &str, on: &str) -> Self {
        self.join_as(JoinKind::Inner, table, on, Vec::<RowValues>::new())
    }

    /// `INNER JOIN` binding `params[i]` to the i-th marker of `on`.
    #[must_use]
    pub fn join_bind<I, V>(self, table: &str, on: &str, params: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RowValues>,
    {
        self.join_as(JoinKind::Inner, table, on, params)
    }

    /// Append a join of the given kind. Joins accumulate in call order; an empty `on` omits
    /// the `ON` clause (useful with [`JoinKind::Cross`]).
    ///
    /// Each marker in `on` binds its own positional parameter; the number of markers must
    /// equal the number of parameters.
    #[must_use]
    pub fn join_as<I, V>(mut self, kind: JoinKind, table: &str, on: &str, params: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RowValues>,
    {
        let values: Vec<RowValues> = params.into_iter().map(Into::into).collect();
        if let Some(on) = self.fragment("join", on, values) {
            self.joins.push(Join {
                kind,
                table: slot_text(table),
                on,
            });
        }
        self
    }

    fn predicate(mut self, connective: Connective, condition: &str, values: Vec<RowValues>) -> Self {
        let clause = match connective {
            Connective::And => "where",
            Connective::Or => "or_where",
        };
        if let Some(condition) = self.fragment(clause, condition, values) {
            self.predicates.push(Predicate {
                connective,
                condition,
            });
        }
        self
    }

    /// Add a predicate joined with `AND` (the first predicate opens the `WHERE`).
    /// The condition must not contain markers.
    #[must_use]
    pub fn and_where(self, condition: &str) -> Self {
        self.predicate(Connective::And, condition, Vec::new())
    }

    /// Add a predicate with one `?` marker bound to `value`, joined with `AND`.
    #[must_use]
    pub fn and_where_bind(self, condition: &str, value: impl Into<RowValues>) -> Self {
        let values = Self::single_value("where", condition, value.into());
        self.predicate(Connective::And, condition, values)
    }

    /// Add a predicate joined with `OR`.
    #[must_use]
    pub fn or_where(self, condition: &str) -> Self {
        self.predicate(Connective::Or, condition, Vec::new())
    }

    /// Add a predicate with one `?` marker bound to `value`, joined with `OR`.
    #[must_use]
    pub fn or_where_bind(self, condition: &str, value: impl Into<RowValues>) -> Self {
        let values = Self::single_value("or_where", condition, value.into());
        self.predicate(Connective::Or, condition, values)
    }

    #[must_use]
    pub fn group_by(mut self, columns: &str) -> Self {
        if self.group_by.is_some() {
            self.fail("group_by: GROUP BY is already set".to_string());
            return self;
        }
        self.group_by = Some(slot_text(columns));
        self
    }

    #[must_use]
    pub fn having(self, condition: &str) -> Self {
        self.having_values(condition, Vec::new())
    }

    /// `HAVING` with a single `?` marker bound to `value`.
    #[must_use]
    pub fn having_bind(self, condition: &str, value: impl Into<RowValues>) -> Self {
        let values = Self::single_value("having", condition, value.into());
        self.having_values(condition, values)
    }

    fn having_values(mut self, condition: &str, values: Vec<RowValues>) -> Self {
        if self.having.is_some() {
            self.fail("having: HAVING is already set".to_string());
            return self;
        }
        if let Some(condition) = self.fragment("having", condition, values) {
            self.having = Some(condition);
        }
        self
    }

    #[must_use]
    pub fn order_by(mut self, columns: &str) -> Self {
        if self.order_by.is_some() {
            self.fail("order_by: ORDER BY is already set".to_string());
            return self;
        }
        self.order_by = Some(slot_text(columns));
        self
    }

    /// Skip the first `n` rows.
    #[must_use]
    pub fn offset(mut self, n: u64) -> Self {
        if self.offset.is_some() {
            self.fail("offset: OFFSET is already set".to_string());
            return self;
        }
        self.offset = Some(n);
        self
    }

    /// Return at most `n` rows.
    #[must_use]
    pub fn take(mut self, n: u64) -> Self {
        if self.limit.is_some() {
            self.fail("take: LIMIT is already set".to_string());
            return self;
        }
        self.limit = Some(n);
        self
    }

    /// The first composition error, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.build_error.as_ref().map(BuildError::message)
    }
}

impl<T> fmt::Debug for QueryBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("sql", &self.render().ok())
            .field("params", &self.params())
            .field("build_error", &self.build_error)
            .finish()
    }
}
