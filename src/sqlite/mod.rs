// SQLite module - the bundled backend behind the `sqlite` feature
//
// - config: opening a connection from `DbConfig`
// - params: bind conversion from `RowValues` to SQLite values
// - query: row extraction
// - prepared: the `PreparedStatement` implementation
// - connection: the `Connection` implementation

pub mod config;
pub mod connection;
pub mod params;
pub mod prepared;
pub mod query;

pub use connection::SqliteConnection;
pub use prepared::SqlitePreparedStatement;
