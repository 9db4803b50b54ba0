//! Engine binding traits.
//!
//! These describe the raw client library the adapter wraps. The DuckDB driver
//! implements them over the `duckdb` crate; tests implement them with fakes
//! that record the statements they receive.

use super::connection::Cursor;
use crate::services::database::error::EngineError;

/// Opens raw engine connections.
pub trait Engine {
    type Connection: EngineConnection;

    /// Open the database at `path`.
    fn connect(&self, path: &str, read_only: bool) -> Result<Self::Connection, EngineError>;
}

/// A raw engine connection.
pub trait EngineConnection {
    type Cursor: Cursor;

    /// Create a new cursor on this connection.
    fn cursor(&self) -> Result<Self::Cursor, EngineError>;

    /// Execute one or more statements without fetching results.
    fn execute(&mut self, sql: &str) -> Result<(), EngineError>;

    fn close(&mut self) -> Result<(), EngineError>;
}
