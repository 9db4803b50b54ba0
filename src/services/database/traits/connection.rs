//! Host-facing connection traits and records.
//!
//! The host framework drives every engine through the same small surface:
//! a `DbConnection` that hands out a `Cursor`, a `Connection` record that owns
//! the live handle and its state, and an `AdapterResponse` per statement.

use serde::{Deserialize, Serialize};

use super::row::{ColumnInfo, Row, Value};
use crate::services::database::drivers::DuckDbCredentials;
use crate::services::database::error::StatementError;

/// Cursor operations the host calls.
pub trait Cursor {
    /// Execute a statement, binding `bindings` if given.
    fn execute(&mut self, sql: &str, bindings: Option<&[Value]>) -> Result<(), StatementError>;

    /// Next row of the current result, if any.
    fn fetchone(&mut self) -> Result<Option<Row>, StatementError>;

    /// Up to `size` rows of the current result.
    fn fetchmany(&mut self, size: usize) -> Result<Vec<Row>, StatementError>;

    /// All remaining rows of the current result.
    fn fetchall(&mut self) -> Result<Vec<Row>, StatementError>;

    /// Columns of the current result, `None` before the first statement.
    fn description(&self) -> Option<&[ColumnInfo]>;

    /// Rows changed by the last statement, -1 if unknown.
    fn rowcount(&self) -> i64;

    fn close(&mut self) -> Result<(), StatementError>;
}

/// Connection operations the host calls on an open handle.
pub trait DbConnection {
    type Cursor: Cursor;

    /// The cursor statements run on.
    fn cursor(&mut self) -> &mut Self::Cursor;

    /// Execute a statement directly on the connection.
    fn execute(&mut self, sql: &str) -> Result<(), StatementError>;

    fn close(&mut self) -> Result<(), StatementError>;
}

/// Lifecycle of a host connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    #[default]
    Init,
    Open,
    Closed,
    Fail,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Fail => "fail",
        };
        write!(f, "{}", name)
    }
}

/// The host's record of one named connection.
///
/// `handle` is only `Some` while `state` is `Open`.
#[derive(Debug)]
pub struct Connection<H> {
    /// Connection name used in logs
    pub name: String,
    pub state: ConnectionState,
    pub credentials: DuckDbCredentials,
    pub handle: Option<H>,
}

impl<H> Connection<H> {
    /// A new, not yet opened connection.
    pub fn new(name: impl Into<String>, credentials: DuckDbCredentials) -> Self {
        Self {
            name: name.into(),
            state: ConnectionState::Init,
            credentials,
            handle: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }
}

/// Per-statement response reported back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterResponse {
    pub message: String,
    pub code: Option<String>,
    pub rows_affected: Option<i64>,
}

impl AdapterResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            rows_affected: None,
        }
    }
}

impl std::fmt::Display for AdapterResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Fetched result of a statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    pub columns: Vec<ColumnInfo>,
    pub rows: Vec<Row>,
}

impl ResultTable {
    pub fn new(columns: Vec<ColumnInfo>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// An empty table, returned when the host does not fetch.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}
