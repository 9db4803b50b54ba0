//! DuckDB engine binding.
//!
//! Implements the `Engine`, `EngineConnection` and `Cursor` traits over the
//! duckdb crate. A cursor is a cloned connection to the same database that
//! buffers the result of its last statement, which is how DuckDB's own client
//! libraries model cursors.

use duckdb::{AccessMode, Config, Connection};
use std::collections::VecDeque;

use super::credentials::IN_MEMORY_PATH;
use super::types::DuckDbValueConverter;
use crate::services::database::error::{EngineError, StatementError};
use crate::services::database::traits::{ColumnInfo, Cursor, Engine, EngineConnection, Row, Value};

/// Opens DuckDB databases.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuckDbEngine;

impl DuckDbEngine {
    fn config(read_only: bool) -> Result<Config, EngineError> {
        let mode = if read_only {
            AccessMode::ReadOnly
        } else {
            AccessMode::ReadWrite
        };
        Ok(Config::default().access_mode(mode)?)
    }
}

impl Engine for DuckDbEngine {
    type Connection = DuckDbRawConnection;

    fn connect(&self, path: &str, read_only: bool) -> Result<Self::Connection, EngineError> {
        let config = Self::config(read_only)?;
        let conn = if path == IN_MEMORY_PATH {
            Connection::open_in_memory_with_flags(config)?
        } else {
            Connection::open_with_flags(path, config)?
        };
        Ok(DuckDbRawConnection { conn: Some(conn) })
    }
}

/// An open DuckDB connection.
pub struct DuckDbRawConnection {
    conn: Option<Connection>,
}

impl DuckDbRawConnection {
    fn conn(&self) -> Result<&Connection, EngineError> {
        self.conn
            .as_ref()
            .ok_or_else(|| EngineError::Runtime("Connection already closed".to_string()))
    }
}

impl EngineConnection for DuckDbRawConnection {
    type Cursor = DuckDbCursor;

    fn cursor(&self) -> Result<Self::Cursor, EngineError> {
        let conn = self.conn()?.try_clone()?;
        Ok(DuckDbCursor::new(conn))
    }

    fn execute(&mut self, sql: &str) -> Result<(), EngineError> {
        self.conn()?.execute_batch(sql)?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), EngineError> {
        match self.conn.take() {
            Some(conn) => conn.close().map_err(|(_, e)| EngineError::from(e)),
            None => Ok(()),
        }
    }
}

/// Whether `sql` holds nothing but whitespace and comments.
fn is_blank(sql: &str) -> bool {
    let mut rest = sql.trim_start();
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("--") {
            rest = after.split_once('\n').map_or("", |(_, tail)| tail);
        } else if let Some(after) = rest.strip_prefix("/*") {
            rest = after.split_once("*/").map_or("", |(_, tail)| tail);
        } else {
            return false;
        }
        rest = rest.trim_start();
    }
    true
}

/// Buffered result of the last statement run on a cursor.
#[derive(Debug, Default)]
struct ResultSet {
    columns: Vec<ColumnInfo>,
    rows: VecDeque<Row>,
}

/// A DuckDB cursor.
pub struct DuckDbCursor {
    conn: Option<Connection>,
    result: Option<ResultSet>,
    rowcount: i64,
}

impl DuckDbCursor {
    fn new(conn: Connection) -> Self {
        Self {
            conn: Some(conn),
            result: None,
            rowcount: -1,
        }
    }

    fn run(conn: &Connection, sql: &str, bindings: &[Value]) -> Result<(ResultSet, usize), duckdb::Error> {
        let mut stmt = conn.prepare(sql)?;
        let params = DuckDbValueConverter::to_params(bindings);
        let changed = stmt.execute(duckdb::params_from_iter(params))?;

        let columns = DuckDbValueConverter::build_column_info(&stmt);
        let column_count = columns.len();

        let mut rows = VecDeque::new();
        let mut row_iter = stmt.raw_query();
        while let Some(row) = row_iter.next()? {
            rows.push_back(DuckDbValueConverter::convert_row(row, column_count));
        }

        Ok((ResultSet { columns, rows }, changed))
    }

    fn result_mut(&mut self) -> Result<&mut ResultSet, StatementError> {
        self.result
            .as_mut()
            .ok_or_else(|| EngineError::Runtime("No open result set".to_string()).into())
    }
}

impl Cursor for DuckDbCursor {
    fn execute(&mut self, sql: &str, bindings: Option<&[Value]>) -> Result<(), StatementError> {
        let conn = self
            .conn
            .as_ref()
            .ok_or_else(|| EngineError::Runtime("Connection already closed".to_string()))?;

        self.result = None;
        self.rowcount = -1;
        if is_blank(sql) {
            return Err(EngineError::Runtime("empty statement".to_string()).into());
        }
        let (result, changed) =
            Self::run(conn, sql, bindings.unwrap_or_default()).map_err(EngineError::from)?;
        self.rowcount = changed as i64;
        self.result = Some(result);
        Ok(())
    }

    fn fetchone(&mut self) -> Result<Option<Row>, StatementError> {
        Ok(self.result_mut()?.rows.pop_front())
    }

    fn fetchmany(&mut self, size: usize) -> Result<Vec<Row>, StatementError> {
        let rows = &mut self.result_mut()?.rows;
        let take = size.min(rows.len());
        Ok(rows.drain(..take).collect())
    }

    fn fetchall(&mut self) -> Result<Vec<Row>, StatementError> {
        Ok(self.result_mut()?.rows.drain(..).collect())
    }

    fn description(&self) -> Option<&[ColumnInfo]> {
        self.result.as_ref().map(|r| r.columns.as_slice())
    }

    fn rowcount(&self) -> i64 {
        self.rowcount
    }

    fn close(&mut self) -> Result<(), StatementError> {
        self.result = None;
        match self.conn.take() {
            Some(conn) => conn
                .close()
                .map_err(|(_, e)| StatementError::Engine(e.into())),
            None => Ok(()),
        }
    }
}
