//! Cursor and connection wrappers handed to the host.
//!
//! Both forward every operation to the engine object unchanged, except that
//! `DuckDbCursorWrapper::execute` turns an engine runtime failure into the
//! host's runtime error.

use crate::services::database::error::{AdapterError, EngineError, StatementError};
use crate::services::database::traits::{ColumnInfo, Cursor, DbConnection, EngineConnection, Row, Value};

/// Cursor wrapper that translates engine runtime failures on `execute`.
pub struct DuckDbCursorWrapper<C> {
    cursor: C,
}

impl<C: Cursor> DuckDbCursorWrapper<C> {
    pub fn new(cursor: C) -> Self {
        Self { cursor }
    }
}

impl<C: Cursor> Cursor for DuckDbCursorWrapper<C> {
    fn execute(&mut self, sql: &str, bindings: Option<&[Value]>) -> Result<(), StatementError> {
        let result = match bindings {
            None => self.cursor.execute(sql, None),
            Some(bindings) => self.cursor.execute(sql, Some(bindings)),
        };

        match result {
            Err(StatementError::Engine(EngineError::Runtime(message))) => {
                Err(AdapterError::runtime(message).into())
            }
            other => other,
        }
    }

    fn fetchone(&mut self) -> Result<Option<Row>, StatementError> {
        self.cursor.fetchone()
    }

    fn fetchmany(&mut self, size: usize) -> Result<Vec<Row>, StatementError> {
        self.cursor.fetchmany(size)
    }

    fn fetchall(&mut self) -> Result<Vec<Row>, StatementError> {
        self.cursor.fetchall()
    }

    fn description(&self) -> Option<&[ColumnInfo]> {
        self.cursor.description()
    }

    fn rowcount(&self) -> i64 {
        self.cursor.rowcount()
    }

    fn close(&mut self) -> Result<(), StatementError> {
        self.cursor.close()
    }
}

/// Connection wrapper owning exactly one cursor.
///
/// DuckDB runs one statement at a time per connection, so the cursor is
/// created once and handed out by every `cursor()` call.
pub struct DuckDbConnectionWrapper<D: EngineConnection> {
    conn: D,
    cursor: DuckDbCursorWrapper<D::Cursor>,
}

impl<D: EngineConnection> DuckDbConnectionWrapper<D> {
    /// Wrap `conn`, creating its cursor.
    pub fn new(conn: D) -> Result<Self, EngineError> {
        let cursor = DuckDbCursorWrapper::new(conn.cursor()?);
        Ok(Self { conn, cursor })
    }

    /// The wrapped engine connection.
    pub fn inner(&self) -> &D {
        &self.conn
    }
}

impl<D: EngineConnection> DbConnection for DuckDbConnectionWrapper<D> {
    type Cursor = DuckDbCursorWrapper<D::Cursor>;

    fn cursor(&mut self) -> &mut Self::Cursor {
        &mut self.cursor
    }

    fn execute(&mut self, sql: &str) -> Result<(), StatementError> {
        Ok(self.conn.execute(sql)?)
    }

    fn close(&mut self) -> Result<(), StatementError> {
        self.cursor.close()?;
        Ok(self.conn.close()?)
    }
}
