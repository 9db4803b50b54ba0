//! DuckDB connection manager.
//!
//! Entry point the host uses to open, drive and close DuckDB connections.
//! DuckDB runs in-process and synchronously, so the manager only supports a
//! single worker thread and `cancel` has nothing to interrupt.

use std::time::Instant;
use tracing::Span;

use super::connection::DuckDbEngine;
use super::credentials::DuckDbCredentials;
use super::wrapper::{DuckDbConnectionWrapper, DuckDbCursorWrapper};
use crate::services::database::error::{AdapterError, EngineError, StatementError};
use crate::services::database::profile::Profile;
use crate::services::database::traits::{
    AdapterResponse, Connection, ConnectionState, Cursor, DbConnection, Engine, EngineConnection,
    ResultTable, Value,
};

/// Handle type stored on a host connection for engine `E`.
pub type DuckDbHandle<E> = DuckDbConnectionWrapper<<E as Engine>::Connection>;

/// Cursor type handed out by a `DuckDbHandle<E>`.
pub type DuckDbHandleCursor<E> =
    DuckDbCursorWrapper<<<E as Engine>::Connection as EngineConnection>::Cursor>;

const MISSING_S3_CREDENTIALS: &str =
    "You must specify either s3_session_token or s3_access_key_id and s3_secret_access_key";

/// Quote a value as a SQL string literal.
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Connection manager for DuckDB.
pub struct DuckDbConnectionManager<E: Engine = DuckDbEngine> {
    engine: E,
    span: Span,
}

impl DuckDbConnectionManager<DuckDbEngine> {
    /// Manager backed by the bundled DuckDB engine.
    pub fn duckdb(profile: &Profile, span: Span) -> Result<Self, AdapterError> {
        Self::new(profile, DuckDbEngine, span)
    }
}

impl<E: Engine> DuckDbConnectionManager<E> {
    /// Create a manager for `profile`.
    ///
    /// Every event the manager logs is emitted under `span`.
    ///
    /// # Errors
    ///
    /// Fails if the profile asks for more than one thread.
    pub fn new(profile: &Profile, engine: E, span: Span) -> Result<Self, AdapterError> {
        if profile.threads > 1 {
            return Err(AdapterError::runtime(
                "duckdb-adapter only supports 1 thread at this time",
            ));
        }

        Ok(Self { engine, span })
    }

    /// Open `connection` and run the bootstrap statements.
    ///
    /// Does nothing if the connection is already open. On failure the
    /// connection is left in the `Fail` state without a handle.
    pub fn open(&self, connection: &mut Connection<DuckDbHandle<E>>) -> Result<(), AdapterError> {
        if connection.state == ConnectionState::Open {
            tracing::debug!(parent: &self.span, "Connection is already open, skipping open.");
            return Ok(());
        }

        let credentials = Self::get_credentials(&connection.credentials);
        match self.connect(credentials) {
            Ok(handle) => {
                connection.handle = Some(handle);
                connection.state = ConnectionState::Open;
                tracing::debug!(
                    parent: &self.span,
                    connection = %connection.name,
                    path = %credentials.path,
                    "Opened duckdb connection"
                );
                Ok(())
            }
            Err(err) => {
                tracing::debug!(
                    parent: &self.span,
                    connection = %connection.name,
                    "Got an error when attempting to open a duckdb database: '{}'",
                    err
                );
                connection.handle = None;
                connection.state = ConnectionState::Fail;
                Err(err)
            }
        }
    }

    /// Connect and run the bootstrap statements.
    fn connect(&self, credentials: &DuckDbCredentials) -> Result<DuckDbHandle<E>, AdapterError> {
        let failed = |err: EngineError| AdapterError::FailedToConnect(err.to_string());

        let conn = self.engine.connect(&credentials.path, false).map_err(failed)?;
        let mut handle = DuckDbConnectionWrapper::new(conn).map_err(failed)?;
        Self::bootstrap(&mut handle, credentials)?;
        Ok(handle)
    }

    /// Load extensions and configure S3 access.
    ///
    /// Statements run one by one; anything loaded before a failure is left in
    /// place, since the caller drops the handle anyway. A session token wins
    /// over an access key pair.
    fn bootstrap<H: DbConnection>(handle: &mut H, credentials: &DuckDbCredentials) -> Result<(), AdapterError> {
        let mut run = |sql: String| {
            handle
                .execute(&sql)
                .map_err(|err| AdapterError::FailedToConnect(err.to_string()))
        };

        for extension in credentials.extensions() {
            run(format!("LOAD {}", quote(extension)))?;
        }

        if let Some(region) = &credentials.s3_region {
            run("LOAD 'httpfs'".to_string())?;
            run(format!("SET s3_region = {}", quote(region)))?;

            match (
                &credentials.s3_session_token,
                &credentials.s3_access_key_id,
                &credentials.s3_secret_access_key,
            ) {
                (Some(token), _, _) => {
                    run(format!("SET s3_session_token = {}", quote(token)))?;
                }
                (None, Some(key_id), Some(secret)) => {
                    run(format!("SET s3_access_key_id = {}", quote(key_id)))?;
                    run(format!("SET s3_secret_access_key = {}", quote(secret)))?;
                }
                _ => return Err(AdapterError::Configuration(MISSING_S3_CREDENTIALS.to_string())),
            }
        }

        Ok(())
    }

    /// Statements run in-process on the only thread, so there is nothing to cancel.
    pub fn cancel(&self, connection: &Connection<DuckDbHandle<E>>) {
        tracing::debug!(parent: &self.span, connection = %connection.name, "Cancel is a no-op for duckdb");
    }

    /// Run `f` and map its failure into the host's error kinds.
    ///
    /// - host errors propagate unchanged
    /// - engine runtime failures are logged and swallowed, yielding `Ok(None)`
    /// - anything else is logged with `sql` and re-raised as a runtime error
    pub fn exception_handler<T, F>(
        &self,
        sql: &str,
        connection_name: &str,
        f: F,
    ) -> Result<Option<T>, AdapterError>
    where
        F: FnOnce() -> Result<T, StatementError>,
    {
        match f() {
            Ok(value) => Ok(Some(value)),
            Err(StatementError::Adapter(err)) => Err(err),
            Err(StatementError::Engine(EngineError::Runtime(message))) => {
                tracing::debug!(parent: &self.span, connection = connection_name, "duckdb error: {}", message);
                Ok(None)
            }
            Err(other) => {
                tracing::debug!(parent: &self.span, connection = connection_name, "Error running SQL: {}", sql);
                tracing::debug!(parent: &self.span, connection = connection_name, "Rolling back transaction.");
                Err(AdapterError::runtime_from(anyhow::Error::new(other)))
            }
        }
    }

    /// Credentials are used as given.
    pub fn get_credentials(credentials: &DuckDbCredentials) -> &DuckDbCredentials {
        credentials
    }

    /// DuckDB reports no per-statement metadata, so every response is "OK".
    pub fn get_response<C: Cursor>(_cursor: &C) -> AdapterResponse {
        AdapterResponse::new("OK")
    }

    /// Run `sql` on the connection's cursor and return the cursor.
    pub fn add_query<'c>(
        &self,
        connection: &'c mut Connection<DuckDbHandle<E>>,
        sql: &str,
        bindings: Option<&[Value]>,
    ) -> Result<&'c mut DuckDbHandleCursor<E>, AdapterError> {
        let name = connection.name.clone();
        let handle = match (connection.state, connection.handle.as_mut()) {
            (ConnectionState::Open, Some(handle)) => handle,
            (state, _) => {
                return Err(AdapterError::runtime(format!(
                    "Connection '{}' is not open (state: {})",
                    name, state
                )));
            }
        };

        tracing::debug!(parent: &self.span, connection = %name, "Using duckdb connection");
        tracing::debug!(parent: &self.span, connection = %name, "On {}: {}", name, sql);

        let cursor = handle.cursor();
        let started = Instant::now();
        self.exception_handler(sql, &name, || cursor.execute(sql, bindings))?;
        tracing::debug!(
            parent: &self.span,
            connection = %name,
            "SQL status: {} in {:.2} seconds",
            Self::get_response(&*cursor),
            started.elapsed().as_secs_f64()
        );

        Ok(cursor)
    }

    /// Run `sql` and report the response, fetching the result if `fetch` is set.
    pub fn execute(
        &self,
        connection: &mut Connection<DuckDbHandle<E>>,
        sql: &str,
        fetch: bool,
    ) -> Result<(AdapterResponse, ResultTable), AdapterError> {
        let name = connection.name.clone();
        let cursor = self.add_query(connection, sql, None)?;
        let response = Self::get_response(&*cursor);

        let table = if fetch {
            let rows = self
                .exception_handler(sql, &name, || cursor.fetchall())?
                .unwrap_or_default();
            let columns = cursor.description().map(<[_]>::to_vec).unwrap_or_default();
            ResultTable::new(columns, rows)
        } else {
            ResultTable::empty()
        };

        Ok((response, table))
    }

    /// Close the connection's handle, if any, and mark it closed.
    ///
    /// The connection ends up `Closed` without a handle even when closing the
    /// engine connection fails; that failure is still returned.
    pub fn close(&self, connection: &mut Connection<DuckDbHandle<E>>) -> Result<(), AdapterError> {
        let result = match connection.handle.take() {
            Some(mut handle) => self
                .exception_handler("", &connection.name, || handle.close())
                .map(|_| ()),
            None => Ok(()),
        };
        connection.state = ConnectionState::Closed;
        tracing::debug!(parent: &self.span, connection = %connection.name, "Closed duckdb connection");
        result
    }
}
