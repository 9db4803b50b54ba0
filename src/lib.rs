//! DuckDB adapter for SQL orchestration hosts.
//!
//! Opens DuckDB handles, loads extensions and S3 credentials, wraps the
//! engine's connection and cursor so generic host code can drive them, and
//! maps engine failures onto the host's error kinds.

pub mod services;

pub use services::database::traits::{AdapterResponse, Connection, ConnectionState, ResultTable};
pub use services::{
    AdapterError, DuckDbConnectionManager, DuckDbCredentials, EngineError, Profile, StatementError,
};
