//! DuckDB adapter.
//!
//! This module lets the host run its SQL on DuckDB via the duckdb-rs crate.
//!
//! # Example
//!
//! ```ignore
//! use duckdb_adapter::services::database::drivers::{DuckDbConnectionManager, DuckDbCredentials};
//! use duckdb_adapter::services::database::traits::Connection;
//! use duckdb_adapter::services::database::Profile;
//!
//! let credentials = DuckDbCredentials::with_path("warehouse.duckdb").with_extensions(["json"]);
//! let profile = Profile::new(credentials.clone());
//! let manager = DuckDbConnectionManager::duckdb(&profile, tracing::info_span!("duckdb"))?;
//!
//! let mut connection = Connection::new("master", credentials);
//! manager.open(&mut connection)?;
//! let (response, table) = manager.execute(&mut connection, "SELECT 42", true)?;
//! ```

mod connection;
mod credentials;
mod manager;
mod types;
mod wrapper;

pub use connection::{DuckDbCursor, DuckDbEngine, DuckDbRawConnection};
pub use credentials::{ConnectionKey, DuckDbCredentials, IN_MEMORY_PATH};
pub use manager::{DuckDbConnectionManager, DuckDbHandle, DuckDbHandleCursor};
pub use wrapper::{DuckDbConnectionWrapper, DuckDbCursorWrapper};
