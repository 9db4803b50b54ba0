//! Engine driver implementations.
//!
//! - **DuckDB**: embedded analytics database via duckdb-rs
//!
//! Each driver implements the engine traits and supplies the connection
//! manager the host drives.

mod duckdb;

pub use self::duckdb::{
    ConnectionKey, DuckDbConnectionManager, DuckDbConnectionWrapper, DuckDbCredentials,
    DuckDbCursor, DuckDbCursorWrapper, DuckDbEngine, DuckDbHandle, DuckDbHandleCursor,
    DuckDbRawConnection, IN_MEMORY_PATH,
};
