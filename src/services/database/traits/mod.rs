//! Adapter abstraction traits and types.
//!
//! - **Connection** (`connection`): host-facing cursor/connection traits, the
//!   host's connection record and per-statement response
//! - **Engine** (`engine`): traits for the raw database client being wrapped
//! - **Row/Value** (`row`): engine-agnostic value representation

pub mod connection;
pub mod engine;
pub mod row;

pub use connection::{
    AdapterResponse, Connection, ConnectionState, Cursor, DbConnection, ResultTable,
};

pub use engine::{Engine, EngineConnection};

pub use row::{ColumnInfo, Row, Value};
