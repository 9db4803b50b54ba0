pub mod drivers;
pub mod error;
mod profile;
pub mod traits;

pub use drivers::{DuckDbConnectionManager, DuckDbCredentials};
pub use error::{AdapterError, EngineError, StatementError};
pub use profile::Profile;
