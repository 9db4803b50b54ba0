//! Error taxonomy shared by the engine binding, the handle wrappers and the
//! connection manager.
//!
//! Three layers:
//! - `EngineError` - what the embedded database reports
//! - `AdapterError` - the host's error kinds, returned from every public entry point
//! - `StatementError` - what a single statement can fail with, matched by the
//!   manager's exception handler to decide between suppressing, propagating and
//!   re-wrapping

use thiserror::Error;

/// Failure reported by the embedded database.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Runtime failure raised while executing SQL. The engine also uses this
    /// kind for informational conditions.
    #[error("{0}")]
    Runtime(String),
    /// Misuse of the client API (bad bindings, closed handles, conversions).
    #[error("{0}")]
    Other(String),
}

impl EngineError {
    /// The message the engine attached to this failure.
    pub fn message(&self) -> &str {
        match self {
            Self::Runtime(message) | Self::Other(message) => message,
        }
    }
}

impl From<duckdb::Error> for EngineError {
    fn from(err: duckdb::Error) -> Self {
        match &err {
            duckdb::Error::DuckDBFailure(..) => Self::Runtime(err.to_string()),
            _ => Self::Other(err.to_string()),
        }
    }
}

/// Errors surfaced to the host framework.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The profile is incomplete or contradictory.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The engine could not be opened or bootstrapped.
    #[error("Failed to connect: {0}")]
    FailedToConnect(String),

    /// The host's standardized runtime error.
    #[error("Runtime error: {message}")]
    Runtime {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl AdapterError {
    /// A runtime error with no underlying cause.
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime {
            message: message.into(),
            source: None,
        }
    }

    /// A runtime error chained to the failure that produced it.
    pub fn runtime_from(source: anyhow::Error) -> Self {
        Self::Runtime {
            message: format!("{:#}", source),
            source: Some(source),
        }
    }

    /// Whether this is the host's standardized runtime error.
    pub fn is_runtime(&self) -> bool {
        matches!(self, Self::Runtime { .. })
    }
}

/// Ways a single statement can fail inside the manager's exception handler.
#[derive(Debug, Error)]
pub enum StatementError {
    /// Already a host error; never re-wrapped.
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    /// Raised by the engine.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Anything else.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_message() {
        let err = EngineError::Runtime("Catalog Error: table foo does not exist".to_string());
        assert_eq!(err.message(), "Catalog Error: table foo does not exist");
        assert_eq!(err.to_string(), "Catalog Error: table foo does not exist");
    }

    #[test]
    fn test_runtime_from_keeps_cause() {
        let err = AdapterError::runtime_from(anyhow::anyhow!("disk full"));
        assert!(err.is_runtime());
        assert!(err.to_string().contains("disk full"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_runtime_without_cause() {
        let err = AdapterError::runtime("only one thread");
        assert_eq!(err.to_string(), "Runtime error: only one thread");
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn test_statement_error_conversions() {
        let err: StatementError = EngineError::Other("bad binding".to_string()).into();
        assert!(matches!(err, StatementError::Engine(EngineError::Other(_))));

        let err: StatementError = AdapterError::runtime("x").into();
        assert!(matches!(err, StatementError::Adapter(AdapterError::Runtime { .. })));
    }
}
