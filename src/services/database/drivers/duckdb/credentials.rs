//! DuckDB credential descriptor.
//!
//! Holds everything needed to open and bootstrap one logical DuckDB
//! connection. Validation is deferred to bootstrap, so an incomplete S3
//! configuration deserializes fine and only fails when a connection is opened.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Path value that selects an in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

fn default_database() -> String {
    "main".to_string()
}

fn default_schema() -> String {
    "main".to_string()
}

fn default_path() -> String {
    IN_MEMORY_PATH.to_string()
}

/// Credentials for a DuckDB connection, as read from the host profile.
///
/// `==` and `Hash` only look at the identifying fields (database, schema and
/// path), the same ones `connection_key` returns.
#[derive(Clone, Serialize, Deserialize)]
pub struct DuckDbCredentials {
    /// Logical database name
    #[serde(default = "default_database")]
    pub database: String,
    /// Logical schema name
    #[serde(default = "default_schema")]
    pub schema: String,
    /// Database file, or `:memory:`
    #[serde(default = "default_path")]
    pub path: String,

    /// Extensions to load on every new connection, in order
    #[serde(default)]
    pub extensions: Option<Vec<String>>,

    // S3 access through the httpfs extension
    #[serde(default)]
    pub s3_region: Option<String>,
    #[serde(default)]
    pub s3_access_key_id: Option<String>,
    #[serde(default)]
    pub s3_secret_access_key: Option<String>,
    #[serde(default)]
    pub s3_session_token: Option<String>,
}

impl Default for DuckDbCredentials {
    fn default() -> Self {
        Self {
            database: default_database(),
            schema: default_schema(),
            path: default_path(),
            extensions: None,
            s3_region: None,
            s3_access_key_id: None,
            s3_secret_access_key: None,
            s3_session_token: None,
        }
    }
}

/// The fields that identify a logical connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionKey {
    pub database: String,
    pub schema: String,
    pub path: String,
}

impl DuckDbCredentials {
    /// Credentials for the given database path with every other field defaulted.
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Set the extensions to load.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = Some(extensions.into_iter().map(Into::into).collect());
        self
    }

    /// Adapter type name reported to the host.
    pub fn type_name(&self) -> &'static str {
        "duckdb"
    }

    /// Names of the fields that identify a connection.
    pub fn connection_keys(&self) -> &'static [&'static str] {
        &["database", "schema", "path"]
    }

    /// `(key, value)` pairs for the identifying fields, for debug output.
    pub fn connection_info(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("database", self.database.as_str()),
            ("schema", self.schema.as_str()),
            ("path", self.path.as_str()),
        ]
        .into_iter()
    }

    /// Identity used for caching and equality of connections.
    pub fn connection_key(&self) -> ConnectionKey {
        ConnectionKey {
            database: self.database.clone(),
            schema: self.schema.clone(),
            path: self.path.clone(),
        }
    }

    /// Whether `path` selects an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.path == IN_MEMORY_PATH
    }

    /// Extensions to load, empty if none are configured.
    pub fn extensions(&self) -> &[String] {
        self.extensions.as_deref().unwrap_or_default()
    }
}

impl PartialEq for DuckDbCredentials {
    fn eq(&self, other: &Self) -> bool {
        self.connection_info().eq(other.connection_info())
    }
}

impl Eq for DuckDbCredentials {}

impl Hash for DuckDbCredentials {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.database.hash(state);
        self.schema.hash(state);
        self.path.hash(state);
    }
}

impl std::fmt::Debug for DuckDbCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "********");
        f.debug_struct("DuckDbCredentials")
            .field("database", &self.database)
            .field("schema", &self.schema)
            .field("path", &self.path)
            .field("extensions", &self.extensions)
            .field("s3_region", &self.s3_region)
            .field("s3_access_key_id", &self.s3_access_key_id)
            .field("s3_secret_access_key", &redact(&self.s3_secret_access_key))
            .field("s3_session_token", &redact(&self.s3_session_token))
            .finish()
    }
}
