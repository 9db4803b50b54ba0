//! Host profile loading.
//!
//! A profile is a small JSON document:
//!
//! ```json
//! {
//!   "threads": 1,
//!   "credentials": { "path": "warehouse.duckdb", "extensions": ["json"] }
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::drivers::DuckDbCredentials;

fn default_threads() -> u32 {
    1
}

/// Adapter-relevant part of the host's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Number of worker threads the host wants to run models on
    #[serde(default = "default_threads")]
    pub threads: u32,
    /// Connection credentials
    #[serde(default)]
    pub credentials: DuckDbCredentials,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            credentials: DuckDbCredentials::default(),
        }
    }
}

impl Profile {
    /// Create a profile from credentials, with a single thread.
    pub fn new(credentials: DuckDbCredentials) -> Self {
        Self {
            threads: default_threads(),
            credentials,
        }
    }

    /// Set the requested thread count.
    pub fn with_threads(mut self, threads: u32) -> Self {
        self.threads = threads;
        self
    }

    /// Parse a profile from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse profile")
    }

    /// Load a profile from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile {}", path.display()))?;
        Self::from_json_str(&contents)
            .with_context(|| format!("Invalid profile {}", path.display()))
    }

    /// Default profile location, `<config dir>/duckdb-adapter/profile.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("duckdb-adapter").join("profile.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_profile_defaults() {
        let profile = Profile::from_json_str("{}").unwrap();
        assert_eq!(profile, Profile::default());
        assert_eq!(profile.threads, 1);
        assert!(profile.credentials.is_in_memory());
    }

    #[test]
    fn test_parse_full_profile() {
        let profile = Profile::from_json_str(
            r#"{
                "threads": 4,
                "credentials": {
                    "database": "analytics",
                    "path": "warehouse.duckdb",
                    "s3_region": "us-west-2",
                    "s3_session_token": "tok"
                }
            }"#,
        )
        .unwrap();

        assert_eq!(profile.threads, 4);
        assert_eq!(profile.credentials.database, "analytics");
        assert_eq!(profile.credentials.schema, "main");
        assert_eq!(profile.credentials.s3_session_token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        let err = Profile::from_json_str("{ threads: }").unwrap_err();
        assert!(err.to_string().contains("Failed to parse profile"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"credentials": {{"extensions": ["httpfs"]}}}}"#).unwrap();

        let profile = Profile::load(file.path()).unwrap();
        assert_eq!(profile.credentials.extensions(), ["httpfs"]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Profile::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read profile"));
    }

    #[test]
    fn test_default_path_file_name() {
        if let Some(path) = Profile::default_path() {
            assert!(path.ends_with("duckdb-adapter/profile.json"));
        }
    }
}
