//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the
//! record service. Core code never reads process-wide environment variables;
//! the binary collects the raw values and hands them to the resolvers here.

use crate::constants::DEFAULT_DATA_FILE;
use crate::{RecordError, RecordResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_file: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::InvalidInput` if `data_file` is empty or names an
    /// existing directory.
    pub fn new(data_file: PathBuf) -> RecordResult<Self> {
        if data_file.as_os_str().is_empty() {
            return Err(RecordError::InvalidInput(
                "data file path cannot be empty".into(),
            ));
        }
        if data_file.is_dir() {
            return Err(RecordError::InvalidInput(format!(
                "data file path is a directory: {}",
                data_file.display()
            )));
        }

        Ok(Self { data_file })
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }
}

/// Pick the records file location from an explicit override and an
/// environment value, falling back to [`DEFAULT_DATA_FILE`].
///
/// Blank values are treated as unset.
pub fn resolve_data_file(override_path: Option<PathBuf>, env_value: Option<String>) -> PathBuf {
    if let Some(path) = override_path.filter(|p| !p.as_os_str().is_empty()) {
        return path;
    }

    env_value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE))
}
