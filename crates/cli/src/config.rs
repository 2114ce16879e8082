//! Process configuration for the `hrms` binary.
//!
//! This is the only place environment variables are read. Values are resolved
//! once at startup and passed down; the core crate receives a [`CoreConfig`].

use hrms_core::{resolve_data_file, CoreConfig};
use std::path::PathBuf;

/// Records file location.
pub const DATA_FILE_ENV: &str = "HRMS_DATA_FILE";

/// Editor command for the bulk editor, checked before `VISUAL` and `EDITOR`.
pub const EDITOR_ENV: &str = "HRMS_EDITOR";

/// Used when no editor variable is set.
pub const FALLBACK_EDITOR: &str = "vi";

#[derive(Clone, Debug)]
pub struct Settings {
    pub core: CoreConfig,
    pub editor_command: String,
}

impl Settings {
    /// Resolve settings from the `--data-file` flag and the process environment.
    pub fn from_env(data_file_flag: Option<PathBuf>) -> anyhow::Result<Self> {
        let data_file = resolve_data_file(data_file_flag, std::env::var(DATA_FILE_ENV).ok());
        let core = CoreConfig::new(data_file)?;
        let editor_command = resolve_editor_command([
            std::env::var(EDITOR_ENV).ok(),
            std::env::var("VISUAL").ok(),
            std::env::var("EDITOR").ok(),
        ]);

        Ok(Self {
            core,
            editor_command,
        })
    }
}

/// First non-blank candidate, else [`FALLBACK_EDITOR`].
pub fn resolve_editor_command(candidates: [Option<String>; 3]) -> String {
    candidates
        .into_iter()
        .flatten()
        .map(|c| c.trim().to_string())
        .find(|c| !c.is_empty())
        .unwrap_or_else(|| FALLBACK_EDITOR.to_string())
}
