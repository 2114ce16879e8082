//! Launching an external editor on the bulk-edit grid.

use std::fs;
use std::io::{self, Write};
use std::process::Command;

/// Something that lets the user edit the grid text.
pub trait GridEditor {
    /// Return the edited grid. An `Err` means the edit was abandoned.
    fn edit(&self, grid: &str) -> io::Result<String>;
}

/// Opens the grid in a temporary `.csv` file with a user-configured command.
#[derive(Clone, Debug)]
pub struct ExternalEditor {
    command: String,
}

impl ExternalEditor {
    /// `command` may carry arguments, e.g. `code --wait`.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl GridEditor for ExternalEditor {
    fn edit(&self, grid: &str) -> io::Result<String> {
        let mut file = tempfile::Builder::new()
            .prefix("hrms-grid-")
            .suffix(".csv")
            .tempfile()?;
        file.write_all(grid.as_bytes())?;
        file.flush()?;

        let mut parts = self.command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "editor command is empty"))?;

        tracing::debug!("launching editor {} on {}", program, file.path().display());
        let status = Command::new(program)
            .args(parts)
            .arg(file.path())
            .status()?;
        if !status.success() {
            return Err(io::Error::other(format!("editor exited with {status}")));
        }

        fs::read_to_string(file.path())
    }
}
