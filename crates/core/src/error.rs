use hrms_types::{AgeError, TextError};

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("Name, Age and Gender are required")]
    MissingRequired,
    #[error("no record with ID {0}")]
    NotFound(u64),
    #[error("invalid record at data row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },
    #[error("invalid grid row {row}: {reason}")]
    InvalidGridRow { row: usize, reason: String },
    #[error("unexpected header row: {found}")]
    UnexpectedHeader { found: String },
    #[error("failed to read records file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write records file: {0}")]
    FileWrite(std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid text: {0}")]
    Text(#[from] TextError),
    #[error("invalid age: {0}")]
    Age(#[from] AgeError),
}

pub type RecordResult<T> = std::result::Result<T, RecordError>;
