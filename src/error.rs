use std::io;
use thiserror::Error;

/// Why a resume could not be taken in. Shown to the candidate; never fatal.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Unsupported file format '{extension}'. Please provide a PDF, DOCX or plain-text resume.")]
    UnsupportedFileType { extension: String },

    #[error("File size must be less than {limit_mb}MB (got {size} bytes).")]
    FileTooLarge {
        size: u64,
        limit: u64,
        limit_mb: u64,
    },

    #[error("Could not read resume: {0}")]
    Io(#[from] io::Error),

    #[error("Could not extract text from resume: {0}")]
    Extraction(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("snapshot encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
