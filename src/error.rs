//! Error types for the zip-combine library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the zip-combine library
#[derive(Error, Debug)]
pub enum Error {
    /// ZIP processing error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Target directory does not exist
    #[error("Directory '{}' does not exist", .0.display())]
    DirectoryNotFound(PathBuf),

    /// Target directory cannot be read or written
    #[error("Insufficient permissions for directory '{}': {}", .0.display(), .1)]
    PermissionDenied(PathBuf, String),

    /// No ZIP archives found in the target directory
    #[error("No ZIP files found in {}", .0.display())]
    NoArchivesFound(PathBuf),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Invalid glob pattern
    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(String),

    /// Invalid PDF (no pages)
    #[error("PDF has no pages: {}", .0.display())]
    EmptyPdf(PathBuf),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// True for the fatal-setup class: missing directory, bad permissions,
    /// or nothing to extract. These abort the run before the extraction
    /// directory is touched.
    pub fn is_fatal_setup(&self) -> bool {
        matches!(
            self,
            Error::DirectoryNotFound(_)
                | Error::PermissionDenied(_, _)
                | Error::NoArchivesFound(_)
        )
    }
}
