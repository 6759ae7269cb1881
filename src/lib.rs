//! ZIP Combine Library
//!
//! Batch-extracts every ZIP archive found directly inside a target directory
//! into one shared `combined_extraction/` folder, then merges all PDFs found
//! under that folder into a single `merged.pdf`. This library provides:
//! - Archive discovery with a case-insensitive `.zip` match
//! - Validated batch extraction with skip-and-continue per archive
//! - PDF concatenation in lexicographic path order
//! - An injectable merge capability for graceful degradation
//!
//! # Example
//!
//! ```no_run
//! use zip_combine::pdf::PdfConcatenator;
//! use zip_combine::pipeline;
//! use std::path::Path;
//!
//! let report = pipeline::run(Path::new("downloads"), &PdfConcatenator)
//!     .expect("run failed");
//! println!("extracted {} files", report.extraction.files_extracted);
//! ```

pub mod error;
pub mod extract;
pub mod locate;
pub mod pdf;
pub mod pipeline;

// Re-export commonly used items
pub use error::{Error, Result};
pub use pipeline::{run, RunReport, Stage, EXTRACTION_DIR_NAME};
