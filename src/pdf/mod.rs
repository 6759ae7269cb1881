//! PDF merging module

pub mod merge;
pub mod metadata;

// Re-export commonly used items
pub use merge::{
    find_pdf_candidates, DocumentMerger, MergeOutcome, MergeUnavailable, PdfConcatenator,
    MERGED_FILE_NAME,
};
pub use metadata::count_pages;
