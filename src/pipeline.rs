//! Run orchestration: locate, extract, merge
//!
//! A run walks a fixed stage sequence. Failures inside a stage are absorbed
//! per item and never move the run backwards; only fatal setup errors from
//! the locator end the run early.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::extract::{self, ExtractOptions, ExtractReport};
use crate::locate;
use crate::pdf::{DocumentMerger, MergeOutcome};

/// Name of the shared extraction directory created under the target
pub const EXTRACTION_DIR_NAME: &str = "combined_extraction";

/// Stages of a run, in order. A run with no archives short-circuits from
/// Locating straight to Done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Idle,
    Locating,
    Extracting,
    Merging,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Locating => "locating",
            Stage::Extracting => "extracting",
            Stage::Merging => "merging",
            Stage::Done => "done",
        };
        write!(f, "{}", name)
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Extraction directory for this run
    pub dest: PathBuf,
    /// What the extractor did
    pub extraction: ExtractReport,
    /// What the merge stage did
    pub merge: MergeOutcome,
}

/// Run the full pipeline over `directory` with the given merge capability.
///
/// Fatal setup errors (missing directory, missing permissions, no archives)
/// are returned before the extraction directory is created or touched.
pub fn run(directory: &Path, merger: &dyn DocumentMerger) -> Result<RunReport> {
    println!("Starting batch extraction in: {}", directory.display());

    let archives = locate::find_archives(directory)?;
    let names: Vec<String> = archives
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .collect();
    println!("Found {} ZIP files to extract: {:?}", archives.len(), names);

    let dest = directory.join(EXTRACTION_DIR_NAME);
    let extraction = extract::extract_all(&ExtractOptions {
        archives,
        dest: dest.clone(),
    })?;

    let merge = merger.merge(&dest)?;

    println!("\nBatch extraction completed");
    println!("All files have been extracted to: {}", dest.display());
    if let MergeOutcome::Merged { output, pages, .. } = &merge {
        println!("Combined PDF available at: {} ({} pages)", output.display(), pages);
    }

    Ok(RunReport {
        dest,
        extraction,
        merge,
    })
}
