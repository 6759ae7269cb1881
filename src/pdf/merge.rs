//! PDF merging into a single combined document
//!
//! The merge capability is injected into the pipeline as a trait object,
//! selected once at startup: [`PdfConcatenator`] when merging is available,
//! [`MergeUnavailable`] when it is not. Either way the extraction output
//! stays valid; merging is an optional final stage.
//!
//! Concatenation is based on the lopdf merge example:
//! https://github.com/J-F-Liu/lopdf/blob/main/examples/merge.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::{Error, Result};

/// Name of the combined document written into the extraction directory
pub const MERGED_FILE_NAME: &str = "merged.pdf";

/// Outcome of the merge stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A combined document was written
    Merged {
        /// Path of the combined document
        output: PathBuf,
        /// Candidates that made it into the output
        merged: usize,
        /// Candidates skipped as unreadable or empty
        skipped: usize,
        /// Total pages in the output
        pages: usize,
    },
    /// No PDFs found under the extraction directory; nothing to do
    NoCandidates,
    /// Merge capability not available; stage skipped
    Unavailable,
}

/// Merge capability injected into the pipeline.
///
/// Implementations decide what "merge every PDF under this directory" means;
/// the pipeline only cares that the stage runs once after extraction.
pub trait DocumentMerger {
    /// Merge all PDFs found under `dir` into a single document inside it.
    fn merge(&self, dir: &Path) -> Result<MergeOutcome>;
}

/// Recursively find the PDF files under `dir` (case-insensitive suffix),
/// sorted by full path. The combined output file itself is never a candidate.
pub fn find_pdf_candidates(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!("{}/**/*.pdf", Pattern::escape(&dir.to_string_lossy()));
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    let mut candidates = Vec::new();
    for entry in
        glob::glob_with(&pattern, options).map_err(|e| Error::InvalidGlob(e.to_string()))?
    {
        match entry {
            Ok(path) if path.is_file() => {
                if path.file_name().is_some_and(|name| name == MERGED_FILE_NAME)
                    && path.parent() == Some(dir)
                {
                    continue;
                }
                candidates.push(path);
            }
            Ok(_) => {}
            Err(e) => println!("Warning: skipping unreadable entry: {}", e),
        }
    }

    // Sort by full path for consistent merge ordering
    candidates.sort();
    Ok(candidates)
}

/// The available merge variant, backed by lopdf.
pub struct PdfConcatenator;

impl DocumentMerger for PdfConcatenator {
    fn merge(&self, dir: &Path) -> Result<MergeOutcome> {
        println!("\n--- Combining PDF files ---");

        let candidates = find_pdf_candidates(dir)?;
        if candidates.is_empty() {
            println!("No PDF files found to combine.");
            return Ok(MergeOutcome::NoCandidates);
        }
        println!("Found {} PDF files to combine", candidates.len());

        // Load each candidate; an unreadable or empty one is skipped, not fatal
        let mut documents = Vec::new();
        let mut skipped = 0;
        for path in &candidates {
            println!("Adding: {}", path.display());
            match load_candidate(path) {
                Ok(doc) => documents.push(doc),
                Err(e) => {
                    skipped += 1;
                    println!("Error adding {}: {}", path.display(), e);
                }
            }
        }

        if documents.is_empty() {
            println!("No readable PDF files; nothing to combine.");
            return Ok(MergeOutcome::NoCandidates);
        }

        let output = dir.join(MERGED_FILE_NAME);
        println!("Writing combined PDF to: {}", output.display());
        let merged = documents.len();
        let pages = concatenate(documents, &output)?;

        println!("Successfully created combined PDF: {}", output.display());
        println!("Combined PDF contains content from {} files", merged);

        Ok(MergeOutcome::Merged {
            output,
            merged,
            skipped,
            pages,
        })
    }
}

/// The absent merge variant: reports the skip and leaves the extraction
/// output as the final result.
pub struct MergeUnavailable;

impl DocumentMerger for MergeUnavailable {
    fn merge(&self, _dir: &Path) -> Result<MergeOutcome> {
        println!("\nPDF merging skipped: merge capability is not available.");
        Ok(MergeOutcome::Unavailable)
    }
}

fn load_candidate(path: &Path) -> Result<Document> {
    let doc = Document::load(path)?;
    if doc.get_pages().is_empty() {
        return Err(Error::EmptyPdf(path.to_path_buf()));
    }
    Ok(doc)
}

/// Concatenate the documents, in order, into `output_path`. Returns the page
/// count of the combined document.
fn concatenate(documents: Vec<Document>, output_path: &Path) -> Result<usize> {
    // Define a starting max_id for the merged document
    let mut max_id = 1;
    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for mut doc in documents {
        // Renumber objects in this document to avoid conflicts
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        // Collect page IDs from this document
        let pages = doc.get_pages();
        page_ids.extend(pages.into_iter().map(|(_, id)| id));

        // Collect all objects from this document
        objects.extend(doc.objects);
    }

    let mut merged_doc = Document::with_version("1.5");

    // Add all collected objects FIRST, then update max_id to reflect the
    // highest object ID we just added. Otherwise new_object_id() would return
    // IDs that collide with existing objects.
    merged_doc.objects.extend(objects);
    merged_doc.max_id = max_id - 1;

    let pages_id = merged_doc.new_object_id();

    // Kids array with all page references, in input order
    let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();

    let mut pages_object = Dictionary::new();
    pages_object.set("Type", Object::Name(b"Pages".to_vec()));
    pages_object.set("Count", Object::Integer(page_ids.len() as i64));
    pages_object.set("Kids", Object::Array(kids));

    let catalog_id = merged_doc.new_object_id();
    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));

    merged_doc.objects.insert(catalog_id, Object::Dictionary(catalog));
    merged_doc.objects.insert(pages_id, Object::Dictionary(pages_object));
    merged_doc.trailer.set("Root", Object::Reference(catalog_id));

    // Re-parent every page onto the new Pages node
    for &page_id in &page_ids {
        if let Ok(Object::Dictionary(dict)) = merged_doc.get_object_mut(page_id) {
            dict.set("Parent", Object::Reference(pages_id));
        }
    }

    merged_doc.compress();
    merged_doc.save(output_path)?;

    Ok(page_ids.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_no_candidates_in_empty_directory() {
        let temp = TempDir::new().unwrap();
        let outcome = PdfConcatenator.merge(temp.path()).unwrap();
        assert_eq!(outcome, MergeOutcome::NoCandidates);
        assert!(!temp.path().join(MERGED_FILE_NAME).exists());
    }

    #[test]
    fn test_unavailable_variant_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let outcome = MergeUnavailable.merge(temp.path()).unwrap();
        assert_eq!(outcome, MergeOutcome::Unavailable);
        assert!(!temp.path().join(MERGED_FILE_NAME).exists());
    }

    #[test]
    fn test_candidate_discovery_is_recursive_case_insensitive_and_sorted() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("B.PDF"), b"x").unwrap();
        fs::write(temp.path().join("a.pdf"), b"x").unwrap();
        fs::write(temp.path().join("sub/c.pdf"), b"x").unwrap();
        fs::write(temp.path().join("notes.txt"), b"x").unwrap();

        let candidates = find_pdf_candidates(temp.path()).unwrap();
        let names: Vec<_> = candidates
            .iter()
            .map(|p| {
                p.strip_prefix(temp.path())
                    .unwrap()
                    .to_string_lossy()
                    .to_string()
            })
            .collect();
        assert_eq!(names, vec!["B.PDF", "a.pdf", "sub/c.pdf"]);
    }

    #[test]
    fn test_existing_merged_output_is_not_a_candidate() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(MERGED_FILE_NAME), b"x").unwrap();
        fs::write(temp.path().join("a.pdf"), b"x").unwrap();

        let candidates = find_pdf_candidates(temp.path()).unwrap();
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].ends_with("a.pdf"));
    }
}
