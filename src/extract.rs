//! Batch extraction of ZIP archives into one combined directory
//!
//! Every archive is validated and unpacked into the same destination, in
//! locator order. A corrupt or unreadable archive is logged and skipped;
//! it never aborts the batch. Colliding relative paths across archives
//! overwrite silently, so the last archive in sort order wins.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::error::Result;

/// Options for a batch extraction run
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Archives to extract, in order
    pub archives: Vec<PathBuf>,
    /// Shared destination directory, recreated at the start of the run
    pub dest: PathBuf,
}

/// Outcome of a batch extraction run
#[derive(Debug, Clone)]
pub struct ExtractReport {
    /// Non-directory entries written, summed over all extracted archives
    pub files_extracted: usize,
    /// Archives that validated and extracted
    pub archives_extracted: usize,
    /// Archives skipped as corrupt or unreadable
    pub archives_skipped: usize,
    /// Files found on disk by the post-extraction walk
    pub files_on_disk: usize,
}

/// Extract every archive into the shared destination.
///
/// The destination is removed if present and recreated exactly once before
/// the first archive. Per-archive failures are logged and absorbed; only the
/// destination rebuild itself can fail the whole batch.
pub fn extract_all(options: &ExtractOptions) -> Result<ExtractReport> {
    if options.dest.exists() {
        println!("Removing existing combined folder: {}", options.dest.display());
        fs::remove_dir_all(&options.dest)?;
    }
    fs::create_dir_all(&options.dest)?;
    println!("Created combined extraction directory: {}", options.dest.display());

    let mut report = ExtractReport {
        files_extracted: 0,
        archives_extracted: 0,
        archives_skipped: 0,
        files_on_disk: 0,
    };

    for archive_path in &options.archives {
        println!("\n--- Processing {} ---", archive_path.display());
        match extract_archive(archive_path, &options.dest) {
            Ok(count) => {
                report.files_extracted += count;
                report.archives_extracted += 1;
                println!("Added {} files to the combined directory", count);
            }
            Err(e) => {
                report.archives_skipped += 1;
                println!("Error extracting {}: {}", archive_path.display(), e);
                println!("Skipping this archive and continuing...");
            }
        }
    }

    // Verification walk over the combined directory
    let mut on_disk = Vec::new();
    collect_files(&options.dest, &mut on_disk)?;
    report.files_on_disk = on_disk.len();

    println!(
        "\nTotal files extracted to combined directory: {}",
        report.files_on_disk
    );
    println!("Expected files based on ZIP contents: {}", report.files_extracted);
    if !on_disk.is_empty() {
        let sample: Vec<String> = on_disk
            .iter()
            .take(5)
            .map(|p| p.display().to_string())
            .collect();
        println!("Sample of extracted files: {:?}", sample);
    }

    Ok(report)
}

/// Validate one archive and unpack it, returning the number of file entries
/// written (directories excluded).
fn extract_archive(archive_path: &Path, dest: &Path) -> Result<usize> {
    let size = fs::metadata(archive_path)?.len();
    println!("File size: {} bytes", size);

    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)?;

    // Integrity pass over every entry. Decompressing to a sink checks each
    // entry's CRC before anything is written to disk.
    verify_archive(&mut archive)?;
    println!("ZIP file is valid");

    println!("ZIP contains {} files/folders", archive.len());
    let preview: Vec<String> = archive
        .file_names()
        .take(3)
        .map(|name| name.to_string())
        .collect();
    if !preview.is_empty() {
        println!("First few files in ZIP: {:?}", preview);
    }

    println!("Extracting to combined directory: {}", dest.display());
    let mut extracted = 0;
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;

        // Entries whose paths escape the destination are blocked
        let Some(relative) = entry.enclosed_name() else {
            println!("Blocked unsafe path in archive: {}", entry.name());
            continue;
        };
        let out_path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        // File::create truncates, so a colliding path from an earlier
        // archive is overwritten silently
        let mut out_file = File::create(&out_path)?;
        io::copy(&mut entry, &mut out_file)?;
        extracted += 1;
    }
    println!("Extraction completed");

    Ok(extracted)
}

/// Read every entry to a sink so the ZIP reader checks the CRCs.
fn verify_archive<R: io::Read + io::Seek>(archive: &mut ZipArchive<R>) -> Result<()> {
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        io::copy(&mut entry, &mut io::sink())?;
    }
    Ok(())
}

/// Recursively collect the files (not directories) under `dir`, sorted by
/// full path.
pub fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<io::Result<_>>()?;
    entries.sort_by_key(|entry| entry.path());

    for entry in entries {
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_files(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut writer = ZipWriter::new(file);
        for (name, content) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, SimpleFileOptions::default()).unwrap();
            } else {
                writer.start_file(*name, SimpleFileOptions::default()).unwrap();
                writer.write_all(content).unwrap();
            }
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_extract_counts_files_not_directories() {
        let temp = TempDir::new().unwrap();
        let zip_path = temp.path().join("a.zip");
        write_zip(
            &zip_path,
            &[
                ("docs/", b""),
                ("docs/one.txt", b"one"),
                ("docs/two.txt", b"two"),
            ],
        );

        let options = ExtractOptions {
            archives: vec![zip_path],
            dest: temp.path().join("combined_extraction"),
        };
        let report = extract_all(&options).unwrap();

        assert_eq!(report.files_extracted, 2);
        assert_eq!(report.files_on_disk, 2);
        assert_eq!(report.archives_extracted, 1);
        assert_eq!(report.archives_skipped, 0);
        assert_eq!(
            fs::read(options.dest.join("docs/one.txt")).unwrap(),
            b"one"
        );
    }

    #[test]
    fn test_destination_is_rebuilt_each_run() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("combined_extraction");
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("stale.txt"), b"from a previous run").unwrap();

        let zip_path = temp.path().join("a.zip");
        write_zip(&zip_path, &[("fresh.txt", b"fresh")]);

        let options = ExtractOptions {
            archives: vec![zip_path],
            dest: dest.clone(),
        };
        extract_all(&options).unwrap();

        assert!(!dest.join("stale.txt").exists());
        assert!(dest.join("fresh.txt").exists());
    }

    #[test]
    fn test_later_archive_wins_on_collision() {
        let temp = TempDir::new().unwrap();
        let first = temp.path().join("a.zip");
        let second = temp.path().join("b.zip");
        write_zip(&first, &[("shared.txt", b"from a")]);
        write_zip(&second, &[("shared.txt", b"from b")]);

        let options = ExtractOptions {
            archives: vec![first, second],
            dest: temp.path().join("combined_extraction"),
        };
        extract_all(&options).unwrap();

        assert_eq!(
            fs::read(options.dest.join("shared.txt")).unwrap(),
            b"from b"
        );
    }

    #[test]
    fn test_corrupt_archive_is_skipped_not_fatal() {
        let temp = TempDir::new().unwrap();
        let good = temp.path().join("a.zip");
        let bad = temp.path().join("b.zip");
        let also_good = temp.path().join("c.zip");
        write_zip(&good, &[("a.txt", b"a")]);
        fs::write(&bad, b"this is not a zip archive").unwrap();
        write_zip(&also_good, &[("c.txt", b"c")]);

        let options = ExtractOptions {
            archives: vec![good, bad, also_good],
            dest: temp.path().join("combined_extraction"),
        };
        let report = extract_all(&options).unwrap();

        assert_eq!(report.archives_extracted, 2);
        assert_eq!(report.archives_skipped, 1);
        assert!(options.dest.join("a.txt").exists());
        assert!(options.dest.join("c.txt").exists());
    }

    #[test]
    fn test_truncated_archive_is_skipped() {
        let temp = TempDir::new().unwrap();
        let good = temp.path().join("a.zip");
        let truncated = temp.path().join("b.zip");
        write_zip(&good, &[("a.txt", b"a")]);
        write_zip(&truncated, &[("b.txt", b"some content to truncate")]);

        // Chop the tail off so the central directory is gone
        let bytes = fs::read(&truncated).unwrap();
        fs::write(&truncated, &bytes[..bytes.len() / 2]).unwrap();

        let options = ExtractOptions {
            archives: vec![good.clone(), truncated],
            dest: temp.path().join("combined_extraction"),
        };
        let report = extract_all(&options).unwrap();

        assert_eq!(report.archives_extracted, 1);
        assert_eq!(report.archives_skipped, 1);
        assert!(options.dest.join("a.txt").exists());
        assert!(!options.dest.join("b.txt").exists());
    }

    #[test]
    fn test_collect_files_is_recursive_and_sorted() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("b")).unwrap();
        fs::write(temp.path().join("b/inner.txt"), b"i").unwrap();
        fs::write(temp.path().join("a.txt"), b"a").unwrap();
        fs::write(temp.path().join("c.txt"), b"c").unwrap();

        let mut files = Vec::new();
        collect_files(temp.path(), &mut files).unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(temp.path()).unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.txt", "b/inner.txt", "c.txt"]);
    }
}
