//! Reads the download layout back to report what landed on disk.

use std::fs;
use std::io;
use std::path::Path;

const COUNTED_EXTENSION: &str = "xml";

/// One filing directory and the number of `*.xml` files directly inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingSummary {
    pub filing_id: String,
    pub xml_files: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// The form directory does not exist.
    Missing,
    /// Filing directories sorted by name; may be empty.
    Filings(Vec<FilingSummary>),
}

/// Lists the filing directories under `form_dir`.
///
/// A missing `form_dir` is reported as [`Listing::Missing`] rather than an
/// error. Plain files next to the filing directories are ignored.
pub fn summarize(form_dir: &Path) -> io::Result<Listing> {
    let entries = match fs::read_dir(form_dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Listing::Missing),
        Err(err) => return Err(err),
    };

    let mut filings = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        filings.push(FilingSummary {
            filing_id: entry.file_name().to_string_lossy().into_owned(),
            xml_files: count_xml_files(&entry.path())?,
        });
    }
    filings.sort_by(|a, b| a.filing_id.cmp(&b.filing_id));

    Ok(Listing::Filings(filings))
}

/// Counts regular files named `*.xml` (case-sensitive), without recursing.
pub fn count_xml_files(dir: &Path) -> io::Result<usize> {
    let mut count = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == COUNTED_EXTENSION) {
            count += 1;
        }
    }
    Ok(count)
}
