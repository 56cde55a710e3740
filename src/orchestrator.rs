//! The download-then-report flow behind the `download-xbrl` binary.

use std::io::{self, Write};
use std::path::PathBuf;

use super::config::AppConfig;
use super::downloader::filing_root;
use super::summary::{self, Listing};
use super::traits::FilingRetriever;

/// What the user asked for, with the ticker already normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub ticker: String,
    pub limit: usize,
    pub output_dir: PathBuf,
}

impl DownloadRequest {
    pub fn new(ticker: &str, limit: usize, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            ticker: ticker.to_uppercase(),
            limit,
            output_dir: output_dir.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Downloaded { count: usize, listing: Listing },
    Failed { message: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Downloaded { .. })
    }

    pub fn exit_code(&self) -> u8 {
        if self.is_success() { 0 } else { 1 }
    }
}

pub struct Orchestrator<R> {
    config: AppConfig,
    retriever: R,
}

impl<R: FilingRetriever> Orchestrator<R> {
    pub fn new(config: AppConfig, retriever: R) -> Self {
        Self { config, retriever }
    }

    /// Runs one retrieval and writes the report.
    ///
    /// Progress and the summary go to `out`; a retrieval failure is written to
    /// `err` and returned as [`Outcome::Failed`]. The only `Err` this returns is
    /// a failure to write the report itself.
    pub async fn run<O, E>(
        &self,
        request: &DownloadRequest,
        out: &mut O,
        err: &mut E,
    ) -> io::Result<Outcome>
    where
        O: Write,
        E: Write,
    {
        let form_type = self.config.form_type.as_str();

        writeln!(out, "Downloading XBRL files for {}...", request.ticker)?;
        writeln!(out, "Number of filings to download: {}", request.limit)?;
        writeln!(out, "Download directory: {}", request.output_dir.display())?;
        writeln!(out)?;
        out.flush()?;

        let count = match self
            .retriever
            .retrieve(form_type, &request.ticker, request.limit)
            .await
        {
            Ok(count) => count,
            Err(e) => {
                tracing::debug!("Retrieval for {} failed: {:?}", request.ticker, e);
                writeln!(err, "\n✗ Error downloading filings: {e}")?;
                return Ok(Outcome::Failed {
                    message: e.to_string(),
                });
            }
        };

        let form_dir = filing_root(
            &request.output_dir,
            &self.config.namespace,
            &request.ticker,
            form_type,
        );

        writeln!(
            out,
            "\n✓ Successfully downloaded {count} {form_type} filing(s) for {}",
            request.ticker
        )?;
        if count == 0 {
            writeln!(
                out,
                "No {form_type} filings were available for {}.",
                request.ticker
            )?;
        }
        writeln!(out, "\nFiles saved to: {}/", form_dir.display())?;
        writeln!(out, "\nEach filing directory contains:")?;
        writeln!(out, "  - full-submission.txt (complete filing)")?;
        writeln!(out, "  - Financial data files (*.xml, *.xsd)")?;
        writeln!(out, "  - HTML rendering files")?;

        let listing = match summary::summarize(&form_dir) {
            Ok(listing) => listing,
            Err(e) => {
                tracing::warn!("Could not read {}: {}", form_dir.display(), e);
                writeln!(out, "\nNote: could not read {}: {e}", form_dir.display())?;
                return Ok(Outcome::Downloaded {
                    count,
                    listing: Listing::Missing,
                });
            }
        };

        match &listing {
            Listing::Filings(filings) if !filings.is_empty() => {
                writeln!(out, "\nDownloaded filings:")?;
                for filing in filings {
                    writeln!(
                        out,
                        "  - {} ({} XML files)",
                        filing.filing_id, filing.xml_files
                    )?;
                }
            }
            Listing::Missing if count > 0 => {
                tracing::warn!(
                    "{} filing(s) reported but {} does not exist",
                    count,
                    form_dir.display()
                );
                writeln!(
                    out,
                    "\nNote: expected directory {} was not found.",
                    form_dir.display()
                )?;
            }
            _ => {}
        }

        Ok(Outcome::Downloaded { count, listing })
    }
}
