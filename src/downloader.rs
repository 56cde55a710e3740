//! Writes filings to disk in the `sec-edgar-filings` layout.
//!
//! ```text
//! <root>/sec-edgar-filings/<TICKER>/<FORM>/<accession-number>/
//!     full-submission.txt
//!     primary-document.htm
//!     <ticker>-<period>.xsd, <ticker>-<period>_htm.xml, ...
//! ```
//!
//! Only the full submission is mandatory. The primary document and the XBRL
//! instance and schema files are fetched on a best-effort basis.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use super::Edgar;
use super::error::Result;
use super::filings::DetailedFiling;
use super::options::FilingOptions;
use super::traits::{CompanyOperations, FilingOperations, FilingRetriever};

pub const DEFAULT_NAMESPACE: &str = "sec-edgar-filings";
pub const FULL_SUBMISSION_FILENAME: &str = "full-submission.txt";
const PRIMARY_DOCUMENT_STEM: &str = "primary-document";
const FINANCIAL_DATA_EXTENSIONS: &[&str] = &["xml", "xsd"];

/// Directory holding every filing of `form_type` for `ticker`.
pub fn filing_root(root: &Path, namespace: &str, ticker: &str, form_type: &str) -> PathBuf {
    root.join(namespace)
        .join(ticker)
        .join(form_type.replace('/', "-"))
}

/// Whether a document from a filing folder is an XBRL instance or schema file.
pub fn is_financial_data_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            FINANCIAL_DATA_EXTENSIONS
                .iter()
                .any(|wanted| ext.eq_ignore_ascii_case(wanted))
        })
}

/// Rejects listing entries that would escape the filing directory.
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}

fn primary_document_name(document: &str) -> String {
    let extension = Path::new(document)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("html");
    format!("{PRIMARY_DOCUMENT_STEM}.{extension}")
}

#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// Also fetch amendments (`10-K/A` when `10-K` is requested).
    pub include_amends: bool,
    /// Also fetch the primary document of each filing.
    pub download_details: bool,
    pub after: Option<NaiveDate>,
    pub before: Option<NaiveDate>,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            include_amends: false,
            download_details: true,
            after: None,
            before: None,
        }
    }
}

impl DownloadOptions {
    fn filing_options(&self, form_type: &str, limit: usize) -> FilingOptions {
        let mut opts = FilingOptions::new()
            .with_form_type(form_type)
            .with_include_amendments(self.include_amends)
            .with_limit(limit);
        if let Some(after) = self.after {
            opts = opts.with_filed_after(after);
        }
        if let Some(before) = self.before {
            opts = opts.with_filed_before(before);
        }
        opts
    }
}

/// Filing retriever backed by the EDGAR client.
///
/// ```ignore
/// use xbrl_fetch::{Downloader, Edgar, FilingRetriever};
///
/// let edgar = Edgar::new("FinancialAnalysisCLI user@example.com")?;
/// let downloader = Downloader::new(edgar, "data/xbrl");
/// let saved = downloader.retrieve("10-K", "AAPL", 5).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Downloader {
    edgar: Edgar,
    root: PathBuf,
    namespace: String,
    options: DownloadOptions,
}

impl Downloader {
    pub fn new(edgar: Edgar, root: impl Into<PathBuf>) -> Self {
        Self {
            edgar,
            root: root.into(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            options: DownloadOptions::default(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_options(mut self, options: DownloadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn filing_dir(&self, ticker: &str, form_type: &str, accession_number: &str) -> PathBuf {
        filing_root(&self.root, &self.namespace, ticker, form_type).join(accession_number)
    }

    /// All-digit input is already a CIK; anything else goes through the ticker map.
    async fn resolve_cik(&self, ticker: &str) -> Result<u64> {
        let ticker = ticker.trim();
        if !ticker.is_empty() && ticker.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(cik) = ticker.parse::<u64>() {
                return Ok(cik);
            }
        }
        self.edgar.company_cik(ticker).await
    }

    async fn save_filing(
        &self,
        cik: &str,
        ticker: &str,
        form_type: &str,
        filing: &DetailedFiling,
    ) -> Result<PathBuf> {
        let dir = self.filing_dir(ticker, form_type, &filing.accession_number);
        tokio::fs::create_dir_all(&dir).await?;

        let url = self.edgar.text_filing_url(cik, &filing.accession_number);
        self.edgar
            .download(&url, &dir.join(FULL_SUBMISSION_FILENAME))
            .await?;

        if self.options.download_details {
            if let Some(document) = &filing.primary_document {
                let url = self
                    .edgar
                    .filing_url(cik, &filing.accession_number, document);
                let dest = dir.join(primary_document_name(document));
                if let Err(err) = self.edgar.download(&url, &dest).await {
                    tracing::warn!(
                        "Could not fetch primary document {} of {}: {}",
                        document,
                        filing.accession_number,
                        err
                    );
                }
            }
        }

        let saved = self.save_financial_data(cik, filing, &dir).await;
        tracing::info!(
            "Saved {} {} filed {} with {} financial data file(s)",
            filing.form,
            filing.accession_number,
            filing.filing_date,
            saved
        );

        Ok(dir)
    }

    /// Downloads the `.xml`/`.xsd` documents listed in the filing folder and
    /// returns how many were written.
    async fn save_financial_data(&self, cik: &str, filing: &DetailedFiling, dir: &Path) -> usize {
        let listing = match self
            .edgar
            .filing_directory(cik, &filing.accession_number)
            .await
        {
            Ok(listing) => listing,
            Err(err) => {
                tracing::warn!(
                    "Could not list documents of {}: {}",
                    filing.accession_number,
                    err
                );
                return 0;
            }
        };

        let mut saved = 0;
        for item in &listing.directory.item {
            if !is_financial_data_file(&item.name) {
                continue;
            }
            if !is_plain_file_name(&item.name) {
                tracing::warn!("Skipping suspicious file name {:?}", item.name);
                continue;
            }

            let url = self
                .edgar
                .filing_url(cik, &filing.accession_number, &item.name);
            match self.edgar.download(&url, &dir.join(&item.name)).await {
                Ok(_) => saved += 1,
                Err(err) => tracing::warn!("Could not fetch {}: {}", item.name, err),
            }
        }
        saved
    }
}

#[async_trait]
impl FilingRetriever for Downloader {
    /// Resolves `ticker`, lists up to `limit` filings of `form_type` and saves
    /// each one. Filings are fetched one after another.
    ///
    /// # Errors
    ///
    /// * `EdgarError::TickerNotFound` - The ticker is not in the SEC ticker map.
    /// * `EdgarError::NotFound` - No submissions exist for the resolved CIK.
    /// * Any network or file error while saving a full submission.
    async fn retrieve(&self, form_type: &str, ticker: &str, limit: usize) -> Result<usize> {
        let cik = self.resolve_cik(ticker).await?.to_string();
        tracing::debug!("Resolved {} to CIK {}", ticker, cik);

        let opts = self.options.filing_options(form_type, limit);
        let filings = self.edgar.filings(&cik, Some(opts)).await?;
        if filings.is_empty() {
            tracing::info!("No {} filings matched for {}", form_type, ticker);
            return Ok(0);
        }

        let mut saved = 0;
        for filing in &filings {
            self.save_filing(&cik, ticker, form_type, filing).await?;
            saved += 1;
        }
        Ok(saved)
    }
}
