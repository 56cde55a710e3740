//! Trait definitions for the EDGAR operations and the retrieval boundary.
//!
//! `Edgar` implements the company and filing traits. `FilingRetriever` is the
//! seam between the command-line orchestrator and whatever actually fetches
//! filings; the binary plugs in [`Downloader`](crate::Downloader) and tests plug
//! in a stub.

use super::company::CompanyTicker;
use super::error::Result;
use super::filings::{DetailedFiling, DirectoryResponse, RecentFilings, Submission};
use super::options::FilingOptions;
use async_trait::async_trait;

/// Operations for resolving company identifiers.
#[async_trait]
pub trait CompanyOperations {
    /// Retrieves a list of all company tickers from EDGAR.
    async fn company_tickers(&self) -> Result<Vec<CompanyTicker>>;
    /// Retrieves the Central Index Key (CIK) for a given company ticker symbol.
    async fn company_cik(&self, ticker: &str) -> Result<u64>;
}

/// Operations for listing a company's filings and locating their documents.
#[async_trait]
pub trait FilingOperations {
    /// Retrieves the submission history for a company identified by CIK.
    async fn submissions(&self, cik: &str) -> Result<Submission>;
    /// Retrieves one paged archive of older filings by its file name.
    async fn submission_page(&self, name: &str) -> Result<RecentFilings>;
    /// Retrieves a filtered list of filings for a company, newest first.
    async fn filings(&self, cik: &str, opts: Option<FilingOptions>) -> Result<Vec<DetailedFiling>>;
    /// Retrieves the file listing of a single filing's archive folder.
    async fn filing_directory(
        &self,
        cik: &str,
        accession_number: &str,
    ) -> Result<DirectoryResponse>;
    /// URL of a named document inside a filing's folder.
    fn filing_url(&self, cik: &str, accession_number: &str, filename: &str) -> String;
    /// URL of the complete submission text file.
    fn text_filing_url(&self, cik: &str, accession_number: &str) -> String;
}

/// Fetches filings of one form type for a ticker and stores them on disk.
///
/// Implementations decide where files land; the return value is the number of
/// filings written, which may be lower than `limit` when fewer exist.
#[async_trait]
pub trait FilingRetriever {
    async fn retrieve(&self, form_type: &str, ticker: &str, limit: usize) -> Result<usize>;
}
