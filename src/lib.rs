//! # xbrl-fetch - download SEC EDGAR 10-K filings for a ticker
//!
//! The crate pairs a small, rate-limited client for the SEC EDGAR system with a
//! downloader that stores each filing in a fixed directory layout, and the
//! command-line flow that reports what was written.
//!
//! ## Features
//!
//! - **Rate-limited HTTP client** - Complies with SEC.gov fair access rules
//! - **Ticker resolution** - Maps ticker symbols to CIKs via the SEC ticker map
//! - **Filing listing** - Reads the submissions API, including paged history
//! - **Filing download** - Full submission, primary document, XBRL `.xml`/`.xsd` files
//! - **Summary** - Counts the XML files of every filing on disk
//!
//! ## Basic Usage
//!
//! ```ignore
//! use xbrl_fetch::{AppConfig, DownloadRequest, Downloader, Edgar, Orchestrator};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::default();
//!     let edgar = Edgar::with_config(config.edgar_config())?;
//!     let request = DownloadRequest::new("aapl", 5, "data/xbrl");
//!
//!     let downloader = Downloader::new(edgar, &request.output_dir);
//!     let outcome = Orchestrator::new(config, downloader)
//!         .run(&request, &mut std::io::stdout(), &mut std::io::stderr())
//!         .await?;
//!
//!     std::process::exit(outcome.exit_code().into());
//! }
//! ```

mod company;
mod config;
mod core;
mod downloader;
mod error;
mod filings;
mod options;
mod orchestrator;
mod traits;

pub mod cli;
pub mod summary;

pub use company::{CompanyTicker, find_cik, parse_company_tickers};
pub use config::{AppConfig, EdgarConfig, EdgarUrls};
pub use self::core::Edgar;
pub use downloader::{
    DEFAULT_NAMESPACE, DownloadOptions, Downloader, FULL_SUBMISSION_FILENAME, filing_root,
    is_financial_data_file,
};
pub use error::{EdgarError, Result};
pub use filings::{
    DetailedFiling, Directory, DirectoryItem, DirectoryResponse, FilingFile, FilingsData,
    RecentFilings, Submission,
};
pub use options::FilingOptions;
pub use orchestrator::{DownloadRequest, Orchestrator, Outcome};
pub use summary::{FilingSummary, Listing};
pub use traits::{CompanyOperations, FilingOperations, FilingRetriever};

/// Current crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
