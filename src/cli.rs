use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

use super::config::AppConfig;
use super::downloader::DownloadOptions;
use super::orchestrator::DownloadRequest;

/// Download XBRL files from SEC EDGAR for financial analysis
#[derive(Debug, Parser)]
#[command(name = "download-xbrl", version, about)]
pub struct Args {
    /// Company ticker symbol (e.g., AAPL, UAL)
    pub ticker: String,

    /// Number of years to download (default: 5)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub years: Option<u32>,

    /// Download directory (default: data/xbrl)
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Also download amended filings (10-K/A)
    #[arg(long)]
    pub include_amends: bool,

    /// Only filings filed on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub after: Option<NaiveDate>,

    /// Only filings filed on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub before: Option<NaiveDate>,

    /// Skip the primary document of each filing
    #[arg(long)]
    pub no_details: bool,

    /// Application name sent to SEC.gov in the User-Agent
    #[arg(long, env = "EDGAR_COMPANY_NAME")]
    pub company_name: Option<String>,

    /// Contact email sent to SEC.gov in the User-Agent
    #[arg(long, env = "EDGAR_EMAIL")]
    pub email: Option<String>,
}

impl Args {
    /// The request, with `--years` and `--dir` falling back to `config`.
    pub fn request(&self, config: &AppConfig) -> DownloadRequest {
        let limit = self
            .years
            .map_or(config.default_limit, |years| years as usize);
        let output_dir = self
            .dir
            .clone()
            .unwrap_or_else(|| config.download_dir.clone());
        DownloadRequest::new(&self.ticker, limit, output_dir)
    }

    pub fn download_options(&self) -> DownloadOptions {
        DownloadOptions {
            include_amends: self.include_amends,
            download_details: !self.no_details,
            after: self.after,
            before: self.before,
        }
    }

    /// Defaults with any identity overrides applied.
    pub fn app_config(&self) -> AppConfig {
        let mut config = AppConfig::default();
        if let Some(name) = &self.company_name {
            config.company_name = name.clone();
        }
        if let Some(email) = &self.email {
            config.email = email.clone();
        }
        config
    }
}
