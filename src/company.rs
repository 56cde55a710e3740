//! Ticker to CIK resolution.
//!
//! Every EDGAR filing endpoint is keyed by CIK, so a ticker has to be looked up
//! in the SEC's `company_tickers.json` map first.

use super::CompanyOperations;
use super::Edgar;
use super::error::{EdgarError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mapping between a stock ticker symbol and a company CIK.
///
/// A company listed on several exchanges appears once per ticker.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompanyTicker {
    #[serde(rename = "cik_str")]
    pub cik: u64,
    pub ticker: String,
    pub title: String,
}

/// Parses the ticker map, which is served as an object keyed by row number
/// (`{"0": {...}, "1": {...}}`) rather than an array.
pub fn parse_company_tickers(json: &str) -> Result<Vec<CompanyTicker>> {
    let map: HashMap<String, CompanyTicker> = serde_json::from_str(json)?;
    let mut tickers: Vec<(usize, CompanyTicker)> = map
        .into_iter()
        .map(|(key, ticker)| (key.parse().unwrap_or(usize::MAX), ticker))
        .collect();
    tickers.sort_by_key(|(row, _)| *row);
    Ok(tickers.into_iter().map(|(_, ticker)| ticker).collect())
}

/// Finds the CIK for `ticker`, ignoring case and surrounding whitespace.
pub fn find_cik(tickers: &[CompanyTicker], ticker: &str) -> Result<u64> {
    let wanted = ticker.trim().to_uppercase();
    tickers
        .iter()
        .find(|t| t.ticker.eq_ignore_ascii_case(&wanted))
        .map(|t| t.cik)
        .ok_or(EdgarError::TickerNotFound(wanted))
}

#[async_trait]
impl CompanyOperations for Edgar {
    /// Retrieves every ticker known to EDGAR, in the order SEC.gov lists them.
    ///
    /// # Errors
    ///
    /// * `EdgarError::RequestError` - The request failed or the body could not be read.
    /// * `EdgarError::JsonError` - The ticker map did not have the expected shape.
    async fn company_tickers(&self) -> Result<Vec<CompanyTicker>> {
        let url = format!("{}/company_tickers.json", self.edgar_files_url);
        let response = self.get(&url).await?;
        parse_company_tickers(&response)
    }

    /// Resolves a ticker symbol to its CIK.
    ///
    /// # Errors
    ///
    /// Returns `EdgarError::TickerNotFound` if the symbol is not in the ticker map.
    async fn company_cik(&self, ticker: &str) -> Result<u64> {
        let tickers = self.company_tickers().await?;
        find_cik(&tickers, ticker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICKERS: &str = r#"{
        "0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."},
        "1": {"cik_str": 100517, "ticker": "UAL", "title": "United Airlines Holdings, Inc."},
        "2": {"cik_str": 1045810, "ticker": "NVDA", "title": "NVIDIA CORP"}
    }"#;

    #[test]
    fn parses_keyed_object_in_row_order() {
        let tickers = parse_company_tickers(TICKERS).unwrap();
        assert_eq!(tickers.len(), 3);
        assert_eq!(tickers[0].ticker, "AAPL");
        assert_eq!(tickers[1].title, "United Airlines Holdings, Inc.");
        assert_eq!(tickers[2].cik, 1045810);
    }

    #[test]
    fn lookup_ignores_case() {
        let tickers = parse_company_tickers(TICKERS).unwrap();
        assert_eq!(find_cik(&tickers, "ual").unwrap(), 100517);
        assert_eq!(find_cik(&tickers, " AAPL ").unwrap(), 320193);
    }

    #[test]
    fn unknown_ticker() {
        let tickers = parse_company_tickers(TICKERS).unwrap();
        match find_cik(&tickers, "zzzz") {
            Err(EdgarError::TickerNotFound(ticker)) => assert_eq!(ticker, "ZZZZ"),
            other => panic!("expected TickerNotFound, got {other:?}"),
        }
    }
}
