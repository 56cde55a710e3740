//! Submission history and filing folder endpoints.
//!
//! The submissions API returns a company's filings as a columnar table: one
//! array per attribute, all indexed by the same row. `recent` holds roughly the
//! last thousand filings; older ones live in paged archives listed under
//! `files`, fetched only when the recent table cannot satisfy a request.

use super::Edgar;
use super::error::{EdgarError, Result};
use super::options::FilingOptions;
use super::traits::FilingOperations;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Submission {
    pub cik: String,
    #[serde(rename = "entityType", default)]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub sic: Option<String>,
    #[serde(rename = "sicDescription", default)]
    pub sic_description: Option<String>,
    pub name: String,
    #[serde(default)]
    pub tickers: Vec<String>,
    #[serde(default)]
    pub exchanges: Vec<String>,
    #[serde(rename = "fiscalYearEnd", default)]
    pub fiscal_year_end: Option<String>,
    pub filings: FilingsData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilingsData {
    pub recent: RecentFilings,
    #[serde(default)]
    pub files: Vec<FilingFile>,
}

/// One paged archive of older filings.
#[derive(Debug, Clone, Deserialize)]
pub struct FilingFile {
    pub name: String,
    #[serde(rename = "filingCount")]
    pub filing_count: u64,
    #[serde(rename = "filingFrom")]
    pub filing_from: String,
    #[serde(rename = "filingTo")]
    pub filing_to: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentFilings {
    #[serde(rename = "accessionNumber")]
    pub accession_number: Vec<String>,
    #[serde(rename = "filingDate")]
    pub filing_date: Vec<String>,
    #[serde(rename = "reportDate")]
    pub report_date: Option<Vec<String>>,
    #[serde(rename = "acceptanceDateTime")]
    pub acceptance_date_time: Vec<String>,
    pub form: Vec<String>,
    pub size: Vec<i64>,
    #[serde(rename = "isXBRL")]
    pub is_xbrl: Option<Vec<i32>>,
    #[serde(rename = "isInlineXBRL")]
    pub is_inline_xbrl: Option<Vec<i32>>,
    #[serde(rename = "primaryDocument")]
    pub primary_document: Option<Vec<String>>,
    #[serde(rename = "primaryDocDescription")]
    pub primary_doc_description: Option<Vec<String>>,
}

/// A single row of [`RecentFilings`].
#[derive(Debug, Clone)]
pub struct DetailedFiling {
    pub accession_number: String,
    pub filing_date: String,
    pub report_date: Option<String>,
    pub acceptance_date_time: DateTime<FixedOffset>,
    pub form: String,
    pub size: i64,
    pub is_xbrl: bool,
    pub is_inline_xbrl: bool,
    pub primary_document: Option<String>,
    pub primary_doc_description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryResponse {
    pub directory: Directory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Directory {
    pub item: Vec<DirectoryItem>,
    pub name: String,
    #[serde(rename = "parent-dir")]
    pub parent_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryItem {
    #[serde(rename = "last-modified")]
    pub last_modified: String,
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub size: String,
}

impl RecentFilings {
    pub fn len(&self) -> usize {
        self.accession_number.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accession_number.is_empty()
    }

    /// Converts every well-formed row, newest first as served by SEC.gov.
    /// Rows with missing columns or a bad acceptance timestamp are skipped.
    pub fn to_filings(&self) -> Vec<DetailedFiling> {
        (0..self.len())
            .filter_map(|idx| match DetailedFiling::try_from((self, idx)) {
                Ok(filing) => Some(filing),
                Err(err) => {
                    tracing::warn!("Skipping submission row {}: {}", idx, err);
                    None
                }
            })
            .collect()
    }

    fn optional_at<T: Clone>(column: &Option<Vec<T>>, idx: usize) -> Option<T> {
        column.as_ref().and_then(|v| v.get(idx).cloned())
    }

    fn flag_at(column: &Option<Vec<i32>>, idx: usize) -> bool {
        column
            .as_ref()
            .and_then(|v| v.get(idx))
            .is_some_and(|flag| *flag == 1)
    }
}

fn required_at<'a, T>(column: &'a [T], name: &str, idx: usize) -> Result<&'a T> {
    column
        .get(idx)
        .ok_or_else(|| EdgarError::InvalidResponse(format!("Column {name} has no row {idx}")))
}

impl TryFrom<(&RecentFilings, usize)> for DetailedFiling {
    type Error = EdgarError;

    fn try_from((recent, idx): (&RecentFilings, usize)) -> Result<Self> {
        let accepted = required_at(&recent.acceptance_date_time, "acceptanceDateTime", idx)?;
        let acceptance_date_time = DateTime::parse_from_rfc3339(accepted).map_err(|e| {
            EdgarError::InvalidResponse(format!("Bad acceptance time {accepted:?}: {e}"))
        })?;

        Ok(DetailedFiling {
            accession_number: required_at(&recent.accession_number, "accessionNumber", idx)?
                .clone(),
            filing_date: required_at(&recent.filing_date, "filingDate", idx)?.clone(),
            report_date: RecentFilings::optional_at(&recent.report_date, idx),
            acceptance_date_time,
            form: required_at(&recent.form, "form", idx)?.clone(),
            size: *required_at(&recent.size, "size", idx)?,
            is_xbrl: RecentFilings::flag_at(&recent.is_xbrl, idx),
            is_inline_xbrl: RecentFilings::flag_at(&recent.is_inline_xbrl, idx),
            primary_document: RecentFilings::optional_at(&recent.primary_document, idx)
                .filter(|doc| !doc.is_empty()),
            primary_doc_description: RecentFilings::optional_at(
                &recent.primary_doc_description,
                idx,
            ),
        })
    }
}

#[derive(Debug)]
enum UrlType {
    Submission,
    SubmissionPage,
    FilingDirectory,
    FilingContent,
    TextFiling,
}

impl Edgar {
    fn build_url(&self, url_type: UrlType, params: &[&str]) -> String {
        match url_type {
            UrlType::Submission => {
                let cik = format!("{:0>10}", params[0]);
                format!("{}/submissions/CIK{}.json", self.edgar_data_url, cik)
            }
            UrlType::SubmissionPage => {
                format!("{}/submissions/{}", self.edgar_data_url, params[0])
            }
            UrlType::FilingDirectory => {
                let (cik, acc_no) = (params[0], params[1]);
                format!(
                    "{}/data/{}/{}/index.json",
                    self.edgar_archives_url,
                    cik,
                    acc_no.replace('-', "")
                )
            }
            UrlType::FilingContent => {
                let (cik, acc_no, filename) = (params[0], params[1], params[2]);
                format!(
                    "{}/data/{}/{}/{}",
                    self.edgar_archives_url,
                    cik,
                    acc_no.replace('-', ""),
                    filename
                )
            }
            // /Archives/edgar/data/CIK/ACC_NO_NO_DASHES/ACC_NO_WITH_DASHES.txt
            UrlType::TextFiling => {
                let (cik, acc_no) = (params[0], params[1]);
                format!(
                    "{}/data/{}/{}/{}.txt",
                    self.edgar_archives_url,
                    cik,
                    acc_no.replace('-', ""),
                    acc_no
                )
            }
        }
    }
}

#[async_trait]
impl FilingOperations for Edgar {
    /// Fetches the submission history for `cik` (padded to ten digits).
    ///
    /// # Errors
    ///
    /// * `EdgarError::NotFound` - No company is registered under this CIK.
    /// * `EdgarError::JsonError` - The response does not match the submissions schema.
    async fn submissions(&self, cik: &str) -> Result<Submission> {
        let url = self.build_url(UrlType::Submission, &[cik]);
        let response = self.get(&url).await?;
        Ok(serde_json::from_str::<Submission>(&response)?)
    }

    async fn submission_page(&self, name: &str) -> Result<RecentFilings> {
        let url = self.build_url(UrlType::SubmissionPage, &[name]);
        let response = self.get(&url).await?;
        Ok(serde_json::from_str::<RecentFilings>(&response)?)
    }

    /// Lists a company's filings, newest first, filtered by `opts`.
    ///
    /// The recent table is always read. Paged archives are only fetched while
    /// fewer than `offset + limit` matching filings have been collected, so an
    /// unlimited request walks the whole history.
    async fn filings(&self, cik: &str, opts: Option<FilingOptions>) -> Result<Vec<DetailedFiling>> {
        let opts = opts.unwrap_or_default();
        let wanted = opts.wanted();
        let submission = self.submissions(cik).await?;

        let mut matched: Vec<DetailedFiling> = submission
            .filings
            .recent
            .to_filings()
            .into_iter()
            .filter(|filing| opts.matches(filing))
            .collect();

        for page in &submission.filings.files {
            if wanted.is_some_and(|wanted| matched.len() >= wanted) {
                break;
            }
            tracing::debug!(
                "Reading older filings from {} ({} filings, {} to {})",
                page.name,
                page.filing_count,
                page.filing_from,
                page.filing_to
            );
            let older = self.submission_page(&page.name).await?;
            matched.extend(
                older
                    .to_filings()
                    .into_iter()
                    .filter(|filing| opts.matches(filing)),
            );
        }

        Ok(opts.paginate(matched))
    }

    /// Lists the files in one filing's archive folder.
    async fn filing_directory(
        &self,
        cik: &str,
        accession_number: &str,
    ) -> Result<DirectoryResponse> {
        let url = self.build_url(UrlType::FilingDirectory, &[cik, accession_number]);
        let response = self.get(&url).await?;
        Ok(serde_json::from_str::<DirectoryResponse>(&response)?)
    }

    fn filing_url(&self, cik: &str, accession_number: &str, filename: &str) -> String {
        self.build_url(UrlType::FilingContent, &[cik, accession_number, filename])
    }

    fn text_filing_url(&self, cik: &str, accession_number: &str) -> String {
        self.build_url(UrlType::TextFiling, &[cik, accession_number])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edgar() -> Edgar {
        Edgar::new("test_agent example@example.com").unwrap()
    }

    fn recent(rows: &[(&str, &str, &str)]) -> RecentFilings {
        RecentFilings {
            accession_number: rows.iter().map(|r| r.0.to_string()).collect(),
            filing_date: rows.iter().map(|r| r.1.to_string()).collect(),
            report_date: None,
            acceptance_date_time: rows
                .iter()
                .map(|r| format!("{}T16:30:00.000Z", r.1))
                .collect(),
            form: rows.iter().map(|r| r.2.to_string()).collect(),
            size: vec![1024; rows.len()],
            is_xbrl: Some(vec![1; rows.len()]),
            is_inline_xbrl: None,
            primary_document: Some(vec![String::new(); rows.len()]),
            primary_doc_description: None,
        }
    }

    #[test]
    fn test_datetime_parsing() {
        let sample_dates = vec![
            "2015-06-01T07:06:52.000Z",
            "2015-05-29T18:54:18.000Z",
            "2015-05-29T18:53:07.000Z",
        ];

        for date in sample_dates {
            assert!(DateTime::parse_from_rfc3339(date).is_ok());
        }
    }

    #[test]
    fn row_conversion_reads_flags_and_blank_documents() {
        let table = recent(&[("0000320193-23-000106", "2023-11-03", "10-K")]);
        let filing = DetailedFiling::try_from((&table, 0)).unwrap();

        assert_eq!(filing.accession_number, "0000320193-23-000106");
        assert!(filing.is_xbrl);
        assert!(!filing.is_inline_xbrl);
        assert_eq!(filing.primary_document, None);
    }

    #[test]
    fn ragged_rows_are_skipped() {
        let mut table = recent(&[
            ("0000320193-23-000106", "2023-11-03", "10-K"),
            ("0000320193-22-000108", "2022-10-28", "10-K"),
        ]);
        table.form.pop();

        assert!(DetailedFiling::try_from((&table, 1)).is_err());
        assert_eq!(table.to_filings().len(), 1);
    }

    #[test]
    fn bad_acceptance_time_is_rejected() {
        let mut table = recent(&[("0000320193-23-000106", "2023-11-03", "10-K")]);
        table.acceptance_date_time[0] = "yesterday".to_string();

        assert!(matches!(
            DetailedFiling::try_from((&table, 0)),
            Err(EdgarError::InvalidResponse(_))
        ));
    }

    #[test]
    fn submission_url_pads_cik() {
        let url = edgar().build_url(UrlType::Submission, &["320193"]);
        assert_eq!(url, "https://data.sec.gov/submissions/CIK0000320193.json");
    }

    #[test]
    fn text_filing_url_format() {
        let edgar = edgar();
        let url = edgar.text_filing_url("1889983", "0001213900-23-009668");
        assert_eq!(
            url,
            format!(
                "{}/data/1889983/000121390023009668/0001213900-23-009668.txt",
                edgar.archives_url()
            )
        );
    }

    #[test]
    fn filing_directory_and_content_urls() {
        let edgar = edgar();
        assert_eq!(
            edgar.build_url(
                UrlType::FilingDirectory,
                &["320193", "0000320193-23-000106"]
            ),
            "https://www.sec.gov/Archives/edgar/data/320193/000032019323000106/index.json"
        );
        assert_eq!(
            edgar.filing_url("320193", "0000320193-23-000106", "aapl-20230930.xsd"),
            "https://www.sec.gov/Archives/edgar/data/320193/000032019323000106/aapl-20230930.xsd"
        );
    }
}
