use chrono::NaiveDate;

use super::filings::DetailedFiling;

/// Options for filtering filing requests
#[derive(Debug, Clone)]
pub struct FilingOptions {
    pub form_types: Option<Vec<String>>,
    pub offset: Option<usize>,
    pub limit: Option<usize>,
    /// Earliest filing date to keep (inclusive).
    pub filed_after: Option<NaiveDate>,
    /// Latest filing date to keep (inclusive).
    pub filed_before: Option<NaiveDate>,
    /// Whether to automatically include amendment forms (e.g., 10-K/A when 10-K is requested).
    /// Defaults to true.
    pub include_amendments: bool,
}

impl Default for FilingOptions {
    fn default() -> Self {
        Self {
            form_types: None,
            offset: None,
            limit: None,
            filed_after: None,
            filed_before: None,
            include_amendments: true,
        }
    }
}

impl FilingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_form_type(mut self, form_type: impl Into<String>) -> Self {
        self.form_types = Some(vec![form_type.into()]);
        self
    }

    pub fn with_form_types(mut self, form_types: Vec<String>) -> Self {
        self.form_types = Some(form_types);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_filed_after(mut self, date: NaiveDate) -> Self {
        self.filed_after = Some(date);
        self
    }

    pub fn with_filed_before(mut self, date: NaiveDate) -> Self {
        self.filed_before = Some(date);
        self
    }

    /// Set whether to include amendment forms automatically.
    ///
    /// When true (default), requesting "10-K" will also include "10-K/A" filings.
    /// When false, only the exact form type specified will be returned.
    pub fn with_include_amendments(mut self, include_amendments: bool) -> Self {
        self.include_amendments = include_amendments;
        self
    }

    /// How many matching filings must be collected before offset and limit can
    /// be applied, or `None` when every match is wanted.
    pub(crate) fn wanted(&self) -> Option<usize> {
        self.limit
            .map(|limit| limit.saturating_add(self.offset.unwrap_or(0)))
    }

    fn matches_form(&self, form: &str) -> bool {
        let Some(form_types) = &self.form_types else {
            return true;
        };
        let form = form.trim();

        form_types.iter().any(|wanted| {
            let wanted = wanted.trim();
            form == wanted
                || (self.include_amendments
                    && form
                        .strip_suffix("/A")
                        .is_some_and(|base| base == wanted))
        })
    }

    fn matches_date(&self, filing_date: &str) -> bool {
        if self.filed_after.is_none() && self.filed_before.is_none() {
            return true;
        }

        let Ok(date) = NaiveDate::parse_from_str(filing_date.trim(), "%Y-%m-%d") else {
            tracing::warn!("Skipping filing with unparseable date {:?}", filing_date);
            return false;
        };

        self.filed_after.is_none_or(|after| date >= after)
            && self.filed_before.is_none_or(|before| date <= before)
    }

    /// Whether a single filing passes the form-type and date filters.
    pub fn matches(&self, filing: &DetailedFiling) -> bool {
        self.matches_form(&filing.form) && self.matches_date(&filing.filing_date)
    }

    /// Applies offset and limit to an already filtered, newest-first list.
    pub(crate) fn paginate(&self, filings: Vec<DetailedFiling>) -> Vec<DetailedFiling> {
        let mut filings: Vec<_> = filings
            .into_iter()
            .skip(self.offset.unwrap_or(0))
            .collect();
        if let Some(limit) = self.limit {
            filings.truncate(limit);
        }
        filings
    }
}
