use std::path::PathBuf;
use std::time::Duration;

use super::error::{EdgarError, Result};

/// Configuration for the Edgar client
#[derive(Debug, Clone)]
pub struct EdgarConfig {
    /// User agent string for HTTP requests
    pub user_agent: String,
    /// Rate limit in requests per second
    pub rate_limit: u32,
    /// HTTP request timeout
    pub timeout: Duration,
    /// Base URLs for the EDGAR services the client talks to
    pub base_urls: EdgarUrls,
}

/// Base URLs for different EDGAR services
#[derive(Debug, Clone)]
pub struct EdgarUrls {
    /// Base URL for EDGAR archives (filing folders and documents)
    pub archives: String,
    /// Base URL for the submissions API
    pub data: String,
    /// Base URL for static SEC files such as the ticker map
    pub files: String,
}

impl Default for EdgarUrls {
    fn default() -> Self {
        Self {
            archives: "https://www.sec.gov/Archives/edgar".to_string(),
            data: "https://data.sec.gov".to_string(),
            files: "https://www.sec.gov/files".to_string(),
        }
    }
}

impl Default for EdgarConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("xbrl-fetch/{}", crate::VERSION),
            rate_limit: 10,
            timeout: Duration::from_secs(30),
            base_urls: EdgarUrls::default(),
        }
    }
}

impl EdgarConfig {
    /// Creates a new EdgarConfig with custom settings
    ///
    /// ```rust
    /// use xbrl_fetch::{Edgar, EdgarConfig};
    /// use std::time::Duration;
    ///
    /// let config = EdgarConfig::new("YourAppName contact@example.com", 5, Duration::from_secs(60), None);
    /// let edgar = Edgar::with_config(config)?;
    /// # Ok::<(), xbrl_fetch::EdgarError>(())
    /// ```
    pub fn new(
        user_agent: impl Into<String>,
        rate_limit: u32,
        timeout: Duration,
        base_urls: Option<EdgarUrls>,
    ) -> Self {
        Self {
            user_agent: user_agent.into(),
            rate_limit,
            timeout,
            base_urls: base_urls.unwrap_or_default(),
        }
    }
}

/// Settings for the download tool itself.
///
/// SEC.gov asks automated clients to identify themselves with an application
/// name and a contact address; both are joined into the user agent. The rest
/// describes where filings land on disk and what gets requested by default.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub company_name: String,
    pub email: String,
    /// Root directory used when no `--dir` is given.
    pub download_dir: PathBuf,
    /// First path segment under the download root.
    pub namespace: String,
    pub form_type: String,
    pub default_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            company_name: "FinancialAnalysisCLI".to_string(),
            email: "user@example.com".to_string(),
            download_dir: PathBuf::from("data/xbrl"),
            namespace: "sec-edgar-filings".to_string(),
            form_type: "10-K".to_string(),
            default_limit: 5,
        }
    }
}

impl AppConfig {
    pub fn with_identity(mut self, company_name: impl Into<String>, email: impl Into<String>) -> Self {
        self.company_name = company_name.into();
        self.email = email.into();
        self
    }

    /// The `"<company> <email>"` string sent as the User-Agent header.
    pub fn user_agent(&self) -> String {
        format!("{} {}", self.company_name.trim(), self.email.trim())
    }

    /// Rejects identities SEC.gov would not accept as contact information.
    pub fn validate(&self) -> Result<()> {
        if self.company_name.trim().is_empty() {
            return Err(EdgarError::ConfigError(
                "Company name must not be empty".to_string(),
            ));
        }

        let email = self.email.trim();
        let valid_email = match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty() && domain.contains('.') && !email.contains(char::is_whitespace)
            }
            None => false,
        };
        if !valid_email {
            return Err(EdgarError::ConfigError(format!(
                "Invalid contact email: {email:?}"
            )));
        }

        Ok(())
    }

    /// Client configuration carrying this tool's user agent.
    pub fn edgar_config(&self) -> EdgarConfig {
        EdgarConfig {
            user_agent: self.user_agent(),
            ..EdgarConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_identity_builds_user_agent() {
        let config = AppConfig::default();
        assert_eq!(config.user_agent(), "FinancialAnalysisCLI user@example.com");
        assert_eq!(config.download_dir, PathBuf::from("data/xbrl"));
        assert_eq!(config.default_limit, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_identity() {
        let missing_at = AppConfig::default().with_identity("Acme", "nobody");
        assert!(matches!(
            missing_at.validate(),
            Err(EdgarError::ConfigError(_))
        ));

        let empty_name = AppConfig::default().with_identity("  ", "a@b.com");
        assert!(matches!(
            empty_name.validate(),
            Err(EdgarError::ConfigError(_))
        ));

        let no_domain = AppConfig::default().with_identity("Acme", "ops@localhost");
        assert!(no_domain.validate().is_err());
    }

    #[test]
    fn edgar_config_uses_identity() {
        let config = AppConfig::default().with_identity("Acme Research", "ops@acme.io");
        let edgar = config.edgar_config();
        assert_eq!(edgar.user_agent, "Acme Research ops@acme.io");
        assert_eq!(edgar.rate_limit, 10);
    }
}
