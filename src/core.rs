use governor::{
    Quota, RateLimiter, clock::DefaultClock, middleware::NoOpMiddleware, state::InMemoryState,
    state::NotKeyed,
};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, RETRY_AFTER, USER_AGENT};
use std::num::NonZeroU32;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use super::config::{EdgarConfig, EdgarUrls};
use super::error::{EdgarError, Result};

const MAX_RETRIES: u32 = 5;
const INITIAL_BACKOFF_MS: u64 = 1000;
const PREVIEW_CHARS: usize = 200;

type Governor = RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// Rate-limited HTTP client for the SEC EDGAR endpoints used to fetch filings.
///
/// SEC.gov fair access rules cap automated traffic at 10 requests per second and
/// require a user agent naming the application and a contact address. The client
/// enforces the cap with a token bucket shared by every clone, so a request simply
/// waits when the bucket is empty:
///
/// ```text
/// Token Bucket (capacity: 10 tokens)
/// ┌──────────────────────────┐
/// │ ████████████████████████ │  ← Tokens refill at 10/sec
/// └──────────────────────────┘
///      ↓ consume on request
/// ```
///
/// Responses with HTTP 429 and transport failures are retried up to five times
/// with exponential backoff and jitter. A 404 maps to [`EdgarError::NotFound`];
/// any other non-success status is returned as [`EdgarError::InvalidResponse`]
/// carrying a short preview of the body.
///
/// ```rust
/// # use xbrl_fetch::Edgar;
/// let edgar = Edgar::new("FinancialAnalysisCLI user@example.com")?;
/// # Ok::<(), xbrl_fetch::EdgarError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Edgar {
    pub(crate) client: reqwest::Client,
    pub(crate) rate_limiter: Arc<Governor>,
    pub(crate) edgar_archives_url: String,
    pub(crate) edgar_data_url: String,
    pub(crate) edgar_files_url: String,
}

impl Edgar {
    /// Creates a client with a 10 req/s limit, a 30-second timeout and the
    /// public SEC.gov base URLs.
    ///
    /// `user_agent` should read like `"AppName contact@example.com"`.
    pub fn new(user_agent: &str) -> Result<Self> {
        Self::with_config(EdgarConfig {
            user_agent: user_agent.to_string(),
            rate_limit: 10,
            timeout: Duration::from_secs(30),
            base_urls: EdgarUrls::default(),
        })
    }

    /// Creates a client from explicit settings.
    ///
    /// # Errors
    ///
    /// Returns `EdgarError::ConfigError` if the user agent is not a valid header
    /// value, the rate limit is zero, or the HTTP client cannot be built.
    pub fn with_config(config: EdgarConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| EdgarError::ConfigError(format!("Invalid user agent: {}", e)))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| EdgarError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        let per_second = NonZeroU32::new(config.rate_limit).ok_or_else(|| {
            EdgarError::ConfigError("Rate limit must be greater than zero".to_string())
        })?;

        Ok(Edgar {
            client,
            rate_limiter: Arc::new(RateLimiter::direct(Quota::per_second(per_second))),
            edgar_archives_url: config.base_urls.archives,
            edgar_data_url: config.base_urls.data,
            edgar_files_url: config.base_urls.files,
        })
    }

    /// Backoff before retry number `retry` (0-based): `2^retry × 1s`, ±20% jitter.
    fn calculate_backoff(retry: u32) -> Duration {
        let backoff_ms = INITIAL_BACKOFF_MS * (2_u64.pow(retry));
        let jitter = (backoff_ms as f64 * 0.2 * (fastrand::f64() - 0.5)) as i64;
        Duration::from_millis((backoff_ms as i64 + jitter) as u64)
    }

    /// Sends a GET, waiting on the rate limiter before every attempt, and
    /// returns the response once it has a 200 status.
    async fn send(&self, url: &str) -> Result<reqwest::Response> {
        let mut retries = 0;

        loop {
            self.rate_limiter.until_ready().await;

            let response = match self.client.get(url).send().await {
                Ok(response) => response,
                Err(e) => {
                    if retries >= MAX_RETRIES {
                        return Err(EdgarError::RequestError(e));
                    }
                    let backoff = Self::calculate_backoff(retries);
                    tracing::warn!(
                        "Request failed for {}: {}. Attempt {}/{}. Retrying in {:?}.",
                        url,
                        e,
                        retries + 1,
                        MAX_RETRIES + 1,
                        backoff
                    );
                    sleep(backoff).await;
                    retries += 1;
                    continue;
                }
            };

            match response.status() {
                reqwest::StatusCode::OK => return Ok(response),
                reqwest::StatusCode::NOT_FOUND => return Err(EdgarError::NotFound),
                reqwest::StatusCode::TOO_MANY_REQUESTS => {
                    if retries >= MAX_RETRIES {
                        return Err(EdgarError::RateLimitExceeded);
                    }

                    let wait = response
                        .headers()
                        .get(RETRY_AFTER)
                        .and_then(|h| h.to_str().ok())
                        .and_then(|s| s.trim().parse::<u64>().ok())
                        .map(Duration::from_secs)
                        .unwrap_or_else(|| Self::calculate_backoff(retries));

                    tracing::warn!(
                        "Rate limit hit (429) for {}. Attempt {}/{}. Waiting {:?} before retry.",
                        url,
                        retries + 1,
                        MAX_RETRIES + 1,
                        wait
                    );
                    sleep(wait).await;
                    retries += 1;
                }
                status => {
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to read error body".to_string());
                    return Err(EdgarError::InvalidResponse(format!(
                        "Unexpected status code: {} for URL: {}. Response preview: {}",
                        status,
                        url,
                        preview(&body)
                    )));
                }
            }
        }
    }

    /// Fetches a text resource.
    ///
    /// SEC.gov occasionally serves JSON with a `text/html` content type. For
    /// `.json` URLs the body is accepted if it looks like JSON; a real HTML page
    /// (usually an error or throttling notice) yields
    /// `EdgarError::UnexpectedContentType`.
    pub async fn get(&self, url: &str) -> Result<String> {
        let response = self.send(url).await?;

        let html_content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|ct| ct.to_lowercase().contains("text/html"))
            .map(str::to_string);

        let body = response.text().await.map_err(EdgarError::RequestError)?;

        if let Some(content_type) = html_content_type {
            if url.ends_with(".json") {
                let trimmed = body.trim_start();
                if trimmed.starts_with('{') || trimmed.starts_with('[') {
                    tracing::warn!(
                        "Received text/html content-type for .json URL, but content appears to be JSON: {}",
                        url
                    );
                } else {
                    return Err(EdgarError::UnexpectedContentType {
                        url: url.to_string(),
                        expected_pattern: "application/json".to_string(),
                        got_content_type: content_type,
                        content_preview: preview(&body),
                    });
                }
            }
        }

        Ok(body)
    }

    /// Fetches a resource as raw bytes (XML instance documents, schemas, images).
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.send(url).await?;
        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(EdgarError::RequestError)
    }

    /// Downloads `url` into `dest`, replacing any existing file, and returns the
    /// number of bytes written. Parent directories must already exist.
    pub async fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        let bytes = self.get_bytes(url).await?;
        tokio::fs::write(dest, &bytes).await?;
        tracing::debug!("Saved {} ({} bytes)", dest.display(), bytes.len());
        Ok(bytes.len() as u64)
    }

    pub fn archives_url(&self) -> &str {
        &self.edgar_archives_url
    }

    pub fn data_url(&self) -> &str {
        &self.edgar_data_url
    }

    pub fn files_url(&self) -> &str {
        &self.edgar_files_url
    }
}

fn preview(body: &str) -> String {
    body.chars().take(PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_backoff() {
        let backoff0 = Edgar::calculate_backoff(0);
        let backoff1 = Edgar::calculate_backoff(1);
        let backoff2 = Edgar::calculate_backoff(2);

        assert!(backoff0 < backoff1);
        assert!(backoff1 < backoff2);

        // ±20% of the base delay
        assert!(backoff0.as_millis() >= 800 && backoff0.as_millis() <= 1200);
        assert!(backoff1.as_millis() >= 1600 && backoff1.as_millis() <= 2400);
        assert!(backoff2.as_millis() >= 3200 && backoff2.as_millis() <= 4800);
    }

    #[test]
    fn rejects_zero_rate_limit() {
        let config = EdgarConfig::new("test_agent example@example.com", 0, Duration::from_secs(5), None);
        assert!(matches!(
            Edgar::with_config(config),
            Err(EdgarError::ConfigError(_))
        ));
    }

    #[test]
    fn rejects_invalid_user_agent() {
        let result = Edgar::new("bad\nagent");
        assert!(matches!(result, Err(EdgarError::ConfigError(_))));
    }

    #[test]
    fn custom_base_urls() {
        let urls = EdgarUrls {
            archives: "http://localhost:9000/archives".to_string(),
            data: "http://localhost:9000/data".to_string(),
            files: "http://localhost:9000/files".to_string(),
        };
        let config = EdgarConfig::new("test_agent example@example.com", 10, Duration::from_secs(5), Some(urls));
        let edgar = Edgar::with_config(config).unwrap();

        assert_eq!(edgar.archives_url(), "http://localhost:9000/archives");
        assert_eq!(edgar.data_url(), "http://localhost:9000/data");
        assert_eq!(edgar.files_url(), "http://localhost:9000/files");
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        let body = "é".repeat(300);
        assert_eq!(preview(&body).chars().count(), PREVIEW_CHARS);
    }
}
