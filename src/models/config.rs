//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{DescriptionFormat, SearchRequest};
use crate::utils::http::DelayPolicy;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// What to search for
    #[serde(default)]
    pub search: SearchConfig,

    /// Where results are written
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        let base = Url::parse(&self.crawler.base_url)
            .map_err(|e| AppError::validation(format!("crawler.base_url: {e}")))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(AppError::validation(
                "crawler.base_url must be an http(s) URL",
            ));
        }
        if let Some(proxy) = &self.crawler.proxy {
            Url::parse(proxy)
                .map_err(|e| AppError::validation(format!("crawler.proxy: {e}")))?;
        }
        if self.search.results_wanted == 0 {
            return Err(AppError::validation("search.results_wanted must be > 0"));
        }
        Ok(())
    }

    /// Build the immutable request for one scrape.
    pub fn search_request(&self) -> SearchRequest {
        SearchRequest {
            search_term: self.search.search_term.clone(),
            site_search_term: self.search.site_search_term.clone(),
            results_wanted: self.search.results_wanted,
            hours_old: self.search.hours_old,
            fetch_description: self.search.fetch_description,
            description_format: self.search.description_format,
            request_timeout: Duration::from_secs(self.crawler.timeout_secs),
        }
    }

    /// Inter-page delay configured for the crawler.
    pub fn delay_policy(&self) -> DelayPolicy {
        DelayPolicy::new(
            Duration::from_millis(self.crawler.delay_ms),
            Duration::from_millis(self.crawler.jitter_ms),
        )
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Site root that listing paths are joined onto
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Minimum delay between listing pages in milliseconds
    #[serde(default = "defaults::delay")]
    pub delay_ms: u64,

    /// Upper bound of the random extra delay in milliseconds
    #[serde(default = "defaults::jitter")]
    pub jitter_ms: u64,

    /// Proxy URL for all requests
    #[serde(default)]
    pub proxy: Option<String>,

    /// Extra PEM root certificate to trust
    #[serde(default)]
    pub ca_cert: Option<PathBuf>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            delay_ms: defaults::delay(),
            jitter_ms: defaults::jitter(),
            proxy: None,
            ca_cert: None,
        }
    }
}

/// Search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub search_term: Option<String>,

    #[serde(default)]
    pub site_search_term: Option<String>,

    #[serde(default = "defaults::results_wanted")]
    pub results_wanted: usize,

    #[serde(default)]
    pub hours_old: Option<u32>,

    #[serde(default)]
    pub fetch_description: bool,

    #[serde(default)]
    pub description_format: DescriptionFormat,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            search_term: None,
            site_search_term: None,
            results_wanted: defaults::results_wanted(),
            hours_old: None,
            fetch_description: false,
            description_format: DescriptionFormat::default(),
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// JSON file the results are written to
    #[serde(default = "defaults::output_path")]
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: defaults::output_path(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Crawler defaults
    pub fn base_url() -> String {
        "https://internshala.com".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".into()
    }
    pub fn timeout() -> u64 {
        60
    }
    pub fn delay() -> u64 {
        2000
    }
    pub fn jitter() -> u64 {
        3000
    }

    // Search defaults
    pub fn results_wanted() -> usize {
        15
    }

    // Output defaults
    pub fn output_path() -> PathBuf {
        PathBuf::from("jobs.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.crawler.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_results() {
        let mut config = Config::default();
        config.search.results_wanted = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_http_base_url() {
        let mut config = Config::default();
        config.crawler.base_url = "ftp://internshala.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [crawler]
            delay_ms = 0

            [search]
            search_term = "python developer"
            hours_old = 48
            description_format = "plain"
            "#,
        )
        .unwrap();

        assert_eq!(config.crawler.delay_ms, 0);
        assert_eq!(config.crawler.jitter_ms, 3000);
        assert_eq!(config.crawler.base_url, "https://internshala.com");
        assert_eq!(config.search.results_wanted, 15);

        let request = config.search_request();
        assert_eq!(request.effective_query().as_deref(), Some("python developer"));
        assert_eq!(request.hours_old, Some(48));
        assert_eq!(request.description_format, DescriptionFormat::Plain);
        assert_eq!(request.request_timeout, Duration::from_secs(60));
    }

    #[test]
    fn load_or_default_survives_missing_file() {
        let config = Config::load_or_default("does/not/exist.toml");
        assert_eq!(config.search.results_wanted, 15);
    }
}
