// src/utils/http.rs

//! HTTP fetching and request pacing.

use std::fs;
use std::thread;
use std::time::Duration;

use rand::Rng;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};

use crate::error::Result;
use crate::models::CrawlerConfig;

/// Status and body of a completed GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    /// 2xx and 3xx responses carry a usable page.
    pub fn is_success(&self) -> bool {
        (200..400).contains(&self.status)
    }
}

/// Issues GET requests for the crawler.
///
/// An `Err` means the request never completed (DNS, connect, timeout).
/// Any status the server answered with comes back as `Ok`.
pub trait PageFetcher {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchResponse>;
}

impl<F: PageFetcher + ?Sized> PageFetcher for &F {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchResponse> {
        (**self).fetch(url, timeout)
    }
}

/// Blocking reqwest client configured from [`CrawlerConfig`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a configured blocking HTTP client.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers);

        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }
        if let Some(path) = &config.ca_cert {
            let pem = fs::read(path)?;
            builder = builder.add_root_certificate(reqwest::Certificate::from_pem(&pem)?);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchResponse> {
        let response = self.client.get(url).timeout(timeout).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(FetchResponse { status, body })
    }
}

/// Pause between consecutive listing pages: `base` plus a random extra in `[0, jitter]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DelayPolicy {
    base: Duration,
    jitter: Duration,
}

impl DelayPolicy {
    pub fn new(base: Duration, jitter: Duration) -> Self {
        Self { base, jitter }
    }

    /// No delay at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Draw the next delay.
    pub fn next_delay(&self) -> Duration {
        let jitter_ms = u64::try_from(self.jitter.as_millis()).unwrap_or(u64::MAX);
        let extra = if jitter_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=jitter_ms)
        };
        self.base + Duration::from_millis(extra)
    }

    /// Block the current thread for the next delay.
    pub fn wait(&self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            log::debug!("Sleeping {} ms before next page", delay.as_millis());
            thread::sleep(delay);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirects_count_as_success() {
        let ok = |status| FetchResponse {
            status,
            body: String::new(),
        };
        assert!(ok(200).is_success());
        assert!(ok(302).is_success());
        assert!(!ok(404).is_success());
        assert!(!ok(503).is_success());
    }

    #[test]
    fn delay_stays_within_band() {
        let policy = DelayPolicy::new(Duration::from_millis(20), Duration::from_millis(30));
        for _ in 0..50 {
            let delay = policy.next_delay();
            assert!(delay >= Duration::from_millis(20));
            assert!(delay <= Duration::from_millis(50));
        }
    }

    #[test]
    fn no_delay_policy_is_zero() {
        assert_eq!(DelayPolicy::none().next_delay(), Duration::ZERO);
    }

    #[test]
    fn client_builds_from_default_config() {
        assert!(HttpFetcher::new(&CrawlerConfig::default()).is_ok());
    }
}
