// src/pipeline/crawl.rs

//! Listing crawl pipeline.

use chrono::Utc;

use crate::error::Result;
use crate::models::{Config, SearchRequest};
use crate::services::{ListingCrawler, ScrapeOutcome};
use crate::storage::{JobStorage, LocalStorage};
use crate::utils::http::PageFetcher;

/// Run the listing crawler with the configured search and store the results.
pub fn run_crawler(config: &Config) -> Result<ScrapeOutcome> {
    config.validate()?;

    let request = config.search_request();
    let crawler = ListingCrawler::from_config(config)?;
    let (storage, key) = LocalStorage::for_file(&config.output.path)?;

    let outcome = crawl_and_store(&crawler, &request, &storage, &key)?;
    log::info!("Results written to {}", storage.path(&key).display());
    Ok(outcome)
}

/// Scrape with `crawler` and write the posts to `storage` under `key`.
pub fn crawl_and_store<F: PageFetcher>(
    crawler: &ListingCrawler<F>,
    request: &SearchRequest,
    storage: &dyn JobStorage,
    key: &str,
) -> Result<ScrapeOutcome> {
    let start_time = Utc::now();
    log::info!(
        "Crawling for {} posts (query: {}, max age: {})",
        request.results_wanted,
        request.effective_query().as_deref().unwrap_or("<all>"),
        request
            .hours_old
            .map_or_else(|| "any".to_string(), |h| format!("{h}h"))
    );

    let outcome = crawler.scrape(request)?;
    let file = storage.write_jobs(key, &outcome.jobs)?;

    let elapsed = Utc::now() - start_time;
    log::info!(
        "Saved {} posts in {:.1}s ({} pages fetched)",
        file.count,
        elapsed.num_milliseconds() as f64 / 1000.0,
        outcome.pages_fetched
    );
    Ok(outcome)
}
