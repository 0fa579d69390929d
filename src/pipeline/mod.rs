//! Pipeline entry points for crawler operations.
//!
//! - `run_crawler`: scrape listings and write them to the configured output

pub mod crawl;

pub use crawl::{crawl_and_store, run_crawler};
