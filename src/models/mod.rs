// src/models/mod.rs

//! Domain models for the crawler.
//!
//! This module contains all data structures used throughout the crate,
//! organized by their primary purpose.

mod config;
mod job;
mod search;

// Re-export all public types
pub use config::{Config, CrawlerConfig, OutputConfig, SearchConfig};
pub use job::{
    Compensation, CompensationInterval, Country, JobPost, JobType, ListingCategory, Location,
};
pub use search::{DescriptionFormat, SearchRequest};
