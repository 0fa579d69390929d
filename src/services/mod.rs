//! Service layer for the crawler.
//!
//! This module contains the scraping logic:
//! - Listing pagination (`ListingCrawler`)
//! - Card discovery (`locate_cards`)
//! - Card to post conversion (`CardProcessor`)
//! - Detail page descriptions (`DescriptionFetcher`)
//! - Text field extraction (`extract`)

pub mod cards;
pub mod description;
pub mod extract;
pub mod listings;
pub mod processor;

pub use cards::{CardSelectors, RawCard, TextBlock, locate_cards};
pub use description::DescriptionFetcher;
pub use listings::{ListingCrawler, ScrapeOutcome};
pub use processor::CardProcessor;
