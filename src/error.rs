// src/error.rs

//! Unified error handling for the crawler.

use std::fmt;

use thiserror::Error;

/// Result type alias for crawler operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A listing page could not be fetched at all. Aborts the scrape.
    #[error("Transport failure for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<AppError>,
    },

    /// A single card could not be turned into a job post.
    #[error("Card error ({context}): {message}")]
    Card { context: String, message: String },
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Wrap the cause of a failed listing page fetch.
    pub fn transport(url: impl Into<String>, source: AppError) -> Self {
        Self::Transport {
            url: url.into(),
            source: Box::new(source),
        }
    }

    /// Create a card-level error with context.
    pub fn card(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Card {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Whether this error must abort the whole scrape.
    ///
    /// Card errors only cost the card they came from.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Card { .. })
    }
}
