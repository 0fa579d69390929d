//! Search request handed to the listing crawler.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Output format applied to fetched descriptions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DescriptionFormat {
    #[default]
    Markdown,
    Plain,
    Html,
}

impl FromStr for DescriptionFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "plain" | "text" => Ok(Self::Plain),
            "html" => Ok(Self::Html),
            other => Err(AppError::validation(format!(
                "unknown description format '{other}' (expected markdown, plain or html)"
            ))),
        }
    }
}

impl fmt::Display for DescriptionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Markdown => "markdown",
            Self::Plain => "plain",
            Self::Html => "html",
        };
        f.write_str(name)
    }
}

/// Parameters of one scrape. Not modified while the scrape runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Generic search term
    pub search_term: Option<String>,

    /// Site-specific search term; wins over `search_term`
    pub site_search_term: Option<String>,

    pub results_wanted: usize,

    /// Only keep posts published within this many hours
    pub hours_old: Option<u32>,

    /// Fetch each listing's detail page for the full description
    pub fetch_description: bool,

    pub description_format: DescriptionFormat,

    /// Timeout applied to every request
    pub request_timeout: Duration,
}

impl SearchRequest {
    /// The term actually searched for, lower-cased. `None` lists everything.
    pub fn effective_query(&self) -> Option<String> {
        self.site_search_term
            .as_deref()
            .filter(|q| !q.trim().is_empty())
            .or(self.search_term.as_deref())
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty())
    }
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            search_term: None,
            site_search_term: None,
            results_wanted: 15,
            hours_old: None,
            fetch_description: false,
            description_format: DescriptionFormat::default(),
            request_timeout: Duration::from_secs(60),
        }
    }
}
