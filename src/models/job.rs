//! Normalized job post records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Listing section on the site. Each one is paginated on its own.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ListingCategory {
    Internship,
    Job,
}

impl ListingCategory {
    /// Categories in the order they are crawled.
    pub const ORDER: [ListingCategory; 2] = [ListingCategory::Internship, ListingCategory::Job];

    /// Label used on cards (`employment_type` attribute) and in records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Internship => "internship",
            Self::Job => "job",
        }
    }

    /// First path segment of the category's listing pages.
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::Internship => "internships",
            Self::Job => "jobs",
        }
    }

    /// Employment type assigned to every post found under this category.
    pub fn job_type(&self) -> JobType {
        match self {
            Self::Internship => JobType::Internship,
            Self::Job => JobType::FullTime,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    FullTime,
    Internship,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Country {
    #[default]
    India,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CompensationInterval {
    Monthly,
}

/// Advertised pay range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Compensation {
    pub interval: CompensationInterval,
    pub min_amount: u64,
    pub max_amount: u64,
    pub currency: String,
}

impl Compensation {
    /// A monthly stipend in rupees.
    pub fn monthly_inr(min_amount: u64, max_amount: u64) -> Self {
        Self {
            interval: CompensationInterval::Monthly,
            min_amount,
            max_amount,
            currency: "INR".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Location {
    /// City or region as printed on the card
    pub city: Option<String>,

    pub country: Country,
}

/// A job or internship post normalized from one listing card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobPost {
    /// Stable identifier derived from `job_url`
    pub id: String,

    pub title: String,

    pub company_name: Option<String>,

    /// Absolute URL of the listing detail page
    pub job_url: String,

    pub location: Location,

    pub description: Option<String>,

    pub job_type: Vec<JobType>,

    pub compensation: Option<Compensation>,

    pub date_posted: Option<NaiveDate>,

    pub emails: Option<Vec<String>>,

    pub is_remote: bool,

    /// Category label ("internship" or "job")
    pub listing_type: ListingCategory,
}
