// src/services/processor.rs

//! Turns one listing card into a [`JobPost`].

use chrono::{DateTime, TimeDelta, Utc};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Country, JobPost, ListingCategory, Location, SearchRequest};
use crate::services::cards::{CardSelectors, TextBlock};
use crate::services::description::DescriptionFetcher;
use crate::services::extract::{LocationGuess, parse_location, parse_posted_ago, parse_stipend};
use crate::utils::http::PageFetcher;
use crate::utils::text::{extract_emails, format_description, normalize_whitespace};
use crate::utils::{listing_id, resolve_url};

/// Title used when the detail link has no text.
const TITLE_PLACEHOLDER: &str = "Internship";

/// Card lines that are never a company name.
const BOILERPLATE: [&str; 5] = [
    "actively hiring",
    "be an early applicant",
    "work from home",
    "internships in india",
    "apply now",
];

const REMOTE_SYNONYMS: [&str; 2] = ["work from home", "remote"];

/// Per-scrape card processing state: request, clock and recency cutoff.
pub struct CardProcessor<'a, F: PageFetcher> {
    base_url: &'a Url,
    selectors: &'a CardSelectors,
    request: &'a SearchRequest,
    descriptions: DescriptionFetcher<'a, F>,
    now: DateTime<Utc>,
    cutoff: Option<DateTime<Utc>>,
}

impl<'a, F: PageFetcher> CardProcessor<'a, F> {
    pub fn new(
        base_url: &'a Url,
        selectors: &'a CardSelectors,
        fetcher: &'a F,
        request: &'a SearchRequest,
        now: DateTime<Utc>,
    ) -> Self {
        let cutoff = request
            .hours_old
            .and_then(|hours| now.checked_sub_signed(TimeDelta::hours(i64::from(hours))));

        Self {
            base_url,
            selectors,
            request,
            descriptions: DescriptionFetcher::new(fetcher, selectors, request.request_timeout),
            now,
            cutoff,
        }
    }

    /// Earliest accepted posting time, if a recency limit is set.
    pub fn cutoff(&self) -> Option<DateTime<Utc>> {
        self.cutoff
    }

    /// Build a post from `card`.
    ///
    /// `Ok(None)` when the card holds no detail link or was posted before the
    /// cutoff. `Err` only for card-level problems; the caller skips the card.
    pub fn process(
        &self,
        card: &impl TextBlock,
        category: ListingCategory,
    ) -> Result<Option<JobPost>> {
        let Some(link) = card.find_link(&self.selectors.detail_link) else {
            return Ok(None);
        };

        let job_url = resolve_url(self.base_url, &link.href).ok_or_else(|| {
            AppError::card("detail link", format!("cannot resolve href '{}'", link.href))
        })?;

        let title = Some(normalize_whitespace(&link.text))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| TITLE_PLACEHOLDER.to_string());

        let company_name = self.company_name(card, &title);
        let text = card.joined_text(" ");
        let location = self.location(card, &text);

        let date_posted = match parse_posted_ago(&text) {
            Some(age) => {
                let posted = self.now.checked_sub_signed(age);
                let stale = match (posted, self.cutoff) {
                    (Some(posted), Some(cutoff)) => posted < cutoff,
                    (None, Some(_)) => true,
                    (_, None) => false,
                };
                if stale {
                    log::debug!("Skipping {job_url}: posted before cutoff");
                    return Ok(None);
                }
                posted.map(|p| p.date_naive())
            }
            None => None,
        };

        let description = if self.request.fetch_description {
            self.descriptions
                .fetch(&job_url)
                .map(|raw| format_description(&raw, self.request.description_format))
                .filter(|d| !d.is_empty())
        } else {
            None
        };
        let emails = description
            .as_deref()
            .map(extract_emails)
            .filter(|found| !found.is_empty());

        Ok(Some(JobPost {
            id: listing_id(&job_url),
            title,
            company_name,
            location: Location {
                city: location.city,
                country: Country::India,
            },
            description,
            job_type: vec![category.job_type()],
            compensation: parse_stipend(&text),
            date_posted,
            emails,
            is_remote: location.is_remote,
            listing_type: category,
            job_url,
        }))
    }

    fn company_name(&self, card: &impl TextBlock, title: &str) -> Option<String> {
        card.find_text(&self.selectors.company_name)
            .filter(|name| !name.is_empty())
            .or_else(|| {
                card.find_text(&self.selectors.company_link)
                    .filter(|name| !name.is_empty())
            })
            .or_else(|| company_from_lines(&card.joined_text("\n"), title))
            .map(|name| normalize_whitespace(&name))
    }

    fn location(&self, card: &impl TextBlock, text: &str) -> LocationGuess {
        let element_text = card
            .find_text(&self.selectors.location)
            .map(|t| normalize_whitespace(&t))
            .filter(|t| !t.is_empty());

        match element_text {
            Some(city) => LocationGuess {
                is_remote: REMOTE_SYNONYMS.contains(&city.to_lowercase().as_str()),
                city: Some(city),
            },
            None => parse_location(text),
        }
    }
}

/// First plausible company line after the title line.
fn company_from_lines(text: &str, title: &str) -> Option<String> {
    let lines: Vec<String> = text
        .lines()
        .map(normalize_whitespace)
        .filter(|line| !line.is_empty())
        .collect();
    let start = lines
        .iter()
        .position(|line| line.contains(title))
        .map_or(0, |i| i + 1);

    lines.into_iter().skip(start).find(|line| {
        let lower = line.to_lowercase();
        !BOILERPLATE.iter().any(|phrase| lower.contains(phrase))
            && line.chars().next().is_some_and(|c| c.is_ascii())
    })
}
