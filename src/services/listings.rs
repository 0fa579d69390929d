// src/services/listings.rs

//! Listing crawler service.
//!
//! Pages through the internship and job listings of the site, one request at
//! a time, until enough posts are collected or a category runs dry.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use scraper::Html;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Config, JobPost, ListingCategory, SearchRequest};
use crate::services::cards::{CardSelectors, RawCard, locate_cards};
use crate::services::processor::CardProcessor;
use crate::utils::http::{DelayPolicy, HttpFetcher, PageFetcher};

/// Summary of a crawl run.
#[derive(Debug, Default)]
pub struct ScrapeOutcome {
    /// Posts in discovery order, at most `results_wanted`
    pub jobs: Vec<JobPost>,
    pub pages_fetched: usize,
    pub cards_seen: usize,
    /// Cards tagged with another category's employment type
    pub cards_filtered: usize,
    /// Cards without a detail link or posted before the cutoff
    pub cards_skipped: usize,
    pub card_failures: usize,
    pub duplicates: usize,
}

/// Service for crawling listing pages.
pub struct ListingCrawler<F: PageFetcher> {
    fetcher: F,
    selectors: CardSelectors,
    base_url: Url,
    delay: DelayPolicy,
}

impl ListingCrawler<HttpFetcher> {
    /// Create a crawler backed by a real HTTP client.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            HttpFetcher::new(&config.crawler)?,
            &config.crawler.base_url,
            config.delay_policy(),
        )
    }
}

impl<F: PageFetcher> ListingCrawler<F> {
    pub fn new(fetcher: F, base_url: &str, delay: DelayPolicy) -> Result<Self> {
        Ok(Self {
            fetcher,
            selectors: CardSelectors::compile()?,
            base_url: Url::parse(base_url)?,
            delay,
        })
    }

    /// Run a scrape with the current time as reference.
    pub fn scrape(&self, request: &SearchRequest) -> Result<ScrapeOutcome> {
        self.scrape_at(request, Utc::now())
    }

    /// Run a scrape, computing posting dates and the cutoff from `now`.
    ///
    /// Fails only when a listing page cannot be fetched at all.
    pub fn scrape_at(&self, request: &SearchRequest, now: DateTime<Utc>) -> Result<ScrapeOutcome> {
        let processor =
            CardProcessor::new(&self.base_url, &self.selectors, &self.fetcher, request, now);
        let query = request.effective_query();
        let mut seen = HashSet::new();
        let mut outcome = ScrapeOutcome::default();

        if let Some(cutoff) = processor.cutoff() {
            log::info!("Keeping posts published after {cutoff}");
        }

        for category in ListingCategory::ORDER {
            if outcome.jobs.len() >= request.results_wanted {
                break;
            }
            self.crawl_category(
                category,
                query.as_deref(),
                request,
                &processor,
                &mut seen,
                &mut outcome,
            )?;
        }

        outcome.jobs.truncate(request.results_wanted);
        log::info!(
            "Collected {} posts from {} pages ({} cards, {} filtered, {} skipped, {} failed, {} duplicates)",
            outcome.jobs.len(),
            outcome.pages_fetched,
            outcome.cards_seen,
            outcome.cards_filtered,
            outcome.cards_skipped,
            outcome.card_failures,
            outcome.duplicates
        );
        Ok(outcome)
    }

    /// Listing page URL, e.g. `/internships/keywords-python%20developer/page-2/`.
    ///
    /// Everything in the query except ASCII alphanumerics and `-._~` is
    /// percent-encoded, reserved characters included.
    pub fn page_url(
        &self,
        category: ListingCategory,
        query: Option<&str>,
        page: usize,
    ) -> Result<Url> {
        if self.base_url.cannot_be_a_base() {
            return Err(AppError::config(format!(
                "base URL {} cannot carry a path",
                self.base_url
            )));
        }

        let mut path = format!("/{}/", category.path_segment());
        if let Some(query) = query {
            path.push_str(&format!("keywords-{}/", urlencoding::encode(query)));
        }
        if page > 1 {
            path.push_str(&format!("page-{page}/"));
        }

        let mut url = self.base_url.clone();
        url.set_path(&path);
        Ok(url)
    }

    fn crawl_category(
        &self,
        category: ListingCategory,
        query: Option<&str>,
        request: &SearchRequest,
        processor: &CardProcessor<'_, F>,
        seen: &mut HashSet<String>,
        outcome: &mut ScrapeOutcome,
    ) -> Result<()> {
        let mut page = 1;

        while outcome.jobs.len() < request.results_wanted {
            if page > 1 {
                self.delay.wait();
            }

            let url = self.page_url(category, query, page)?;
            log::info!("Fetching {} page {}: {}", category.as_str(), page, url);

            let response = self
                .fetcher
                .fetch(url.as_str(), request.request_timeout)
                .map_err(|e| {
                    log::error!("Request failed for {url}: {e}");
                    AppError::transport(url.as_str(), e)
                })?;
            outcome.pages_fetched += 1;

            if !response.is_success() {
                log::warn!(
                    "Status {} for {}, stopping {} pagination",
                    response.status,
                    url,
                    category.as_str()
                );
                break;
            }

            let document = Html::parse_document(&response.body);
            let cards = locate_cards(&document, &self.selectors);
            if cards.is_empty() {
                log::info!("No {} cards on page {}, stopping", category.as_str(), page);
                break;
            }

            let added =
                self.collect_posts(&cards, category, request, processor, seen, outcome)?;
            log::info!(
                "{} page {}: {} cards, {} new posts",
                category.as_str(),
                page,
                cards.len(),
                added
            );
            if added == 0 {
                break;
            }
            page += 1;
        }
        Ok(())
    }

    /// Process one page of cards. Returns how many posts were added.
    fn collect_posts(
        &self,
        cards: &[RawCard<'_>],
        category: ListingCategory,
        request: &SearchRequest,
        processor: &CardProcessor<'_, F>,
        seen: &mut HashSet<String>,
        outcome: &mut ScrapeOutcome,
    ) -> Result<usize> {
        let mut added = 0;

        for card in cards {
            outcome.cards_seen += 1;

            if card
                .employment_type()
                .is_some_and(|kind| kind != category.as_str())
            {
                outcome.cards_filtered += 1;
                continue;
            }

            let post = match processor.process(card, category) {
                Ok(Some(post)) => post,
                Ok(None) => {
                    outcome.cards_skipped += 1;
                    continue;
                }
                Err(e) if !e.is_fatal() => {
                    log::warn!("Skipping card: {e}");
                    outcome.card_failures += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            if !seen.insert(post.job_url.clone()) {
                outcome.duplicates += 1;
                continue;
            }

            outcome.jobs.push(post);
            added += 1;
            if outcome.jobs.len() >= request.results_wanted {
                break;
            }
        }
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::utils::http::testing::StaticFetcher;

    const BASE: &str = "https://internshala.com";
    const PY_INTERNSHIPS: &str = "https://internshala.com/internships/keywords-python%20developer/";
    const PY_INTERNSHIPS_2: &str =
        "https://internshala.com/internships/keywords-python%20developer/page-2/";
    const PY_JOBS: &str = "https://internshala.com/jobs/keywords-python%20developer/";
    const PY_JOBS_2: &str = "https://internshala.com/jobs/keywords-python%20developer/page-2/";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn request(results_wanted: usize) -> SearchRequest {
        SearchRequest {
            search_term: Some("Python Developer".into()),
            results_wanted,
            ..SearchRequest::default()
        }
    }

    fn card_with(attrs: &str, link_kind: &str, slug: &str, extra: &str) -> String {
        format!(
            r#"<div class="container-fluid individual_internship"{attrs}>
                 <h3><a href="/{link_kind}/detail/{slug}">{slug}</a></h3>
                 <p class="company-name">Acme</p>{extra}
               </div>"#
        )
    }

    fn card(kind: &str, slug: &str, extra: &str) -> String {
        card_with(&format!(r#" employment_type="{kind}""#), kind, slug, extra)
    }

    fn page(cards: &[String]) -> String {
        format!("<html><body>{}</body></html>", cards.concat())
    }

    fn internships(range: std::ops::Range<usize>) -> String {
        let cards: Vec<_> = range
            .map(|i| card("internship", &format!("python-internship-{i}"), ""))
            .collect();
        page(&cards)
    }

    fn crawler(fetcher: &StaticFetcher) -> ListingCrawler<&StaticFetcher> {
        ListingCrawler::new(fetcher, BASE, DelayPolicy::none()).unwrap()
    }

    fn urls(outcome: &ScrapeOutcome) -> Vec<&str> {
        outcome.jobs.iter().map(|j| j.job_url.as_str()).collect()
    }

    #[test]
    fn builds_page_urls() {
        let fetcher = StaticFetcher::new();
        let crawler = crawler(&fetcher);
        let url = |c: ListingCategory, q: Option<&str>, p: usize| {
            crawler.page_url(c, q, p).unwrap().to_string()
        };

        assert_eq!(url(ListingCategory::Internship, None, 1), "https://internshala.com/internships/");
        assert_eq!(url(ListingCategory::Job, None, 3), "https://internshala.com/jobs/page-3/");
        assert_eq!(url(ListingCategory::Internship, Some("python developer"), 1), PY_INTERNSHIPS);
        assert_eq!(url(ListingCategory::Job, Some("c++/qt"), 2), "https://internshala.com/jobs/keywords-c%2B%2B%2Fqt/page-2/");
    }

    #[test]
    fn keyword_segment_escapes_reserved_characters() {
        let fetcher = StaticFetcher::new();
        let crawler = crawler(&fetcher);
        let path = |q: &str| {
            crawler
                .page_url(ListingCategory::Job, Some(q), 1)
                .unwrap()
                .path()
                .to_string()
        };

        assert_eq!(path("c++"), "/jobs/keywords-c%2B%2B/");
        assert_eq!(path("r&d"), "/jobs/keywords-r%26d/");
        assert_eq!(path("node.js, react"), "/jobs/keywords-node.js%2C%20react/");
        assert_eq!(path("a=b;c:d@e"), "/jobs/keywords-a%3Db%3Bc%3Ad%40e/");
        assert_eq!(path("ui_ux-design~2"), "/jobs/keywords-ui_ux-design~2/");
    }

    #[test]
    fn stops_once_enough_posts_are_collected() {
        let fetcher = StaticFetcher::new().page(PY_INTERNSHIPS, internships(0..7));
        let outcome = crawler(&fetcher).scrape_at(&request(5), now()).unwrap();

        assert_eq!(outcome.jobs.len(), 5);
        assert_eq!(
            urls(&outcome),
            (0..5)
                .map(|i| format!("https://internshala.com/internship/detail/python-internship-{i}"))
                .collect::<Vec<_>>()
        );
        assert_eq!(fetcher.requests(), vec![PY_INTERNSHIPS.to_string()]);
    }

    #[test]
    fn paginates_then_moves_to_jobs() {
        let fetcher = StaticFetcher::new()
            .page(PY_INTERNSHIPS, internships(0..2))
            .page(PY_INTERNSHIPS_2, internships(2..3))
            .page(PY_JOBS, page(&[card("job", "python-job-0", "")]));

        let outcome = crawler(&fetcher).scrape_at(&request(10), now()).unwrap();

        assert_eq!(outcome.jobs.len(), 4);
        assert_eq!(outcome.jobs[3].listing_type, ListingCategory::Job);
        assert_eq!(
            fetcher.requests(),
            vec![
                PY_INTERNSHIPS.to_string(),
                PY_INTERNSHIPS_2.to_string(),
                "https://internshala.com/internships/keywords-python%20developer/page-3/".to_string(),
                PY_JOBS.to_string(),
                PY_JOBS_2.to_string(),
            ]
        );
    }

    #[test]
    fn empty_page_ends_category() {
        let fetcher = StaticFetcher::new()
            .page(PY_INTERNSHIPS, "<html><body><p>No results</p></body></html>")
            .page(PY_JOBS, "<html><body></body></html>");

        let outcome = crawler(&fetcher).scrape_at(&request(5), now()).unwrap();

        assert!(outcome.jobs.is_empty());
        assert_eq!(fetcher.requests(), vec![PY_INTERNSHIPS.to_string(), PY_JOBS.to_string()]);
    }

    #[test]
    fn foreign_category_cards_do_not_keep_pagination_alive() {
        let fetcher = StaticFetcher::new()
            .page(PY_INTERNSHIPS, page(&[card("job", "python-job-9", "")]))
            .page(PY_JOBS, page(&[card("job", "python-job-9", "")]));

        let outcome = crawler(&fetcher).scrape_at(&request(5), now()).unwrap();

        assert_eq!(outcome.cards_filtered, 1);
        assert_eq!(urls(&outcome), vec!["https://internshala.com/job/detail/python-job-9"]);
        assert_eq!(outcome.jobs[0].listing_type, ListingCategory::Job);
        assert!(!fetcher.requests().contains(&PY_INTERNSHIPS_2.to_string()));
    }

    #[test]
    fn duplicates_across_categories_are_dropped() {
        let shared = card_with("", "internship", "shared-listing-1", "");
        let fetcher = StaticFetcher::new()
            .page(PY_INTERNSHIPS, page(&[shared.clone()]))
            .page(PY_JOBS, page(&[shared]));

        let outcome = crawler(&fetcher).scrape_at(&request(5), now()).unwrap();

        assert_eq!(outcome.jobs.len(), 1);
        assert_eq!(outcome.duplicates, 1);
        // the jobs page added nothing new, so its page 2 is never requested
        assert!(!fetcher.requests().contains(&PY_JOBS_2.to_string()));
    }

    #[test]
    fn stale_cards_count_as_found_but_are_not_kept() {
        let fetcher = StaticFetcher::new().page(
            PY_INTERNSHIPS,
            page(&[
                card("internship", "old-1", "<span>Posted 3 days ago</span>"),
                card("internship", "fresh-1", "<span>Posted 1 day ago</span>"),
                card("internship", "unknown-1", "<span>Posted recently</span>"),
            ]),
        );
        let request = SearchRequest {
            hours_old: Some(48),
            ..request(3)
        };

        let outcome = crawler(&fetcher).scrape_at(&request, now()).unwrap();

        assert_eq!(
            urls(&outcome),
            vec![
                "https://internshala.com/internship/detail/fresh-1",
                "https://internshala.com/internship/detail/unknown-1",
            ]
        );
        assert_eq!(outcome.cards_skipped, 1);
    }

    #[test]
    fn page_of_only_stale_cards_ends_category() {
        let fetcher = StaticFetcher::new()
            .page(
                PY_INTERNSHIPS,
                page(&[
                    card("internship", "old-1", "<span>Posted 5 days ago</span>"),
                    card("internship", "old-2", "<span>Posted 5 days ago</span>"),
                ]),
            )
            .page(PY_INTERNSHIPS_2, internships(0..2));
        let request = SearchRequest {
            hours_old: Some(48),
            ..request(5)
        };

        let outcome = crawler(&fetcher).scrape_at(&request, now()).unwrap();

        assert!(outcome.jobs.is_empty());
        assert_eq!(outcome.cards_skipped, 2);
        assert_eq!(fetcher.requests(), vec![PY_INTERNSHIPS.to_string(), PY_JOBS.to_string()]);
    }

    #[test]
    fn error_status_ends_only_that_category() {
        let fetcher = StaticFetcher::new()
            .respond(PY_INTERNSHIPS, 503, "")
            .page(PY_JOBS, page(&[card("job", "python-job-0", "")]));

        let outcome = crawler(&fetcher).scrape_at(&request(1), now()).unwrap();

        assert_eq!(urls(&outcome), vec!["https://internshala.com/job/detail/python-job-0"]);
    }

    #[test]
    fn transport_failure_aborts_scrape() {
        let fetcher = StaticFetcher::new()
            .page(PY_INTERNSHIPS, internships(0..2))
            .unreachable(PY_INTERNSHIPS_2);

        let err = crawler(&fetcher).scrape_at(&request(5), now()).unwrap_err();

        assert!(matches!(err, AppError::Transport { ref url, .. } if url == PY_INTERNSHIPS_2));
        assert!(!fetcher.requests().contains(&PY_JOBS.to_string()));
    }

    #[test]
    fn unfiltered_listing_paths_without_query() {
        let fetcher = StaticFetcher::new().page(
            "https://internshala.com/internships/",
            internships(0..1),
        );
        let outcome = crawler(&fetcher)
            .scrape_at(&SearchRequest { results_wanted: 1, ..SearchRequest::default() }, now())
            .unwrap();
        assert_eq!(outcome.jobs.len(), 1);
    }

    #[test]
    fn results_never_exceed_request_and_urls_are_unique() {
        let fetcher = StaticFetcher::new()
            .page(PY_INTERNSHIPS, internships(0..4))
            .page(PY_INTERNSHIPS_2, internships(2..9));

        for wanted in [1, 3, 6, 20] {
            let outcome = crawler(&fetcher).scrape_at(&request(wanted), now()).unwrap();
            assert!(outcome.jobs.len() <= wanted);

            let unique: HashSet<_> = urls(&outcome).into_iter().collect();
            assert_eq!(unique.len(), outcome.jobs.len());
        }
    }

    #[test]
    fn identifiers_are_stable_across_runs() {
        let fetcher = StaticFetcher::new().page(PY_INTERNSHIPS, internships(0..3));
        let first = crawler(&fetcher).scrape_at(&request(3), now()).unwrap();
        let second = crawler(&fetcher).scrape_at(&request(3), now()).unwrap();

        let ids = |o: &ScrapeOutcome| o.jobs.iter().map(|j| j.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&second));
    }
}
