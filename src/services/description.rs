// src/services/description.rs

//! Full description lookup on a listing's detail page.

use std::time::Duration;

use scraper::{ElementRef, Html};

use crate::services::cards::{CardSelectors, TextBlock};
use crate::utils::http::PageFetcher;
use crate::utils::text::normalize_whitespace;

const ABOUT_MARKER: &str = "about the internship";

/// Fetches detail pages. Every failure yields `None`, never an error.
pub struct DescriptionFetcher<'a, F: PageFetcher> {
    fetcher: &'a F,
    selectors: &'a CardSelectors,
    timeout: Duration,
}

impl<'a, F: PageFetcher> DescriptionFetcher<'a, F> {
    pub fn new(fetcher: &'a F, selectors: &'a CardSelectors, timeout: Duration) -> Self {
        Self {
            fetcher,
            selectors,
            timeout,
        }
    }

    /// Raw description text of the listing at `url`.
    pub fn fetch(&self, url: &str) -> Option<String> {
        let response = match self.fetcher.fetch(url, self.timeout) {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Description fetch failed for {url}: {e}");
                return None;
            }
        };

        if !response.is_success() {
            log::warn!(
                "Description fetch for {url} returned status {}",
                response.status
            );
            return None;
        }

        let document = Html::parse_document(&response.body);
        extract_description(&document, self.selectors)
    }
}

/// Text of the "About the internship" section, else the detail container,
/// else the whole body.
///
/// The section is every element sibling after its header, up to the next
/// `h2`/`h3`. Blocks are separated by newlines and list items become
/// `• ` lines of their own.
pub fn extract_description(document: &Html, selectors: &CardSelectors) -> Option<String> {
    let about = document
        .select(&selectors.section_header)
        .find(|h| {
            normalize_whitespace(&h.joined_text(" "))
                .to_lowercase()
                .contains(ABOUT_MARKER)
        })
        .map(section_text)
        .filter(|text| !text.is_empty());
    if about.is_some() {
        return about;
    }

    document
        .select(&selectors.detail_container)
        .next()
        .or_else(|| document.select(&selectors.body).next())
        .map(|el| el.joined_text(" "))
        .filter(|text| !text.is_empty())
}

fn section_text(header: ElementRef<'_>) -> String {
    let mut lines = Vec::new();
    for el in header
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .take_while(|el| !matches!(el.value().name(), "h2" | "h3"))
    {
        block_lines(el, &mut lines);
    }
    lines.join("\n")
}

/// Lines of one block. List items get a bullet line each; a block without
/// lists is a single line.
fn block_lines(el: ElementRef<'_>, lines: &mut Vec<String>) {
    let push = |lines: &mut Vec<String>, text: String| {
        if !text.is_empty() {
            lines.push(text);
        }
    };

    if matches!(el.value().name(), "ul" | "ol") {
        for item in el
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|c| c.value().name() == "li")
        {
            let text = item.joined_text(" ");
            if !text.is_empty() {
                lines.push(format!("• {text}"));
            }
        }
        return;
    }

    let holds_list = el
        .descendants()
        .filter_map(ElementRef::wrap)
        .any(|d| matches!(d.value().name(), "ul" | "ol"));
    if !holds_list {
        push(lines, el.joined_text(" "));
        return;
    }

    for child in el.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            block_lines(child_el, lines);
        } else if let Some(text) = child.value().as_text() {
            push(lines, text.trim().to_string());
        }
    }
}
