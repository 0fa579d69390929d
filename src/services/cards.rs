// src/services/cards.rs

//! Listing card discovery.
//!
//! Cards are located by the `individual_internship` container class, falling
//! back to any `div` carrying an `internshipid` attribute.

use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};

/// Compiled selectors for listing and detail pages.
#[derive(Debug, Clone)]
pub struct CardSelectors {
    pub card: Selector,
    pub card_fallback: Selector,
    pub detail_link: Selector,
    pub company_name: Selector,
    pub company_link: Selector,
    pub location: Selector,
    pub section_header: Selector,
    pub detail_container: Selector,
    pub body: Selector,
}

impl CardSelectors {
    pub fn compile() -> Result<Self> {
        Ok(Self {
            card: parse_selector(r#"div[class*="individual_internship"]"#)?,
            card_fallback: parse_selector("div[internshipid]")?,
            detail_link: parse_selector(
                r#"a[href*="/internship/detail/"], a[href*="/job/detail/"]"#,
            )?,
            company_name: parse_selector("p.company-name")?,
            company_link: parse_selector(r#"a[href*="/company/"]"#)?,
            location: parse_selector(".row-1-item.locations span a")?,
            section_header: parse_selector("h2, h3")?,
            detail_container: parse_selector("div#internship_detail")?,
            body: parse_selector("body")?,
        })
    }
}

pub(crate) fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// Anchor found inside a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    pub text: String,
}

/// Read-only view of one block of a parsed page.
pub trait TextBlock {
    /// Visible text fragments, each trimmed, empty ones dropped, joined by `sep`.
    fn joined_text(&self, sep: &str) -> String;

    /// Attribute value on the block's root element.
    fn attr(&self, name: &str) -> Option<&str>;

    /// Joined text of the first descendant matching `selector`.
    fn find_text(&self, selector: &Selector) -> Option<String>;

    /// First descendant anchor matching `selector`.
    fn find_link(&self, selector: &Selector) -> Option<Link>;
}

impl TextBlock for ElementRef<'_> {
    fn joined_text(&self, sep: &str) -> String {
        self.text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(sep)
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.value().attr(name)
    }

    fn find_text(&self, selector: &Selector) -> Option<String> {
        self.select(selector).next().map(|el| el.joined_text(" "))
    }

    fn find_link(&self, selector: &Selector) -> Option<Link> {
        self.select(selector).find_map(|el| {
            let href = el.value().attr("href")?;
            Some(Link {
                href: href.to_string(),
                text: el.joined_text(" "),
            })
        })
    }
}

/// One listing block from a search results page.
#[derive(Debug, Clone, Copy)]
pub struct RawCard<'a>(ElementRef<'a>);

impl<'a> RawCard<'a> {
    pub fn new(element: ElementRef<'a>) -> Self {
        Self(element)
    }

    /// Employment type the page tags this card with, lower-cased.
    pub fn employment_type(&self) -> Option<String> {
        self.attr("employment_type")
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
    }
}

impl TextBlock for RawCard<'_> {
    fn joined_text(&self, sep: &str) -> String {
        self.0.joined_text(sep)
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.0.value().attr(name)
    }

    fn find_text(&self, selector: &Selector) -> Option<String> {
        self.0.find_text(selector)
    }

    fn find_link(&self, selector: &Selector) -> Option<Link> {
        self.0.find_link(selector)
    }
}

/// Listing cards on a page, in document order. Empty when the page has none.
pub fn locate_cards<'a>(document: &'a Html, selectors: &CardSelectors) -> Vec<RawCard<'a>> {
    let cards: Vec<_> = document.select(&selectors.card).map(RawCard::new).collect();
    if !cards.is_empty() {
        return cards;
    }
    document
        .select(&selectors.card_fallback)
        .map(RawCard::new)
        .collect()
}
