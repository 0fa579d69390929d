// src/utils/text.rs

//! Text cleanup, description formatting and email scanning.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::DescriptionFormat;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email regex")
});

const BULLETS: [&str; 4] = ["• ", "•", "- ", "* "];

/// Collapse runs of whitespace into a single space and trim.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Render extracted description text in the requested format.
///
/// Input is line-oriented: one block of the detail page per line.
pub fn format_description(text: &str, format: DescriptionFormat) -> String {
    match format {
        DescriptionFormat::Plain => normalize_whitespace(text),
        DescriptionFormat::Markdown => to_markdown(text),
        DescriptionFormat::Html => to_html(text),
    }
}

fn lines(text: &str) -> impl Iterator<Item = String> + '_ {
    text.lines()
        .map(normalize_whitespace)
        .filter(|line| !line.is_empty())
}

fn bullet_item(line: &str) -> Option<&str> {
    BULLETS
        .iter()
        .find_map(|b| line.strip_prefix(b))
        .map(str::trim_start)
        .filter(|rest| !rest.is_empty())
}

fn to_markdown(text: &str) -> String {
    let mut out = String::new();
    let mut prev_item = false;

    for line in lines(text) {
        let item = bullet_item(&line);
        if !out.is_empty() {
            out.push_str(if prev_item && item.is_some() { "\n" } else { "\n\n" });
        }
        match item {
            Some(rest) => {
                out.push_str("- ");
                out.push_str(rest);
            }
            None => out.push_str(&line),
        }
        prev_item = item.is_some();
    }
    out
}

fn to_html(text: &str) -> String {
    lines(text)
        .map(|line| format!("<p>{}</p>", escape_html(&line)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Email addresses found in `text`, in order of appearance, without repeats.
pub fn extract_emails(text: &str) -> Vec<String> {
    let mut emails: Vec<String> = Vec::new();
    for m in EMAIL.find_iter(text) {
        let email = m.as_str().to_string();
        if !emails.contains(&email) {
            emails.push(email);
        }
    }
    emails
}
