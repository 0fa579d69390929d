//! Utility functions and helpers.

pub mod http;
pub mod text;

use sha2::{Digest, Sha256};
use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> Option<String> {
    base.join(href.trim()).ok().map(|u| u.to_string())
}

/// Stable identifier for a listing, derived from its canonical URL.
///
/// The same URL always yields the same id, across runs and machines.
pub fn listing_id(canonical_url: &str) -> String {
    let digest = Sha256::digest(canonical_url.as_bytes());
    format!("internshala-{}", hex::encode(&digest[..8]))
}
