//! # User Agents Module
//!
//! Browser User-Agent strings rotated across search requests.

use rand::seq::SliceRandom;
use rand::Rng;

const USER_AGENT_LIST: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.2478.80",
];

/// Picks a User-Agent string using the given random source.
pub fn pick_useragent<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    USER_AGENT_LIST
        .choose(rng)
        .copied()
        // USER_AGENT_LIST is a non-empty const slice
        .unwrap_or(USER_AGENT_LIST[0])
}
