//! Google search client.
//!
//! Scrapes `https://www.google.com/search` one page at a time (up to 10
//! results per page) until the requested count is reached or a page adds
//! no URL not already collected. Pages are spaced by a random delay.

use crate::client::{SearchClient, SearchResult};
use crate::config::BotConfig;
use crate::error::SearchError;
use crate::pacing::Pacer;
use crate::query::Query;
use crate::user_agents;
use reqwest::{Client, StatusCode};
use scraper::{ElementRef, Html, Selector};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

const SEARCH_URL: &str = "https://www.google.com/search";

/// Google returns at most this many organic results per page.
const PAGE_SIZE: usize = 10;

pub struct GoogleSearch {
    client: Client,
    lang: String,
    page_pacer: Mutex<Pacer>,
}

impl GoogleSearch {
    /// Builds a client using the timeout, language and page delay from `config`.
    pub fn new(config: &BotConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SearchError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            lang: config.lang.clone(),
            page_pacer: Mutex::new(Pacer::from_entropy(config.page_delay.0, config.page_delay.1)),
        })
    }

    async fn fetch_page(&self, query: &Query, num: usize, start: usize) -> Result<String, SearchError> {
        let user_agent = user_agents::pick_useragent(&mut rand::thread_rng());
        let params = [
            ("q", query.as_str().to_string()),
            // Asking for a couple extra avoids a second request when ads are stripped.
            ("num", (num + 2).to_string()),
            ("hl", self.lang.clone()),
            ("start", start.to_string()),
        ];

        let resp = self
            .client
            .get(SEARCH_URL)
            .header("User-Agent", user_agent)
            .header("Accept-Language", accept_language(&self.lang))
            .query(&params)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(SearchError::RateLimited(format!("Google returned HTTP {status}")));
        }
        if resp.url().path().starts_with("/sorry/") {
            return Err(SearchError::RateLimited(
                "Google redirected to its unusual-traffic page".into(),
            ));
        }
        let resp = resp.error_for_status()?;

        let html = resp.text().await?;
        tracing::trace!(bytes = html.len(), start, "Google page received");
        Ok(html)
    }

    fn next_page_delay(&self) -> Duration {
        match self.page_pacer.lock() {
            Ok(mut pacer) => pacer.next_delay(),
            Err(_) => Duration::ZERO,
        }
    }
}

impl SearchClient for GoogleSearch {
    async fn search(&self, query: &Query, count: usize) -> Result<Vec<SearchResult>, SearchError> {
        let mut results: Vec<SearchResult> = Vec::new();
        let mut start = 0;

        while results.len() < count {
            let num = (count - results.len()).min(PAGE_SIZE);
            let html = self.fetch_page(query, num, start).await?;
            let page = parse_google_html(&html, query, results.len() + 1, count - results.len())?;
            start += page.consumed;

            if merge_page(&mut results, page, count) == 0 {
                tracing::debug!(query = %query, found = results.len(), "no more new results");
                break;
            }

            if results.len() < count {
                tokio::time::sleep(self.next_page_delay()).await;
            }
        }

        Ok(results)
    }
}

/// One parsed results page.
#[derive(Debug)]
pub(crate) struct ParsedPage {
    pub results: Vec<SearchResult>,
    /// Raw result blocks visited, kept or not. The next page starts after them.
    pub consumed: usize,
}

/// Appends the URLs of `page` not already in `results`, up to `count` in total,
/// renumbering ranks to follow on. Returns how many were added.
pub(crate) fn merge_page(results: &mut Vec<SearchResult>, page: ParsedPage, count: usize) -> usize {
    let before = results.len();
    for mut result in page.results {
        if results.len() >= count {
            break;
        }
        if results.iter().any(|r| r.url == result.url) {
            continue;
        }
        result.rank = results.len() + 1;
        results.push(result);
    }
    results.len() - before
}

/// Parses one Google results page.
///
/// `first_rank` is the rank given to the first result on this page; at most
/// `limit` results are returned.
pub(crate) fn parse_google_html(
    html: &str,
    query: &Query,
    first_rank: usize,
    limit: usize,
) -> Result<ParsedPage, SearchError> {
    let document = Html::parse_document(html);

    let block_sel = selector("div.g")?;
    let link_sel = selector("a[href]")?;
    let title_sel = selector("h3")?;
    let snippet_sel = selector("div[style='-webkit-line-clamp:2'], div.VwiC3b, span.aCOpRe")?;

    let mut results = Vec::new();
    let mut consumed = 0;

    for block in document.select(&block_sel) {
        if results.len() >= limit {
            break;
        }
        consumed += 1;

        let Some(href) = block
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            continue;
        };

        let Some(url) = extract_url(href) else {
            continue;
        };

        let mut result = SearchResult::new(query, first_rank + results.len(), url);
        if let Some(title) = block.select(&title_sel).next().and_then(text_of) {
            result = result.with_title(title);
        }
        if let Some(snippet) = block.select(&snippet_sel).next().and_then(text_of) {
            result = result.with_snippet(snippet);
        }
        results.push(result);
    }

    tracing::debug!(count = results.len(), consumed, "Google results parsed");
    Ok(ParsedPage { results, consumed })
}

/// `Accept-Language` value preferring `lang`, falling back to English.
fn accept_language(lang: &str) -> String {
    if lang == "en" {
        "en-US,en;q=0.9".to_string()
    } else {
        format!("{lang},en;q=0.8")
    }
}

fn selector(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css).map_err(|e| SearchError::Parse(format!("invalid selector {css:?}: {e:?}")))
}

fn text_of(el: ElementRef<'_>) -> Option<String> {
    let text = el.text().collect::<String>().trim().to_string();
    (!text.is_empty()).then_some(text)
}

/// Resolves a result link to the target URL.
///
/// Unwraps `/url?q=` redirects and drops links that point back at Google or
/// are not http(s).
pub(crate) fn extract_url(href: &str) -> Option<String> {
    let target = if href.starts_with("/url?") {
        let wrapped = Url::parse("https://www.google.com").ok()?.join(href).ok()?;
        wrapped
            .query_pairs()
            .find(|(key, _)| key == "q" || key == "url")
            .map(|(_, value)| value.into_owned())?
    } else {
        href.to_string()
    };

    let parsed = Url::parse(&target).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    let host = parsed.host_str()?;
    if host == "google.com" || host.ends_with(".google.com") {
        return None;
    }
    Some(target)
}
