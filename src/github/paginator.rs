use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::github::rate_limiter::RateLimiter;
use crate::models::SearchResults;

pub struct Paginator<'a> {
    client: &'a Client,
    rate_limiter: &'a RateLimiter,
}

impl<'a> Paginator<'a> {
    pub fn new(client: &'a Client, rate_limiter: &'a RateLimiter) -> Self {
        Self {
            client,
            rate_limiter,
        }
    }

    /// Collects every item of a search, following `rel="next"` links.
    pub async fn fetch_search<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &str,
        per_page: u32,
    ) -> Result<Vec<T>> {
        let mut all_items = Vec::new();
        let mut page: u32 = 1;

        loop {
            tracing::debug!("Searching {} page {}: {}", url, page, query);
            let response = self
                .client
                .get(url)
                .query(&[
                    ("q", query.to_string()),
                    ("per_page", per_page.to_string()),
                    ("page", page.to_string()),
                ])
                .send()
                .await?;
            self.rate_limiter.observe(&response);

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(Error::GitHubApi(format!(
                    "Search \"{}\" failed: {} - {}",
                    query, status, body
                )));
            }

            let has_next = response
                .headers()
                .get("link")
                .and_then(|v| v.to_str().ok())
                .map(has_next_link)
                .unwrap_or(false);

            let results: SearchResults<T> = response.json().await?;
            if results.incomplete_results {
                tracing::warn!("Search results for \"{}\" are incomplete", query);
            }

            let items_count = results.items.len();
            all_items.extend(results.items);

            if !has_next || items_count < per_page as usize {
                break;
            }

            page += 1;
        }

        Ok(all_items)
    }
}

fn has_next_link(link: &str) -> bool {
    link.split(',').any(|part| part.contains("rel=\"next\""))
}
