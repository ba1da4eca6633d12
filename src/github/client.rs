use async_trait::async_trait;
use reqwest::{header, Client};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::github::host::CodeHost;
use crate::github::paginator::Paginator;
use crate::github::rate_limiter::RateLimiter;
use crate::models::{Issue, RateLimitStatus, Repository};

pub struct GitHubClient {
    client: Client,
    rate_limiter: RateLimiter,
    base_url: String,
    per_page: u32,
}

impl GitHubClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", config.github_token))?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("dependabot-stats/0.1"),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(config.search_pause),
            base_url: config.api_base_url.clone(),
            per_page: config.per_page,
        })
    }

    pub async fn rate_limit(&self) -> Result<RateLimitStatus> {
        let url = format!("{}/rate_limit", self.base_url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::GitHubApi(format!(
                "Failed to fetch rate limit: {} - {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl CodeHost for GitHubClient {
    async fn search_repositories(&self, query: &str) -> Result<Vec<Repository>> {
        let url = format!("{}/search/repositories", self.base_url);
        let paginator = Paginator::new(&self.client, &self.rate_limiter);
        tracing::info!("Searching repositories: {}", query);
        paginator.fetch_search(&url, query, self.per_page).await
    }

    async fn search_issues(&self, query: &str) -> Result<Vec<Issue>> {
        let url = format!("{}/search/issues", self.base_url);
        let paginator = Paginator::new(&self.client, &self.rate_limiter);
        tracing::debug!("Searching issues: {}", query);
        paginator.fetch_search(&url, query, self.per_page).await
    }

    async fn pause(&self) {
        self.rate_limiter.pause().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(token: &str) -> Config {
        Config {
            github_token: token.to_string(),
            api_base_url: "http://localhost:8080".to_string(),
            search_pause: Duration::from_millis(0),
            per_page: 50,
        }
    }

    #[test]
    fn test_from_config_uses_settings() {
        let client = GitHubClient::from_config(&config("secret")).unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
        assert_eq!(client.per_page, 50);
    }

    #[test]
    fn test_token_with_newline_is_rejected() {
        let result = GitHubClient::from_config(&config("secret\n"));
        assert!(matches!(result, Err(Error::InvalidHeader(_))));
    }
}
