use crate::error::{Error, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_REGISTRY_URL: &str = "https://docs.publishing.service.gov.uk/repos.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: String,
    pub api_base_url: String,
    pub search_pause: Duration,
    pub per_page: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let github_token = env::var("GITHUB_TOKEN")
            .map_err(|_| Error::Config("GITHUB_TOKEN environment variable not set".to_string()))?;

        let api_base_url = env::var("GITHUB_API_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let search_pause = env::var("SEARCH_PAUSE_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(2));

        let per_page = env::var("SEARCH_PER_PAGE")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|n| (1..=100).contains(n))
            .unwrap_or(100);

        Ok(Self {
            github_token,
            api_base_url,
            search_pause,
            per_page,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub registry_url: String,
}

impl AnalyzerConfig {
    pub fn from_env() -> Self {
        let registry_url = env::var("REPOS_REGISTRY_URL")
            .unwrap_or_else(|_| DEFAULT_REGISTRY_URL.to_string());

        Self { registry_url }
    }
}
