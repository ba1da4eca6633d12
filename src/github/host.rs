use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Issue, Repository};

/// The two search endpoints the collector depends on.
#[async_trait]
pub trait CodeHost: Send + Sync {
    async fn search_repositories(&self, query: &str) -> Result<Vec<Repository>>;
    async fn search_issues(&self, query: &str) -> Result<Vec<Issue>>;

    /// Called once after every repository's issues have been fetched.
    async fn pause(&self);
}
