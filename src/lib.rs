pub mod analysis;
pub mod collector;
pub mod config;
pub mod error;
pub mod github;
pub mod models;
pub mod registry;
pub mod storage;

pub use collector::{Collector, DependabotTitleParser, TitleParser};
pub use config::{AnalyzerConfig, Config};
pub use error::{Error, Result};
pub use github::{CodeHost, GitHubClient};
pub use models::PullRequestRecord;
