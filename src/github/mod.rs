pub mod client;
pub mod host;
pub mod paginator;
pub mod rate_limiter;

pub use client::GitHubClient;
pub use host::CodeHost;
pub use paginator::Paginator;
pub use rate_limiter::RateLimiter;
