use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use reqwest::Response;
use tokio::time::{sleep, Duration};

/// Fixed pause between search requests. The search API allows 30 requests a
/// minute; the pause is not adjusted from response headers.
pub struct RateLimiter {
    pause: Duration,
}

impl RateLimiter {
    pub fn new(pause: Duration) -> Self {
        Self { pause }
    }

    pub async fn pause(&self) {
        if self.pause.is_zero() {
            return;
        }
        tracing::debug!("Pausing {:?} for search rate limiting", self.pause);
        sleep(self.pause).await;
    }

    pub fn observe(&self, response: &Response) {
        if let Some(reset_at) = exhausted_until(response.headers()) {
            tracing::warn!("Rate limited until {}", reset_at.to_rfc2822());
        }
    }
}

fn exhausted_until(headers: &HeaderMap) -> Option<DateTime<Utc>> {
    let remaining: u32 = headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())?;

    if remaining > 0 {
        return None;
    }

    headers
        .get("x-ratelimit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_exhausted_until_reads_reset() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
        headers.insert("x-ratelimit-reset", HeaderValue::from_static("1609459200"));

        let reset = exhausted_until(&headers).unwrap();
        assert_eq!(reset.to_rfc3339(), "2021-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_not_exhausted_with_remaining_budget() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("12"));
        headers.insert("x-ratelimit-reset", HeaderValue::from_static("1609459200"));
        assert!(exhausted_until(&headers).is_none());
        assert!(exhausted_until(&HeaderMap::new()).is_none());
    }

    #[tokio::test]
    async fn test_zero_pause_returns_immediately() {
        let limiter = RateLimiter::new(Duration::ZERO);
        let start = std::time::Instant::now();
        limiter.pause().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
