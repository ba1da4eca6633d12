use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Envelope shared by every search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults<T> {
    #[serde(default)]
    pub incomplete_results: bool,
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub html_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl Issue {
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|label| label.name == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitStatus {
    pub resources: RateLimitResources,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitResources {
    pub core: RateLimitWindow,
    pub search: RateLimitWindow,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitWindow {
    pub limit: u32,
    pub remaining: u32,
    pub reset: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_issue_search() {
        let json = r#"{
            "total_count": 1,
            "incomplete_results": false,
            "items": [{
                "number": 42,
                "title": "Bump rails from 6.0.3 to 6.0.4",
                "html_url": "https://github.com/alphagov/whitehall/pull/42",
                "created_at": "2021-01-01T00:00:00Z",
                "closed_at": "2021-01-02T00:00:00Z",
                "labels": [{"name": "dependencies"}, {"name": "security"}]
            }]
        }"#;

        let results: SearchResults<Issue> = serde_json::from_str(json).unwrap();
        assert_eq!(results.items.len(), 1);
        let issue = &results.items[0];
        assert!(issue.has_label("security"));
        assert!(!issue.has_label("ruby"));
        assert!(issue.closed_at.is_some());
    }
}
