use chrono::{DateTime, Duration, FixedOffset};

/// One merged dependency-update pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRecord {
    pub repository: String,
    pub library: Option<String>,
    pub opened_at: DateTime<FixedOffset>,
    pub closed_at: DateTime<FixedOffset>,
    pub duration: Duration,
    pub is_security: bool,
    pub versions: Option<VersionChange>,
    pub update_type: UpdateType,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionChange {
    pub old_version: String,
    pub new_version: String,
}

/// Size of a version bump, judged from the first two dotted components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UpdateType {
    Major,
    Minor,
    Patch,
    #[default]
    Unknown,
}

impl UpdateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateType::Major => "major",
            UpdateType::Minor => "minor",
            UpdateType::Patch => "patch",
            UpdateType::Unknown => "unknown",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "major" => Some(UpdateType::Major),
            "minor" => Some(UpdateType::Minor),
            "patch" => Some(UpdateType::Patch),
            "unknown" => Some(UpdateType::Unknown),
            _ => None,
        }
    }
}

impl PullRequestRecord {
    pub fn new(
        repository: impl Into<String>,
        library: Option<String>,
        opened_at: DateTime<FixedOffset>,
        closed_at: DateTime<FixedOffset>,
        is_security: bool,
    ) -> Self {
        Self {
            repository: repository.into(),
            library,
            opened_at,
            closed_at,
            duration: closed_at - opened_at,
            is_security,
            versions: None,
            update_type: UpdateType::Unknown,
            url: None,
        }
    }

    pub fn with_versions(mut self, versions: Option<VersionChange>, update_type: UpdateType) -> Self {
        self.versions = versions;
        self.update_type = update_type;
        self
    }

    pub fn with_url(mut self, url: Option<String>) -> Self {
        self.url = url;
        self
    }

    /// The library name as written to disk; empty when it was never recorded.
    pub fn library_name(&self) -> &str {
        self.library.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_duration_is_derived() {
        let record = PullRequestRecord::new(
            "alphagov/whitehall",
            Some("rails".to_string()),
            at("2021-01-01T00:00:00Z"),
            at("2021-01-03T12:00:00Z"),
            false,
        );
        assert_eq!(record.duration, Duration::hours(60));
    }

    #[test]
    fn test_duration_across_offsets() {
        let record = PullRequestRecord::new(
            "alphagov/whitehall",
            None,
            at("2021-01-01T01:00:00+01:00"),
            at("2021-01-01T00:30:00Z"),
            false,
        );
        assert_eq!(record.duration, Duration::minutes(30));
        assert_eq!(record.library_name(), "");
    }

    #[test]
    fn test_update_type_names() {
        for kind in [
            UpdateType::Major,
            UpdateType::Minor,
            UpdateType::Patch,
            UpdateType::Unknown,
        ] {
            assert_eq!(UpdateType::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(UpdateType::parse("breaking"), None);
    }

    #[test]
    fn test_equality_is_structural() {
        let a = PullRequestRecord::new(
            "alphagov/a",
            Some("rake".to_string()),
            at("2021-01-01T00:00:00Z"),
            at("2021-01-02T00:00:00Z"),
            true,
        );
        let b = a.clone();
        assert_eq!(a, b);

        let c = PullRequestRecord {
            is_security: false,
            ..b
        };
        assert_ne!(a, c);
    }
}
