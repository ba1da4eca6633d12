use serde::Serialize;
use std::collections::HashSet;

use crate::error::Result;
use crate::models::PullRequestRecord;
use crate::registry::fetch_internal_libraries;

pub const DEFAULT_FRAMEWORK_LIBRARIES: [&str; 5] = [
    "factory_bot_rails",
    "jasmine",
    "rails",
    "rspec-rails",
    "sass-rails",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PartitionKind {
    Security,
    Internal,
    Framework,
    ThirdParty,
    AllAllowed,
    Ignored,
}

impl PartitionKind {
    pub const ALL: [PartitionKind; 6] = [
        PartitionKind::Security,
        PartitionKind::Internal,
        PartitionKind::Framework,
        PartitionKind::ThirdParty,
        PartitionKind::AllAllowed,
        PartitionKind::Ignored,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            PartitionKind::Security => "Security PRs",
            PartitionKind::Internal => "Internal library PRs",
            PartitionKind::Framework => "Framework PRs",
            PartitionKind::ThirdParty => "Third-party PRs (framework and other)",
            PartitionKind::AllAllowed => "Allowed PRs (security, internal and framework)",
            PartitionKind::Ignored => "Other PRs",
        }
    }
}

/// Internal and framework library names used to classify records.
#[derive(Debug, Clone, Default)]
pub struct LibrarySets {
    pub internal: HashSet<String>,
    pub framework: HashSet<String>,
}

impl LibrarySets {
    pub fn new(internal: &[String], framework: &[String]) -> Self {
        Self {
            internal: internal.iter().cloned().collect(),
            framework: framework.iter().cloned().collect(),
        }
    }

    /// Fills unset lists with their defaults. The registry is only contacted
    /// when no internal list was given.
    pub async fn resolve(
        internal: Option<Vec<String>>,
        framework: Option<Vec<String>>,
        registry_url: &str,
    ) -> Result<Self> {
        let internal = match internal {
            Some(names) => names,
            None => fetch_internal_libraries(registry_url).await?,
        };
        let framework = framework.unwrap_or_else(|| {
            DEFAULT_FRAMEWORK_LIBRARIES
                .iter()
                .map(|name| name.to_string())
                .collect()
        });

        Ok(Self::new(&internal, &framework))
    }

    pub fn is_internal(&self, record: &PullRequestRecord) -> bool {
        record
            .library
            .as_ref()
            .is_some_and(|name| self.internal.contains(name))
    }

    pub fn is_framework(&self, record: &PullRequestRecord) -> bool {
        record
            .library
            .as_ref()
            .is_some_and(|name| self.framework.contains(name))
    }
}

/// Named views over the records. They overlap: a security update of a
/// framework library is in both `security` and `framework`, and is counted
/// twice in `all_allowed`.
#[derive(Debug, Clone, Default)]
pub struct Partitions {
    pub security: Vec<PullRequestRecord>,
    pub internal: Vec<PullRequestRecord>,
    pub framework: Vec<PullRequestRecord>,
    pub third_party: Vec<PullRequestRecord>,
    pub all_allowed: Vec<PullRequestRecord>,
    pub ignored: Vec<PullRequestRecord>,
}

impl Partitions {
    pub fn get(&self, kind: PartitionKind) -> &[PullRequestRecord] {
        match kind {
            PartitionKind::Security => &self.security,
            PartitionKind::Internal => &self.internal,
            PartitionKind::Framework => &self.framework,
            PartitionKind::ThirdParty => &self.third_party,
            PartitionKind::AllAllowed => &self.all_allowed,
            PartitionKind::Ignored => &self.ignored,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (PartitionKind, &[PullRequestRecord])> {
        PartitionKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}

pub fn partition(records: &[PullRequestRecord], sets: &LibrarySets) -> Partitions {
    let mut parts = Partitions::default();

    for record in records {
        let internal = sets.is_internal(record);
        let framework = sets.is_framework(record);

        if record.is_security {
            parts.security.push(record.clone());
        }
        if internal {
            parts.internal.push(record.clone());
        }
        if framework {
            parts.framework.push(record.clone());
        }
        if !record.is_security && !internal && !framework {
            parts.ignored.push(record.clone());
        }
    }

    parts.third_party = [parts.framework.as_slice(), parts.ignored.as_slice()].concat();
    parts.all_allowed = [
        parts.security.as_slice(),
        parts.internal.as_slice(),
        parts.framework.as_slice(),
    ]
    .concat();

    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn record(library: &str, is_security: bool) -> PullRequestRecord {
        PullRequestRecord::new(
            "alphagov/whitehall",
            Some(library.to_string()),
            DateTime::parse_from_rfc3339("2021-01-01T00:00:00Z").unwrap(),
            DateTime::parse_from_rfc3339("2021-01-02T00:00:00Z").unwrap(),
            is_security,
        )
    }

    fn sets() -> LibrarySets {
        LibrarySets::new(
            &["govuk_app_config".to_string(), "slimmer".to_string()],
            &["rails".to_string(), "jasmine".to_string()],
        )
    }

    fn counts(parts: &Partitions) -> Vec<(PartitionKind, usize)> {
        parts.iter().map(|(kind, records)| (kind, records.len())).collect()
    }

    #[test]
    fn test_disjoint_sets_add_up() {
        let records = vec![
            record("nokogiri", true),
            record("govuk_app_config", false),
            record("rails", false),
            record("rubocop", false),
            record("pry", false),
        ];

        let parts = partition(&records, &sets());

        assert_eq!(
            counts(&parts),
            vec![
                (PartitionKind::Security, 1),
                (PartitionKind::Internal, 1),
                (PartitionKind::Framework, 1),
                (PartitionKind::ThirdParty, 3),
                (PartitionKind::AllAllowed, 3),
                (PartitionKind::Ignored, 2),
            ]
        );
        assert_eq!(
            parts.all_allowed.len(),
            parts.security.len() + parts.internal.len() + parts.framework.len()
        );
    }

    #[test]
    fn test_overlapping_record_is_double_counted() {
        let records = vec![record("rails", true), record("pry", false)];

        let parts = partition(&records, &sets());

        assert_eq!(parts.security.len(), 1);
        assert_eq!(parts.framework.len(), 1);
        assert_eq!(parts.ignored.len(), 1);
        // the security rails update is allowed twice over
        assert_eq!(parts.all_allowed.len(), 2);
        assert_eq!(parts.all_allowed[0], parts.all_allowed[1]);
        assert_eq!(parts.third_party.len(), 2);
    }

    #[test]
    fn test_library_in_both_sets() {
        let both = LibrarySets::new(&["rails".to_string()], &["rails".to_string()]);
        let parts = partition(&[record("rails", false)], &both);

        assert_eq!(parts.internal.len(), 1);
        assert_eq!(parts.framework.len(), 1);
        assert_eq!(parts.all_allowed.len(), 2);
        assert!(parts.ignored.is_empty());
    }

    #[test]
    fn test_third_party_lists_framework_first() {
        let records = vec![record("pry", false), record("rails", false)];
        let parts = partition(&records, &sets());
        let names: Vec<_> = parts.third_party.iter().map(|r| r.library_name()).collect();
        assert_eq!(names, vec!["rails", "pry"]);
    }

    #[test]
    fn test_unnamed_library_is_ignored() {
        let mut unnamed = record("rails", false);
        unnamed.library = None;
        let parts = partition(&[unnamed], &sets());
        assert_eq!(parts.ignored.len(), 1);
        assert!(parts.framework.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_uses_explicit_lists_without_network() {
        let sets = LibrarySets::resolve(
            Some(vec!["slimmer".to_string()]),
            None,
            "http://127.0.0.1:9/unreachable",
        )
        .await
        .unwrap();

        assert!(sets.internal.contains("slimmer"));
        assert_eq!(sets.framework.len(), DEFAULT_FRAMEWORK_LIBRARIES.len());
        assert!(sets.framework.contains("rspec-rails"));
    }

    #[tokio::test]
    async fn test_resolve_builds_fresh_sets_each_call() {
        let mut first = LibrarySets::resolve(Some(vec![]), None, "unused").await.unwrap();
        first.framework.insert("sinatra".to_string());

        let second = LibrarySets::resolve(Some(vec![]), None, "unused").await.unwrap();
        assert!(!second.framework.contains("sinatra"));
    }
}
