use chrono::Duration;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::models::PullRequestRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BasicStats {
    pub count: usize,
    #[serde(serialize_with = "as_seconds")]
    pub mean: Duration,
    #[serde(serialize_with = "as_seconds")]
    pub max: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryMean {
    pub library: Option<String>,
    pub count: usize,
    #[serde(serialize_with = "as_seconds")]
    pub mean: Duration,
}

/// Libraries ranked by mean time to merge, slowest first. Ties keep the order
/// in which the libraries were first seen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupedStats {
    pub ranking: Vec<LibraryMean>,
}

impl GroupedStats {
    pub fn top(&self, n: usize) -> &[LibraryMean] {
        &self.ranking[..n.min(self.ranking.len())]
    }

    /// The last `n` entries, still slowest first. Overlaps with `top` when
    /// there are fewer than `2 * n` libraries.
    pub fn bottom(&self, n: usize) -> &[LibraryMean] {
        &self.ranking[self.ranking.len().saturating_sub(n)..]
    }

    pub fn len(&self) -> usize {
        self.ranking.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranking.is_empty()
    }
}

pub fn basic_stats(records: &[PullRequestRecord]) -> Result<BasicStats> {
    let durations: Vec<Duration> = records.iter().map(|r| r.duration).collect();
    let mean = mean_duration(&durations)?;
    let max = durations
        .iter()
        .copied()
        .max()
        .ok_or_else(|| Error::EmptyPartition("no pull requests".to_string()))?;

    Ok(BasicStats {
        count: records.len(),
        mean,
        max,
    })
}

pub fn grouped_stats(records: &[PullRequestRecord]) -> Result<GroupedStats> {
    let mut groups: Vec<(Option<String>, Vec<Duration>)> = Vec::new();
    let mut index: HashMap<Option<&str>, usize> = HashMap::new();

    for record in records {
        let key = record.library.as_deref();
        match index.get(&key) {
            Some(&i) => groups[i].1.push(record.duration),
            None => {
                index.insert(key, groups.len());
                groups.push((record.library.clone(), vec![record.duration]));
            }
        }
    }

    let mut ranking = groups
        .into_iter()
        .map(|(library, durations)| {
            Ok(LibraryMean {
                library,
                count: durations.len(),
                mean: mean_duration(&durations)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    // sort_by is stable
    ranking.sort_by(|a, b| b.mean.cmp(&a.mean));

    Ok(GroupedStats { ranking })
}

fn mean_duration(durations: &[Duration]) -> Result<Duration> {
    if durations.is_empty() {
        return Err(Error::EmptyPartition("no pull requests".to_string()));
    }

    let total = durations
        .iter()
        .fold(Duration::zero(), |acc, duration| acc + *duration);

    Ok(total / durations.len() as i32)
}

fn as_seconds<S: Serializer>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    let millis = duration.num_milliseconds();
    serializer.serialize_f64(millis as f64 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset};

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn record(library: &str, opened: &str, closed: &str, is_security: bool) -> PullRequestRecord {
        PullRequestRecord::new(
            "alphagov/whitehall",
            Some(library.to_string()),
            at(opened),
            at(closed),
            is_security,
        )
    }

    fn rails_pair() -> Vec<PullRequestRecord> {
        vec![
            record("rails", "2021-01-01T00:00:00Z", "2021-01-03T00:00:00Z", false),
            record("rails", "2021-01-05T00:00:00Z", "2021-01-06T00:00:00Z", true),
        ]
    }

    fn hours(library: &str, n: i64) -> PullRequestRecord {
        let opened = at("2021-03-01T00:00:00Z");
        PullRequestRecord::new(
            "alphagov/a",
            Some(library.to_string()),
            opened,
            opened + Duration::hours(n),
            false,
        )
    }

    #[test]
    fn test_basic_stats_example() {
        let stats = basic_stats(&rails_pair()).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, Duration::hours(36));
        assert_eq!(stats.max, Duration::days(2));
        assert!(stats.max >= stats.mean && stats.mean >= Duration::zero());
    }

    #[test]
    fn test_basic_stats_empty_fails() {
        assert!(matches!(basic_stats(&[]), Err(Error::EmptyPartition(_))));
    }

    #[test]
    fn test_single_library_group_matches_basic_mean() {
        let records = rails_pair();
        let grouped = grouped_stats(&records).unwrap();
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped.ranking[0].library.as_deref(), Some("rails"));
        assert_eq!(grouped.ranking[0].mean, basic_stats(&records).unwrap().mean);
        assert_eq!(grouped.ranking[0].mean, Duration::hours(36));
    }

    #[test]
    fn test_ranking_descending_with_stable_ties() {
        let records = vec![
            hours("a", 1),
            hours("b", 5),
            hours("c", 5),
            hours("a", 3),
            hours("d", 10),
        ];

        let grouped = grouped_stats(&records).unwrap();
        let names: Vec<_> = grouped
            .ranking
            .iter()
            .map(|g| g.library.clone().unwrap())
            .collect();
        assert_eq!(names, vec!["d", "b", "c", "a"]);
        assert_eq!(grouped.ranking[3].count, 2);
        assert_eq!(grouped.ranking[3].mean, Duration::hours(2));
    }

    #[test]
    fn test_top_and_bottom_overlap_when_few_groups() {
        let records: Vec<_> = (0..7).map(|i| hours(&format!("lib{}", i), i + 1)).collect();
        let grouped = grouped_stats(&records).unwrap();

        assert_eq!(grouped.top(5).len(), 5);
        assert_eq!(grouped.bottom(5).len(), 5);
        assert_eq!(grouped.top(5)[0].library.as_deref(), Some("lib6"));
        assert_eq!(grouped.bottom(5)[4].library.as_deref(), Some("lib0"));
        // lib4, lib3 and lib2 appear in both lists
        assert_eq!(grouped.top(5)[2], grouped.bottom(5)[0]);
        assert_eq!(grouped.top(5)[4], grouped.bottom(5)[2]);
    }

    #[test]
    fn test_top_and_bottom_disjoint_with_many_groups() {
        let records: Vec<_> = (0..12).map(|i| hours(&format!("lib{}", i), i + 1)).collect();
        let grouped = grouped_stats(&records).unwrap();
        assert!(grouped
            .top(5)
            .iter()
            .all(|entry| !grouped.bottom(5).contains(entry)));
    }

    #[test]
    fn test_missing_library_forms_its_own_group() {
        let mut unnamed = hours("x", 4);
        unnamed.library = None;
        let records = vec![hours("x", 2), unnamed];

        let grouped = grouped_stats(&records).unwrap();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped.ranking[0].library, None);
    }

    #[test]
    fn test_serializes_durations_as_seconds() {
        let stats = basic_stats(&rails_pair()).unwrap();
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["count"], 2);
        assert_eq!(json["mean"].as_f64().unwrap(), 129_600.0);
        assert_eq!(json["max"].as_f64().unwrap(), 172_800.0);
    }
}
