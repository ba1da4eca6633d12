use chrono::Duration;
use serde::Serialize;

use crate::analysis::partition::{partition, LibrarySets};
use crate::analysis::stats::{basic_stats, grouped_stats, BasicStats, LibraryMean};
use crate::error::{Error, Result};
use crate::models::PullRequestRecord;

/// How many libraries are listed at each end of the ranking.
pub const RANKING_SIZE: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct SectionReport {
    pub title: String,
    pub stats: BasicStats,
    pub library_count: usize,
    pub slowest: Vec<LibraryMean>,
    pub fastest: Vec<LibraryMean>,
}

impl SectionReport {
    pub fn build(title: &str, records: &[PullRequestRecord]) -> Result<Self> {
        let stats = basic_stats(records).map_err(|e| match e {
            Error::EmptyPartition(_) => Error::EmptyPartition(title.to_string()),
            other => other,
        })?;
        let grouped = grouped_stats(records)?;

        Ok(Self {
            title: title.to_string(),
            stats,
            library_count: grouped.len(),
            slowest: grouped.top(RANKING_SIZE).to_vec(),
            fastest: grouped.bottom(RANKING_SIZE).to_vec(),
        })
    }
}

/// Overall, security and non-security breakdown.
pub fn prs_report(records: &[PullRequestRecord]) -> Result<Vec<SectionReport>> {
    let (security, other): (Vec<_>, Vec<_>) =
        records.iter().cloned().partition(|r| r.is_security);

    Ok(vec![
        SectionReport::build("All PRs", records)?,
        SectionReport::build("Security PRs", &security)?,
        SectionReport::build("Non-security PRs", &other)?,
    ])
}

/// One section per partition, in `PartitionKind::ALL` order.
pub fn libraries_report(
    records: &[PullRequestRecord],
    sets: &LibrarySets,
) -> Result<Vec<SectionReport>> {
    let parts = partition(records, sets);
    parts
        .iter()
        .map(|(kind, records)| SectionReport::build(kind.title(), records))
        .collect()
}

pub fn format_text(sections: &[SectionReport]) -> String {
    let mut output = String::new();

    for section in sections {
        output.push_str(&format!("{}\n", section.title));
        output.push_str(&format!("Count: {}\n", section.stats.count));
        output.push_str(&format!("Mean: {}\n", format_duration(section.stats.mean)));
        output.push_str(&format!("Max: {}\n", format_duration(section.stats.max)));

        output.push_str(&format!(
            "Slowest libraries (of {}):\n",
            section.library_count
        ));
        push_ranking(&mut output, &section.slowest);
        output.push_str("Fastest libraries:\n");
        push_ranking(&mut output, &section.fastest);
        output.push('\n');
    }

    output
}

fn push_ranking(output: &mut String, entries: &[LibraryMean]) {
    for entry in entries {
        output.push_str(&format!(
            "  {}: {} ({} PRs)\n",
            entry.library.as_deref().unwrap_or("(unknown)"),
            format_duration(entry.mean),
            entry.count
        ));
    }
}

pub fn format_json(sections: &[SectionReport]) -> Result<String> {
    Ok(serde_json::to_string_pretty(sections)?)
}

/// Renders as `D days, H:MM:SS`, with microseconds when present.
pub fn format_duration(duration: Duration) -> String {
    let negative = duration < Duration::zero();
    let duration = if negative { -duration } else { duration };

    let total_secs = duration.num_seconds();
    let micros = (duration - Duration::seconds(total_secs))
        .num_microseconds()
        .unwrap_or(0);

    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if days > 0 {
        let unit = if days == 1 { "day" } else { "days" };
        out.push_str(&format!("{} {}, ", days, unit));
    }
    out.push_str(&format!("{}:{:02}:{:02}", hours, minutes, seconds));
    if micros > 0 {
        out.push_str(&format!(".{:06}", micros));
    }

    out
}
