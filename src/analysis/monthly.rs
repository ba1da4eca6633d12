use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;

use crate::analysis::partition::LibrarySets;
use crate::error::Result;
use crate::models::PullRequestRecord;

pub const MONTHLY_HEADERS: [&str; 5] = [
    "Month beginning",
    "Total no. of pulls",
    "No. framework pulls",
    "No. internal pulls",
    "No. other pulls",
];

/// Pull requests opened in one calendar month. `other` can go negative when a
/// library is both internal and framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCounts {
    pub month_beginning: NaiveDate,
    pub total: usize,
    pub framework: usize,
    pub internal: usize,
    pub other: i64,
}

/// Months appear in the order they are first seen, in each record's own
/// offset.
pub fn monthly_counts(records: &[PullRequestRecord], sets: &LibrarySets) -> Vec<MonthlyCounts> {
    let mut months: Vec<MonthlyCounts> = Vec::new();
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();

    for record in records {
        let opened = record.opened_at.date_naive();
        let month = opened.with_day(1).unwrap_or(opened);

        let i = *index.entry(month).or_insert_with(|| {
            months.push(MonthlyCounts {
                month_beginning: month,
                total: 0,
                framework: 0,
                internal: 0,
                other: 0,
            });
            months.len() - 1
        });

        let entry = &mut months[i];
        entry.total += 1;
        if sets.is_framework(record) {
            entry.framework += 1;
        }
        if sets.is_internal(record) {
            entry.internal += 1;
        }
    }

    for entry in &mut months {
        entry.other = entry.total as i64 - entry.framework as i64 - entry.internal as i64;
    }

    months
}

pub fn write_monthly<W: Write>(counts: &[MonthlyCounts], writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(MONTHLY_HEADERS)?;

    for entry in counts {
        wtr.write_record([
            entry.month_beginning.to_string(),
            entry.total.to_string(),
            entry.framework.to_string(),
            entry.internal.to_string(),
            entry.other.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
