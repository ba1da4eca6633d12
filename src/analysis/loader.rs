use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use crate::error::Result;
use crate::models::PullRequestRecord;
use crate::storage::RecordReader;

/// 2020-06-11T00:00:00Z. Pull requests opened earlier predate the current
/// dependency update policy.
pub const CUTOVER_TIMESTAMP: i64 = 1_591_833_600;

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub ignore_libraries: HashSet<String>,
    pub cutover: DateTime<Utc>,
}

impl LoadOptions {
    pub fn new(ignore_libraries: &[String]) -> Self {
        Self {
            ignore_libraries: ignore_libraries.iter().cloned().collect(),
            cutover: DateTime::from_timestamp(CUTOVER_TIMESTAMP, 0).unwrap_or_default(),
        }
    }

    pub fn with_cutover(mut self, cutover: DateTime<Utc>) -> Self {
        self.cutover = cutover;
        self
    }

    /// Keeps pull requests from before the policy change too.
    pub fn without_cutover(self) -> Self {
        self.with_cutover(DateTime::<Utc>::MIN_UTC)
    }

    pub fn keeps(&self, record: &PullRequestRecord) -> bool {
        !self.ignore_libraries.contains(record.library_name())
            && record.opened_at.with_timezone(&Utc) >= self.cutover
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::new(&[])
    }
}

pub fn load<P: AsRef<Path>>(source: P, ignore_libraries: &[String]) -> Result<Vec<PullRequestRecord>> {
    load_with(source, &LoadOptions::new(ignore_libraries))
}

pub fn load_with<P: AsRef<Path>>(source: P, options: &LoadOptions) -> Result<Vec<PullRequestRecord>> {
    let path = source.as_ref();
    tracing::info!("Loading pull requests from {}", path.display());
    let mut reader = RecordReader::open(path)?;
    load_from(&mut reader, options)
}

pub fn load_from<R: Read>(
    reader: &mut RecordReader<R>,
    options: &LoadOptions,
) -> Result<Vec<PullRequestRecord>> {
    let mut records = Vec::new();
    let mut dropped = 0usize;

    for record in reader.records()? {
        let record = record?;
        if options.keeps(&record) {
            records.push(record);
        } else {
            dropped += 1;
        }
    }

    tracing::info!("Loaded {} pull requests ({} filtered out)", records.len(), dropped);
    Ok(records)
}
