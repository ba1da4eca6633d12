use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::{PullRequestRecord, UpdateType, VersionChange};

pub const HEADERS: [&str; 9] = [
    "repo",
    "library",
    "opened_at",
    "closed_at",
    "is_security",
    "old_version",
    "new_version",
    "update_type",
    "url",
];

/// On-disk shape of a record. Older files lack `library` and everything
/// after `is_security`.
#[derive(Debug, Serialize, Deserialize)]
struct Row {
    repo: String,
    #[serde(default)]
    library: Option<String>,
    opened_at: String,
    closed_at: String,
    is_security: String,
    #[serde(default)]
    old_version: Option<String>,
    #[serde(default)]
    new_version: Option<String>,
    #[serde(default)]
    update_type: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

impl From<&PullRequestRecord> for Row {
    fn from(record: &PullRequestRecord) -> Self {
        Self {
            repo: record.repository.clone(),
            library: record.library.clone(),
            opened_at: record.opened_at.to_rfc3339(),
            closed_at: record.closed_at.to_rfc3339(),
            is_security: if record.is_security { "true" } else { "false" }.to_string(),
            old_version: record.versions.as_ref().map(|v| v.old_version.clone()),
            new_version: record.versions.as_ref().map(|v| v.new_version.clone()),
            update_type: Some(record.update_type.as_str().to_string()),
            url: record.url.clone(),
        }
    }
}

impl Row {
    fn into_record(self, line: u64) -> Result<PullRequestRecord> {
        let opened_at = parse_timestamp(&self.opened_at)
            .ok_or_else(|| Error::malformed(line, format!("invalid opened_at \"{}\"", self.opened_at)))?;
        let closed_at = parse_timestamp(&self.closed_at)
            .ok_or_else(|| Error::malformed(line, format!("invalid closed_at \"{}\"", self.closed_at)))?;

        if closed_at < opened_at {
            return Err(Error::malformed(line, "closed_at precedes opened_at"));
        }

        let is_security = match self.is_security.as_str() {
            "true" => true,
            "false" => false,
            other => {
                return Err(Error::malformed(
                    line,
                    format!("is_security must be \"true\" or \"false\", got \"{}\"", other),
                ))
            }
        };

        let update_type = match self.update_type.as_deref() {
            None | Some("") => UpdateType::Unknown,
            Some(value) => UpdateType::parse(value).ok_or_else(|| {
                Error::malformed(line, format!("unknown update_type \"{}\"", value))
            })?,
        };

        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());
        let library = non_empty(self.library);
        let versions = match (non_empty(self.old_version), non_empty(self.new_version)) {
            (Some(old_version), Some(new_version)) => Some(VersionChange {
                old_version,
                new_version,
            }),
            _ => None,
        };

        Ok(PullRequestRecord::new(
            self.repo,
            library,
            opened_at,
            closed_at,
            is_security,
        )
        .with_versions(versions, update_type)
        .with_url(non_empty(self.url)))
    }
}

/// ISO-8601 with offset. Timestamps without an offset are read as UTC.
fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).ok().or_else(|| {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc().fixed_offset())
    })
}

pub struct RecordWriter<W: Write> {
    inner: ::csv::Writer<W>,
    written: usize,
}

impl RecordWriter<File> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Self::from_writer(file)
    }
}

impl<W: Write> RecordWriter<W> {
    pub fn from_writer(writer: W) -> Result<Self> {
        let mut inner = ::csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        inner.write_record(HEADERS)?;
        Ok(Self { inner, written: 0 })
    }

    pub fn write(&mut self, record: &PullRequestRecord) -> Result<()> {
        self.inner.serialize(Row::from(record))?;
        self.written += 1;
        Ok(())
    }

    #[cfg(test)]
    fn into_inner(self) -> Result<W> {
        self.inner
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))
    }

    /// Flushes and returns the number of rows written, header excluded.
    pub fn finish(mut self) -> Result<usize> {
        self.inner.flush()?;
        Ok(self.written)
    }
}

pub struct RecordReader<R: Read> {
    inner: ::csv::Reader<R>,
}

impl RecordReader<File> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::from_reader(file))
    }
}

impl<R: Read> RecordReader<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            inner: ::csv::Reader::from_reader(reader),
        }
    }

    /// Parses rows in file order. Any malformed row yields an error carrying
    /// its line number.
    pub fn records(&mut self) -> Result<impl Iterator<Item = Result<PullRequestRecord>> + '_> {
        let headers = self.inner.headers()?.clone();

        Ok(self.inner.records().map(move |result| {
            let raw = result.map_err(|e| match e.position().map(|pos| pos.line()) {
                Some(line) => Error::malformed(line, e.to_string()),
                None => Error::Csv(e),
            })?;
            let line = raw.position().map(|pos| pos.line()).unwrap_or_default();
            let row: Row = raw
                .deserialize(Some(&headers))
                .map_err(|e| Error::malformed(line, e.to_string()))?;
            row.into_record(line)
        }))
    }
}
