use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

use crate::collector::title::{determine_update_type, TitleParser};
use crate::error::{Error, Result};
use crate::github::CodeHost;
use crate::models::{Issue, PullRequestRecord};
use crate::storage::RecordWriter;

pub const DEPENDABOT_AUTHORS: [&str; 2] = ["app/dependabot", "app/dependabot-preview"];
pub const SECURITY_LABEL: &str = "security";

pub struct Collector<H: CodeHost> {
    host: H,
    parser: Box<dyn TitleParser>,
    progress: ProgressBar,
}

impl<H: CodeHost> Collector<H> {
    pub fn new(host: H, parser: impl TitleParser + 'static) -> Self {
        Self {
            host,
            parser: Box::new(parser),
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_progress(mut self) -> Self {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} repos {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        self.progress = pb;
        self
    }

    /// Non-archived repositories of `account` tagged with `topic`, sorted by
    /// full name.
    pub async fn list_repositories(&self, account: &str, topic: &str) -> Result<Vec<String>> {
        let query = format!("user:{} topic:{} archived:false", account, topic);
        let repos = self.host.search_repositories(&query).await?;

        let mut names: Vec<String> = repos
            .into_iter()
            .filter(|repo| !repo.archived)
            .map(|repo| repo.full_name)
            .collect();
        names.sort();
        names.dedup();

        Ok(names)
    }

    /// Lazily yields one record per merged Dependabot pull request, repository
    /// by repository in input order. Nothing is fetched until the stream is
    /// polled.
    pub fn list_pull_requests<'a>(
        &'a self,
        repositories: &'a [String],
    ) -> impl Stream<Item = Result<PullRequestRecord>> + 'a {
        let total = repositories.len();
        self.progress.set_length(total as u64);

        stream::iter(repositories.iter().enumerate())
            .then(move |(i, repository)| self.fetch_repository(repository, i, total))
            .map_ok(|records| stream::iter(records.into_iter().map(Ok::<_, Error>)))
            .try_flatten()
    }

    async fn fetch_repository(
        &self,
        repository: &str,
        index: usize,
        total: usize,
    ) -> Result<Vec<PullRequestRecord>> {
        tracing::info!("Downloading: {} {}/{}", repository, index, total);
        self.progress.set_message(repository.to_string());

        let issues = self.host.search_issues(&pull_request_query(repository)).await?;

        let mut records = Vec::with_capacity(issues.len());
        for issue in issues {
            if let Some(record) = self.to_record(repository, issue)? {
                records.push(record);
            }
        }
        tracing::debug!("{}: {} dependency updates", repository, records.len());

        self.progress.inc(1);
        if index + 1 == total {
            self.progress.finish_with_message("done");
        }

        self.host.pause().await;
        Ok(records)
    }

    fn to_record(&self, repository: &str, issue: Issue) -> Result<Option<PullRequestRecord>> {
        let Some(library) = self.parser.extract_library(&issue.title)? else {
            tracing::debug!("Skipping \"{}\" in {}", issue.title, repository);
            return Ok(None);
        };

        let closed_at = issue.closed_at.ok_or_else(|| {
            Error::GitHubApi(format!(
                "merged pull request #{} in {} has no close time",
                issue.number, repository
            ))
        })?;
        if closed_at < issue.created_at {
            return Err(Error::GitHubApi(format!(
                "pull request #{} in {} was closed before it was opened",
                issue.number, repository
            )));
        }

        let versions = self.parser.extract_versions(&issue.title);
        let update_type = versions
            .as_ref()
            .map(|v| determine_update_type(&v.old_version, &v.new_version))
            .unwrap_or_default();

        let record = PullRequestRecord::new(
            repository,
            Some(library),
            issue.created_at.into(),
            closed_at.into(),
            issue.has_label(SECURITY_LABEL),
        )
        .with_versions(versions, update_type)
        .with_url(issue.html_url);

        Ok(Some(record))
    }
}

pub fn pull_request_query(repository: &str) -> String {
    let authors: Vec<String> = DEPENDABOT_AUTHORS
        .iter()
        .map(|author| format!("author:{}", author))
        .collect();
    format!("repo:{} {} is:pr is:merged", repository, authors.join(" "))
}

/// Writes the header and then every record as it arrives. Stops at the first
/// error; rows already written stay in the file.
pub async fn persist<S, P>(records: S, destination: P) -> Result<usize>
where
    S: Stream<Item = Result<PullRequestRecord>>,
    P: AsRef<Path>,
{
    let mut writer = RecordWriter::create(destination)?;
    futures::pin_mut!(records);

    while let Some(record) = records.try_next().await? {
        writer.write(&record)?;
    }

    writer.finish()
}
