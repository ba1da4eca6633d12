use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not extract library from \"{0}\"")]
    UnparsableTitle(String),

    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    #[error("No pull requests in partition: {0}")]
    EmptyPartition(String),

    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid title pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Errors caused by the shape of the data rather than by the transport.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Error::UnparsableTitle(_) | Error::MalformedRow { .. } | Error::EmptyPartition(_)
        )
    }

    pub(crate) fn malformed(line: u64, reason: impl Into<String>) -> Self {
        Error::MalformedRow {
            line,
            reason: reason.into(),
        }
    }
}
