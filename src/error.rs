//! Error type shared by the engine, the git backend and the CLI.

use thiserror::Error;

/// Everything that can stop a git-fame run.
#[derive(Error, Debug)]
pub enum FameError {
    /// `--order-by` value is not one of lines/commits/files
    #[error("unsupported order key \"{0}\": expected one of \"lines\", \"commits\", \"files\"")]
    UnsupportedOrderKey(String),

    /// `--format` value has no reporter
    #[error(
        "unsupported format \"{0}\": expected one of \"tabular\", \"csv\", \"json\", \"json-lines\""
    )]
    UnsupportedFormat(String),

    /// Language names missing from the language table
    #[error("unsupported languages: {}", .0.join(", "))]
    UnsupportedLanguages(Vec<String>),

    /// Invalid glob pattern in --exclude / --restrict-to
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    #[error("invalid parallel factor {0}: must be 1 or greater")]
    InvalidParallelFactor(usize),

    /// Config file could not be read, parsed or validated
    #[error("{0}")]
    Config(String),

    /// Unexpected output from a git command
    #[error("parse error: {0}")]
    Parse(String),

    /// git could not be started or exited unsuccessfully
    #[error("git error: {0}")]
    Git(String),

    /// The rayon pool could not spawn its threads
    #[error("failed to start worker pool: {0}")]
    WorkerPool(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("error listing git files: {source}")]
    ListFiles { source: Box<FameError> },

    #[error("error blaming {path}: {source}")]
    Blame { path: String, source: Box<FameError> },

    #[error("error retrieving last commit of {path}: {source}")]
    LastCommit { path: String, source: Box<FameError> },
}

impl FameError {
    /// True for errors raised while validating options, before any git call.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            FameError::UnsupportedOrderKey(_)
                | FameError::UnsupportedFormat(_)
                | FameError::UnsupportedLanguages(_)
                | FameError::InvalidGlob { .. }
                | FameError::InvalidParallelFactor(_)
                | FameError::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_failures_are_not_configuration_errors() {
        let pool = FameError::WorkerPool("no threads".to_string());
        assert!(!pool.is_configuration());
        assert_eq!(pool.to_string(), "failed to start worker pool: no threads");

        let blame = FameError::Blame {
            path: "a.go".to_string(),
            source: Box::new(FameError::Git("boom".to_string())),
        };
        assert!(!blame.is_configuration());
        assert!(FameError::InvalidParallelFactor(0).is_configuration());
        assert!(FameError::Config("bad file".to_string()).is_configuration());
    }
}
