use std::io::{BufRead, Read};
use std::path::{Path, PathBuf};

use crate::error::{FameError, Result};
use crate::git::blame_parser::parse_incremental;
use crate::git::command::stream_git;
use crate::types::{FileStats, Identity, LastCommit};

/// The three questions the engine asks of version control.
///
/// Implementations are shared across worker threads, hence `Sync`.
pub trait GitBackend: Sync {
    /// Every tracked path at the analyzed revision.
    fn list_files(&self) -> Result<Vec<String>>;

    /// Per-contributor, per-commit line counts for one file.
    fn blame(&self, path: &str, identity: Identity) -> Result<FileStats>;

    /// The most recent commit touching `path`.
    fn last_commit(&self, path: &str, identity: Identity) -> Result<LastCommit>;
}

/// [`GitBackend`] backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    repository: PathBuf,
    revision: String,
}

impl GitCli {
    pub fn new(repository: impl Into<PathBuf>, revision: impl Into<String>) -> Self {
        GitCli { repository: repository.into(), revision: revision.into() }
    }

    pub fn repository(&self) -> &Path {
        &self.repository
    }
}

impl GitBackend for GitCli {
    fn list_files(&self) -> Result<Vec<String>> {
        // -z: NUL-separated, paths are never quoted
        let args = ["ls-tree", "-r", "-z", "--name-only", self.revision.as_str()];
        stream_git(&self.repository, &args, |mut reader| {
            let mut raw = Vec::new();
            reader.read_to_end(&mut raw)?;
            Ok(split_nul_paths(&raw))
        })
    }

    fn blame(&self, path: &str, identity: Identity) -> Result<FileStats> {
        let args = ["blame", "--incremental", self.revision.as_str(), "--", path];
        stream_git(&self.repository, &args, |reader| parse_incremental(reader, identity))
    }

    fn last_commit(&self, path: &str, identity: Identity) -> Result<LastCommit> {
        let pretty = format!("--pretty=%H|{}", identity.log_placeholder());
        let args = [
            "--no-pager",
            "log",
            "-n",
            "1",
            pretty.as_str(),
            self.revision.as_str(),
            "--",
            path,
        ];
        stream_git(&self.repository, &args, |mut reader| {
            let mut line = String::new();
            reader.read_line(&mut line)?;
            parse_last_commit(&line)
        })
    }
}

fn split_nul_paths(raw: &[u8]) -> Vec<String> {
    raw.split(|b| *b == 0)
        .filter(|p| !p.is_empty())
        .map(|p| String::from_utf8_lossy(p).into_owned())
        .collect()
}

/// Parses one `<sha>|<name>` line from `git log --pretty=%H|%an`.
pub fn parse_last_commit(line: &str) -> Result<LastCommit> {
    let line = line.trim_end_matches(['\n', '\r']);
    if line.is_empty() {
        return Err(FameError::Parse("empty git log output".to_string()));
    }
    let (commit, contributor) = line
        .split_once('|')
        .ok_or_else(|| FameError::Parse(format!("unexpected git log line: {line}")))?;
    Ok(LastCommit { commit: commit.to_string(), contributor: contributor.to_string() })
}
