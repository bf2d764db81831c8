use serde::Serialize;
use std::collections::HashMap;

// ─── Attribution Data ─────────────────────────────────────────────────────────

/// commit id → attributed line count.
pub type CommitLines = HashMap<String, usize>;

/// contributor → commit id → line count, for a single file.
pub type FileStats = HashMap<String, CommitLines>;

/// contributor → commit id → line count, summed over every processed file.
pub type GlobalStats = HashMap<String, CommitLines>;

/// contributor → number of distinct files the contributor appears in.
pub type FileTouchCount = HashMap<String, usize>;

/// Which name git reports for a line: the commit's author or its committer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Identity {
    #[default]
    Author,
    Committer,
}

impl Identity {
    pub fn from_flag(use_committer: bool) -> Self {
        if use_committer {
            Identity::Committer
        } else {
            Identity::Author
        }
    }

    /// Key of the header line in `git blame --incremental` output.
    pub fn blame_token(self) -> &'static str {
        match self {
            Identity::Author    => "author",
            Identity::Committer => "committer",
        }
    }

    /// `git log --pretty` placeholder for the name.
    pub fn log_placeholder(self) -> &'static str {
        match self {
            Identity::Author    => "%an",
            Identity::Committer => "%cn",
        }
    }
}

/// Most recent commit touching a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastCommit {
    pub commit: String,
    pub contributor: String,
}

// ─── Summary ──────────────────────────────────────────────────────────────────

/// One output row: everything a contributor owns at the analyzed revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FameEntry {
    pub name: String,
    pub lines: usize,
    pub commits: usize,
    pub files: usize,
}

impl FameEntry {
    pub fn new(name: impl Into<String>, lines: usize, commits: usize, files: usize) -> Self {
        FameEntry { name: name.into(), lines, commits, files }
    }
}
