use crate::types::{FileStats, FileTouchCount, GlobalStats};

/// Running totals over every file merged so far.
///
/// Owned by exactly one consumer; workers hand over [`FileStats`] and never
/// touch this directly.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatsAggregator {
    pub stats: GlobalStats,
    pub file_counts: FileTouchCount,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one file in. Every contributor present in `file` gets exactly
    /// one file credit, including zero-line fallback entries.
    pub fn merge(&mut self, file: FileStats) {
        for (contributor, commits) in file {
            *self.file_counts.entry(contributor.clone()).or_insert(0) += 1;
            let target = self.stats.entry(contributor).or_default();
            for (commit, lines) in commits {
                *target.entry(commit).or_insert(0) += lines;
            }
        }
    }

    pub fn into_parts(self) -> (GlobalStats, FileTouchCount) {
        (self.stats, self.file_counts)
    }
}
