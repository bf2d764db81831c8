use crate::types::{FameEntry, FileTouchCount, GlobalStats};

/// One row per contributor in `stats`: summed lines, distinct commits and
/// the file count recorded during merge. Row order is unspecified.
pub fn to_fame_entries(stats: &GlobalStats, file_counts: &FileTouchCount) -> Vec<FameEntry> {
    stats
        .iter()
        .map(|(name, commits)| FameEntry {
            name: name.clone(),
            lines: commits.values().sum(),
            commits: commits.len(),
            files: file_counts.get(name).copied().unwrap_or(0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CommitLines;

    #[test]
    fn test_rows_follow_formulas() {
        let mut stats = GlobalStats::new();
        stats.insert("Alice".into(), CommitLines::from([("c1".into(), 10), ("c2".into(), 4)]));
        stats.insert("Carol".into(), CommitLines::from([("c3".into(), 0)]));
        let counts = FileTouchCount::from([("Alice".into(), 3), ("Carol".into(), 1)]);

        let mut rows = to_fame_entries(&stats, &counts);
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(rows, vec![
            FameEntry::new("Alice", 14, 2, 3),
            FameEntry::new("Carol", 0, 1, 1),
        ]);
    }

    #[test]
    fn test_empty_stats_give_no_rows() {
        assert!(to_fame_entries(&GlobalStats::new(), &FileTouchCount::new()).is_empty());
    }
}
