use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Mutex};
use std::thread;

use crate::engine::aggregator::StatsAggregator;
use crate::error::{FameError, Result};
use crate::git::GitBackend;
use crate::types::{CommitLines, FileStats, FileTouchCount, GlobalStats, Identity};

/// Holds the first failure of a run. Later failures are dropped.
#[derive(Default)]
struct FirstError {
    stopped: AtomicBool,
    slot: Mutex<Option<FameError>>,
}

impl FirstError {
    fn is_set(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    fn record(&self, err: FameError) {
        let mut slot = self.slot.lock().unwrap_or_else(|p| p.into_inner());
        if slot.is_none() {
            log::warn!("{err}; no further files will be started");
            *slot = Some(err);
            self.stopped.store(true, Ordering::Release);
        } else {
            log::debug!("ignoring later failure: {err}");
        }
    }

    fn take(self) -> Option<FameError> {
        self.slot.into_inner().unwrap_or_else(|p| p.into_inner())
    }
}

/// Blames every path with at most `parallel_factor` files in flight and
/// merges the results.
///
/// Per-file results travel over a channel to a single merging thread. The
/// first failure stops new files from starting; files already running are
/// waited for and their results thrown away. Nothing is returned on failure.
pub fn collect_stats<B>(
    backend: &B,
    paths: &[String],
    identity: Identity,
    parallel_factor: usize,
) -> Result<(GlobalStats, FileTouchCount)>
where
    B: GitBackend + ?Sized,
{
    if parallel_factor == 0 {
        return Err(FameError::InvalidParallelFactor(parallel_factor));
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(parallel_factor)
        .thread_name(|i| format!("git-fame-worker-{i}"))
        .build()
        .map_err(|e| FameError::WorkerPool(e.to_string()))?;

    let failure = FirstError::default();
    let (tx, rx) = mpsc::channel::<FileStats>();

    let aggregator = thread::scope(|scope| {
        let merger = scope.spawn(move || {
            let mut aggregator = StatsAggregator::new();
            for file in rx {
                aggregator.merge(file);
            }
            aggregator
        });

        pool.scope(|s| {
            for path in paths {
                if failure.is_set() {
                    break;
                }
                let tx = tx.clone();
                let failure = &failure;
                s.spawn(move |_| {
                    if failure.is_set() {
                        return;
                    }
                    log::debug!("blaming {path}");
                    match process_file(backend, path, identity) {
                        Ok(stats) => {
                            if !failure.is_set() {
                                // receiver outlives every worker
                                let _ = tx.send(stats);
                            }
                        }
                        Err(e) => failure.record(e),
                    }
                });
            }
        });

        // last sender gone: the merger sees end of stream
        drop(tx);
        merger.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic))
    });

    match failure.take() {
        Some(err) => Err(err),
        None => Ok(aggregator.into_parts()),
    }
}

/// Blame one path, falling back to its last commit when nothing is
/// attributable. The fallback entry is only built once the lookup succeeded.
fn process_file<B>(backend: &B, path: &str, identity: Identity) -> Result<FileStats>
where
    B: GitBackend + ?Sized,
{
    let stats = backend.blame(path, identity).map_err(|e| FameError::Blame {
        path: path.to_string(),
        source: Box::new(e),
    })?;
    if !stats.is_empty() {
        return Ok(stats);
    }

    let last = backend.last_commit(path, identity).map_err(|e| FameError::LastCommit {
        path: path.to_string(),
        source: Box::new(e),
    })?;
    log::debug!("{path} has no attributable lines, crediting {} via {}", last.contributor, last.commit);
    Ok(FileStats::from([(last.contributor, CommitLines::from([(last.commit, 0)]))]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LastCommit;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Barrier;
    use std::time::Duration;

    /// In-memory backend: path → blame result, plus last commits for the
    /// fallback. Tracks how many blames run at once.
    #[derive(Default)]
    struct FakeBackend {
        blames: HashMap<String, std::result::Result<FileStats, String>>,
        last: HashMap<String, LastCommit>,
        delay: Duration,
        slow: HashMap<String, Duration>,
        gate: Option<Barrier>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        blame_calls: AtomicUsize,
        completed: AtomicUsize,
    }

    impl FakeBackend {
        fn file(mut self, path: &str, entries: &[(&str, &str, usize)]) -> Self {
            let mut stats = FileStats::new();
            for (who, commit, lines) in entries {
                *stats.entry(who.to_string()).or_default().entry(commit.to_string()).or_insert(0) += lines;
            }
            self.blames.insert(path.to_string(), Ok(stats));
            self
        }

        fn failing(mut self, path: &str, message: &str) -> Self {
            self.blames.insert(path.to_string(), Err(message.to_string()));
            self
        }

        fn with_last_commit(mut self, path: &str, commit: &str, who: &str) -> Self {
            self.last.insert(
                path.to_string(),
                LastCommit { commit: commit.to_string(), contributor: who.to_string() },
            );
            self
        }

        fn delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn slow(mut self, path: &str, delay: Duration) -> Self {
            self.slow.insert(path.to_string(), delay);
            self
        }

        /// No blame proceeds until `n` of them are running at once.
        fn gate(mut self, n: usize) -> Self {
            self.gate = Some(Barrier::new(n));
            self
        }
    }

    impl GitBackend for FakeBackend {
        fn list_files(&self) -> Result<Vec<String>> {
            Ok(self.blames.keys().cloned().collect())
        }

        fn blame(&self, path: &str, _identity: Identity) -> Result<FileStats> {
            self.blame_calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.wait();
            }
            thread::sleep(self.slow.get(path).copied().unwrap_or(self.delay));
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            match self.blames.get(path) {
                Some(Ok(stats)) => {
                    self.completed.fetch_add(1, Ordering::SeqCst);
                    Ok(stats.clone())
                }
                Some(Err(msg)) => Err(FameError::Git(msg.clone())),
                None => Err(FameError::Git(format!("no such path: {path}"))),
            }
        }

        fn last_commit(&self, path: &str, _identity: Identity) -> Result<LastCommit> {
            self.last
                .get(path)
                .cloned()
                .ok_or_else(|| FameError::Git(format!("no history for {path}")))
        }
    }

    fn paths(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_merges_all_files() {
        let backend = FakeBackend::default()
            .file("a.go", &[("Alice", "c1", 10), ("Bob", "c2", 5)])
            .file("b.go", &[("Alice", "c1", 3)]);
        let (stats, files) =
            collect_stats(&backend, &paths(&["a.go", "b.go"]), Identity::Author, 4).expect("ok");
        assert_eq!(stats["Alice"]["c1"], 13);
        assert_eq!(stats["Bob"]["c2"], 5);
        assert_eq!(files["Alice"], 2);
        assert_eq!(files["Bob"], 1);
    }

    #[test]
    fn test_empty_file_uses_last_commit_with_zero_lines() {
        let backend = FakeBackend::default().file("c.txt", &[]).with_last_commit("c.txt", "c3", "Carol");
        let (stats, files) =
            collect_stats(&backend, &paths(&["c.txt"]), Identity::Author, 1).expect("ok");
        assert_eq!(stats["Carol"], CommitLines::from([("c3".to_string(), 0)]));
        assert_eq!(files["Carol"], 1);
    }

    #[test]
    fn test_failed_last_commit_lookup_is_fatal() {
        let backend = FakeBackend::default().file("c.txt", &[]).file("a.go", &[("Alice", "c1", 1)]);
        let err = collect_stats(&backend, &paths(&["a.go", "c.txt"]), Identity::Author, 2)
            .unwrap_err();
        match err {
            FameError::LastCommit { path, .. } => assert_eq!(path, "c.txt"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_blame_error_names_the_file() {
        let backend = FakeBackend::default()
            .file("ok.go", &[("Alice", "c1", 1)])
            .failing("bad.go", "exit status 128");
        let err = collect_stats(&backend, &paths(&["ok.go", "bad.go"]), Identity::Author, 2)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("bad.go") && msg.contains("exit status 128"), "got: {msg}");
    }

    #[test]
    fn test_no_new_files_start_after_failure() {
        let mut backend = FakeBackend::default();
        let names: Vec<String> = (0..30).map(|i| format!("f{i}.go")).collect();
        for name in &names {
            backend = backend.failing(name, "boom");
        }
        let err = collect_stats(&backend, &names, Identity::Author, 1).unwrap_err();
        assert!(matches!(err, FameError::Blame { .. }));
        assert_eq!(backend.blame_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failure_waits_for_running_files() {
        let backend = FakeBackend::default()
            .file("slow1.go", &[("Alice", "c1", 1)])
            .file("slow2.go", &[("Bob", "c2", 1)])
            .failing("bad.go", "boom")
            .slow("slow1.go", Duration::from_millis(200))
            .slow("slow2.go", Duration::from_millis(200))
            .gate(3);
        let names = paths(&["slow1.go", "slow2.go", "bad.go"]);
        let err = collect_stats(&backend, &names, Identity::Author, 3).unwrap_err();
        match err {
            FameError::Blame { path, .. } => assert_eq!(path, "bad.go"),
            other => panic!("unexpected error {other:?}"),
        }
        // returned only after the slow blames finished
        assert_eq!(backend.in_flight.load(Ordering::SeqCst), 0);
        assert_eq!(backend.completed.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_never_exceeds_parallel_factor() {
        let mut backend = FakeBackend::default().delay(Duration::from_millis(5));
        let names: Vec<String> = (0..40).map(|i| format!("f{i}.go")).collect();
        for name in &names {
            backend = backend.file(name, &[("Alice", "c1", 1)]);
        }
        for factor in [1, 3] {
            backend.max_in_flight.store(0, Ordering::SeqCst);
            let (stats, files) =
                collect_stats(&backend, &names, Identity::Author, factor).expect("ok");
            assert_eq!(stats["Alice"]["c1"], 40);
            assert_eq!(files["Alice"], 40);
            let peak = backend.max_in_flight.load(Ordering::SeqCst);
            assert!(peak >= 1 && peak <= factor, "peak {peak} with factor {factor}");
        }
    }

    #[test]
    fn test_zero_parallel_factor_rejected() {
        let backend = FakeBackend::default();
        let err = collect_stats(&backend, &[], Identity::Author, 0).unwrap_err();
        assert!(matches!(err, FameError::InvalidParallelFactor(0)));
    }

    #[test]
    fn test_no_paths_gives_empty_stats() {
        let backend = FakeBackend::default();
        let (stats, files) = collect_stats(&backend, &[], Identity::Author, 8).expect("ok");
        assert!(stats.is_empty() && files.is_empty());
    }
}
