pub mod aggregator;
pub mod coordinator;
pub mod summary;

use crate::error::{FameError, Result};
use crate::filters::FilterChain;
use crate::git::GitBackend;
use crate::sort::{sort_fame_entries, CompositeKey};
use crate::types::{FameEntry, Identity};

pub const DEFAULT_PARALLEL_FACTOR: usize = 8;

/// Everything the engine needs besides the backend and the file list.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub identity: Identity,
    pub parallel_factor: usize,
    pub order_by: CompositeKey,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            identity:        Identity::Author,
            parallel_factor: DEFAULT_PARALLEL_FACTOR,
            order_by:        CompositeKey::default(),
        }
    }
}

/// Blames `paths`, folds the results into one row per contributor and ranks
/// them. Fails with the first error any file produced.
pub fn compute_fame_entries<B>(
    backend: &B,
    paths: &[String],
    options: &EngineOptions,
) -> Result<Vec<FameEntry>>
where
    B: GitBackend + ?Sized,
{
    let (stats, file_counts) =
        coordinator::collect_stats(backend, paths, options.identity, options.parallel_factor)?;
    let mut entries = summary::to_fame_entries(&stats, &file_counts);
    sort_fame_entries(&mut entries, &options.order_by);
    Ok(entries)
}

/// Full pipeline: list tracked files, filter them, compute ranked rows.
pub fn run<B>(backend: &B, filters: &FilterChain, options: &EngineOptions) -> Result<Vec<FameEntry>>
where
    B: GitBackend + ?Sized,
{
    let listed = backend
        .list_files()
        .map_err(|e| FameError::ListFiles { source: Box::new(e) })?;
    let paths = filters.apply(listed);
    log::info!(
        "{} files to blame with {} workers",
        paths.len(),
        options.parallel_factor
    );
    compute_fame_entries(backend, &paths, options)
}
