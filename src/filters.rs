use glob::{MatchOptions, Pattern};

use crate::error::{FameError, Result};
use crate::languages::extensions_for;

/// `*` and `?` stay within one path segment, like shell globs.
const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Raw filter settings as given on the command line or in the config file.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    pub extensions: Vec<String>,
    pub languages: Vec<String>,
    pub exclude: Vec<String>,
    pub restrict_to: Vec<String>,
}

impl FilterConfig {
    /// Validates globs and language names and assembles the chain.
    /// Empty lists contribute no stage.
    pub fn build(&self) -> Result<FilterChain> {
        let mut stages = Vec::new();

        if !self.extensions.is_empty() {
            stages.push(PathFilter::Suffix(self.extensions.clone()));
        }
        if !self.languages.is_empty() {
            stages.push(PathFilter::Suffix(extensions_for(&self.languages)?));
        }
        if !self.exclude.is_empty() {
            stages.push(PathFilter::Exclude(compile(&self.exclude)?));
        }
        if !self.restrict_to.is_empty() {
            stages.push(PathFilter::RestrictTo(compile(&self.restrict_to)?));
        }

        Ok(FilterChain { stages })
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| FameError::InvalidGlob {
                pattern: p.clone(),
                message: e.to_string(),
            })
        })
        .collect()
}

/// One stage of the chain.
#[derive(Debug, Clone)]
pub enum PathFilter {
    /// Keep paths ending with any suffix.
    Suffix(Vec<String>),
    /// Drop paths matching any glob.
    Exclude(Vec<Pattern>),
    /// Keep only paths matching some glob.
    RestrictTo(Vec<Pattern>),
}

impl PathFilter {
    pub fn keeps(&self, path: &str) -> bool {
        match self {
            PathFilter::Suffix(suffixes) => suffixes.iter().any(|s| path.ends_with(s.as_str())),
            PathFilter::Exclude(patterns) => !matches_any(patterns, path),
            PathFilter::RestrictTo(patterns) => matches_any(patterns, path),
        }
    }
}

fn matches_any(patterns: &[Pattern], path: &str) -> bool {
    patterns.iter().any(|p| p.matches_with(path, GLOB_OPTIONS))
}

/// Stages applied in order; each sees only what the previous one kept.
#[derive(Debug, Clone, Default)]
pub struct FilterChain {
    stages: Vec<PathFilter>,
}

impl FilterChain {
    pub fn apply(&self, mut paths: Vec<String>) -> Vec<String> {
        for stage in &self.stages {
            paths.retain(|p| stage.keeps(p));
        }
        paths
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
