use serde::Deserialize;
use std::path::Path;

use crate::error::{FameError, Result};
use crate::reporters::OutputFormat;
use crate::sort::OrderKey;

/// Looked up in the repository root when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = ".git-fame.yml";

/// All settings that can be placed in a .git-fame.yml config file.
/// Every field is optional; omitted fields fall back to CLI defaults.
/// CLI flags always take precedence over values set here.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FameConfig {
    pub revision: Option<String>,
    pub use_committer: Option<bool>,
    pub format: Option<String>,
    pub order_by: Option<String>,
    pub parallel_factor: Option<usize>,

    // Path filters
    pub extensions: Option<Vec<String>>,
    pub languages: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub restrict_to: Option<Vec<String>>,
}

impl FameConfig {
    /// Validates semantic constraints that serde cannot enforce.
    ///
    /// Language names and globs are checked later, when the filter chain is
    /// built, so CLI and file values go through the same path.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(fmt) = &self.format {
            if fmt.parse::<OutputFormat>().is_err() {
                return Err(format!(
                    "Invalid 'format' value: \"{fmt}\". \
                     Expected one of: \"tabular\", \"csv\", \"json\", \"json-lines\""
                ));
            }
        }

        if let Some(key) = &self.order_by {
            if key.parse::<OrderKey>().is_err() {
                return Err(format!(
                    "Invalid 'order_by' value: \"{key}\". \
                     Expected one of: \"lines\", \"commits\", \"files\""
                ));
            }
        }

        if let Some(0) = self.parallel_factor {
            return Err("Invalid 'parallel_factor' value: 0. Must be 1 or greater".to_string());
        }

        if let Some(rev) = &self.revision {
            if rev.trim().is_empty() {
                return Err("Invalid 'revision' value: must not be empty".to_string());
            }
        }

        Ok(())
    }
}

/// Reads, parses, and validates a YAML config file from `path`.
pub fn load_config(path: &Path) -> Result<FameConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        FameError::Config(format!("Cannot read config file '{}': {e}", path.display()))
    })?;
    let cfg: FameConfig = serde_yaml::from_str(&content).map_err(|e| {
        FameError::Config(format!("Invalid config file '{}': {e}", path.display()))
    })?;
    cfg.validate()
        .map_err(|e| FameError::Config(format!("Config file '{}': {e}", path.display())))?;
    log::debug!("loaded config from {}", path.display());
    Ok(cfg)
}

/// Loads `explicit` if given, otherwise `.git-fame.yml` in `repository` when
/// it exists. A missing default file is not an error.
pub fn discover_config(explicit: Option<&Path>, repository: &Path) -> Result<FameConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    let default = repository.join(DEFAULT_CONFIG_FILE);
    if default.is_file() {
        load_config(&default)
    } else {
        Ok(FameConfig::default())
    }
}

/// Annotated YAML template printed by `--generate-config`.
pub static TEMPLATE: &str = r#"# git-fame configuration file
# Generated by: git-fame --generate-config
#
# All settings are optional. Omit any field to use the built-in default.
# CLI flags always take precedence over values in this file.
# Save this file as .git-fame.yml in your repository root, or pass it with:
#
#   git-fame --config path/to/git-fame.yml

# ── Attribution ────────────────────────────────────────────────────────────────

# Revision to analyze (branch, tag or commit).
# revision: "HEAD"

# Credit the committer instead of the author of each line.
# use_committer: false

# ── Output ─────────────────────────────────────────────────────────────────────

# Output format: tabular, csv, json, json-lines
# format: "tabular"

# Primary ranking key: lines, commits, files
# order_by: "lines"

# ── Performance ────────────────────────────────────────────────────────────────

# Number of files blamed concurrently.
# parallel_factor: 8

# ── File filtering ─────────────────────────────────────────────────────────────

# Only count files with these suffixes.
# extensions:
#   - ".go"
#   - ".md"

# Only count files of these languages (case-insensitive).
# languages:
#   - "go"
#   - "markdown"

# Skip files matching these globs ('*' does not cross '/').
# exclude:
#   - "vendor/*"
#   - "*/testdata/*"

# Only count files matching at least one of these globs.
# restrict_to:
#   - "internal/*"
"#;

/// Prints the config template to stdout, or writes it to `output_path` if given.
pub fn print_template(output_path: Option<&Path>) -> Result<()> {
    match output_path {
        Some(path) => std::fs::write(path, TEMPLATE).map_err(|e| {
            FameError::Config(format!(
                "Cannot write config template to '{}': {e}",
                path.display()
            ))
        }),
        None => {
            print!("{TEMPLATE}");
            Ok(())
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
