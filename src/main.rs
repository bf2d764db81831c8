mod config;
mod engine;
mod error;
mod filters;
mod git;
mod languages;
mod reporters;
mod sort;
mod types;

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::PathBuf;
use std::time::Duration;

use config::FameConfig;
use engine::{EngineOptions, DEFAULT_PARALLEL_FACTOR};
use error::{FameError, Result};
use filters::FilterConfig;
use git::GitCli;
use reporters::OutputFormat;
use sort::CompositeKey;
use types::Identity;

#[derive(Parser, Debug)]
#[command(
    name = "git-fame",
    about = "Rank contributors by the lines they own, the commits behind them and the files they touch",
    version,
    long_about = "Runs git blame over every tracked file at a revision and reports, per\n\
                  contributor, surviving lines, distinct commits and files touched.\n\n\
                  Settings may also come from a .git-fame.yml file in the repository;\n\
                  flags given on the command line win over the file."
)]
struct Args {
    /// Repository directory
    #[arg(long, default_value = ".")]
    repository: PathBuf,

    /// Revision to analyze [default: HEAD]
    #[arg(long)]
    revision: Option<String>,

    /// Credit committers instead of authors
    #[arg(long, overrides_with = "no_use_committer")]
    use_committer: bool,

    /// Credit authors even if the config file sets use_committer
    #[arg(long, overrides_with = "use_committer")]
    no_use_committer: bool,

    /// Output format: tabular, csv, json, json-lines [default: tabular]
    #[arg(long)]
    format: Option<String>,

    /// Primary ranking key: lines, commits, files [default: lines]
    #[arg(long)]
    order_by: Option<String>,

    /// Only count files with these suffixes, e.g. ".go,.md"
    #[arg(long, value_delimiter = ',')]
    extensions: Option<Vec<String>>,

    /// Only count files of these languages, e.g. "go,markdown"
    #[arg(long, value_delimiter = ',')]
    languages: Option<Vec<String>>,

    /// Skip files matching these globs
    #[arg(long, value_delimiter = ',')]
    exclude: Option<Vec<String>>,

    /// Only count files matching these globs
    #[arg(long, value_delimiter = ',')]
    restrict_to: Option<Vec<String>>,

    /// Number of files blamed concurrently [default: 8]
    #[arg(long)]
    parallel_factor: Option<usize>,

    /// Show a spinner on stderr while computing
    #[arg(long)]
    spin: bool,

    /// YAML config file (defaults to .git-fame.yml in the repository, if present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print an annotated config template, or write it to FILE
    #[arg(long, value_name = "FILE", num_args = 0..=1)]
    generate_config: Option<Option<PathBuf>>,
}

/// Effective settings after merging flags, config file and defaults.
#[derive(Debug)]
struct Settings {
    repository: PathBuf,
    revision: String,
    format: OutputFormat,
    filters: FilterConfig,
    options: EngineOptions,
    spin: bool,
}

/// Flag beats file, file beats default.
fn resolve(args: Args, cfg: FameConfig) -> Result<Settings> {
    let format = match args.format.or(cfg.format) {
        Some(f) => f.parse::<OutputFormat>()?,
        None => OutputFormat::default(),
    };
    let order_by = match args.order_by.or(cfg.order_by) {
        Some(k) => k.parse::<CompositeKey>()?,
        None => CompositeKey::default(),
    };
    let parallel_factor = args
        .parallel_factor
        .or(cfg.parallel_factor)
        .unwrap_or(DEFAULT_PARALLEL_FACTOR);
    if parallel_factor == 0 {
        return Err(FameError::InvalidParallelFactor(parallel_factor));
    }

    let filters = FilterConfig {
        extensions: args.extensions.or(cfg.extensions).unwrap_or_default(),
        languages: args.languages.or(cfg.languages).unwrap_or_default(),
        exclude: args.exclude.or(cfg.exclude).unwrap_or_default(),
        restrict_to: args.restrict_to.or(cfg.restrict_to).unwrap_or_default(),
    };

    let use_committer = match (args.use_committer, args.no_use_committer) {
        (true, _) => true,
        (_, true) => false,
        _ => cfg.use_committer.unwrap_or(false),
    };

    Ok(Settings {
        repository: args.repository,
        revision: args.revision.or(cfg.revision).unwrap_or_else(|| "HEAD".to_string()),
        format,
        filters,
        options: EngineOptions {
            identity: Identity::from_flag(use_committer),
            parallel_factor,
            order_by,
        },
        spin: args.spin,
    })
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("{} {}", "error:".red().bold(), e);
        if e.is_configuration() {
            eprintln!("       Run with --generate-config to see every accepted setting.");
        }
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    if let Some(output) = &args.generate_config {
        return config::print_template(output.as_deref());
    }

    let cfg = config::discover_config(args.config.as_deref(), &args.repository)?;
    let settings = resolve(args, cfg)?;

    // Reject bad globs and language names before any git process starts.
    let chain = settings.filters.build()?;
    let backend = GitCli::new(&settings.repository, &settings.revision);
    log::debug!(
        "analyzing {} at {}",
        backend.repository().display(),
        settings.revision
    );

    let pb = settings.spin.then(start_spinner);
    let result = engine::run(&backend, &chain, &settings.options);
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let entries = result?;

    let stdout = io::stdout();
    let styled = stdout.is_terminal();
    let mut out = BufWriter::new(stdout.lock());
    settings.format.reporter(styled).write(&entries, &mut out)?;
    out.flush()?;
    Ok(())
}

fn start_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message("Blaming files...");
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

// ── Tests ──────────────────────────────────────────────────────────────────────
