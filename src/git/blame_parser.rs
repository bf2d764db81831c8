use std::collections::HashMap;
use std::io::BufRead;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{FameError, Result};
use crate::types::{FileStats, Identity};

/// Parses `git blame --incremental` output into contributor → commit → lines.
///
/// Each block opens with `<sha> <source-line> <result-line> <num-lines>`.
/// The first block of a commit carries the full header set (`author`,
/// `committer`, `summary`, ...); later blocks of the same commit only carry
/// `filename`, so names are remembered per commit once seen.
///
/// A block whose identity line never arrives before end of stream is dropped
/// and whatever was accumulated so far is returned.
pub fn parse_incremental<R: BufRead>(mut reader: R, identity: Identity) -> Result<FileStats> {
    let token = identity.blame_token();
    let mut stats = FileStats::new();
    let mut names: HashMap<String, String> = HashMap::new();
    // (commit, contributor) of the previous block
    let mut current: Option<(String, String)> = None;

    while let Some(header) = seek_header(&mut reader)? {
        let (commit, count) = parse_header(&header)?;

        if let Some((prev_commit, prev_name)) = &current {
            if *prev_commit == commit {
                credit(&mut stats, prev_name, &commit, count);
                continue;
            }
        }

        let name = match names.get(&commit) {
            Some(known) => known.clone(),
            None => match seek_identity(&mut reader, token)? {
                Some(found) => found,
                None => break,
            },
        };

        credit(&mut stats, &name, &commit, count);
        names.insert(commit.clone(), name.clone());
        current = Some((commit, name));
    }

    Ok(stats)
}

fn credit(stats: &mut FileStats, name: &str, commit: &str, count: usize) {
    if count == 0 {
        return;
    }
    *stats
        .entry(name.to_string())
        .or_default()
        .entry(commit.to_string())
        .or_insert(0) += count;
}

/// Splits a block header into its commit id and line count.
fn parse_header(line: &str) -> Result<(String, usize)> {
    let mut parts = line.split(' ');
    let commit = parts.next().unwrap_or_default();
    let raw_count = parts.nth(2).unwrap_or_default();
    let count = raw_count.parse::<usize>().map_err(|_| {
        FameError::Parse(format!("expected integer line count, got \"{raw_count}\" in \"{line}\""))
    })?;
    Ok((commit.to_string(), count))
}

/// Advances to the next block header. `None` at end of stream.
fn seek_header<R: BufRead>(reader: &mut R) -> Result<Option<String>> {
    while let Some(line) = next_line(reader)? {
        let first = line.split(' ').next().unwrap_or_default();
        if is_sha1(first) {
            return Ok(Some(line));
        }
    }
    Ok(None)
}

/// Advances to the `<token> <name>` line and returns the name.
fn seek_identity<R: BufRead>(reader: &mut R, token: &str) -> Result<Option<String>> {
    while let Some(line) = next_line(reader)? {
        let mut parts = line.splitn(2, ' ');
        if parts.next() == Some(token) {
            return Ok(Some(parts.next().unwrap_or_default().to_string()));
        }
    }
    Ok(None)
}

/// Reads one line without its terminator. Names that are not valid UTF-8
/// are decoded lossily rather than failing the whole file.
fn next_line<R: BufRead>(reader: &mut R) -> Result<Option<String>> {
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }
    while matches!(buf.last(), Some(b'\n' | b'\r')) {
        buf.pop();
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

static SHA1_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-f]{40}$").unwrap());

pub fn is_sha1(s: &str) -> bool {
    SHA1_RE.is_match(s)
}
