use std::io::{BufReader, Read};
use std::path::Path;
use std::process::{ChildStdout, Command, Stdio};
use std::thread;

use crate::error::{FameError, Result};

/// Runs `git <args>` in `cwd` and hands its stdout to `read` as a stream.
///
/// stderr is drained on a side thread so a chatty git cannot block on a full
/// pipe. The process is always waited on. A failure from `read` wins over
/// the exit status, since dropping stdout early may make git exit non-zero.
pub fn stream_git<T, F>(cwd: &Path, args: &[&str], read: F) -> Result<T>
where
    F: FnOnce(BufReader<ChildStdout>) -> Result<T>,
{
    log::trace!("git {}", args.join(" "));

    let mut child = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| FameError::Git(format!("failed to run git: {e}")))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| FameError::Git("failed to capture git stdout".to_string()))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| FameError::Git("failed to capture git stderr".to_string()))?;

    let stderr_reader = thread::spawn(move || {
        let mut stderr_text = String::new();
        let mut reader = BufReader::new(stderr);
        let _ = reader.read_to_string(&mut stderr_text);
        stderr_text
    });

    let parsed = read(BufReader::new(stdout));

    let status = child
        .wait()
        .map_err(|e| FameError::Git(format!("failed to wait for git process: {e}")))?;
    let stderr_text = stderr_reader.join().unwrap_or_default();

    let value = parsed?;
    if !status.success() {
        let subcommand = args.iter().find(|a| !a.starts_with('-')).unwrap_or(&"");
        return Err(FameError::Git(format!(
            "git {subcommand} exited with {status}: {}",
            stderr_text.trim()
        )));
    }

    Ok(value)
}
