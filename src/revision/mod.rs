//! Revision lookup through the version-control tool.
//!
//! Repository presence is decided on the filesystem: `GIT_DIR` if set,
//! otherwise a `.git` entry in `dir` or one of its ancestors. Git itself is
//! only asked for HEAD once a repository is known to exist, so every git
//! failure is reported as an error and never read as "no repository".

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use thiserror::Error;

use crate::log::Log;

/// Warning emitted when the working directory is not inside a repository.
pub const NO_REPOSITORY_WARNING: &str = "No Git repository found. Skipping Git info.";

#[derive(Debug, Error)]
pub enum RevisionError {
    /// The tool binary is not installed or not on PATH.
    #[error("{command} not found; install it or set vcs_command in bootshim.toml")]
    ToolMissing { command: String },
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    #[error("`{command}` exited with {}: {stderr}", exit_label(.code))]
    Command {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("`{command}` printed an empty revision")]
    EmptyRevision { command: String },
}

fn exit_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| format!("status {c}"))
}

/// Returns the repository location for `dir`, if there is one.
pub fn probe_repository(dir: &Path) -> Option<PathBuf> {
    find_repository(dir, std::env::var_os("GIT_DIR"))
}

/// `GIT_DIR` wins when set (relative values resolve against `dir`), else
/// the nearest `.git` file or directory walking up from `dir`.
fn find_repository(dir: &Path, git_dir: Option<OsString>) -> Option<PathBuf> {
    if let Some(git_dir) = git_dir.filter(|d| !d.is_empty()) {
        return Some(dir.join(git_dir));
    }
    dir.ancestors()
        .map(|ancestor| ancestor.join(".git"))
        .find(|candidate| candidate.exists())
}

/// Resolve the HEAD commit hash of the repository containing `dir`.
///
/// Returns `Ok(None)` and logs one warning when there is no repository.
/// The tool must be installed either way.
pub fn lookup<L: Log>(
    vcs_command: &str,
    dir: &Path,
    log: &L,
) -> Result<Option<String>, RevisionError> {
    check_output(vcs_command, None, &["--version"])?;

    if probe_repository(dir).is_none() {
        log.warn(NO_REPOSITORY_WARNING);
        return Ok(None);
    }

    let args = ["rev-parse", "--verify", "HEAD"];
    let output = check_output(vcs_command, Some(dir), &args)?;
    let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if hash.is_empty() {
        return Err(RevisionError::EmptyRevision {
            command: command_line(vcs_command, &args),
        });
    }
    Ok(Some(hash))
}

/// Run the tool and turn a non-zero exit into [`RevisionError::Command`].
fn check_output(
    vcs_command: &str,
    dir: Option<&Path>,
    args: &[&str],
) -> Result<Output, RevisionError> {
    let output = run_vcs(vcs_command, dir, args)?;
    if !output.status.success() {
        return Err(RevisionError::Command {
            command: command_line(vcs_command, args),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output)
}

fn run_vcs(
    vcs_command: &str,
    dir: Option<&Path>,
    args: &[&str],
) -> Result<Output, RevisionError> {
    let mut cmd = Command::new(vcs_command);
    if let Some(dir) = dir {
        cmd.arg("-C").arg(dir);
    }
    cmd.args(args)
        .output()
        .map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                RevisionError::ToolMissing {
                    command: vcs_command.to_string(),
                }
            } else {
                RevisionError::Spawn {
                    command: vcs_command.to_string(),
                    source,
                }
            }
        })
}

fn command_line(vcs_command: &str, args: &[&str]) -> String {
    format!("{vcs_command} {}", args.join(" "))
}
