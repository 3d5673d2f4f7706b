//! Persisted run state flag.
//!
//! The state file holds a single `STATE=<int>` line and is overwritten on
//! every write. Last write wins; there is no locking or atomic rename.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Key written to the state file.
pub const STATE_KEY: &str = "STATE";

/// Run state flag written to the state file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Settings validated, run in progress.
    Starting,
    Completed,
    Failed,
}

impl RunState {
    pub fn as_flag(self) -> i64 {
        match self {
            RunState::Starting => 1,
            RunState::Completed => 0,
            RunState::Failed => -1,
        }
    }

    pub fn from_flag(flag: i64) -> Option<Self> {
        match flag {
            1 => Some(RunState::Starting),
            0 => Some(RunState::Completed),
            -1 => Some(RunState::Failed),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunState::Starting => "starting",
            RunState::Completed => "completed",
            RunState::Failed => "failed",
        }
    }
}

pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StateFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the file with `STATE=<flag>`.
    pub fn write(&self, state: RunState) -> Result<()> {
        fs::write(&self.path, format!("{STATE_KEY}={}\n", state.as_flag()))
            .with_context(|| format!("failed to write state to {}", self.path.display()))
    }

    /// Read the last `STATE=` value, or `None` if the file or key is missing.
    pub fn read(&self) -> Result<Option<i64>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to read {}", self.path.display()));
            }
        };

        let mut flag = None;
        for line in content.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            if key.trim() != STATE_KEY {
                continue;
            }
            let value = value.trim();
            flag = Some(value.parse::<i64>().with_context(|| {
                format!("invalid {STATE_KEY} value {value:?} in {}", self.path.display())
            })?);
        }
        Ok(flag)
    }
}
