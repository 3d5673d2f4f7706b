//! Logging handle passed explicitly to every component.
//!
//! Production code uses [`TracingLog`], which forwards to the `tracing`
//! subscriber installed by [`init_tracing`]. Settings failures are also
//! appended to a plain error log file via [`append_error_log`].

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

pub trait Log {
    fn info(&self, message: &str);
    /// A message addressed to the person running the shim.
    fn notice(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// [`Log`] implementation backed by the global `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl Log for TracingLog {
    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn notice(&self, message: &str) {
        tracing::info!(target: "bootshim::notice", "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!("{}", message);
    }
}

/// Install the stderr `fmt` subscriber. `RUST_LOG` overrides the default
/// `info` filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber may already be installed (e.g. by an embedding binary)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Append a timestamped line to the error log, creating parent directories.
pub fn append_error_log(path: &Path, message: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    writeln!(
        file,
        "{} ERROR {}",
        chrono::Utc::now().to_rfc3339(),
        message
    )
    .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_error_log_creates_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("setup.log");

        append_error_log(&path, "first").unwrap();
        append_error_log(&path, "second").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("ERROR first"));
        assert!(lines[1].ends_with("ERROR second"));
    }

    #[test]
    fn test_append_error_log_reports_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file cannot act as a parent directory
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let err = append_error_log(&blocker.join("setup.log"), "msg").unwrap_err();
        assert!(err.to_string().starts_with("failed to"));
    }
}
