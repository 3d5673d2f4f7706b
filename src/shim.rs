//! Startup sequence: settings, state flag, revision lookup.
//!
//! The run writes `STATE=1` once settings are valid, resolves the revision,
//! and writes `STATE=0` on success. Failure paths after the first write leave
//! `STATE=-1` behind; a settings failure never touches the state file.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

use crate::config::{self, Config, Settings};
use crate::log::{Log, append_error_log};
use crate::revision::{self, RevisionError};
use crate::state::{RunState, StateFile};

/// Offered through the log handle when no repository exists. Nothing is
/// initialized.
pub const INIT_OFFER: &str =
    "No git repository here. Run `git init` to start tracking this project.";

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub settings: Settings,
    pub revision: Option<String>,
    pub state: i64,
}

#[derive(Debug)]
pub enum Outcome {
    Completed(RunReport),
    /// A required tool is not installed; `STATE=-1` was written and the
    /// final state write was skipped.
    SetupFailed(RevisionError),
}

/// Run the startup sequence in `workdir`.
pub fn run<L, F>(
    config: &Config,
    workdir: &Path,
    lookup: F,
    today: NaiveDate,
    log: &L,
) -> Result<Outcome>
where
    L: Log,
    F: Fn(&str) -> Option<String>,
{
    let settings = match config::parse_settings(lookup, today) {
        Ok(settings) => settings,
        Err(e) => {
            let message = format!("Error loading environment variables: {e}");
            log.error(&message);
            let error_log = config.error_log_path(workdir);
            if let Err(write_err) = append_error_log(&error_log, &message) {
                log.warn(&format!("could not record settings error: {write_err:#}"));
            }
            return Err(e).context("invalid settings");
        }
    };

    log.info(&format!(
        "settings loaded: required_int={} previous_state={} date={}",
        settings.required_int, settings.state, settings.required_date
    ));

    let state_file = StateFile::new(config.state_path(workdir));
    state_file.write(RunState::Starting)?;

    let revision = match revision::lookup(&config.vcs_command, workdir, log) {
        Ok(revision) => revision,
        Err(e @ RevisionError::ToolMissing { .. }) => {
            state_file.write(RunState::Failed)?;
            return Ok(Outcome::SetupFailed(e));
        }
        Err(e) => {
            state_file.write(RunState::Failed)?;
            log.error(&format!("revision lookup failed: {e}"));
            return Err(e).context("revision lookup failed");
        }
    };

    match revision {
        Some(ref hash) => log.info(&format!("revision {hash}")),
        None => log.notice(INIT_OFFER),
    }

    state_file.write(RunState::Completed)?;

    Ok(Outcome::Completed(RunReport {
        settings,
        revision,
        state: RunState::Completed.as_flag(),
    }))
}
