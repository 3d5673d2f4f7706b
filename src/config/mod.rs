mod settings;

pub use settings::*;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Name of the per-project config file looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "bootshim.toml";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    /// Where the run state flag is written. Relative paths resolve against
    /// the working directory. Default: ".env"
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    /// Append-only log that receives settings failures. Default: "/logs/setup.log"
    #[serde(default = "default_error_log")]
    pub error_log: PathBuf,

    /// Version-control binary used for the revision lookup. Default: "git"
    #[serde(default = "default_vcs_command")]
    pub vcs_command: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            state_file: default_state_file(),
            error_log: default_error_log(),
            vcs_command: default_vcs_command(),
        }
    }
}

fn default_state_file() -> PathBuf {
    PathBuf::from(".env")
}

fn default_error_log() -> PathBuf {
    PathBuf::from("/logs/setup.log")
}

fn default_vcs_command() -> String {
    "git".to_string()
}

impl Config {
    /// Resolve the state file path against `workdir`.
    pub fn state_path(&self, workdir: &Path) -> PathBuf {
        workdir.join(&self.state_file)
    }

    /// Resolve the error log path against `workdir`.
    pub fn error_log_path(&self, workdir: &Path) -> PathBuf {
        workdir.join(&self.error_log)
    }
}

/// Returns the base bootshim config directory: ~/.bootshim/
pub fn base_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    Ok(home.join(".bootshim"))
}

/// Load config from `<workdir>/bootshim.toml`, falling back to
/// ~/.bootshim/config.toml, or return defaults if neither exists.
pub fn load(workdir: &Path) -> Result<Config> {
    let project = workdir.join(PROJECT_CONFIG_FILE);
    if project.exists() {
        return load_from(&project);
    }

    // No home directory is not an error here, there is just no global file.
    if let Ok(base) = base_dir() {
        let global = base.join("config.toml");
        if global.exists() {
            return load_from(&global);
        }
    }

    Ok(Config::default())
}

/// Load config from an explicit file.
pub fn load_from(path: &Path) -> Result<Config> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(config)
}
