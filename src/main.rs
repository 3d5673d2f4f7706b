use std::path::PathBuf;

use anyhow::{Context, Result};
use bootshim::config;
use bootshim::log::{self, TracingLog};
use bootshim::revision;
use bootshim::shim::{self, Outcome};
use bootshim::state::{RunState, StateFile};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bootshim",
    version = bootshim::VERSION,
    about = "Validate startup settings, record run state, and read the git revision"
)]
struct Cli {
    /// Working directory holding the state file and repository
    #[arg(short = 'C', long, global = true, default_value = ".")]
    workdir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the startup sequence (default)
    Run {
        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the persisted state flag
    State,
    /// Print the HEAD revision, or "none" outside a repository
    Revision,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    log::init_tracing();

    let workdir = std::fs::canonicalize(&cli.workdir)
        .with_context(|| format!("invalid working directory: {}", cli.workdir.display()))?;
    let cfg = config::load(&workdir)?;
    let log = TracingLog;

    match cli.command.unwrap_or(Commands::Run { json: false }) {
        Commands::Run { json } => {
            let outcome = shim::run(
                &cfg,
                &workdir,
                |key| std::env::var(key).ok(),
                chrono::Local::now().date_naive(),
                &log,
            )?;
            match outcome {
                Outcome::Completed(report) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&report)?);
                    }
                    Ok(())
                }
                Outcome::SetupFailed(e) => {
                    eprintln!("{e}");
                    eprintln!("bootshim cannot start; reinstall the missing tool and run again");
                    std::process::exit(1);
                }
            }
        }
        Commands::State => {
            let state_file = StateFile::new(cfg.state_path(&workdir));
            match state_file.read()? {
                Some(flag) => match RunState::from_flag(flag) {
                    Some(state) => println!("{flag} ({})", state.as_str()),
                    None => println!("{flag}"),
                },
                None => println!("unset"),
            }
            Ok(())
        }
        Commands::Revision => {
            match revision::lookup(&cfg.vcs_command, &workdir, &log)? {
                Some(hash) => println!("{hash}"),
                None => println!("none"),
            }
            Ok(())
        }
    }
}
