//! gopack CLI — pinned, verified installs of Go command-line tools.

mod commands;
mod config;

use std::ffi::OsString;
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use gopack_core::GopackError;
use gopack_install::CancelToken;
use tracing_subscriber::EnvFilter;

use config::GopackConfig;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "GOPACK_LOG";

#[derive(Parser)]
#[command(name = "gopack", version, about = "Pinned, verified installs of Go tools")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Install dependencies from go.pack.lock, or go.pack when there is no lockfile
    Install,
    /// Execute an installed binary
    Exec {
        /// Binary name under .gopack/bin
        binary: String,
        /// Arguments passed through to the binary
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    #[command(external_subcommand)]
    Unknown(Vec<String>),
}

fn main() {
    init_logging();
    let cli = parse_cli(std::env::args_os()).unwrap_or_else(|e| e.exit());
    let cancel = CancelToken::new();

    if let Err(e) = run(cli, &cancel) {
        eprintln!("error: {e:#}");
        process::exit(exit_code(&e));
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Parse arguments, treating an unrecognized flag like an unknown command.
fn parse_cli<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Err(e) if e.kind() == ErrorKind::UnknownArgument => Ok(Cli { command: None }),
        other => other,
    }
}

fn run(cli: Cli, cancel: &CancelToken) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Install) => {
            let (cwd, go) = project_context()?;
            commands::install::run(&cwd, &go, cancel)
        }
        Some(Commands::Exec { binary, args }) => {
            let (cwd, _) = project_context()?;
            commands::exec::run(&cwd, &binary, &args, cancel)
        }
        Some(Commands::Unknown(args)) => {
            tracing::debug!(?args, "unrecognized command");
            print_help()
        }
        None => print_help(),
    }
}

fn print_help() -> anyhow::Result<()> {
    Cli::command().print_help()?;
    Ok(())
}

/// The project directory (the cwd) and the toolchain program to use there.
fn project_context() -> anyhow::Result<(PathBuf, PathBuf)> {
    let cwd = std::env::current_dir().context("failed to get current working directory")?;
    let config = GopackConfig::load(&cwd)?;
    let go = config.go_program(std::env::var_os(config::GO_ENV).map(PathBuf::from));
    Ok((cwd, go))
}

/// Exit code for a failed run: the child's own code for `exec`, else 1.
fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<GopackError>() {
        Some(GopackError::ExecFailure { status, .. }) => {
            status.code().filter(|c| *c != 0).unwrap_or(1)
        }
        _ => 1,
    }
}
