//! The external build tool.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use gopack_core::{bin_dir, GopackError, Result};
use tracing::debug;

use crate::cancel::{wait_with_cancel, CancelToken};

/// Turns a module reference into an installed artifact.
pub trait BuildTool {
    /// Build and install `reference`, blocking until the tool exits.
    fn install(&self, reference: &str, cancel: &CancelToken) -> Result<()>;
}

/// Runs `<go> install <reference>` into a fixed install root.
///
/// The destination is passed to each child through its own environment
/// (`GOPATH` and `GOBIN`); the gopack process environment is left alone.
#[derive(Debug, Clone)]
pub struct GoToolchain {
    program: PathBuf,
    install_root: PathBuf,
}

impl GoToolchain {
    pub fn new(program: impl Into<PathBuf>, install_root: impl Into<PathBuf>) -> Self {
        GoToolchain {
            program: program.into(),
            install_root: install_root.into(),
        }
    }

    fn install_command(&self, reference: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("install")
            .arg(reference)
            .env("GOPATH", &self.install_root)
            .env("GOBIN", bin_dir(&self.install_root))
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        cmd
    }
}

impl BuildTool for GoToolchain {
    fn install(&self, reference: &str, cancel: &CancelToken) -> Result<()> {
        cancel.check()?;

        debug!(
            program = %self.program.display(),
            install_root = %self.install_root.display(),
            reference,
            "running go install"
        );
        let mut child = self
            .install_command(reference)
            .spawn()
            .map_err(|source| GopackError::ToolSpawn {
                program: self.program.display().to_string(),
                source,
            })?;

        let status = wait_with_cancel(&mut child, cancel)?;
        if !status.success() {
            return Err(GopackError::ExternalToolFailure {
                reference: reference.to_string(),
                status,
            });
        }
        Ok(())
    }
}
