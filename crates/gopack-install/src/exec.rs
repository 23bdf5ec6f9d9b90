//! Running an installed tool.

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Stdio};

use gopack_core::{artifact_path, GopackError, Result};
use tracing::debug;

use crate::cancel::{wait_with_cancel, CancelToken};

/// Run `install_root/bin/<binary>` with `args` and inherited stdio.
///
/// Any unsuccessful exit becomes `ExecFailure` carrying the child's status.
pub fn execute<I, S>(install_root: &Path, binary: &str, args: I, cancel: &CancelToken) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    cancel.check()?;

    let path = artifact_path(install_root, binary);
    debug!(path = %path.display(), "executing installed binary");

    let mut child = Command::new(&path)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|source| GopackError::ExecSpawn {
            path: path.clone(),
            source,
        })?;

    let status = wait_with_cancel(&mut child, cancel)?;
    if !status.success() {
        return Err(GopackError::ExecFailure {
            binary: binary.to_string(),
            status,
        });
    }
    Ok(())
}
