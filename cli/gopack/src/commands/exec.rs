//! `gopack exec` — run a tool from the project's install root.

use std::path::Path;

use anyhow::Result;
use gopack_core::ProjectLayout;
use gopack_install::CancelToken;

/// Run `binary` with `args` from the install root of `project_dir`.
pub fn run(project_dir: &Path, binary: &str, args: &[String], cancel: &CancelToken) -> Result<()> {
    let layout = ProjectLayout::new(project_dir);
    gopack_install::execute(&layout.install_root(), binary, args, cancel)?;
    Ok(())
}
