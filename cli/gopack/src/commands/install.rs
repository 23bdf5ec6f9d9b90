//! `gopack install` — reconcile installed tools with `go.pack` / `go.pack.lock`.

use std::path::Path;

use anyhow::Result;
use gopack_core::{GoVersionReader, ProjectLayout, LOCK_FILE};
use gopack_install::{run_install, CancelToken, GoToolchain, InstallOutcome};

/// Install or verify every declared tool for the project in `project_dir`.
pub fn run(project_dir: &Path, go: &Path, cancel: &CancelToken) -> Result<()> {
    let layout = ProjectLayout::new(project_dir);
    let tool = GoToolchain::new(go, layout.install_root());
    let reader = GoVersionReader::new(go);

    match run_install(&layout, &tool, &reader, cancel)? {
        InstallOutcome::UpToDate => {}
        InstallOutcome::Reinstalled { count } => {
            println!("Verified {count} reinstalled tool(s) against {LOCK_FILE}");
        }
        InstallOutcome::Locked { entries } => {
            println!("Pinned {} tool(s) in {LOCK_FILE}", entries.len());
        }
    }
    Ok(())
}
