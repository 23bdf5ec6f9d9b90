//! Fixed on-disk layout of a gopack project.
//!
//! ```text
//! <project>/
//!   go.pack         — package list
//!   go.pack.lock    — lockfile
//!   .gopack/        — install root (GOPATH for the toolchain)
//!     bin/<name>    — one artifact per dependency
//! ```

use std::path::{Path, PathBuf};

/// Install root directory name, relative to the project directory.
pub const INSTALL_DIR: &str = ".gopack";
/// Package list file name.
pub const PACKAGE_FILE: &str = "go.pack";
/// Lockfile file name.
pub const LOCK_FILE: &str = "go.pack.lock";

/// Paths for one project directory.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    project_dir: PathBuf,
}

impl ProjectLayout {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        ProjectLayout {
            project_dir: project_dir.into(),
        }
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn install_root(&self) -> PathBuf {
        self.project_dir.join(INSTALL_DIR)
    }

    pub fn package_file(&self) -> PathBuf {
        self.project_dir.join(PACKAGE_FILE)
    }

    pub fn lock_file(&self) -> PathBuf {
        self.project_dir.join(LOCK_FILE)
    }
}

/// Directory holding installed artifacts.
pub fn bin_dir(install_root: &Path) -> PathBuf {
    install_root.join("bin")
}

/// Path of the artifact named `binary` under `install_root`.
pub fn artifact_path(install_root: &Path, binary: &str) -> PathBuf {
    bin_dir(install_root).join(binary)
}
