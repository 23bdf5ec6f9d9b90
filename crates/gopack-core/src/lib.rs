//! Core data model for gopack.
//!
//! gopack installs Go command-line tools into a project-local directory and
//! pins each one to an exact version and module checksum. This crate holds
//! the pieces with no process orchestration of their own:
//!
//! - **Descriptors** — the `go.pack` package list and `go.pack.lock` lockfile
//! - **Layout** — where those files and the install root live
//! - **Metadata** — reading module path, version and checksum back out of an
//!   installed binary

pub mod descriptor;
pub mod error;
pub mod layout;
pub mod metadata;

// Re-exports for convenience.
pub use descriptor::{
    format_lockfile, load_lockfile, load_package_file, parse_lockfile, parse_package_file,
    unique_packages, LockEntry, PackageEntry,
};
pub use error::{GopackError, Result};
pub use layout::{artifact_path, bin_dir, ProjectLayout, INSTALL_DIR, LOCK_FILE, PACKAGE_FILE};
pub use metadata::{binary_name, parse_build_info, ArtifactMetadata, GoVersionReader, MetadataReader};
