//! Deciding what needs to be installed.

use std::path::Path;

use gopack_core::{
    load_lockfile, load_package_file, GopackError, LockEntry, MetadataReader, PackageEntry,
    ProjectLayout, Result,
};
use tracing::debug;

/// The descriptor an install run works from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descriptor {
    /// A lockfile was found: incremental mode.
    Lockfile(Vec<LockEntry>),
    /// Only a package list was found: fresh mode.
    PackageList(Vec<PackageEntry>),
}

/// Load the lockfile if present, else the package list.
pub fn load_descriptor(layout: &ProjectLayout) -> Result<Descriptor> {
    let lock_file = layout.lock_file();
    if lock_file.exists() {
        debug!(path = %lock_file.display(), "using lockfile");
        return Ok(Descriptor::Lockfile(load_lockfile(&lock_file)?));
    }

    let package_file = layout.package_file();
    if package_file.exists() {
        debug!(path = %package_file.display(), "using package list");
        return Ok(Descriptor::PackageList(load_package_file(&package_file)?));
    }

    Err(GopackError::NoDescriptorFound {
        package_file,
        lock_file,
    })
}

/// Compute the lock entries whose installed artifact does not match its pin.
///
/// With no install root yet, every entry is required. Otherwise a missing
/// or unreadable artifact aborts the whole reconciliation.
pub fn reconcile(
    entries: &[LockEntry],
    install_root: &Path,
    reader: &dyn MetadataReader,
) -> Result<Vec<LockEntry>> {
    if !install_root.exists() {
        debug!(
            install_root = %install_root.display(),
            "install root missing, all entries required"
        );
        return Ok(entries.to_vec());
    }

    let mut required = Vec::new();
    for entry in entries {
        let installed = reader.read(install_root, &entry.module)?;
        if installed.version == entry.version && installed.checksum == entry.checksum {
            debug!(module = %entry.module, version = %entry.version, "up to date");
            continue;
        }
        debug!(
            module = %entry.module,
            pinned = %entry.version,
            installed = %installed.version,
            "out of date"
        );
        required.push(entry.clone());
    }
    Ok(required)
}
