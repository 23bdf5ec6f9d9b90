//! Driving the build tool and pinning the results.

use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

use gopack_core::{
    format_lockfile, unique_packages, GopackError, LockEntry, MetadataReader, PackageEntry,
    ProjectLayout, Result,
};
use tracing::{debug, info};

use crate::cancel::CancelToken;
use crate::reconcile::{load_descriptor, reconcile, Descriptor};
use crate::toolchain::BuildTool;

/// How an install run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Every pinned artifact already matched; nothing was run.
    UpToDate,
    /// Incremental mode reinstalled and verified `count` entries.
    Reinstalled { count: usize },
    /// Fresh mode installed the package list and wrote these pins.
    Locked { entries: Vec<LockEntry> },
}

/// Installs entries one at a time, stopping at the first failure.
pub struct Installer<'a> {
    tool: &'a dyn BuildTool,
    reader: &'a dyn MetadataReader,
    install_root: &'a Path,
    cancel: &'a CancelToken,
}

impl<'a> Installer<'a> {
    pub fn new(
        tool: &'a dyn BuildTool,
        reader: &'a dyn MetadataReader,
        install_root: &'a Path,
        cancel: &'a CancelToken,
    ) -> Self {
        Installer {
            tool,
            reader,
            install_root,
            cancel,
        }
    }

    /// Reinstall pinned entries and check each result against its pin.
    pub fn install_locked(&self, required: &[LockEntry]) -> Result<()> {
        for entry in required {
            let reference = entry.qualified_reference();
            self.install_one(&reference)?;

            let installed = self.reader.read(self.install_root, &reference)?;
            if installed.checksum != entry.checksum {
                return Err(GopackError::IntegrityMismatch {
                    binary: entry.binary_name().to_string(),
                    expected: entry.checksum.clone(),
                    actual: installed.checksum,
                });
            }
            debug!(module = %entry.module, checksum = %entry.checksum, "verified");
        }
        Ok(())
    }

    /// Install every package, then pin what was installed to `lock_file`.
    ///
    /// Repeated references are installed once; two references sharing a
    /// binary name fail before anything is installed. The lockfile is
    /// written once, after all installs have succeeded.
    pub fn install_packages(
        &self,
        packages: &[PackageEntry],
        lock_file: &Path,
    ) -> Result<Vec<LockEntry>> {
        let packages = unique_packages(packages)?;
        for package in &packages {
            self.install_one(&package.reference)?;
        }

        let mut entries = Vec::with_capacity(packages.len());
        for package in &packages {
            let installed = self.reader.read(self.install_root, &package.reference)?;
            entries.push(LockEntry::new(
                installed.module_path,
                installed.version,
                installed.checksum,
            ));
        }

        ensure_unique_modules(&entries)?;
        write_lockfile(lock_file, &entries)?;
        info!(path = %lock_file.display(), entries = entries.len(), "wrote lockfile");
        Ok(entries)
    }

    fn install_one(&self, reference: &str) -> Result<()> {
        println!("Installing {reference}");
        self.tool.install(reference, self.cancel)
    }
}

/// A lockfile is only written if its own parser would accept it back.
fn ensure_unique_modules(entries: &[LockEntry]) -> Result<()> {
    let mut seen = HashSet::new();
    for (idx, entry) in entries.iter().enumerate() {
        if !seen.insert(entry.module.as_str()) {
            return Err(GopackError::DuplicateLockEntry {
                line: idx + 1,
                module: entry.module.clone(),
            });
        }
    }
    Ok(())
}

/// Replace the lockfile at `path` with `entries` in one step.
///
/// The content goes to a sibling temp file first and is renamed into place.
pub fn write_lockfile(path: &Path, entries: &[LockEntry]) -> Result<()> {
    let tmp_path = path.with_extension("lock.tmp");
    atomic_write(&tmp_path, path, format_lockfile(entries).as_bytes()).map_err(|source| {
        let _ = std::fs::remove_file(&tmp_path);
        GopackError::LockfileWriteFailure {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn atomic_write(tmp_path: &Path, dest: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = std::fs::File::create(tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    drop(file);
    std::fs::rename(tmp_path, dest)
}

/// Run `install` for the project at `layout`.
pub fn run_install(
    layout: &ProjectLayout,
    tool: &dyn BuildTool,
    reader: &dyn MetadataReader,
    cancel: &CancelToken,
) -> Result<InstallOutcome> {
    let install_root = layout.install_root();
    let installer = Installer::new(tool, reader, &install_root, cancel);

    match load_descriptor(layout)? {
        Descriptor::Lockfile(entries) => {
            let required = reconcile(&entries, &install_root, reader)?;
            if required.is_empty() {
                println!("Already up to date");
                return Ok(InstallOutcome::UpToDate);
            }
            info!(required = required.len(), total = entries.len(), "reinstalling pinned tools");
            installer.install_locked(&required)?;
            Ok(InstallOutcome::Reinstalled {
                count: required.len(),
            })
        }
        Descriptor::PackageList(packages) => {
            let package_file = layout.package_file();
            let name = package_file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| package_file.display().to_string());
            println!("Installing using {name}");
            let entries = installer.install_packages(&packages, &layout.lock_file())?;
            Ok(InstallOutcome::Locked { entries })
        }
    }
}
