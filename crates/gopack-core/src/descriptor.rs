//! The two persisted dependency descriptors.
//!
//! Both are plain text with one record per line and no comments:
//! ```text
//! go.pack       golang.org/x/tools/gopls@v0.14.2
//!               honnef.co/go/tools/cmd/staticcheck
//!
//! go.pack.lock  golang.org/x/tools/gopls v0.14.2 h1:...=
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::warn;

use crate::error::{GopackError, Result};
use crate::metadata::binary_name;

/// One declared dependency from the package list.
///
/// The reference is opaque and may carry an explicit `@version` suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageEntry {
    pub reference: String,
}

impl PackageEntry {
    pub fn new(reference: impl Into<String>) -> Self {
        PackageEntry {
            reference: reference.into(),
        }
    }

    /// Name of the artifact this entry installs under `bin/`.
    pub fn binary_name(&self) -> &str {
        binary_name(&self.reference)
    }
}

/// A pinned record of one dependency's last known good build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockEntry {
    /// Module reference, unique within a lockfile.
    pub module: String,
    /// Opaque version label.
    pub version: String,
    /// Content hash recorded by the toolchain.
    pub checksum: String,
}

impl LockEntry {
    pub fn new(
        module: impl Into<String>,
        version: impl Into<String>,
        checksum: impl Into<String>,
    ) -> Self {
        LockEntry {
            module: module.into(),
            version: version.into(),
            checksum: checksum.into(),
        }
    }

    /// The `module@version` reference handed to the build tool.
    pub fn qualified_reference(&self) -> String {
        format!("{}@{}", self.module, self.version)
    }

    pub fn binary_name(&self) -> &str {
        binary_name(&self.module)
    }
}

/// Parse a package list: one module reference per non-empty line.
pub fn parse_package_file(text: &str) -> Vec<PackageEntry> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PackageEntry::new)
        .collect()
}

/// Parse a lockfile.
///
/// Every non-empty line must hold exactly `module version checksum`.
/// The first bad line fails the whole parse.
pub fn parse_lockfile(text: &str) -> Result<Vec<LockEntry>> {
    let mut entries = Vec::new();
    let mut seen = HashSet::new();

    for (idx, row) in text.lines().enumerate() {
        let row = row.trim();
        if row.is_empty() {
            continue;
        }

        let fields: Vec<&str> = row.split_whitespace().collect();
        let [module, version, checksum] = fields[..] else {
            return Err(GopackError::MalformedLockEntry {
                line: idx + 1,
                content: row.to_string(),
                fields: fields.len(),
            });
        };

        if !seen.insert(module) {
            return Err(GopackError::DuplicateLockEntry {
                line: idx + 1,
                module: module.to_string(),
            });
        }

        entries.push(LockEntry::new(module, version, checksum));
    }

    Ok(entries)
}

/// Drop repeated references, keeping the first, and reject distinct
/// references that would install to the same binary name.
pub fn unique_packages(entries: &[PackageEntry]) -> Result<Vec<PackageEntry>> {
    let mut by_binary: HashMap<&str, &PackageEntry> = HashMap::new();
    let mut unique = Vec::with_capacity(entries.len());

    for entry in entries {
        match by_binary.get(entry.binary_name()) {
            Some(first) if first.reference == entry.reference => {
                warn!(reference = %entry.reference, "ignoring repeated package entry");
            }
            Some(first) => {
                return Err(GopackError::BinaryNameCollision {
                    binary: entry.binary_name().to_string(),
                    first: first.reference.clone(),
                    second: entry.reference.clone(),
                });
            }
            None => {
                by_binary.insert(entry.binary_name(), entry);
                unique.push(entry.clone());
            }
        }
    }

    Ok(unique)
}

/// Serialize entries in lockfile format, one line each, in order.
pub fn format_lockfile(entries: &[LockEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{} {} {}\n", e.module, e.version, e.checksum))
        .collect()
}

/// Read and parse the package list at `path`.
pub fn load_package_file(path: &Path) -> Result<Vec<PackageEntry>> {
    let text = read_descriptor(path)?;
    Ok(parse_package_file(&text))
}

/// Read and parse the lockfile at `path`.
pub fn load_lockfile(path: &Path) -> Result<Vec<LockEntry>> {
    let text = read_descriptor(path)?;
    parse_lockfile(&text)
}

fn read_descriptor(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| GopackError::DescriptorRead {
        path: path.to_path_buf(),
        source,
    })
}
