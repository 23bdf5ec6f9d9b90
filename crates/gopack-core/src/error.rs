//! Error types shared by the gopack crates.

use std::path::PathBuf;
use std::process::ExitStatus;

/// Errors that can occur while reconciling, installing or executing tools.
#[derive(Debug, thiserror::Error)]
pub enum GopackError {
    /// A lockfile line did not have exactly three fields.
    #[error("malformed lockfile entry on line {line}: expected 3 fields, found {fields}: '{content}'")]
    MalformedLockEntry {
        line: usize,
        content: String,
        fields: usize,
    },

    /// The same module was pinned twice in one lockfile.
    #[error("duplicate lockfile entry on line {line}: '{module}' is already pinned")]
    DuplicateLockEntry { line: usize, module: String },

    /// Two different package references would install the same `bin/<binary>`.
    #[error("'{first}' and '{second}' both install bin/{binary}")]
    BinaryNameCollision {
        binary: String,
        first: String,
        second: String,
    },

    /// Neither a lockfile nor a package list exists.
    #[error("no descriptor found: expected {} or {}", lock_file.display(), package_file.display())]
    NoDescriptorFound {
        package_file: PathBuf,
        lock_file: PathBuf,
    },

    /// A descriptor file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    DescriptorRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// No artifact is installed where one was expected.
    #[error("installed binary not found: {}", path.display())]
    MetadataNotFound { path: PathBuf },

    /// The artifact exists but its embedded build info could not be decoded.
    #[error("could not read build info from {}: {detail}", path.display())]
    MetadataUnreadable { path: PathBuf, detail: String },

    /// The build tool could not be started at all.
    #[error("failed to run {program}: {source}")]
    ToolSpawn {
        program: String,
        source: std::io::Error,
    },

    /// The build tool ran and reported failure.
    #[error("install of {reference} failed ({status})")]
    ExternalToolFailure {
        reference: String,
        status: ExitStatus,
    },

    /// The tool succeeded but produced content other than what was pinned.
    #[error("installed binary {binary} does not match expected sum: {expected} != {actual}")]
    IntegrityMismatch {
        binary: String,
        expected: String,
        actual: String,
    },

    /// Artifacts were installed but the new lockfile could not be written.
    #[error("failed to write lockfile {}: {source}", path.display())]
    LockfileWriteFailure {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An installed binary could not be started.
    #[error("failed to execute {}: {source}", path.display())]
    ExecSpawn {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An installed binary ran and exited unsuccessfully.
    #[error("{binary} exited unsuccessfully ({status})")]
    ExecFailure { binary: String, status: ExitStatus },

    /// The run was cancelled while a child process was in flight.
    #[error("cancelled")]
    Cancelled,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for gopack operations.
pub type Result<T> = std::result::Result<T, GopackError>;
