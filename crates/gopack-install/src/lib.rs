//! Reconciliation and installation engine for gopack.
//!
//! An install run picks its mode from the descriptors on disk:
//! - **Incremental** — a `go.pack.lock` exists. Each pin is compared with the
//!   metadata of the installed binary; only mismatches are reinstalled, and
//!   each reinstall is checked against the pinned checksum.
//! - **Fresh** — only `go.pack` exists. Everything is installed and the
//!   results are pinned into a new lockfile.
//!
//! All work is sequential and fail-fast. One [`CancelToken`] is threaded
//! through every child process of a run.

pub mod cancel;
pub mod exec;
pub mod install;
pub mod reconcile;
pub mod toolchain;

#[cfg(test)]
mod testing;

// Re-exports for convenience.
pub use cancel::{wait_with_cancel, CancelToken};
pub use exec::execute;
pub use install::{run_install, write_lockfile, InstallOutcome, Installer};
pub use reconcile::{load_descriptor, reconcile, Descriptor};
pub use toolchain::{BuildTool, GoToolchain};
