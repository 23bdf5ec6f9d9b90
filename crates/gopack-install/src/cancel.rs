//! Cancellation shared by every child process of one run.

use std::process::{Child, ExitStatus};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use gopack_core::{GopackError, Result};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// A cloneable cancellation signal. All clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fail with `Cancelled` if the token has fired.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(GopackError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Wait for `child` to exit, killing it if `cancel` fires first.
///
/// A killed child is always reaped before `Cancelled` is returned.
pub fn wait_with_cancel(child: &mut Child, cancel: &CancelToken) -> Result<ExitStatus> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if cancel.is_cancelled() {
            debug!(pid = child.id(), "cancelling child process");
            if let Err(e) = child.kill() {
                warn!(pid = child.id(), error = %e, "failed to kill child process");
            }
            child.wait()?;
            return Err(GopackError::Cancelled);
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}
