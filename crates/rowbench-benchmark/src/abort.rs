//! Operator-triggered cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag that stops a benchmark or tournament.
///
/// Cloning shares the flag. Setting it kills the in-flight candidate process
/// group at the next sampling tick and skips every run not yet started.
///
/// # Example
///
/// ```
/// use rowbench_benchmark::AbortHandle;
///
/// let handle = AbortHandle::new();
/// let from_signal = handle.clone();
/// from_signal.abort();
/// assert!(handle.is_aborted());
/// ```
#[derive(Debug, Clone, Default)]
pub struct AbortHandle {
    aborted: Arc<AtomicBool>,
}

impl AbortHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn abort(&self) {
        self.aborted.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }
}
