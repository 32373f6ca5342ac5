//! Explicit "AOT processing in progress" marker.
//!
//! Application code receives an [`AotContext`] through its [`AppContext`](crate::application::AppContext)
//! and can ask whether it is being started for metadata extraction, e.g. to skip lazy
//! initialization shortcuts. The marker is only ever set through an [`AotGuard`], which
//! clears it again when dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared, cloneable view of the AOT processing marker.
#[derive(Debug, Clone, Default)]
pub struct AotContext {
    in_progress: Arc<AtomicBool>,
}

impl AotContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while an extraction run is active.
    pub fn in_progress(&self) -> bool {
        self.in_progress.load(Ordering::SeqCst)
    }

    /// Sets the marker for the lifetime of the returned guard.
    pub fn enter(&self) -> AotGuard {
        self.in_progress.store(true, Ordering::SeqCst);
        AotGuard {
            in_progress: Arc::clone(&self.in_progress),
        }
    }
}

/// Clears the AOT marker on drop, including during unwinding.
#[must_use = "the AOT marker is cleared as soon as the guard is dropped"]
#[derive(Debug)]
pub struct AotGuard {
    in_progress: Arc<AtomicBool>,
}

impl Drop for AotGuard {
    fn drop(&mut self) {
        self.in_progress.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_scoped_to_guard() {
        let context = AotContext::new();
        assert!(!context.in_progress());

        {
            let _guard = context.enter();
            assert!(context.in_progress());
            assert!(context.clone().in_progress());
        }

        assert!(!context.in_progress());
    }

    #[test]
    fn test_marker_cleared_on_panic() {
        let context = AotContext::new();
        let inner = context.clone();

        let result = std::panic::catch_unwind(move || {
            let _guard = inner.enter();
            panic!("boom");
        });

        assert!(result.is_err());
        assert!(!context.in_progress());
    }
}
