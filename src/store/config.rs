//! FilterStore configuration types.

use std::sync::atomic::{AtomicBool, Ordering};

/// Process-wide default for [`StoreOptions::autocommit`].
static DEFAULT_AUTOCOMMIT: AtomicBool = AtomicBool::new(false);

/// Set the auto-commit default picked up by `StoreOptions::default()`.
///
/// Stores that already exist keep the options they were opened with.
pub fn set_default_autocommit(enabled: bool) {
    DEFAULT_AUTOCOMMIT.store(enabled, Ordering::Relaxed);
}

/// Current process-wide auto-commit default.
pub fn default_autocommit() -> bool {
    DEFAULT_AUTOCOMMIT.load(Ordering::Relaxed)
}

/// Options for a FilterStore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Commit pending changes when the store is closed with `close()`
    pub autocommit: bool,
}

impl StoreOptions {
    /// Create options with auto-commit on or off.
    pub fn new(autocommit: bool) -> Self {
        Self { autocommit }
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            autocommit: default_autocommit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_options() {
        assert!(StoreOptions::new(true).autocommit);
        assert!(!StoreOptions::new(false).autocommit);
    }

    #[test]
    fn test_default_follows_global_flag() {
        // Only this test touches the global flag.
        set_default_autocommit(true);
        assert!(StoreOptions::default().autocommit);
        set_default_autocommit(false);
        assert!(!StoreOptions::default().autocommit);
    }
}
