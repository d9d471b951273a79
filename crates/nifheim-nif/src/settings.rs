//! Process-wide load toggles.
//!
//! Both toggles default to off and may be flipped from any thread at any
//! time. A decode snapshots them once, into [`LoadOptions`], before reading
//! the header, so a concurrent change never affects a file mid-decode.

use std::sync::atomic::{AtomicBool, Ordering};

static LOAD_UNSUPPORTED_FILES: AtomicBool = AtomicBool::new(false);
static WRITE_DEBUG_LOG: AtomicBool = AtomicBool::new(false);

/// Accept files whose version is outside the supported set.
pub fn set_load_unsupported_files(load: bool) {
    LOAD_UNSUPPORTED_FILES.store(load, Ordering::Relaxed);
}

/// Whether files with unsupported versions are loaded best-effort.
pub fn load_unsupported_files() -> bool {
    LOAD_UNSUPPORTED_FILES.load(Ordering::Relaxed)
}

/// Emit a trace line for every record of an unsupported file.
pub fn set_write_debug_log(write: bool) {
    WRITE_DEBUG_LOG.store(write, Ordering::Relaxed);
}

/// Whether per-record debug traces are emitted.
pub fn write_debug_log() -> bool {
    WRITE_DEBUG_LOG.load(Ordering::Relaxed)
}

/// Toggles in effect for a single decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadOptions {
    /// Downgrade an unsupported version from an error to a warning.
    pub load_unsupported: bool,
    /// Trace every record read from an unsupported file.
    pub debug_log: bool,
}

impl LoadOptions {
    /// Snapshot the process-wide toggles.
    pub fn from_globals() -> Self {
        Self {
            load_unsupported: load_unsupported_files(),
            debug_log: write_debug_log(),
        }
    }

    /// Options with the permissive toggle set.
    pub fn permissive() -> Self {
        Self {
            load_unsupported: true,
            debug_log: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_log_toggle() {
        let before = write_debug_log();
        set_write_debug_log(true);
        assert!(LoadOptions::from_globals().debug_log);
        set_write_debug_log(before);
        assert_eq!(write_debug_log(), before);
    }

    #[test]
    fn test_default_options_are_strict() {
        let options = LoadOptions::default();
        assert!(!options.load_unsupported);
        assert!(!options.debug_log);
        assert!(LoadOptions::permissive().load_unsupported);
    }
}
