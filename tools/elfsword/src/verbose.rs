//! Diagnostic output gated by the `-q` / `-v` flags.
//!
//! Three levels:
//! - **Quiet** (`-q`): only the requested data and errors
//! - **Default** (no flag): plus short status lines
//! - **Verbose** (`-v`): plus mapping sizes, index statistics and timings
//!
//! Diagnostics go to stderr so that stdout carries only the requested data
//! (`dump` writes raw bytes there).

use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Instant;

/// Output verbosity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet = 0,
    Default = 1,
    Verbose = 2,
}

/// Global verbosity level, set once at startup.
static VERBOSITY: AtomicU8 = AtomicU8::new(1);

/// Initialize the verbosity level for the current process.
pub fn init(quiet: bool, verbose: bool) {
    let level = if quiet {
        Verbosity::Quiet
    } else if verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Default
    };
    VERBOSITY.store(level as u8, Ordering::Relaxed);
}

/// Returns the current verbosity level.
pub fn verbosity() -> Verbosity {
    match VERBOSITY.load(Ordering::Relaxed) {
        0 => Verbosity::Quiet,
        2 => Verbosity::Verbose,
        _ => Verbosity::Default,
    }
}

/// Returns `true` if verbose mode is active.
pub fn is_verbose() -> bool {
    verbosity() == Verbosity::Verbose
}

/// Returns `true` if quiet mode is active.
pub fn is_quiet() -> bool {
    verbosity() == Verbosity::Quiet
}

/// Print a diagnostic only when verbose mode is enabled.
///
/// ```ignore
/// vprintln!("mapped {} bytes", len);
/// ```
macro_rules! vprintln {
    ($($arg:tt)*) => {
        if $crate::verbose::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

pub(crate) use vprintln;

/// Print a diagnostic at default verbosity and above (suppressed in quiet mode).
///
/// ```ignore
/// dprintln!("wrote {} bytes to {}", n, path.display());
/// ```
macro_rules! dprintln {
    ($($arg:tt)*) => {
        if !$crate::verbose::is_quiet() {
            eprintln!($($arg)*);
        }
    };
}

pub(crate) use dprintln;

/// RAII timer that prints elapsed duration on drop when verbose mode is active.
///
/// ```ignore
/// let _t = Timer::start("section index");
/// // ... work ...
/// // prints "  section index: 42µs" on drop
/// ```
pub struct Timer {
    label: &'static str,
    start: Instant,
}

impl Timer {
    /// Begin timing a labeled operation.
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if is_verbose() {
            eprintln!("  {}: {:.1?}", self.label, self.start.elapsed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_follow_flags() {
        init(true, false);
        assert!(is_quiet());
        init(false, true);
        assert!(is_verbose());
        init(false, false);
        assert_eq!(verbosity(), Verbosity::Default);
        assert!(Verbosity::Quiet < Verbosity::Verbose);
    }
}
