//! Programmer-error reporting.
//!
//! Layout misuse (configuring a container twice, a child count that does not
//! match its measurement, a negative measured size) is never a recoverable
//! error. It is a bug in the calling code. Such bugs are reported here:
//!
//! - every fault is logged at `error` level under [`targets::FAULT`]
//! - when fault panics are enabled (the default in debug builds) the fault
//!   also panics, so it surfaces immediately during development
//! - in release builds execution continues and the caller degrades to a no-op
//!   or a clamped result
//!
//! # Example
//!
//! ```
//! use trellis_core::{fail_debug, fault};
//!
//! let _guard = fault::suppress_faults();
//! let before = fault::fault_count();
//! fail_debug!("container {} configured twice", "inbox");
//! assert_eq!(fault::fault_count(), before + 1);
//! ```
//!
//! [`targets::FAULT`]: crate::logging::targets::FAULT

use std::cell::Cell;
use std::fmt;
use std::panic::Location;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::logging::targets;

/// Whether faults panic. Mirrors debug assertions unless overridden.
static FAULT_PANICS_ENABLED: AtomicBool = AtomicBool::new(cfg!(debug_assertions));

thread_local! {
    /// Depth of active [`FaultSuppressionGuard`]s on this thread.
    static SUPPRESSION_DEPTH: Cell<usize> = const { Cell::new(0) };
    /// Number of faults reported on this thread.
    static FAULT_COUNT: Cell<usize> = const { Cell::new(0) };
}

/// Enable or disable fault panics process-wide.
pub fn set_fault_panics_enabled(enabled: bool) {
    FAULT_PANICS_ENABLED.store(enabled, Ordering::SeqCst);
}

/// Check whether faults panic on this thread.
///
/// Returns `false` while a [`FaultSuppressionGuard`] is alive on the
/// current thread, regardless of the process-wide setting.
pub fn are_fault_panics_enabled() -> bool {
    FAULT_PANICS_ENABLED.load(Ordering::SeqCst) && SUPPRESSION_DEPTH.with(Cell::get) == 0
}

/// Number of faults reported on the current thread so far.
pub fn fault_count() -> usize {
    FAULT_COUNT.with(Cell::get)
}

/// Report a programmer error.
///
/// Logs the fault with the caller's location, bumps the per-thread fault
/// counter, then panics if fault panics are enabled.
#[track_caller]
pub fn report_fault(fault: impl fmt::Display) {
    let location = Location::caller();
    FAULT_COUNT.with(|count| count.set(count.get() + 1));

    tracing::error!(
        target: targets::FAULT,
        file = location.file(),
        line = location.line(),
        "{fault}"
    );

    if are_fault_panics_enabled() {
        panic_fault(&fault.to_string(), location);
    }
}

#[cold]
#[inline(never)]
fn panic_fault(message: &str, location: &Location<'_>) -> ! {
    let thread = std::thread::current();
    panic!(
        "\n\
        ══════════════════════════════════════════════════════════════════════\n\
        LAYOUT FAULT\n\
        ══════════════════════════════════════════════════════════════════════\n\
        \n\
        {message}\n\
        \n\
        Location: {location}\n\
        Thread: {} ({:?})\n\
        \n\
        Release builds log this fault and continue.\n\
        ══════════════════════════════════════════════════════════════════════",
        thread.name().unwrap_or("<unnamed>"),
        thread.id(),
    );
}

/// RAII guard that keeps faults from panicking on the current thread.
///
/// Faults are still logged and counted. Guards nest.
#[derive(Debug)]
#[must_use = "faults panic again as soon as the guard is dropped"]
pub struct FaultSuppressionGuard {
    // Tied to the thread whose counter it incremented.
    _not_send: std::marker::PhantomData<*const ()>,
}

impl Drop for FaultSuppressionGuard {
    fn drop(&mut self) {
        SUPPRESSION_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Suppress fault panics on this thread until the guard is dropped.
pub fn suppress_faults() -> FaultSuppressionGuard {
    SUPPRESSION_DEPTH.with(|depth| depth.set(depth.get() + 1));
    FaultSuppressionGuard {
        _not_send: std::marker::PhantomData,
    }
}

/// Report a programmer error built from a format string.
///
/// ```
/// # let _guard = trellis_core::suppress_faults();
/// trellis_core::fail_debug!("unexpected child count: {}", 3);
/// ```
#[macro_export]
macro_rules! fail_debug {
    ($($arg:tt)+) => {
        $crate::fault::report_fault(::std::format_args!($($arg)+))
    };
}

/// Report a programmer error when a condition does not hold.
///
/// Evaluates to the condition, so callers can bail out:
///
/// ```
/// # let _guard = trellis_core::suppress_faults();
/// let spacing = -1.0_f32;
/// if !trellis_core::assert_debug!(spacing >= 0.0, "negative spacing {}", spacing) {
///     // fall back
/// }
/// ```
#[macro_export]
macro_rules! assert_debug {
    ($cond:expr $(,)?) => {
        $crate::assert_debug!($cond, "assertion failed: {}", ::std::stringify!($cond))
    };
    ($cond:expr, $($arg:tt)+) => {{
        let holds: bool = $cond;
        if !holds {
            $crate::fail_debug!($($arg)+);
        }
        holds
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suppressed_fault_is_counted() {
        let _guard = suppress_faults();
        let before = fault_count();
        report_fault("something went wrong");
        assert_eq!(fault_count(), before + 1);
    }

    #[test]
    fn test_guards_nest() {
        let outer = suppress_faults();
        {
            let _inner = suppress_faults();
            assert!(!are_fault_panics_enabled());
        }
        assert!(!are_fault_panics_enabled());
        drop(outer);
    }

    #[test]
    fn test_assert_debug_returns_condition() {
        let _guard = suppress_faults();
        let before = fault_count();
        assert!(crate::assert_debug!(1 + 1 == 2));
        assert_eq!(fault_count(), before);
        assert!(!crate::assert_debug!(1 + 1 == 3, "math is broken"));
        assert_eq!(fault_count(), before + 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "LAYOUT FAULT")]
    fn test_fault_panics_in_debug_builds() {
        crate::fail_debug!("unsuppressed fault");
    }
}
