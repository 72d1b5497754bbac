//! Logging facilities for Trellis.
//!
//! Trellis is instrumented with the `tracing` crate. Nothing is printed unless
//! the host installs a subscriber:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("trellis=debug,trellis_core::fault=error")
//!         .init();
//! }
//! ```
//!
//! Layout passes open a [`PerfSpan`], so a subscriber that records span
//! timings shows how long each container took to arrange its children.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core target.
    pub const CORE: &str = "trellis_core";
    /// Programmer-error reports.
    pub const FAULT: &str = "trellis_core::fault";
    /// Signal emission.
    pub const SIGNAL: &str = "trellis_core::signal";
    /// View tree mutations.
    pub const TREE: &str = "trellis::tree";
    /// Deferred layout surfaces.
    pub const SURFACE: &str = "trellis::surface";
    /// Stack measurement and arrangement.
    pub const STACK: &str = "trellis::stack";
}

/// Span names used for performance tracing.
pub mod span_names {
    /// A deferred layout surface running its layout blocks.
    pub const SURFACE_LAYOUT: &str = "surface_layout";
    /// A stack container computing and applying its arrangement.
    pub const STACK_LAYOUT: &str = "stack_layout";
    /// Pure stack measurement.
    pub const STACK_MEASURE: &str = "stack_measure";
}

/// A span guard for performance tracing.
///
/// The span stays entered until the guard is dropped.
///
/// ```
/// use trellis_core::PerfSpan;
///
/// {
///     let _span = PerfSpan::new("arrange_row");
///     // timed work
/// }
/// ```
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: "trellis::perf", "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }

    /// Create a span that also records which view it belongs to.
    pub fn for_view(name: &'static str, view: &str) -> Self {
        let span =
            tracing::debug_span!(target: "trellis::perf", "perf", operation = name, view = view);
        Self {
            _span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span_without_subscriber() {
        let _span = PerfSpan::new("test_operation");
        let _view_span = PerfSpan::for_view("test_operation", "row");
    }

    #[test]
    fn test_targets_are_namespaced() {
        for target in [targets::FAULT, targets::SIGNAL] {
            assert!(target.starts_with(targets::CORE));
        }
        for target in [targets::TREE, targets::SURFACE, targets::STACK] {
            assert!(target.starts_with("trellis::"));
        }
    }
}
