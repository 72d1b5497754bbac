//! Core plumbing shared by the Trellis layout crates.
//!
//! - [`ViewId`]: generational key naming a view in a view tree
//! - [`fault`]: programmer-error reporting that is loud in debug builds
//!   and degrades gracefully in release builds
//! - [`Signal`]: explicit callback registration owned by the host
//! - [`thread_check`]: thread affinity assertions for UI-bound state
//! - [`logging`]: `tracing` targets and spans

pub mod error;
pub mod fault;
pub mod logging;
pub mod signal;
pub mod thread_check;
mod view_id;

pub use error::{TreeError, TreeResult};
pub use fault::{
    FaultSuppressionGuard, are_fault_panics_enabled, fault_count, report_fault,
    set_fault_panics_enabled, suppress_faults,
};
pub use logging::PerfSpan;
pub use signal::{ConnectionId, Signal};
pub use thread_check::ThreadAffinity;
pub use view_id::ViewId;
