//! Single-axis stack layout.
//!
//! Layout is split in two halves:
//!
//! - [`measure`]: resolution-independent. Sums the children's measured sizes
//!   along the axis, adds spacing and margins, and yields an immutable
//!   [`StackMeasurement`] that can be computed off the main thread and cached.
//! - [`arrange`]: resolution-dependent. Given a measurement and the bounds the
//!   container actually received, distributes surplus or missing space among
//!   flexible children and aligns each child on the cross axis.
//!
//! [`StackView`] ties both halves to a [`LayoutView`](crate::LayoutView),
//! caching the arrangement until the bounds size or the set of visible
//! children changes.

mod arrange;
mod config;
mod measure;
mod stack_view;

pub use arrange::{ArrangedFrame, Arrangement, arrange};
pub use config::{Axis, LayoutDirection, OffAxisAlignment, StackAlignment, StackConfig};
pub use measure::{FlowBehavior, StackMeasurement, SubviewInfo, measure};
pub use stack_view::{StackState, StackView};
