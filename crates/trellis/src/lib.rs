//! Trellis - manual box layout for view trees.
//!
//! Trellis positions a container's children without a constraint solver.
//! Children are measured once into a [`StackMeasurement`]; every time the
//! container's bounds size changes, the measurement is arranged into one frame
//! per visible child and the frames are written back through [`ViewAccess`].
//!
//! # Components
//!
//! - [`LayoutView`]: a surface that re-runs its layout blocks whenever its
//!   bounds size changes.
//! - [`StackView`]: a stack container built on the surface.
//! - [`ViewTree`]: an arena of views that both operate on.
//!
//! # Example
//!
//! ```
//! use trellis::{Rect, Size, StackConfig, StackView, SubviewInfo, ViewAccess, ViewTree};
//!
//! let mut tree = ViewTree::new();
//! let mut column = StackView::new(&mut tree, "column");
//! let title = tree.create_view("title");
//! let subtitle = tree.create_view("subtitle");
//!
//! column.configure_with_infos(
//!     &mut tree,
//!     StackConfig::vertical().with_spacing(4.0),
//!     &[title, subtitle],
//!     vec![
//!         SubviewInfo::fixed(Size::new(120.0, 20.0)),
//!         SubviewInfo::fixed(Size::new(90.0, 16.0)),
//!     ],
//! );
//!
//! tree.set_frame(column.id(), Rect::new(0.0, 0.0, 200.0, 40.0)).unwrap();
//! column.layout_if_needed(&mut tree);
//! assert_eq!(tree.get_frame(subtitle), Some(Rect::new(0.0, 24.0, 90.0, 16.0)));
//! ```

pub mod error;
pub mod layout_view;
pub mod stack;
pub mod tree;

pub use error::{ConfigError, ConfigResult, LayoutFault};
pub use layout_view::{LayoutBlock, LayoutContext, LayoutView, TapHandler};
pub use stack::{
    ArrangedFrame, Arrangement, Axis, FlowBehavior, LayoutDirection, OffAxisAlignment,
    StackAlignment, StackConfig, StackMeasurement, StackState, StackView, SubviewInfo, arrange,
    measure,
};
pub use tree::{TreeStyle, ViewAccess, ViewTree, ViewTreeDebug};

pub use trellis_core::{TreeError, TreeResult, ViewId};
pub use trellis_geometry::{EdgeInsets, Point, Rect, Size};
