//! Geometry value types for Trellis.
//!
//! Everything here is a plain `Copy` value in logical points. The layout
//! engine never stores references into these types, so they can cross
//! thread boundaries freely.

mod insets;
mod types;

pub use insets::EdgeInsets;
pub use types::{Point, Rect, Size};
