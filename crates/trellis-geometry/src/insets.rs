//! Edge insets (margins) around content.

use serde::{Deserialize, Serialize};

use crate::Size;

/// Insets from each edge of a rectangle.
///
/// Containers use these as margins between their bounds and their content.
/// Fields missing from a serialized form default to zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeInsets {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl EdgeInsets {
    /// No insets.
    pub const ZERO: Self = Self {
        top: 0.0,
        left: 0.0,
        bottom: 0.0,
        right: 0.0,
    };

    /// Create insets in top, left, bottom, right order.
    #[inline]
    pub const fn new(top: f32, left: f32, bottom: f32, right: f32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// The same inset on every edge.
    #[inline]
    pub const fn uniform(inset: f32) -> Self {
        Self::new(inset, inset, inset, inset)
    }

    /// Separate horizontal (left/right) and vertical (top/bottom) insets.
    #[inline]
    pub const fn symmetric(horizontal: f32, vertical: f32) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }

    /// Total horizontal inset (left + right).
    #[inline]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Total vertical inset (top + bottom).
    #[inline]
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Total inset as a size.
    #[inline]
    pub fn total_size(&self) -> Size {
        Size::new(self.horizontal(), self.vertical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insets_totals() {
        let insets = EdgeInsets::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(insets.horizontal(), 6.0);
        assert_eq!(insets.vertical(), 4.0);
        assert_eq!(insets.total_size(), Size::new(6.0, 4.0));
    }

    #[test]
    fn test_insets_symmetric() {
        let insets = EdgeInsets::symmetric(10.0, 5.0);
        assert_eq!(insets.left, 10.0);
        assert_eq!(insets.right, 10.0);
        assert_eq!(insets.top, 5.0);
        assert_eq!(insets.bottom, 5.0);
    }

    #[test]
    fn test_insets_partial_toml_defaults_to_zero() {
        let insets: EdgeInsets = toml::from_str("top = 8.0\nleft = 16.0").unwrap();
        assert_eq!(insets, EdgeInsets::new(8.0, 16.0, 0.0, 0.0));
    }
}
