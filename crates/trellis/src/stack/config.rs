//! Stack configuration: axis, alignment, spacing, margins and direction.

use std::path::Path;

use serde::{Deserialize, Serialize};
use trellis_geometry::{EdgeInsets, Point, Size};

use crate::error::{ConfigError, ConfigResult};

/// The main axis of a stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Children are laid out left to right.
    Horizontal,
    /// Children are laid out top to bottom.
    #[default]
    Vertical,
}

impl Axis {
    /// The perpendicular axis.
    pub fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// The component of `size` along this axis.
    #[inline]
    pub fn on_axis(self, size: Size) -> f32 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    /// The component of `size` across this axis.
    #[inline]
    pub fn off_axis(self, size: Size) -> f32 {
        self.cross().on_axis(size)
    }

    /// Build a size from on-axis and off-axis components.
    #[inline]
    pub fn make_size(self, on_axis: f32, off_axis: f32) -> Size {
        match self {
            Self::Horizontal => Size::new(on_axis, off_axis),
            Self::Vertical => Size::new(off_axis, on_axis),
        }
    }

    /// Build a point from on-axis and off-axis components.
    #[inline]
    pub fn make_point(self, on_axis: f32, off_axis: f32) -> Point {
        match self {
            Self::Horizontal => Point::new(on_axis, off_axis),
            Self::Vertical => Point::new(off_axis, on_axis),
        }
    }
}

/// Horizontal layout direction of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LayoutDirection {
    #[default]
    #[serde(rename = "ltr")]
    LeftToRight,
    #[serde(rename = "rtl")]
    RightToLeft,
}

impl LayoutDirection {
    #[inline]
    pub fn is_rtl(self) -> bool {
        self == Self::RightToLeft
    }
}

/// Off-axis alignment as declared by the caller.
///
/// `Leading` and `Trailing` are relative: for a vertical stack their
/// horizontal meaning flips under right-to-left layout. For a horizontal
/// stack they mean top and bottom, which is why [`TOP`](Self::TOP) and
/// [`BOTTOM`](Self::BOTTOM) are aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackAlignment {
    /// Stretch off-axis flexible children to the full extent.
    #[default]
    Fill,
    #[serde(alias = "top")]
    Leading,
    Center,
    #[serde(alias = "bottom")]
    Trailing,
}

impl StackAlignment {
    pub const TOP: Self = Self::Leading;
    pub const BOTTOM: Self = Self::Trailing;

    /// Map to an absolute off-axis mode for the given axis and direction.
    pub fn resolve(self, axis: Axis, direction: LayoutDirection) -> OffAxisAlignment {
        // Only a vertical stack has a horizontal off-axis that RTL can flip.
        let flipped = axis == Axis::Vertical && direction.is_rtl();
        match self {
            Self::Fill => OffAxisAlignment::Fill,
            Self::Center => OffAxisAlignment::Center,
            Self::Leading if flipped => OffAxisAlignment::Maximum,
            Self::Leading => OffAxisAlignment::Minimum,
            Self::Trailing if flipped => OffAxisAlignment::Minimum,
            Self::Trailing => OffAxisAlignment::Maximum,
        }
    }
}

/// Absolute off-axis alignment used by the arrangement pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OffAxisAlignment {
    /// Align to the top (horizontal stacks) or left (vertical stacks).
    Minimum,
    Center,
    /// Align to the bottom (horizontal stacks) or right (vertical stacks).
    Maximum,
    /// Stretch flexible children; position everything at the minimum edge.
    Fill,
}

/// Configuration of a stack container.
///
/// Fields missing from TOML take their default: vertical axis, fill
/// alignment, zero spacing, zero margins, left-to-right.
///
/// ```
/// use trellis::{Axis, StackAlignment, StackConfig};
///
/// let config = StackConfig::from_toml_str(
///     r#"
///     axis = "horizontal"
///     alignment = "center"
///     spacing = 8.0
///     margins = { left = 12.0, right = 12.0 }
///     "#,
/// )
/// .unwrap();
/// assert_eq!(config.axis, Axis::Horizontal);
/// assert_eq!(config.alignment, StackAlignment::Center);
/// assert_eq!(config.margins.left, 12.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    pub axis: Axis,
    pub alignment: StackAlignment,
    pub spacing: f32,
    pub layout_direction: LayoutDirection,
    pub margins: EdgeInsets,
}

impl StackConfig {
    /// Create a configuration with left-to-right direction.
    pub fn new(axis: Axis, alignment: StackAlignment, spacing: f32, margins: EdgeInsets) -> Self {
        Self {
            axis,
            alignment,
            spacing,
            margins,
            layout_direction: LayoutDirection::LeftToRight,
        }
    }

    /// A horizontal stack with default alignment, spacing and margins.
    pub fn horizontal() -> Self {
        Self {
            axis: Axis::Horizontal,
            ..Default::default()
        }
    }

    /// A vertical stack with default alignment, spacing and margins.
    pub fn vertical() -> Self {
        Self::default()
    }

    pub fn with_alignment(mut self, alignment: StackAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_margins(mut self, margins: EdgeInsets) -> Self {
        self.margins = margins;
        self
    }

    pub fn with_layout_direction(mut self, direction: LayoutDirection) -> Self {
        self.layout_direction = direction;
        self
    }

    /// The alignment after applying the layout direction.
    pub fn resolved_alignment(&self) -> OffAxisAlignment {
        self.alignment.resolve(self.axis, self.layout_direction)
    }

    /// Total margins along the main axis.
    pub fn on_axis_margins(&self) -> f32 {
        self.axis.on_axis(self.margins.total_size())
    }

    /// Total margins across the main axis.
    pub fn off_axis_margins(&self) -> f32 {
        self.axis.off_axis(self.margins.total_size())
    }

    /// Check spacing and margins are finite and non-negative.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.spacing.is_finite() || self.spacing < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "spacing must be a non-negative number, got {}",
                self.spacing
            )));
        }
        let m = &self.margins;
        if [m.top, m.left, m.bottom, m.right]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(ConfigError::Invalid(format!(
                "margins must be non-negative numbers, got {m:?}"
            )));
        }
        Ok(())
    }

    /// Parse and validate a configuration from TOML.
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Serialize to a TOML document.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_helpers() {
        let size = Size::new(10.0, 20.0);
        assert_eq!(Axis::Horizontal.on_axis(size), 10.0);
        assert_eq!(Axis::Horizontal.off_axis(size), 20.0);
        assert_eq!(Axis::Vertical.on_axis(size), 20.0);
        assert_eq!(Axis::Vertical.make_size(1.0, 2.0), Size::new(2.0, 1.0));
        assert_eq!(Axis::Vertical.make_point(1.0, 2.0), Point::new(2.0, 1.0));
        assert_eq!(Axis::Horizontal.cross(), Axis::Vertical);
    }

    #[test]
    fn test_alignment_resolution_ltr() {
        for axis in [Axis::Horizontal, Axis::Vertical] {
            let ltr = LayoutDirection::LeftToRight;
            assert_eq!(StackAlignment::Leading.resolve(axis, ltr), OffAxisAlignment::Minimum);
            assert_eq!(StackAlignment::Trailing.resolve(axis, ltr), OffAxisAlignment::Maximum);
            assert_eq!(StackAlignment::Center.resolve(axis, ltr), OffAxisAlignment::Center);
            assert_eq!(StackAlignment::Fill.resolve(axis, ltr), OffAxisAlignment::Fill);
        }
    }

    #[test]
    fn test_alignment_resolution_rtl_flips_vertical_only() {
        let rtl = LayoutDirection::RightToLeft;
        assert_eq!(
            StackAlignment::Leading.resolve(Axis::Vertical, rtl),
            OffAxisAlignment::Maximum
        );
        assert_eq!(
            StackAlignment::Trailing.resolve(Axis::Vertical, rtl),
            OffAxisAlignment::Minimum
        );
        assert_eq!(
            StackAlignment::TOP.resolve(Axis::Horizontal, rtl),
            OffAxisAlignment::Minimum
        );
        assert_eq!(
            StackAlignment::BOTTOM.resolve(Axis::Horizontal, rtl),
            OffAxisAlignment::Maximum
        );
    }

    #[test]
    fn test_config_defaults() {
        let config = StackConfig::default();
        assert_eq!(config.axis, Axis::Vertical);
        assert_eq!(config.alignment, StackAlignment::Fill);
        assert_eq!(config.spacing, 0.0);
        assert_eq!(config.margins, EdgeInsets::ZERO);
        assert_eq!(config.layout_direction, LayoutDirection::LeftToRight);
    }

    #[test]
    fn test_config_margin_totals() {
        let config = StackConfig::horizontal().with_margins(EdgeInsets::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(config.on_axis_margins(), 6.0);
        assert_eq!(config.off_axis_margins(), 4.0);
    }

    #[test]
    fn test_config_toml_aliases() {
        let config =
            StackConfig::from_toml_str("axis = \"horizontal\"\nalignment = \"bottom\"").unwrap();
        assert_eq!(config.alignment, StackAlignment::Trailing);

        let config = StackConfig::from_toml_str("layout_direction = \"rtl\"").unwrap();
        assert!(config.layout_direction.is_rtl());
        assert_eq!(config.axis, Axis::Vertical);
    }

    #[test]
    fn test_config_toml_rejects_negative_spacing() {
        let err = StackConfig::from_toml_str("spacing = -4.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_config_toml_rejects_unknown_axis() {
        let err = StackConfig::from_toml_str("axis = \"diagonal\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_config_toml_round_trip() {
        let config = StackConfig::horizontal()
            .with_alignment(StackAlignment::Center)
            .with_spacing(6.0)
            .with_margins(EdgeInsets::symmetric(12.0, 4.0))
            .with_layout_direction(LayoutDirection::RightToLeft);
        let text = config.to_toml_string().unwrap();
        assert_eq!(StackConfig::from_toml_str(&text).unwrap(), config);
    }
}
