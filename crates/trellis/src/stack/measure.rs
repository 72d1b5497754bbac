//! Measurement: the resolution-independent half of stack layout.
//!
//! [`measure`] is pure. It can run before a container exists, on any
//! thread, and its result is cached by the container until replaced.

use serde::{Deserialize, Serialize};
use trellis_core::{PerfSpan, assert_debug, logging::span_names};
use trellis_geometry::{Point, Size};

use super::config::{Axis, StackConfig};
use crate::error::LayoutFault;

/// How a child may deviate from its measured size along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowBehavior {
    /// Always exactly the measured size.
    Fixed,
    /// May grow to absorb surplus space, never shrinks.
    Expand,
    /// May shrink when space runs out, never grows.
    Compress,
    /// May grow or shrink.
    #[default]
    Flexible,
}

impl FlowBehavior {
    /// `Fixed` when `fixed` is set, `Flexible` otherwise.
    #[inline]
    pub fn from_fixed(fixed: bool) -> Self {
        if fixed { Self::Fixed } else { Self::Flexible }
    }

    #[inline]
    pub fn can_expand(self) -> bool {
        matches!(self, Self::Expand | Self::Flexible)
    }

    #[inline]
    pub fn can_compress(self) -> bool {
        matches!(self, Self::Compress | Self::Flexible)
    }
}

/// Per-child measurement record.
///
/// Axis-agnostic: the same info can be measured into a horizontal or a
/// vertical stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubviewInfo {
    measured_size: Size,
    horizontal_flow: FlowBehavior,
    vertical_flow: FlowBehavior,
    location_offset: Point,
}

impl SubviewInfo {
    /// Create an info with explicit per-axis flow behavior.
    ///
    /// A negative or non-finite `measured_size` is a bug in whatever measured
    /// the child. It is reported as a fault and stored unchanged.
    #[track_caller]
    pub fn new(
        measured_size: Size,
        horizontal_flow: FlowBehavior,
        vertical_flow: FlowBehavior,
    ) -> Self {
        assert_debug!(
            measured_size.is_valid_extent(),
            "{}",
            LayoutFault::InvalidMeasuredSize {
                width: measured_size.width,
                height: measured_size.height,
            }
        );
        Self {
            measured_size,
            horizontal_flow,
            vertical_flow,
            location_offset: Point::ZERO,
        }
    }

    /// Flexible on both axes.
    #[track_caller]
    pub fn flexible(measured_size: Size) -> Self {
        Self::new(measured_size, FlowBehavior::Flexible, FlowBehavior::Flexible)
    }

    /// Fixed on both axes.
    #[track_caller]
    pub fn fixed(measured_size: Size) -> Self {
        Self::new(measured_size, FlowBehavior::Fixed, FlowBehavior::Fixed)
    }

    /// Fixed or flexible per axis.
    #[track_caller]
    pub fn with_fixed(measured_size: Size, fixed_width: bool, fixed_height: bool) -> Self {
        Self::new(
            measured_size,
            FlowBehavior::from_fixed(fixed_width),
            FlowBehavior::from_fixed(fixed_height),
        )
    }

    /// An empty, flexible info.
    pub fn empty() -> Self {
        Self::flexible(Size::ZERO)
    }

    /// Offset added to the child's arranged origin after layout.
    ///
    /// Useful for optical adjustments that should not affect siblings.
    pub fn with_location_offset(mut self, offset: Point) -> Self {
        self.location_offset = offset;
        self
    }

    #[inline]
    pub fn measured_size(&self) -> Size {
        self.measured_size
    }

    #[inline]
    pub fn location_offset(&self) -> Point {
        self.location_offset
    }

    #[inline]
    pub fn horizontal_flow(&self) -> FlowBehavior {
        self.horizontal_flow
    }

    #[inline]
    pub fn vertical_flow(&self) -> FlowBehavior {
        self.vertical_flow
    }

    /// Flow behavior along the given axis.
    #[inline]
    pub fn flow(&self, axis: Axis) -> FlowBehavior {
        match axis {
            Axis::Horizontal => self.horizontal_flow,
            Axis::Vertical => self.vertical_flow,
        }
    }

    /// Whether the child may absorb surplus space along the stack's axis.
    pub fn can_expand_on_axis(&self, axis: Axis) -> bool {
        self.flow(axis).can_expand()
    }

    /// Whether the child may give up space along the stack's axis.
    pub fn can_compress_on_axis(&self, axis: Axis) -> bool {
        self.flow(axis).can_compress()
    }

    /// Whether the child may be stretched across the stack's axis under
    /// fill alignment.
    pub fn can_expand_off_axis(&self, axis: Axis) -> bool {
        self.flow(axis.cross()).can_expand()
    }
}

impl From<Size> for SubviewInfo {
    #[track_caller]
    fn from(size: Size) -> Self {
        Self::flexible(size)
    }
}

/// The cached result of measuring a stack's children.
///
/// Immutable once built. Replace it wholesale when children or
/// configuration change.
#[derive(Debug, Clone, PartialEq)]
pub struct StackMeasurement {
    total_size: Size,
    subview_infos: Vec<SubviewInfo>,
}

impl StackMeasurement {
    pub(crate) fn new(total_size: Size, subview_infos: Vec<SubviewInfo>) -> Self {
        Self {
            total_size,
            subview_infos,
        }
    }

    /// A measurement with a known size and no arranged children.
    ///
    /// For containers whose children are placed by layout blocks only.
    pub fn fixed(total_size: Size) -> Self {
        Self::new(total_size, Vec::new())
    }

    /// Total size including spacing and margins, rounded up.
    #[inline]
    pub fn total_size(&self) -> Size {
        self.total_size
    }

    /// The measured children, in layout order.
    #[inline]
    pub fn subview_infos(&self) -> &[SubviewInfo] {
        &self.subview_infos
    }

    pub fn len(&self) -> usize {
        self.subview_infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subview_infos.is_empty()
    }
}

static_assertions::assert_impl_all!(StackMeasurement: Send, Sync);

/// Measure a stack's children.
///
/// The on-axis total is the sum of the children plus spacing between them;
/// the off-axis total is the largest child. Margins are added to both and the
/// result is rounded up to whole points. Negative child sizes count as zero.
pub fn measure(config: &StackConfig, subview_infos: Vec<SubviewInfo>) -> StackMeasurement {
    let _span = PerfSpan::new(span_names::STACK_MEASURE);
    let axis = config.axis;

    let mut on_axis_total = 0.0_f32;
    let mut off_axis_max = 0.0_f32;
    for (index, info) in subview_infos.iter().enumerate() {
        let size = info.measured_size().max(Size::ZERO);
        if index > 0 {
            on_axis_total += config.spacing;
        }
        on_axis_total += axis.on_axis(size);
        off_axis_max = off_axis_max.max(axis.off_axis(size));
    }

    let content = axis.make_size(on_axis_total, off_axis_max);
    let total_size = (content + config.margins.total_size()).ceil();

    tracing::trace!(
        target: trellis_core::logging::targets::STACK,
        children = subview_infos.len(),
        width = total_size.width,
        height = total_size.height,
        "measured stack"
    );

    StackMeasurement::new(total_size, subview_infos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::{fault_count, suppress_faults};
    use trellis_geometry::EdgeInsets;

    fn infos(sizes: &[(f32, f32)]) -> Vec<SubviewInfo> {
        sizes
            .iter()
            .map(|&(w, h)| SubviewInfo::flexible(Size::new(w, h)))
            .collect()
    }

    #[test]
    fn test_flow_behavior_capabilities() {
        assert!(!FlowBehavior::Fixed.can_expand());
        assert!(!FlowBehavior::Fixed.can_compress());
        assert!(FlowBehavior::Expand.can_expand());
        assert!(!FlowBehavior::Expand.can_compress());
        assert!(!FlowBehavior::Compress.can_expand());
        assert!(FlowBehavior::Compress.can_compress());
        assert!(FlowBehavior::Flexible.can_expand());
        assert!(FlowBehavior::Flexible.can_compress());
    }

    #[test]
    fn test_subview_info_axis_queries() {
        let info = SubviewInfo::with_fixed(Size::new(10.0, 10.0), true, false);
        assert!(!info.can_expand_on_axis(Axis::Horizontal));
        assert!(info.can_expand_on_axis(Axis::Vertical));
        assert!(info.can_expand_off_axis(Axis::Horizontal));
        assert!(!info.can_expand_off_axis(Axis::Vertical));
    }

    #[test]
    fn test_invalid_measured_size_is_fault() {
        let _guard = suppress_faults();
        let before = fault_count();
        let info = SubviewInfo::flexible(Size::new(-5.0, 10.0));
        assert_eq!(fault_count(), before + 1);
        // Stored as given.
        assert_eq!(info.measured_size().width, -5.0);

        SubviewInfo::fixed(Size::new(f32::NAN, 1.0));
        assert_eq!(fault_count(), before + 2);
    }

    #[test]
    fn test_measure_horizontal() {
        let config = StackConfig::horizontal().with_spacing(10.0);
        let m = measure(&config, infos(&[(50.0, 20.0), (50.0, 30.0), (50.0, 10.0)]));
        assert_eq!(m.total_size(), Size::new(170.0, 30.0));
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn test_measure_vertical_with_margins() {
        let config = StackConfig::vertical()
            .with_spacing(4.0)
            .with_margins(EdgeInsets::new(1.0, 2.0, 3.0, 4.0));
        let m = measure(&config, infos(&[(30.0, 10.0), (40.0, 10.0)]));
        assert_eq!(m.total_size(), Size::new(46.0, 28.0));
    }

    #[test]
    fn test_measure_rounds_up() {
        let config = StackConfig::horizontal();
        let m = measure(&config, infos(&[(10.2, 5.5), (10.2, 5.0)]));
        assert_eq!(m.total_size(), Size::new(21.0, 6.0));
    }

    #[test]
    fn test_measure_empty() {
        let config = StackConfig::horizontal()
            .with_spacing(10.0)
            .with_margins(EdgeInsets::uniform(5.0));
        let m = measure(&config, Vec::new());
        assert_eq!(m.total_size(), Size::new(10.0, 10.0));
        assert!(m.is_empty());
    }

    #[test]
    fn test_measure_ignores_negative_sizes() {
        let _guard = suppress_faults();
        let config = StackConfig::horizontal();
        let m = measure(&config, infos(&[(-20.0, 5.0), (10.0, 5.0)]));
        assert_eq!(m.total_size(), Size::new(10.0, 5.0));
    }

    #[test]
    fn test_measure_off_thread() {
        let config = StackConfig::horizontal().with_spacing(2.0);
        let m = std::thread::spawn(move || measure(&config, infos(&[(5.0, 5.0), (5.0, 5.0)])))
            .join()
            .unwrap();
        assert_eq!(m.total_size(), Size::new(12.0, 5.0));
    }

    #[test]
    fn test_fixed_measurement() {
        let m = StackMeasurement::fixed(Size::new(44.0, 44.0));
        assert_eq!(m.total_size(), Size::new(44.0, 44.0));
        assert!(m.subview_infos().is_empty());
    }
}
