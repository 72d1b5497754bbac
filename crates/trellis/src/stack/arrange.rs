//! Arrangement: the resolution-dependent half of stack layout.
//!
//! Given the measured children and the container's bounds, compute one frame
//! per visible child. Surplus or missing on-axis space is split evenly among
//! the children allowed to absorb it; off-axis placement follows the
//! resolved alignment.

use trellis_core::ViewId;
use trellis_core::logging::targets;
use trellis_geometry::{Point, Rect, Size};

use super::config::{OffAxisAlignment, StackConfig};
use super::measure::SubviewInfo;

/// Totals closer than this to the available extent count as an exact fit.
const FUZZY_TOLERANCE: f32 = 0.001;

/// The frame computed for one measured child.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrangedFrame {
    /// Position of the child's info in the measurement.
    pub index: usize,
    pub frame: Rect,
}

/// Working state for one visible child during arrangement.
struct LayoutItem {
    index: usize,
    info: SubviewInfo,
    on_axis_size: f32,
    on_axis_location: f32,
    off_axis_size: f32,
    off_axis_location: f32,
}

/// Compute frames for the visible children.
///
/// `is_visible` receives each info's index; hidden children get no frame
/// and take no spacing. Frames are in the container's coordinate space,
/// margins and each child's location offset included.
pub fn arrange(
    config: &StackConfig,
    subview_infos: &[SubviewInfo],
    bounds: Size,
    is_visible: impl Fn(usize) -> bool,
) -> Vec<ArrangedFrame> {
    let axis = config.axis;
    let spacing = config.spacing;
    let margins = config.margins;

    let available = Size::new(
        (bounds.width - margins.horizontal()).max(0.0),
        (bounds.height - margins.vertical()).max(0.0),
    );
    let on_axis_max = axis.on_axis(available);
    let off_axis_max = axis.off_axis(available);

    let mut items: Vec<LayoutItem> = subview_infos
        .iter()
        .enumerate()
        .filter(|(index, _)| is_visible(*index))
        .map(|(index, info)| LayoutItem {
            index,
            info: *info,
            on_axis_size: axis.on_axis(info.measured_size().max(Size::ZERO)),
            on_axis_location: 0.0,
            off_axis_size: 0.0,
            off_axis_location: 0.0,
        })
        .collect();

    if items.is_empty() {
        return Vec::new();
    }

    let on_axis_total: f32 = items.iter().map(|item| item.on_axis_size).sum::<f32>()
        + spacing * (items.len() - 1) as f32;

    if (on_axis_total - on_axis_max).abs() < FUZZY_TOLERANCE {
        // Exact fit.
    } else if on_axis_total < on_axis_max {
        let surplus = on_axis_max - on_axis_total;
        let selected = select_items(&items, |info| info.can_expand_on_axis(axis), "underflow");
        let adjustment = surplus / selected.len() as f32;
        for index in selected {
            let item = &mut items[index];
            item.on_axis_size = (item.on_axis_size + adjustment).max(0.0);
        }
    } else {
        let deficit = on_axis_total - on_axis_max;
        tracing::debug!(target: targets::STACK, deficit, "stack overflow");
        let selected = select_items(&items, |info| info.can_compress_on_axis(axis), "overflow");
        let adjustment = deficit / selected.len() as f32;
        for index in selected {
            let item = &mut items[index];
            item.on_axis_size = (item.on_axis_size - adjustment).max(0.0);
        }
    }

    let mut location = 0.0;
    for item in &mut items {
        item.on_axis_location = location;
        location += item.on_axis_size + spacing;
    }

    let alignment = config.resolved_alignment();
    for item in &mut items {
        let measured = axis.off_axis(item.info.measured_size().max(Size::ZERO));
        let stretch =
            alignment == OffAxisAlignment::Fill && item.info.can_expand_off_axis(axis);
        item.off_axis_size = if stretch {
            off_axis_max
        } else {
            measured.min(off_axis_max)
        };
        item.off_axis_location = match alignment {
            OffAxisAlignment::Minimum | OffAxisAlignment::Fill => 0.0,
            OffAxisAlignment::Maximum => off_axis_max - item.off_axis_size,
            OffAxisAlignment::Center => (off_axis_max - item.off_axis_size) * 0.5,
        };
    }

    let leading = Point::new(margins.left, margins.top);
    items
        .iter()
        .map(|item| {
            let origin = axis.make_point(item.on_axis_location, item.off_axis_location)
                + leading
                + item.info.location_offset();
            ArrangedFrame {
                index: item.index,
                frame: Rect::from_origin_size(
                    origin,
                    axis.make_size(item.on_axis_size, item.off_axis_size),
                ),
            }
        })
        .collect()
}

/// Indices of the items allowed to absorb an adjustment, or all of them if
/// none are.
fn select_items(
    items: &[LayoutItem],
    eligible: impl Fn(&SubviewInfo) -> bool,
    case: &'static str,
) -> Vec<usize> {
    let selected: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| eligible(&item.info))
        .map(|(index, _)| index)
        .collect();
    if selected.is_empty() {
        tracing::warn!(
            target: targets::STACK,
            case,
            "no flexible children, distributing across all children"
        );
        (0..items.len()).collect()
    } else {
        selected
    }
}

/// A cached arrangement: one frame per visible child.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrangement {
    bounds_size: Size,
    items: Vec<(ViewId, Rect)>,
}

impl Arrangement {
    pub(crate) fn new(bounds_size: Size, items: Vec<(ViewId, Rect)>) -> Self {
        Self { bounds_size, items }
    }

    /// The bounds size this arrangement was computed for.
    pub fn bounds_size(&self) -> Size {
        self.bounds_size
    }

    /// Arranged children and their frames, in layout order.
    pub fn items(&self) -> &[(ViewId, Rect)] {
        &self.items
    }

    /// The frame computed for a child, if it was arranged.
    pub fn frame_for(&self, view: ViewId) -> Option<Rect> {
        self.items
            .iter()
            .find(|(id, _)| *id == view)
            .map(|(_, frame)| *frame)
    }

    /// Whether this arrangement covers exactly `views`, in order.
    pub(crate) fn covers(&self, views: &[ViewId]) -> bool {
        self.items.len() == views.len()
            && self.items.iter().zip(views).all(|((id, _), view)| id == view)
    }
}
