//! Deferred layout surfaces.
//!
//! A [`LayoutView`] hosts child views and a list of *layout blocks*:
//! closures that position children from the surface's current bounds. The
//! surface does not size anything itself. It only guarantees when blocks
//! run:
//!
//! - once per observed change of its bounds *size* (moving the surface
//!   does not count)
//! - once per pass after [`invalidate`](LayoutView::invalidate) or
//!   [`set_needs_layout`](LayoutView::set_needs_layout), however many times
//!   those were called
//! - on demand via [`layout_subviews`](LayoutView::layout_subviews)
//!
//! The host drives passes by calling
//! [`layout_if_needed`](LayoutView::layout_if_needed) after changing frames.
//!
//! # Example
//!
//! ```
//! use trellis::{LayoutView, Rect, Size, ViewAccess, ViewTree};
//!
//! let mut tree = ViewTree::new();
//! let mut surface = LayoutView::new(&mut tree, "cell");
//! let badge = tree.create_view("badge");
//!
//! surface.add_subview_to_center_on_superview(&mut tree, badge, Size::new(20.0, 20.0));
//!
//! tree.set_frame(surface.id(), Rect::new(0.0, 0.0, 100.0, 40.0)).unwrap();
//! surface.layout_if_needed(&mut tree);
//! assert_eq!(tree.get_frame(badge), Some(Rect::new(40.0, 10.0, 20.0, 20.0)));
//! ```

use std::fmt;

use trellis_core::logging::{span_names, targets};
use trellis_core::{PerfSpan, Signal, ThreadAffinity, ViewId, report_fault};
use trellis_geometry::{Point, Rect, Size};

use crate::error::LayoutFault;
use crate::tree::{ViewAccess, ViewTree};

/// What a layout block sees when it runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutContext {
    /// The surface running the block.
    pub view: ViewId,
    /// The surface's bounds: its size at the origin.
    pub bounds: Rect,
}

/// A stored placement closure.
///
/// Blocks name children by [`ViewId`] and never own them. Writing to a view
/// that has since been removed is ignored by [`ViewTree`].
pub type LayoutBlock = Box<dyn FnMut(&mut dyn ViewAccess, &LayoutContext)>;

/// A tap callback, given the tap location in the surface's coordinates.
pub type TapHandler = Box<dyn FnMut(Point)>;

/// A container that re-runs layout blocks whenever its size changes.
pub struct LayoutView {
    id: ViewId,
    name: String,
    subviews: Vec<ViewId>,
    layout_blocks: Vec<LayoutBlock>,
    tap_handlers: Vec<TapHandler>,
    /// Size seen by the last pass; `None` until the first pass.
    last_size: Option<Size>,
    needs_layout: bool,
    intrinsic_size_valid: bool,
    preferred_size: Option<Size>,
    affinity: ThreadAffinity,
    size_changed: Signal<Size>,
}

impl fmt::Debug for LayoutView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutView")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("subviews", &self.subviews)
            .field("layout_blocks", &self.layout_blocks.len())
            .field("tap_handlers", &self.tap_handlers.len())
            .field("last_size", &self.last_size)
            .field("needs_layout", &self.needs_layout)
            .finish()
    }
}

impl LayoutView {
    /// Create a surface backed by a new view in `tree`.
    pub fn new(tree: &mut ViewTree, name: impl Into<String>) -> Self {
        let name = name.into();
        let id = tree.create_view(name.clone());
        Self::with_view(id, name)
    }

    /// Create a surface for an existing view in any [`ViewAccess`] storage.
    pub fn with_view(id: ViewId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            subviews: Vec::new(),
            layout_blocks: Vec::new(),
            tap_handlers: Vec::new(),
            last_size: None,
            needs_layout: true,
            intrinsic_size_valid: false,
            preferred_size: None,
            affinity: ThreadAffinity::current(),
            size_changed: Signal::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> ViewId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Children added through this surface, in insertion order.
    pub fn subviews(&self) -> &[ViewId] {
        &self.subviews
    }

    pub fn layout_block_count(&self) -> usize {
        self.layout_blocks.len()
    }

    /// Emitted with the new size whenever a pass observes a size change.
    pub fn size_changed(&self) -> &Signal<Size> {
        &self.size_changed
    }

    // =========================================================================
    // Children and Layout Blocks
    // =========================================================================

    /// Attach a child without a layout block.
    ///
    /// Returns `false` if the child could not be added. Adding the same child
    /// twice is a fault.
    pub fn add_subview(&mut self, access: &mut dyn ViewAccess, child: ViewId) -> bool {
        if self.subviews.contains(&child) {
            report_fault(LayoutFault::DuplicateSubview {
                view: self.name.clone(),
                child,
            });
            return false;
        }
        if access.attach_subview(self.id, child).is_err() {
            report_fault(LayoutFault::UnknownSubview {
                view: self.name.clone(),
                child,
            });
            return false;
        }
        self.subviews.push(child);
        self.invalidate();
        true
    }

    /// Attach a child and register the block that positions it.
    pub fn add_child<F>(
        &mut self,
        access: &mut dyn ViewAccess,
        child: ViewId,
        layout_block: F,
    ) -> bool
    where
        F: FnMut(&mut dyn ViewAccess, &LayoutContext) + 'static,
    {
        if !self.add_subview(access, child) {
            return false;
        }
        self.add_layout_block(layout_block);
        true
    }

    /// Register a block that runs on every pass.
    pub fn add_layout_block<F>(&mut self, layout_block: F)
    where
        F: FnMut(&mut dyn ViewAccess, &LayoutContext) + 'static,
    {
        self.layout_blocks.push(Box::new(layout_block));
        self.set_needs_layout();
    }

    /// Detach a child. Its layout blocks stay registered.
    pub fn remove_subview(&mut self, access: &mut dyn ViewAccess, child: ViewId) -> bool {
        let Some(position) = self.subviews.iter().position(|id| *id == child) else {
            report_fault(LayoutFault::UnknownSubview {
                view: self.name.clone(),
                child,
            });
            return false;
        };
        self.subviews.remove(position);
        if let Err(err) = access.detach_subview(child) {
            tracing::debug!(target: targets::SURFACE, view = %self.name, %err, "detach failed");
        }
        self.invalidate();
        true
    }

    /// Set a child's frame, skipping the write when nothing changed.
    pub fn set_subview_frame(access: &mut dyn ViewAccess, child: ViewId, frame: Rect) {
        if access.get_frame(child) != Some(frame) {
            access.apply_frame(child, frame);
        }
    }

    /// Attach a child that always covers the surface's bounds.
    pub fn add_subview_to_fill_superview_edges(
        &mut self,
        access: &mut dyn ViewAccess,
        child: ViewId,
    ) -> bool {
        self.add_child(access, child, move |access, ctx| {
            Self::set_subview_frame(access, child, ctx.bounds);
        })
    }

    /// Attach a child of a fixed size kept centered in the surface.
    pub fn add_subview_to_center_on_superview(
        &mut self,
        access: &mut dyn ViewAccess,
        child: ViewId,
        size: Size,
    ) -> bool {
        self.add_child(access, child, move |access, ctx| {
            let origin = Point::new(
                (ctx.bounds.width() - size.width) * 0.5,
                (ctx.bounds.height() - size.height) * 0.5,
            );
            Self::set_subview_frame(access, child, Rect::from_origin_size(origin, size));
        })
    }

    /// Attach a full-width stroke of the given thickness along the bottom
    /// edge.
    pub fn add_subview_as_bottom_stroke(
        &mut self,
        access: &mut dyn ViewAccess,
        child: ViewId,
        thickness: f32,
    ) -> bool {
        self.add_child(access, child, move |access, ctx| {
            let frame = Rect::new(
                0.0,
                ctx.bounds.height() - thickness,
                ctx.bounds.width(),
                thickness,
            );
            Self::set_subview_frame(access, child, frame);
        })
    }

    // =========================================================================
    // Sizing
    // =========================================================================

    /// Mark the intrinsic size stale and schedule a pass.
    ///
    /// Idempotent until the next pass.
    pub fn invalidate(&mut self) {
        self.intrinsic_size_valid = false;
        self.needs_layout = true;
    }

    /// Schedule a pass without touching the intrinsic size.
    pub fn set_needs_layout(&mut self) {
        self.needs_layout = true;
    }

    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    pub fn is_intrinsic_size_valid(&self) -> bool {
        self.intrinsic_size_valid
    }

    /// Size reported to the host when nothing more specific is known.
    pub fn set_preferred_size(&mut self, size: Option<Size>) {
        if self.preferred_size != size {
            self.preferred_size = size;
            self.invalidate();
        }
    }

    pub fn preferred_size(&self) -> Option<Size> {
        self.preferred_size
    }

    /// The surface's intrinsic size. Querying it marks it valid again.
    pub fn intrinsic_size(&mut self) -> Size {
        self.intrinsic_size_valid = true;
        self.preferred_size.unwrap_or(Size::ZERO)
    }

    /// Size for the host's outer layout: zero while hidden.
    pub fn size_that_fits(&self, access: &dyn ViewAccess) -> Size {
        if access.is_view_hidden(self.id) {
            Size::ZERO
        } else {
            self.preferred_size.unwrap_or(Size::ZERO)
        }
    }

    // =========================================================================
    // Gestures
    // =========================================================================

    /// Register a tap callback.
    pub fn add_tap_handler<F>(&mut self, handler: F)
    where
        F: FnMut(Point) + 'static,
    {
        self.tap_handlers.push(Box::new(handler));
    }

    pub fn tap_handler_count(&self) -> usize {
        self.tap_handlers.len()
    }

    /// Deliver a tap at `point` (surface coordinates).
    ///
    /// Returns whether any handler ran. Taps outside the bounds or on a
    /// hidden surface are ignored.
    pub fn handle_tap(&mut self, access: &dyn ViewAccess, point: Point) -> bool {
        if self.tap_handlers.is_empty() || access.is_view_hidden(self.id) {
            return false;
        }
        let Some(bounds) = access.get_bounds(self.id) else {
            return false;
        };
        if !bounds.contains(point) {
            return false;
        }
        for handler in &mut self.tap_handlers {
            handler(point);
        }
        true
    }

    // =========================================================================
    // Layout Passes
    // =========================================================================

    /// Compare the current bounds size with the last pass.
    ///
    /// On a change, records the new size, schedules a pass, notifies
    /// `size_changed` and returns the new size.
    pub(crate) fn observe_size(&mut self, access: &dyn ViewAccess) -> Option<Size> {
        let size = access.get_frame(self.id)?.size;
        if self.last_size == Some(size) {
            return None;
        }
        tracing::trace!(
            target: targets::SURFACE,
            view = %self.name,
            width = size.width,
            height = size.height,
            "size changed"
        );
        self.last_size = Some(size);
        self.needs_layout = true;
        self.size_changed.emit(size);
        Some(size)
    }

    /// Run the layout blocks if the size changed or a pass was scheduled.
    ///
    /// Returns whether a pass ran.
    pub fn layout_if_needed(&mut self, access: &mut dyn ViewAccess) -> bool {
        self.affinity.debug_assert_same_thread();
        self.observe_size(access);
        if !self.needs_layout {
            return false;
        }
        self.apply_layout_blocks(access);
        self.needs_layout = false;
        true
    }

    /// Run the layout blocks now, whether or not anything changed.
    pub fn layout_subviews(&mut self, access: &mut dyn ViewAccess) {
        self.affinity.debug_assert_same_thread();
        self.observe_size(access);
        self.apply_layout_blocks(access);
        self.needs_layout = false;
    }

    pub(crate) fn apply_layout_blocks(&mut self, access: &mut dyn ViewAccess) {
        if self.layout_blocks.is_empty() {
            return;
        }
        let _span = PerfSpan::for_view(span_names::SURFACE_LAYOUT, &self.name);
        let context = LayoutContext {
            view: self.id,
            bounds: access.get_bounds(self.id).unwrap_or(Rect::ZERO),
        };
        for block in &mut self.layout_blocks {
            block(&mut *access, &context);
        }
    }

    pub(crate) fn mark_laid_out(&mut self) {
        self.needs_layout = false;
    }

    pub(crate) fn assert_owner_thread(&self) {
        self.affinity.debug_assert_same_thread();
    }

    /// Remove all children, layout blocks and tap handlers.
    ///
    /// The surface returns to its just-constructed state and is invalidated.
    /// `size_changed` connections belong to the host and are kept.
    pub fn reset(&mut self, access: &mut dyn ViewAccess) {
        self.affinity.debug_assert_same_thread();
        for child in self.subviews.drain(..) {
            if let Err(err) = access.detach_subview(child) {
                tracing::debug!(target: targets::SURFACE, view = %self.name, %err, "detach failed");
            }
        }
        self.layout_blocks.clear();
        self.tap_handlers.clear();
        self.preferred_size = None;
        self.last_size = None;
        self.invalidate();
        tracing::debug!(target: targets::SURFACE, view = %self.name, "reset");
    }
}
