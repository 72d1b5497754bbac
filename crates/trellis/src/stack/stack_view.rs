//! The stack container.

use std::fmt;

use trellis_core::logging::{span_names, targets};
use trellis_core::{PerfSpan, ViewId, assert_debug, report_fault};
use trellis_geometry::{Rect, Size};

use super::arrange::{Arrangement, arrange};
use super::config::StackConfig;
use super::measure::{StackMeasurement, SubviewInfo, measure};
use crate::error::LayoutFault;
use crate::layout_view::LayoutView;
use crate::tree::{ViewAccess, ViewTree};

/// Lifecycle of a [`StackView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackState {
    /// No measurement yet; `configure` is allowed.
    Unconfigured,
    /// Has a measurement but no arrangement for the current bounds.
    Configured,
    /// Frames have been computed for the current bounds.
    Arranged,
}

/// A single-axis stack of children laid out from a cached measurement.
///
/// The container is configured once with a [`StackConfig`], a
/// [`StackMeasurement`] and the children it arranges. After that every layout
/// pass that sees a new bounds size computes an [`Arrangement`] and applies
/// it; passes with an unchanged size reuse the cached one. Layout blocks
/// registered on the underlying surface run after the arrangement is applied.
///
/// # Example
///
/// ```
/// use trellis::{
///     Rect, Size, StackAlignment, StackConfig, StackView, SubviewInfo, ViewAccess, ViewTree,
/// };
///
/// let mut tree = ViewTree::new();
/// let mut row = StackView::new(&mut tree, "row");
/// let icon = tree.create_view("icon");
/// let title = tree.create_view("title");
///
/// let config = StackConfig::horizontal()
///     .with_spacing(8.0)
///     .with_alignment(StackAlignment::Center);
/// let measurement = row.configure_with_infos(
///     &mut tree,
///     config,
///     &[icon, title],
///     vec![
///         SubviewInfo::fixed(Size::new(24.0, 24.0)),
///         SubviewInfo::flexible(Size::new(100.0, 18.0)),
///     ],
/// );
/// assert_eq!(measurement.total_size(), Size::new(132.0, 24.0));
///
/// tree.set_frame(row.id(), Rect::new(0.0, 0.0, 200.0, 44.0)).unwrap();
/// row.layout_if_needed(&mut tree);
/// assert_eq!(tree.get_frame(icon), Some(Rect::new(0.0, 10.0, 24.0, 24.0)));
/// assert_eq!(tree.get_frame(title), Some(Rect::new(32.0, 13.0, 168.0, 18.0)));
/// ```
pub struct StackView {
    base: LayoutView,
    config: StackConfig,
    arranged_subviews: Vec<ViewId>,
    measurement: Option<StackMeasurement>,
    arrangement: Option<Arrangement>,
}

impl fmt::Debug for StackView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackView")
            .field("base", &self.base)
            .field("config", &self.config)
            .field("arranged_subviews", &self.arranged_subviews)
            .field("state", &self.state())
            .finish()
    }
}

impl StackView {
    /// Create a stack backed by a new view in `tree`.
    pub fn new(tree: &mut ViewTree, name: impl Into<String>) -> Self {
        Self::from_surface(LayoutView::new(tree, name))
    }

    /// Create a stack for an existing view in any [`ViewAccess`] storage.
    pub fn with_view(id: ViewId, name: impl Into<String>) -> Self {
        Self::from_surface(LayoutView::with_view(id, name))
    }

    fn from_surface(base: LayoutView) -> Self {
        Self {
            base,
            config: StackConfig::default(),
            arranged_subviews: Vec::new(),
            measurement: None,
            arrangement: None,
        }
    }

    #[inline]
    pub fn id(&self) -> ViewId {
        self.base.id()
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.base.name()
    }

    /// The underlying surface, for layout blocks and signals.
    pub fn surface(&self) -> &LayoutView {
        &self.base
    }

    pub fn surface_mut(&mut self) -> &mut LayoutView {
        &mut self.base
    }

    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    pub fn measurement(&self) -> Option<&StackMeasurement> {
        self.measurement.as_ref()
    }

    /// The cached arrangement, if the current one is still valid.
    pub fn arrangement(&self) -> Option<&Arrangement> {
        self.arrangement.as_ref()
    }

    /// Arranged children, in layout order.
    pub fn arranged_subviews(&self) -> &[ViewId] {
        &self.arranged_subviews
    }

    pub fn state(&self) -> StackState {
        match (&self.measurement, &self.arrangement) {
            (None, _) => StackState::Unconfigured,
            (Some(_), None) => StackState::Configured,
            (Some(_), Some(_)) => StackState::Arranged,
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Bind configuration, measurement and children.
    ///
    /// `measurement` must hold one info per child in `subviews`, hidden
    /// children included: infos pair with children by position, and a hidden
    /// child skips its own slot. Measuring only the visible children shifts
    /// every later pairing and is reported as a count mismatch on layout.
    ///
    /// Only valid from [`StackState::Unconfigured`]; a second call is a fault
    /// and is ignored. Use [`configure_for_reuse`](Self::configure_for_reuse)
    /// or [`reset`](Self::reset) to rebind.
    pub fn configure(
        &mut self,
        access: &mut dyn ViewAccess,
        config: StackConfig,
        measurement: StackMeasurement,
        subviews: &[ViewId],
    ) {
        if self.measurement.is_some() {
            report_fault(LayoutFault::AlreadyConfigured {
                view: self.name().to_owned(),
            });
            return;
        }

        self.apply_config(config);
        for &subview in subviews {
            self.add_arranged_subview(access, subview);
        }
        self.set_measurement(measurement);
        tracing::debug!(
            target: targets::STACK,
            view = %self.name(),
            subviews = self.arranged_subviews.len(),
            "configured"
        );
    }

    /// Measure `subview_infos`, then [`configure`](Self::configure).
    ///
    /// Returns the measurement so callers can cache it.
    pub fn configure_with_infos(
        &mut self,
        access: &mut dyn ViewAccess,
        config: StackConfig,
        subviews: &[ViewId],
        subview_infos: Vec<SubviewInfo>,
    ) -> StackMeasurement {
        let measurement = measure(&config, subview_infos);
        self.configure(access, config, measurement.clone(), subviews);
        measurement
    }

    /// Derive each child's info from its intrinsic size and declared flow
    /// behavior, then configure.
    ///
    /// Children unknown to `access` are reported and left out.
    pub fn configure_with_subviews(
        &mut self,
        access: &mut dyn ViewAccess,
        config: StackConfig,
        subviews: &[ViewId],
    ) -> StackMeasurement {
        let mut known = Vec::with_capacity(subviews.len());
        let mut infos = Vec::with_capacity(subviews.len());
        for &subview in subviews {
            match (access.get_intrinsic_size(subview), access.get_flow(subview)) {
                (Some(size), Some((horizontal, vertical))) => {
                    known.push(subview);
                    infos.push(SubviewInfo::new(size, horizontal, vertical));
                }
                _ => report_fault(LayoutFault::UnknownSubview {
                    view: self.name().to_owned(),
                    child: subview,
                }),
            }
        }
        self.configure_with_infos(access, config, &known, infos)
    }

    /// Replace configuration and measurement, keeping the children, and lay
    /// out immediately.
    ///
    /// For containers recycled across list rows whose children stay the same
    /// but whose content changes.
    pub fn configure_for_reuse(
        &mut self,
        access: &mut dyn ViewAccess,
        config: StackConfig,
        measurement: StackMeasurement,
    ) {
        self.apply_config(config);
        self.set_measurement(measurement);
        self.layout_subviews(access);
    }

    fn apply_config(&mut self, config: StackConfig) {
        assert_debug!(
            config.spacing.is_finite() && config.spacing >= 0.0,
            "{}",
            LayoutFault::InvalidSpacing(config.spacing)
        );
        if self.config != config {
            self.config = config;
            self.invalidate_arrangement();
        }
    }

    fn set_measurement(&mut self, measurement: StackMeasurement) {
        // The surface reports the measured size to the host.
        self.base.set_preferred_size(Some(measurement.total_size()));
        self.measurement = Some(measurement);
        self.invalidate_arrangement();
        self.base.invalidate();
    }

    /// Append a child to the arrangement.
    ///
    /// Returns `false` if the child could not be added (already present, or
    /// unknown to `access`).
    pub fn add_arranged_subview(&mut self, access: &mut dyn ViewAccess, subview: ViewId) -> bool {
        if self.arranged_subviews.contains(&subview) {
            report_fault(LayoutFault::DuplicateSubview {
                view: self.name().to_owned(),
                child: subview,
            });
            return false;
        }
        if !self.base.add_subview(access, subview) {
            return false;
        }
        self.arranged_subviews.push(subview);
        self.invalidate_arrangement();
        true
    }

    /// Append several children, optionally in reverse order.
    pub fn add_arranged_subviews(
        &mut self,
        access: &mut dyn ViewAccess,
        subviews: &[ViewId],
        reverse_order: bool,
    ) {
        let mut ordered = subviews.to_vec();
        if reverse_order {
            ordered.reverse();
        }
        for subview in ordered {
            self.add_arranged_subview(access, subview);
        }
    }

    /// Remove a child from the arrangement and detach it.
    ///
    /// The measurement is not touched; callers replace it via
    /// [`configure_for_reuse`](Self::configure_for_reuse).
    pub fn remove_arranged_subview(&mut self, access: &mut dyn ViewAccess, subview: ViewId) -> bool {
        let Some(position) = self.arranged_subviews.iter().position(|id| *id == subview) else {
            report_fault(LayoutFault::UnknownSubview {
                view: self.name().to_owned(),
                child: subview,
            });
            return false;
        };
        self.arranged_subviews.remove(position);
        self.base.remove_subview(access, subview);
        self.invalidate_arrangement();
        true
    }

    /// Drop the cached arrangement and schedule a pass.
    pub fn invalidate_arrangement(&mut self) {
        self.arrangement = None;
        self.base.set_needs_layout();
    }

    /// The size the host should give this container: the measured total, or
    /// zero while hidden.
    pub fn size_that_fits(&self, access: &dyn ViewAccess) -> Size {
        if access.is_view_hidden(self.id()) {
            return Size::ZERO;
        }
        match &self.measurement {
            Some(measurement) => measurement.total_size(),
            None => {
                report_fault(LayoutFault::MissingMeasurement {
                    view: self.name().to_owned(),
                });
                Size::ZERO
            }
        }
    }

    // =========================================================================
    // Layout Passes
    // =========================================================================

    /// Arrange children if the bounds size, the visible children or the
    /// measurement changed since the last pass.
    ///
    /// Returns whether a pass ran.
    pub fn layout_if_needed(&mut self, access: &mut dyn ViewAccess) -> bool {
        self.base.assert_owner_thread();
        self.drop_stale_arrangement(access);
        if !self.base.needs_layout() {
            return false;
        }
        self.perform_layout(access);
        self.base.mark_laid_out();
        true
    }

    /// Arrange children and run layout blocks now.
    ///
    /// The cached arrangement is reused if the bounds size is unchanged.
    pub fn layout_subviews(&mut self, access: &mut dyn ViewAccess) {
        self.base.assert_owner_thread();
        self.drop_stale_arrangement(access);
        self.perform_layout(access);
        self.base.mark_laid_out();
    }

    /// Forget the cached arrangement if the bounds size or the set of visible
    /// children moved away from it.
    fn drop_stale_arrangement(&mut self, access: &dyn ViewAccess) {
        if self.base.observe_size(access).is_some() {
            self.arrangement = None;
            return;
        }
        let visible = self.visible_subviews(access);
        let stale = self
            .arrangement
            .as_ref()
            .is_some_and(|arrangement| !arrangement.covers(&visible));
        if stale {
            tracing::trace!(target: targets::STACK, view = %self.name(), "visible subviews changed");
            self.invalidate_arrangement();
        }
    }

    fn perform_layout(&mut self, access: &mut dyn ViewAccess) {
        let _span = PerfSpan::for_view(span_names::STACK_LAYOUT, self.base.name());
        let Some(bounds) = access.get_bounds(self.id()) else {
            return;
        };

        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            tracing::trace!(target: targets::STACK, view = %self.name(), "empty bounds");
            for &subview in self.base.subviews() {
                LayoutView::set_subview_frame(access, subview, Rect::ZERO);
            }
            return;
        }

        if let Some(arrangement) = self.ensure_arrangement(access, bounds.size) {
            for &(subview, frame) in arrangement.items() {
                LayoutView::set_subview_frame(access, subview, frame);
            }
        }

        // Layout blocks run after the arrangement so they can adjust it.
        self.base.apply_layout_blocks(access);
    }

    /// Arranged children that are visible and have a matching info slot.
    fn visible_subviews(&self, access: &dyn ViewAccess) -> Vec<ViewId> {
        let count = self
            .measurement
            .as_ref()
            .map_or(0, |m| m.len().min(self.arranged_subviews.len()));
        self.arranged_subviews[..count]
            .iter()
            .copied()
            .filter(|id| !access.is_view_hidden(*id))
            .collect()
    }

    fn ensure_arrangement(&mut self, access: &dyn ViewAccess, size: Size) -> Option<&Arrangement> {
        let cached = self
            .arrangement
            .as_ref()
            .is_some_and(|arrangement| arrangement.bounds_size() == size);
        if !cached {
            let Some(measurement) = &self.measurement else {
                report_fault(LayoutFault::MissingMeasurement {
                    view: self.name().to_owned(),
                });
                return None;
            };

            let infos = measurement.subview_infos();
            let subviews = &self.arranged_subviews;
            assert_debug!(
                subviews.len() == infos.len(),
                "{}",
                LayoutFault::CountMismatch {
                    view: self.name().to_owned(),
                    subviews: subviews.len(),
                    infos: infos.len(),
                }
            );
            let count = subviews.len().min(infos.len());

            let frames = arrange(&self.config, &infos[..count], size, |index| {
                !access.is_view_hidden(subviews[index])
            });
            let items = frames
                .into_iter()
                .map(|arranged| (subviews[arranged.index], arranged.frame))
                .collect();

            tracing::trace!(
                target: targets::STACK,
                view = %self.name(),
                width = size.width,
                height = size.height,
                "arranged"
            );
            self.arrangement = Some(Arrangement::new(size, items));
        }
        self.arrangement.as_ref()
    }

    /// Return to [`StackState::Unconfigured`].
    ///
    /// Detaches every child, drops layout blocks and tap handlers, clears the
    /// preferred size and restores the default configuration.
    pub fn reset(&mut self, access: &mut dyn ViewAccess) {
        self.base.reset(access);
        self.arranged_subviews.clear();
        self.config = StackConfig::default();
        self.measurement = None;
        self.arrangement = None;
    }
}
