//! The view tree that layout operates on.
//!
//! [`ViewTree`] is an arena of plain view nodes addressed by [`ViewId`]. Each
//! node has a name, a frame in its parent's coordinates, a hidden flag, an
//! intrinsic size and a declared [`FlowBehavior`] per axis.
//!
//! Surfaces and containers do not own views. They hold ids and reach the
//! tree through [`ViewAccess`], so a host with its own view storage can
//! implement that trait instead of using [`ViewTree`].

use std::fmt::{self, Write as FmtWrite};

use slotmap::SlotMap;
use trellis_core::logging::targets;
use trellis_core::{TreeError, TreeResult, ViewId};
use trellis_geometry::{Rect, Size};

use crate::stack::FlowBehavior;

/// Access to views by id, as used by layout surfaces and layout blocks.
///
/// Lookups of unknown ids return `None`/`false` and writes to them are
/// ignored: a layout block may outlive the view it positions.
pub trait ViewAccess {
    /// The view's frame in its parent's coordinates.
    fn get_frame(&self, id: ViewId) -> Option<Rect>;

    /// Set the view's frame.
    fn apply_frame(&mut self, id: ViewId, frame: Rect);

    /// Whether the view is hidden. Unknown views count as hidden.
    fn is_view_hidden(&self, id: ViewId) -> bool;

    /// The size the view would like to be, unconstrained.
    fn get_intrinsic_size(&self, id: ViewId) -> Option<Size>;

    /// Declared flow behavior, horizontal then vertical.
    fn get_flow(&self, id: ViewId) -> Option<(FlowBehavior, FlowBehavior)>;

    /// Make `child` the last child of `parent`.
    fn attach_subview(&mut self, parent: ViewId, child: ViewId) -> TreeResult<()>;

    /// Remove `child` from its parent, if it has one.
    fn detach_subview(&mut self, child: ViewId) -> TreeResult<()>;

    /// The view's bounds: its frame size at the origin.
    fn get_bounds(&self, id: ViewId) -> Option<Rect> {
        self.get_frame(id).map(|frame| Rect::from_size(frame.size))
    }
}

/// A single view node.
#[derive(Debug, Clone)]
struct ViewNode {
    name: String,
    parent: Option<ViewId>,
    children: Vec<ViewId>,
    frame: Rect,
    hidden: bool,
    intrinsic_size: Size,
    horizontal_flow: FlowBehavior,
    vertical_flow: FlowBehavior,
}

impl ViewNode {
    fn new(name: String) -> Self {
        Self {
            name,
            parent: None,
            children: Vec::new(),
            frame: Rect::ZERO,
            hidden: false,
            intrinsic_size: Size::ZERO,
            horizontal_flow: FlowBehavior::Flexible,
            vertical_flow: FlowBehavior::Flexible,
        }
    }
}

/// Arena of views.
#[derive(Debug, Clone, Default)]
pub struct ViewTree {
    nodes: SlotMap<ViewId, ViewNode>,
}

impl ViewTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached view.
    pub fn create_view(&mut self, name: impl Into<String>) -> ViewId {
        let name = name.into();
        let id = self.nodes.insert(ViewNode::new(name));
        tracing::trace!(target: targets::TREE, ?id, "created view");
        id
    }

    /// Create a detached view with an intrinsic size and flow behavior.
    pub fn create_leaf(
        &mut self,
        name: impl Into<String>,
        intrinsic_size: Size,
        horizontal_flow: FlowBehavior,
        vertical_flow: FlowBehavior,
    ) -> ViewId {
        let id = self.create_view(name);
        if let Some(node) = self.nodes.get_mut(id) {
            node.intrinsic_size = intrinsic_size;
            node.horizontal_flow = horizontal_flow;
            node.vertical_flow = vertical_flow;
        }
        id
    }

    /// Remove a view and all of its descendants.
    pub fn remove_view(&mut self, id: ViewId) -> TreeResult<()> {
        self.remove_from_parent(id)?;
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.remove(next) {
                pending.extend(node.children);
            }
        }
        tracing::trace!(target: targets::TREE, ?id, "removed view subtree");
        Ok(())
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live views.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, id: ViewId) -> TreeResult<&ViewNode> {
        self.nodes.get(id).ok_or(TreeError::InvalidViewId(id))
    }

    fn node_mut(&mut self, id: ViewId) -> TreeResult<&mut ViewNode> {
        self.nodes.get_mut(id).ok_or(TreeError::InvalidViewId(id))
    }

    pub fn name(&self, id: ViewId) -> TreeResult<&str> {
        Ok(&self.node(id)?.name)
    }

    pub fn parent(&self, id: ViewId) -> TreeResult<Option<ViewId>> {
        Ok(self.node(id)?.parent)
    }

    /// Children in insertion (paint) order.
    pub fn children(&self, id: ViewId) -> TreeResult<&[ViewId]> {
        Ok(&self.node(id)?.children)
    }

    /// Views without a parent.
    pub fn roots(&self) -> Vec<ViewId> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(id, _)| id)
            .collect()
    }

    /// First view with the given name, searching depth-first under `root`.
    pub fn find_by_name(&self, root: ViewId, name: &str) -> Option<ViewId> {
        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            let node = self.nodes.get(id)?;
            if node.name == name {
                return Some(id);
            }
            pending.extend(node.children.iter().rev());
        }
        None
    }

    /// Check whether `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_of(&self, ancestor: ViewId, id: ViewId) -> bool {
        let mut current = Some(id);
        while let Some(view) = current {
            if view == ancestor {
                return true;
            }
            current = self.nodes.get(view).and_then(|node| node.parent);
        }
        false
    }

    /// Append `child` to `parent`, detaching it from any previous parent.
    pub fn add_child(&mut self, parent: ViewId, child: ViewId) -> TreeResult<()> {
        self.node(parent)?;
        self.node(child)?;
        if self.is_ancestor_of(child, parent) {
            return Err(TreeError::CircularParentage { parent, child });
        }
        self.remove_from_parent(child)?;
        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Detach `child` from its parent. Detached views are left alone.
    pub fn remove_from_parent(&mut self, child: ViewId) -> TreeResult<()> {
        let Some(parent) = self.node(child)?.parent else {
            return Ok(());
        };
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.retain(|id| *id != child);
        }
        self.node_mut(child)?.parent = None;
        Ok(())
    }

    pub fn frame(&self, id: ViewId) -> TreeResult<Rect> {
        Ok(self.node(id)?.frame)
    }

    /// Set a view's frame. Returns whether the size changed.
    pub fn set_frame(&mut self, id: ViewId, frame: Rect) -> TreeResult<bool> {
        let node = self.node_mut(id)?;
        let size_changed = node.frame.size != frame.size;
        node.frame = frame;
        Ok(size_changed)
    }

    pub fn is_hidden(&self, id: ViewId) -> TreeResult<bool> {
        Ok(self.node(id)?.hidden)
    }

    pub fn set_hidden(&mut self, id: ViewId, hidden: bool) -> TreeResult<()> {
        self.node_mut(id)?.hidden = hidden;
        Ok(())
    }

    pub fn intrinsic_size(&self, id: ViewId) -> TreeResult<Size> {
        Ok(self.node(id)?.intrinsic_size)
    }

    pub fn set_intrinsic_size(&mut self, id: ViewId, size: Size) -> TreeResult<()> {
        self.node_mut(id)?.intrinsic_size = size;
        Ok(())
    }

    pub fn set_flow(
        &mut self,
        id: ViewId,
        horizontal: FlowBehavior,
        vertical: FlowBehavior,
    ) -> TreeResult<()> {
        let node = self.node_mut(id)?;
        node.horizontal_flow = horizontal;
        node.vertical_flow = vertical;
        Ok(())
    }
}

impl ViewAccess for ViewTree {
    fn get_frame(&self, id: ViewId) -> Option<Rect> {
        self.nodes.get(id).map(|node| node.frame)
    }

    fn apply_frame(&mut self, id: ViewId, frame: Rect) {
        match self.nodes.get_mut(id) {
            Some(node) => node.frame = frame,
            None => tracing::trace!(target: targets::TREE, ?id, "frame set on removed view"),
        }
    }

    fn is_view_hidden(&self, id: ViewId) -> bool {
        self.nodes.get(id).is_none_or(|node| node.hidden)
    }

    fn get_intrinsic_size(&self, id: ViewId) -> Option<Size> {
        self.nodes.get(id).map(|node| node.intrinsic_size)
    }

    fn get_flow(&self, id: ViewId) -> Option<(FlowBehavior, FlowBehavior)> {
        self.nodes
            .get(id)
            .map(|node| (node.horizontal_flow, node.vertical_flow))
    }

    fn attach_subview(&mut self, parent: ViewId, child: ViewId) -> TreeResult<()> {
        self.add_child(parent, child)
    }

    fn detach_subview(&mut self, child: ViewId) -> TreeResult<()> {
        self.remove_from_parent(child)
    }
}

// =========================================================================
// Debug Visualization
// =========================================================================

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
}

/// Renders a view subtree for diagnostics.
///
/// ```
/// use trellis::{ViewTree, ViewTreeDebug};
///
/// let mut tree = ViewTree::new();
/// let root = tree.create_view("root");
/// let child = tree.create_view("child");
/// tree.add_child(root, child).unwrap();
///
/// let text = ViewTreeDebug::new().show_ids(false).format_subtree(&tree, root).unwrap();
/// assert!(text.contains("child"));
/// ```
#[derive(Debug, Clone)]
pub struct ViewTreeDebug {
    style: TreeStyle,
    show_ids: bool,
    show_frames: bool,
}

impl Default for ViewTreeDebug {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewTreeDebug {
    pub fn new() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: true,
            show_frames: true,
        }
    }

    pub fn style(mut self, style: TreeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn show_ids(mut self, show: bool) -> Self {
        self.show_ids = show;
        self
    }

    pub fn show_frames(mut self, show: bool) -> Self {
        self.show_frames = show;
        self
    }

    /// Format the subtree rooted at `root`.
    pub fn format_subtree(&self, tree: &ViewTree, root: ViewId) -> TreeResult<String> {
        let mut output = String::new();
        self.format_node(tree, root, "", true, true, &mut output)
            .map_err(|_| TreeError::InvalidViewId(root))?;
        Ok(output)
    }

    fn format_node(
        &self,
        tree: &ViewTree,
        id: ViewId,
        prefix: &str,
        is_last: bool,
        is_root: bool,
        output: &mut String,
    ) -> Result<(), FormatError> {
        let node = tree.node(id).map_err(|_| FormatError)?;
        let (branch, last_branch, pipe) = match self.style {
            TreeStyle::Ascii => ("+-- ", "`-- ", "|   "),
            TreeStyle::Unicode => ("├── ", "└── ", "│   "),
        };

        if !is_root {
            output.push_str(prefix);
            output.push_str(if is_last { last_branch } else { branch });
        }
        output.push_str(&node.name);
        if self.show_ids {
            write!(output, " #{}", id.as_raw())?;
        }
        if self.show_frames {
            let f = node.frame;
            write!(
                output,
                " ({}, {}, {} x {})",
                f.origin.x, f.origin.y, f.size.width, f.size.height
            )?;
        }
        if node.hidden {
            output.push_str(" [hidden]");
        }
        output.push('\n');

        let child_prefix = if is_root {
            String::new()
        } else if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}{pipe}")
        };
        let count = node.children.len();
        for (index, child) in node.children.iter().enumerate() {
            self.format_node(tree, *child, &child_prefix, index + 1 == count, false, output)?;
        }
        Ok(())
    }
}

#[derive(Debug)]
struct FormatError;

impl From<fmt::Error> for FormatError {
    fn from(_: fmt::Error) -> Self {
        FormatError
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove_child() {
        let mut tree = ViewTree::new();
        let parent = tree.create_view("parent");
        let child = tree.create_view("child");

        tree.add_child(parent, child).unwrap();
        assert_eq!(tree.children(parent).unwrap(), &[child]);
        assert_eq!(tree.parent(child).unwrap(), Some(parent));

        tree.remove_from_parent(child).unwrap();
        assert!(tree.children(parent).unwrap().is_empty());
        assert_eq!(tree.parent(child).unwrap(), None);
    }

    #[test]
    fn test_reparenting_moves_child() {
        let mut tree = ViewTree::new();
        let a = tree.create_view("a");
        let b = tree.create_view("b");
        let child = tree.create_view("child");

        tree.add_child(a, child).unwrap();
        tree.add_child(b, child).unwrap();
        assert!(tree.children(a).unwrap().is_empty());
        assert_eq!(tree.children(b).unwrap(), &[child]);
    }

    #[test]
    fn test_circular_parentage_rejected() {
        let mut tree = ViewTree::new();
        let a = tree.create_view("a");
        let b = tree.create_view("b");
        tree.add_child(a, b).unwrap();

        assert_eq!(
            tree.add_child(b, a),
            Err(TreeError::CircularParentage {
                parent: b,
                child: a
            })
        );
        assert!(matches!(
            tree.add_child(a, a),
            Err(TreeError::CircularParentage { .. })
        ));
    }

    #[test]
    fn test_remove_view_removes_subtree() {
        let mut tree = ViewTree::new();
        let root = tree.create_view("root");
        let mid = tree.create_view("mid");
        let leaf = tree.create_view("leaf");
        tree.add_child(root, mid).unwrap();
        tree.add_child(mid, leaf).unwrap();

        tree.remove_view(mid).unwrap();
        assert!(!tree.contains(mid));
        assert!(!tree.contains(leaf));
        assert!(tree.children(root).unwrap().is_empty());
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.frame(leaf), Err(TreeError::InvalidViewId(leaf)));
    }

    #[test]
    fn test_set_frame_reports_size_change() {
        let mut tree = ViewTree::new();
        let view = tree.create_view("view");
        assert!(tree.set_frame(view, Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap());
        assert!(!tree.set_frame(view, Rect::new(5.0, 5.0, 10.0, 10.0)).unwrap());
        assert_eq!(tree.frame(view).unwrap(), Rect::new(5.0, 5.0, 10.0, 10.0));
    }

    #[test]
    fn test_view_access_tolerates_removed_views() {
        let mut tree = ViewTree::new();
        let view = tree.create_view("gone");
        tree.remove_view(view).unwrap();

        tree.apply_frame(view, Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(tree.get_frame(view), None);
        assert!(tree.is_view_hidden(view));
        assert_eq!(tree.get_bounds(view), None);
    }

    #[test]
    fn test_find_by_name() {
        let mut tree = ViewTree::new();
        let root = tree.create_view("root");
        let avatar = tree.create_view("avatar");
        let label = tree.create_view("label");
        tree.add_child(root, avatar).unwrap();
        tree.add_child(avatar, label).unwrap();

        assert_eq!(tree.find_by_name(root, "label"), Some(label));
        assert_eq!(tree.find_by_name(root, "missing"), None);
        assert_eq!(tree.roots(), vec![root]);
    }

    #[test]
    fn test_leaf_properties() {
        let mut tree = ViewTree::new();
        let leaf = tree.create_leaf(
            "badge",
            Size::new(20.0, 20.0),
            FlowBehavior::Fixed,
            FlowBehavior::Expand,
        );
        assert_eq!(tree.get_intrinsic_size(leaf), Some(Size::new(20.0, 20.0)));
        assert_eq!(
            tree.get_flow(leaf),
            Some((FlowBehavior::Fixed, FlowBehavior::Expand))
        );
    }

    #[test]
    fn test_debug_format() {
        let mut tree = ViewTree::new();
        let root = tree.create_view("row");
        let a = tree.create_view("avatar");
        let b = tree.create_view("title");
        tree.add_child(root, a).unwrap();
        tree.add_child(root, b).unwrap();
        tree.set_frame(a, Rect::new(0.0, 0.0, 40.0, 40.0)).unwrap();
        tree.set_hidden(b, true).unwrap();

        let text = ViewTreeDebug::new()
            .show_ids(false)
            .style(TreeStyle::Ascii)
            .format_subtree(&tree, root)
            .unwrap();
        let expected = "row (0, 0, 0 x 0)\n\
                        +-- avatar (0, 0, 40 x 40)\n\
                        `-- title (0, 0, 0 x 0) [hidden]\n";
        assert_eq!(text, expected);
    }
}
