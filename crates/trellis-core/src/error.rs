//! Recoverable errors for view tree manipulation.
//!
//! Layout itself never fails with an error value: misuse is reported through
//! [`crate::fault`]. These errors cover the tree operations a host can
//! legitimately get wrong at runtime, such as using a stale id.

use thiserror::Error;

use crate::ViewId;

/// Errors from view tree operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The view id does not resolve, usually because the view was removed.
    #[error("invalid view id: {0:?}")]
    InvalidViewId(ViewId),
    /// Re-parenting would make a view its own ancestor.
    #[error("circular parentage: {child:?} cannot be added under {parent:?}")]
    CircularParentage { parent: ViewId, child: ViewId },
}

/// Result type for view tree operations.
pub type TreeResult<T> = std::result::Result<T, TreeError>;
