//! Owner-thread checks for layout state.
//!
//! Surfaces and containers belong to the thread that created them. Layout
//! passes and resets check it; measurement is pure and carries no owner.
//!
//! ```
//! use trellis_core::ThreadAffinity;
//!
//! let owner = ThreadAffinity::current();
//! owner.debug_assert_same_thread();
//! assert!(owner.is_same_thread());
//! ```

use std::thread::ThreadId;

/// The thread that owns a piece of layout state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadAffinity {
    owner: ThreadId,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Owned by the calling thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            owner: std::thread::current().id(),
        }
    }

    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.owner
    }

    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.owner
    }

    /// Panic unless called from the owner thread.
    #[inline]
    #[track_caller]
    pub fn assert_same_thread(&self) {
        if !self.is_same_thread() {
            self.wrong_thread();
        }
    }

    /// [`assert_same_thread`](Self::assert_same_thread) in debug builds, a
    /// no-op in release builds.
    #[inline]
    #[track_caller]
    pub fn debug_assert_same_thread(&self) {
        if cfg!(debug_assertions) {
            self.assert_same_thread();
        }
    }

    #[cold]
    #[inline(never)]
    #[track_caller]
    fn wrong_thread(&self) -> ! {
        let current = std::thread::current();
        panic!(
            "layout state owned by thread {:?} touched from thread {} ({:?}); \
             measure off-thread if needed, but configure and lay out on the owner",
            self.owner,
            current.name().unwrap_or("<unnamed>"),
            current.id(),
        );
    }
}
