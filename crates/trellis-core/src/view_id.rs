use slotmap::{Key, KeyData, new_key_type};

new_key_type! {
    /// Identifies a view in a view tree.
    ///
    /// Ids are generational: once a view is removed its id never resolves
    /// again, even if the slot is reused. Containers and layout blocks hold
    /// `ViewId`s instead of references, so they never keep a view alive.
    pub struct ViewId;
}

impl ViewId {
    /// Get the raw u64 representation, for logging and debug output.
    pub fn as_raw(&self) -> u64 {
        self.data().as_ffi()
    }

    /// Rebuild an id from [`as_raw`](Self::as_raw).
    pub fn from_raw(raw: u64) -> Self {
        KeyData::from_ffi(raw).into()
    }
}

static_assertions::assert_impl_all!(ViewId: Send, Sync, Copy);
