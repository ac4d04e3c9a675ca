//! Identifiers and simple allocators for core entities.

use serde::{Deserialize, Serialize};

/// Handle returned by [`Timers::schedule`](crate::timers::Timers::schedule).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TimerId(pub u32);

/// Opaque clip handle handed out by the asset loader.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ClipHandle(pub u64);

/// Opaque scene node handle for the character's model.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct NodeHandle(pub u64);

/// Monotonic allocator for TimerId.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_timer: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_timer(&mut self) -> TimerId {
        let id = TimerId(self.next_timer);
        self.next_timer = self.next_timer.wrapping_add(1);
        id
    }
}
