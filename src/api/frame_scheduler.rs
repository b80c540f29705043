use tracing::trace;

use super::invalidation::InvalidationMask;

/// Coalesces relayout requests into at most one pending frame.
///
/// Hosts call [`FrameScheduler::request`] from resize and legend events and
/// schedule a single callback whenever it returns `true`; that callback runs
/// the merged work once.
#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    pending: InvalidationMask,
    coalesced: u32,
}

impl FrameScheduler {
    /// Records `mask`. Returns `true` when it opened a new burst.
    pub fn request(&mut self, mask: InvalidationMask) -> bool {
        if mask.is_none() {
            return false;
        }
        let opened = self.pending.is_none();
        self.pending.merge(mask);
        self.coalesced += 1;
        trace!(
            opened,
            coalesced = self.coalesced,
            level = ?self.pending.level(),
            "frame requested"
        );
        opened
    }

    /// Takes the merged work of the current burst, if any.
    pub fn take(&mut self) -> Option<InvalidationMask> {
        if self.pending.is_none() {
            return None;
        }
        let mask = self.pending;
        self.pending = InvalidationMask::NONE;
        self.coalesced = 0;
        Some(mask)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        !self.pending.is_none()
    }
}
