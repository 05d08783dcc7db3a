use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use super::morph::TreeMode;

const EMPTY: u8 = 0;
const TREE_SHAPE: u8 = 1;
const SCATTERED: u8 = 2;

/// Single-slot, lock-free handoff of a mode change from another thread.
///
/// Writers overwrite whatever is pending, so only the latest toggle
/// survives; the frame driver drains the slot once per frame.
#[derive(Debug, Clone, Default)]
pub struct ModeMailbox {
    slot: Arc<AtomicU8>,
}

impl ModeMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&self, mode: TreeMode) {
        let encoded = match mode {
            TreeMode::TreeShape => TREE_SHAPE,
            TreeMode::Scattered => SCATTERED,
        };
        self.slot.store(encoded, Ordering::Release);
    }

    /// Take the pending mode, leaving the slot empty
    pub fn take(&self) -> Option<TreeMode> {
        match self.slot.swap(EMPTY, Ordering::AcqRel) {
            TREE_SHAPE => Some(TreeMode::TreeShape),
            SCATTERED => Some(TreeMode::Scattered),
            _ => None,
        }
    }

    /// Drop any pending mode
    pub fn clear(&self) {
        self.slot.store(EMPTY, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_empty_by_default() {
        assert_eq!(ModeMailbox::new().take(), None);
    }

    #[test]
    fn test_last_write_wins() {
        let mailbox = ModeMailbox::new();
        mailbox.post(TreeMode::Scattered);
        mailbox.post(TreeMode::TreeShape);
        mailbox.post(TreeMode::Scattered);
        assert_eq!(mailbox.take(), Some(TreeMode::Scattered));
        assert_eq!(mailbox.take(), None);
    }

    #[test]
    fn test_clear_drops_pending() {
        let mailbox = ModeMailbox::new();
        mailbox.post(TreeMode::Scattered);
        mailbox.clear();
        assert_eq!(mailbox.take(), None);
    }

    #[test]
    fn test_cross_thread_handoff() {
        let mailbox = ModeMailbox::new();
        let ui = mailbox.clone();
        thread::spawn(move || ui.post(TreeMode::Scattered))
            .join()
            .unwrap();
        assert_eq!(mailbox.take(), Some(TreeMode::Scattered));
    }
}
