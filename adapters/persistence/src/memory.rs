//! In-memory progress store for tests and throwaway sessions.

use std::{cell::RefCell, rc::Rc};

use pathforge_core::{ProgressData, ProgressStore};

#[derive(Debug, Default)]
struct Slot {
    progress: ProgressData,
    saves: usize,
}

/// Progress store kept in memory.
///
/// Clones share the same slot, so a host can hand one clone to the world and
/// inspect what was saved through another.
#[derive(Clone, Debug, Default)]
pub struct MemoryProgressStore {
    slot: Rc<RefCell<Slot>>,
}

impl MemoryProgressStore {
    /// Creates a store pre-populated with `progress`.
    #[must_use]
    pub fn with_progress(progress: ProgressData) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Slot { progress, saves: 0 })),
        }
    }

    /// Progress currently held by the store.
    #[must_use]
    pub fn snapshot(&self) -> ProgressData {
        self.slot.borrow().progress
    }

    /// Number of saves received so far.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.slot.borrow().saves
    }
}

impl ProgressStore for MemoryProgressStore {
    fn load(&self) -> ProgressData {
        self.snapshot()
    }

    fn save(&mut self, progress: &ProgressData) {
        let mut slot = self.slot.borrow_mut();
        slot.progress = *progress;
        slot.saves += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_saved_progress() {
        let observer = MemoryProgressStore::default();
        let mut store = observer.clone();
        let progress = ProgressData {
            menu_coins: 120,
            ..ProgressData::default()
        };

        store.save(&progress);

        assert_eq!(observer.snapshot(), progress);
        assert_eq!(observer.load(), progress);
        assert_eq!(observer.save_count(), 1);
    }

    #[test]
    fn default_store_loads_default_progress() {
        assert_eq!(MemoryProgressStore::default().load(), ProgressData::default());
    }
}
