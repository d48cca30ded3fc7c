//! Slot-indexed registry of tracked controllers.
//!
//! Explicitly owned by one [`super::InputSession`]; there is no process-wide
//! device state, so independent sessions (and tests) never interfere.

use crate::controller::TrackedController;

#[derive(Debug, Default)]
pub struct ControllerRegistry {
    slots: Vec<Option<TrackedController>>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_registered(&self, slot: usize) -> bool {
        matches!(self.slots.get(slot), Some(Some(_)))
    }

    pub fn get(&self, slot: usize) -> Option<&TrackedController> {
        self.slots.get(slot).and_then(|entry| entry.as_ref())
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut TrackedController> {
        self.slots.get_mut(slot).and_then(|entry| entry.as_mut())
    }

    pub fn insert(&mut self, slot: usize, controller: TrackedController) {
        if self.slots.len() <= slot {
            self.slots.resize_with(slot + 1, || None);
        }
        self.slots[slot] = Some(controller);
    }

    /// Clears a slot, returning the adapter that occupied it. This is also
    /// the collaborator-facing explicit removal path.
    pub fn clear(&mut self, slot: usize) -> Option<TrackedController> {
        self.slots.get_mut(slot).and_then(|entry| entry.take())
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &TrackedController)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, entry)| entry.as_ref().map(|controller| (slot, controller)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut TrackedController)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(slot, entry)| entry.as_mut().map(|controller| (slot, controller)))
    }

    pub fn connected_count(&self) -> usize {
        self.slots.iter().filter(|entry| entry.is_some()).count()
    }
}
