//! Selection model: the set of emoji ids marked for group manipulation.
//!
//! The set is owned by the interaction layer, not the document. Callers keep
//! it referentially valid by calling [`SelectionSet::remove`] when an emoji is
//! deleted and [`SelectionSet::retain`] to prune ids that disappeared elsewhere.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use std::collections::HashSet;

use crate::doc::EntityId;

/// Set of selected emoji ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: HashSet<EntityId>,
}

impl SelectionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove `id` if selected, otherwise select it. Returns whether `id` is
    /// selected afterwards.
    pub fn toggle(&mut self, id: EntityId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Deselect `id`. Returns whether it was selected.
    pub fn remove(&mut self, id: EntityId) -> bool {
        self.ids.remove(&id)
    }

    /// Keep only ids for which `keep` returns `true`; returns the pruned ids.
    pub fn retain<F>(&mut self, mut keep: F) -> Vec<EntityId>
    where
        F: FnMut(EntityId) -> bool,
    {
        let mut pruned = Vec::new();
        self.ids.retain(|id| {
            let kept = keep(*id);
            if !kept {
                pruned.push(*id);
            }
            kept
        });
        pruned.sort_unstable();
        pruned
    }

    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.ids.contains(&id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Sorted copy of the selected ids.
    #[must_use]
    pub fn ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.ids.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.ids.iter().copied()
    }
}
