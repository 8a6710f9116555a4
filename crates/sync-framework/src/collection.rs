//! # Ordered Collection
//!
//! The in-memory copy of one resource kind. Order matters: exports render the collection
//! as-is, so a rolled-back deletion has to put the entity back where it was rather than at
//! the end.

use crate::entity::SyncEntity;

/// Prior value of an entity and where it sat, kept only until its operation settles.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    pub index: usize,
    pub value: T,
}

/// Read-only view handed out to callers.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot<T> {
    pub items: Vec<T>,
    /// Number of successful reconciliations so far.
    pub revision: u64,
}

/// Ordered entities plus a revision counter.
#[derive(Debug, Clone)]
pub struct Collection<T: SyncEntity> {
    items: Vec<T>,
    revision: u64,
}

impl<T: SyncEntity> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SyncEntity> Collection<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            revision: 0,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Marks a successful reconciliation.
    pub fn bump(&mut self) {
        self.revision += 1;
    }

    pub fn position(&self, id: &T::Id) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Replaces the entity with `item`'s id in place and returns the snapshot of what it held.
    pub fn replace(&mut self, item: T) -> Option<Snapshot<T>> {
        let index = self.position(item.id())?;
        let value = std::mem::replace(&mut self.items[index], item);
        Some(Snapshot { index, value })
    }

    /// Overwrites the entity at `index`.
    ///
    /// # Panics
    /// If `index` is out of bounds; callers obtain it from [`Collection::position`].
    pub fn replace_at(&mut self, index: usize, item: T) -> Snapshot<T> {
        let value = std::mem::replace(&mut self.items[index], item);
        Snapshot { index, value }
    }

    /// Removes the entity and returns its snapshot.
    pub fn remove(&mut self, id: &T::Id) -> Option<Snapshot<T>> {
        let index = self.position(id)?;
        let value = self.items.remove(index);
        Some(Snapshot { index, value })
    }

    /// Puts a snapshot back.
    ///
    /// If the id is present again (a refresh brought it back) the value is replaced in place;
    /// otherwise it is inserted at its original index, clamped to the current length.
    pub fn restore(&mut self, snapshot: Snapshot<T>) {
        match self.position(snapshot.value.id()) {
            Some(index) => self.items[index] = snapshot.value,
            None => {
                let index = snapshot.index.min(self.items.len());
                self.items.insert(index, snapshot.value);
            }
        }
    }

    /// Replaces in place when the id is known, appends otherwise.
    pub fn upsert(&mut self, item: T) {
        match self.position(item.id()) {
            Some(index) => self.items[index] = item,
            None => self.items.push(item),
        }
    }

    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
    }

    pub fn snapshot(&self) -> StoreSnapshot<T> {
        StoreSnapshot {
            items: self.items.clone(),
            revision: self.revision,
        }
    }
}
