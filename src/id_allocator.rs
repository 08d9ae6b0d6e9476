//! Sequential id allocator for shapes
//! Nodes and labels share one counter; labels carry an `L` prefix
//! Ids are never handed out twice within a session

use crate::{EditorError, SequentialId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdAllocator {
    /// Number of allocations so far (plus any imported ids observed)
    counter: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next node id: the counter is bumped first, so the first node is `1`
    pub fn next_node_id(&mut self) -> Result<SequentialId, EditorError> {
        self.counter = self.counter.checked_add(1).ok_or(EditorError::IdsExhausted)?;
        Ok(SequentialId::Node(self.counter))
    }

    /// Next label id: takes the current counter, then bumps it, so the
    /// first label in a fresh session is `L0`
    pub fn next_label_id(&mut self) -> Result<SequentialId, EditorError> {
        let id = SequentialId::Label(self.counter);
        self.counter = self.counter.checked_add(1).ok_or(EditorError::IdsExhausted)?;
        Ok(id)
    }

    /// Account for an id that arrived from outside (bulk import) so that
    /// later allocations in the same namespace never collide with it
    ///
    /// Returns false, leaving the counter untouched, when the id is so large
    /// that no further id of its namespace could follow it.
    pub fn observe(&mut self, id: SequentialId) -> bool {
        let floor = match id {
            SequentialId::Node(n) if n < u64::MAX => n,
            SequentialId::Label(n) if n < u64::MAX - 1 => n + 1,
            _ => return false,
        };
        self.counter = self.counter.max(floor);
        true
    }

    pub fn counter(&self) -> u64 {
        self.counter
    }
}
