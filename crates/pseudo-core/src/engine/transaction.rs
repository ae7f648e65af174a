use super::store::{GroupEntry, Store};
use crate::core::models::ids::{GroupId, NodeId};
use crate::core::models::pseudo::PseudoPotential;
use slotmap::SlotMap;
use std::collections::HashMap;
use tracing::warn;

/// The parts of a [`Store`] a transaction can change.
struct Snapshot {
    nodes: SlotMap<NodeId, PseudoPotential>,
    groups: SlotMap<GroupId, GroupEntry>,
    labels: HashMap<String, GroupId>,
}

impl Store {
    /// Runs `action` against the store and undoes all of its changes if it
    /// returns an error.
    ///
    /// Only the store itself is rolled back. Records outside the store that
    /// were stored during a failed action keep their stored state and should
    /// be discarded by the caller.
    pub fn transaction<F, R, E>(&mut self, action: F) -> Result<R, E>
    where
        F: FnOnce(&mut Self) -> Result<R, E>,
    {
        // 1. Record the original state.
        let snapshot = Snapshot {
            nodes: self.nodes.clone(),
            groups: self.groups.clone(),
            labels: self.labels.clone(),
        };

        // 2. Execute the action.
        let result = action(self);

        // 3. On failure, restore the original state.
        if result.is_err() {
            warn!("Transaction failed; rolling back store changes.");
            self.nodes = snapshot.nodes;
            self.groups = snapshot.groups;
            self.labels = snapshot.labels;
        }

        result
    }
}
