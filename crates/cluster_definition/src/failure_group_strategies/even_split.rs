use crate::{
    error::Result,
    failure_group_strategy::{FailureGroupStrategy, FailureGroups},
    inventory::StorageNode,
};

/// Cuts the storage list in two contiguous halves. With an odd count the second half is the larger one.
pub struct EvenSplitStrategy {}

impl EvenSplitStrategy {
    pub fn new() -> Self {
        EvenSplitStrategy {}
    }
}

impl Default for EvenSplitStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl FailureGroupStrategy for EvenSplitStrategy {
    fn name(&self) -> &'static str {
        "split"
    }

    fn partition(&self, storage_nodes: &[StorageNode]) -> Result<FailureGroups> {
        let (first, second) = storage_nodes.split_at(storage_nodes.len() / 2);
        Ok(FailureGroups {
            first: first.iter().map(|node| node.ip.clone()).collect(),
            second: second.iter().map(|node| node.ip.clone()).collect(),
        })
    }
}
