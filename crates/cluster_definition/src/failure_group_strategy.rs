//! Trait for a failure group strategy.

use std::collections::BTreeSet;

use itertools::Itertools;

use crate::{
    error::{Error, Result},
    inventory::StorageNode,
};

/// Failure group of a data disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum FailureGroup {
    First,
    Second,
}

impl FailureGroup {
    /// Failure group id as the filesystem expects it.
    pub fn id(self) -> u32 {
        match self {
            FailureGroup::First => 1,
            FailureGroup::Second => 2,
        }
    }
}

/// Failure group id of the tie-breaker disk in multi-AZ deployments.
pub const DESCRIPTOR_FAILURE_GROUP: u32 = 3;

/// Storage node ids split into two failure groups. Each group keeps inventory order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FailureGroups {
    pub first: Vec<String>,
    pub second: Vec<String>,
}

impl FailureGroups {
    /// Group a storage node belongs to, `None` if the node is unknown.
    pub fn group_of(&self, ip: &str) -> Option<FailureGroup> {
        if self.first.iter().any(|node| node == ip) {
            Some(FailureGroup::First)
        } else if self.second.iter().any(|node| node == ip) {
            Some(FailureGroup::Second)
        } else {
            None
        }
    }

    /// Alternates between the groups: `first[0], second[0], first[1], second[1], ...`, then the rest of the longer one.
    ///
    /// Roles are handed out in this order, so role redundancy spreads over both failure groups.
    pub fn interleaved(&self) -> Vec<String> {
        self.first.iter().interleave(self.second.iter()).cloned().collect()
    }

    /// Checks that every storage node is in exactly one group and no other node is.
    pub fn validate(&self, storage_nodes: &[StorageNode], strategy: &'static str) -> Result<()> {
        let invalid = |reason: String| Error::InvalidPartition { strategy, reason };
        let mut seen = BTreeSet::new();
        for ip in self.first.iter().chain(self.second.iter()) {
            if !seen.insert(ip.as_str()) {
                return Err(invalid(format!("`{ip}` is placed twice")));
            }
            if !storage_nodes.iter().any(|node| &node.ip == ip) {
                return Err(invalid(format!("`{ip}` is not a storage node")));
            }
        }
        match storage_nodes.iter().find(|node| !seen.contains(node.ip.as_str())) {
            Some(node) => Err(invalid(format!("`{}` is in no group", node.ip))),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.first.len() + self.second.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Trait for a strategy mapping storage nodes to failure groups.
pub trait FailureGroupStrategy {
    /// Short name used on the command line and in logs.
    fn name(&self) -> &'static str;

    /// Splits `storage_nodes` into two failure groups.
    ///
    /// Every node must land in exactly one group.
    fn partition(&self, storage_nodes: &[StorageNode]) -> Result<FailureGroups>;
}
