use std::net::Ipv4Addr;

use crate::{
    error::{Error, Result},
    failure_group_strategy::{FailureGroupStrategy, FailureGroups},
    inventory::StorageNode,
};

/// Groups storage nodes by the third octet of their IPv4 address.
///
/// Nodes sharing the first node's octet form the first failure group, all others the second one. This relies on
/// every availability zone having its own `/24` subnet; nodes from two different non-first zones end up together in
/// the second group.
pub struct SubnetStrategy {}

impl SubnetStrategy {
    pub fn new() -> Self {
        SubnetStrategy {}
    }
}

impl Default for SubnetStrategy {
    fn default() -> Self {
        Self::new()
    }
}

fn subnet_octet(ip: &str) -> Result<u8> {
    ip.parse::<Ipv4Addr>()
        .map(|addr| addr.octets()[2])
        .map_err(|_| Error::NotIpv4(ip.to_string()))
}

impl FailureGroupStrategy for SubnetStrategy {
    fn name(&self) -> &'static str {
        "subnet"
    }

    fn partition(&self, storage_nodes: &[StorageNode]) -> Result<FailureGroups> {
        let mut groups = FailureGroups::default();
        let Some(head) = storage_nodes.first() else {
            return Ok(groups);
        };
        let reference = subnet_octet(&head.ip)?;
        for node in storage_nodes.iter() {
            if subnet_octet(&node.ip)? == reference {
                groups.first.push(node.ip.clone());
            } else {
                groups.second.push(node.ip.clone());
            }
        }
        Ok(groups)
    }
}
