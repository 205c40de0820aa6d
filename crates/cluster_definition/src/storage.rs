//! Disk and filesystem planning.

use log::debug;
use serde::Serialize;

use crate::{
    error::{Error, Result},
    failure_group_strategy::{FailureGroups, DESCRIPTOR_FAILURE_GROUP},
    inventory::{BlockSize, Inventory},
};

/// Number of metadata replicas, independent of the number of zones.
pub const METADATA_REPLICAS: u32 = 2;

/// Storage pool of all disks.
pub const SYSTEM_POOL: &str = "system";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiskUsage {
    DataAndMetadata,
    /// Holds only filesystem descriptors, used to break quorum ties between zones.
    DescOnly,
}

/// Network shared disk of the filesystem.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskDescriptor {
    pub device: String,
    pub failure_group: u32,
    /// Node serving the disk.
    pub servers: String,
    pub usage: DiskUsage,
    pub pool: String,
}

/// Filesystem with its replication parameters and disks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filesystem {
    pub filesystem: String,
    pub block_size: BlockSize,
    pub default_data_replicas: u32,
    pub default_metadata_replicas: u32,
    pub automatic_mount_option: String,
    pub default_mount_point: String,
    pub disks: Vec<DiskDescriptor>,
}

/// Number of data replicas for a deployment over `zones` availability zones.
///
/// With three zones the third one only holds the tie-breaker disk, so two data replicas are enough.
pub fn data_replicas(zones: usize) -> u32 {
    match zones {
        3 => 2,
        n => n as u32,
    }
}

/// Builds disk descriptors for every storage node in inventory order, followed by the tie-breaker disk for
/// multi-AZ deployments.
pub fn plan_disks(inventory: &Inventory, failure_groups: &FailureGroups) -> Result<Vec<DiskDescriptor>> {
    let mut disks = Vec::new();
    for node in inventory.storage_nodes.iter() {
        let group = failure_groups
            .group_of(&node.ip)
            .ok_or_else(|| Error::UngroupedStorageNode(node.ip.clone()))?;
        disks.extend(node.disks.iter().map(|device| DiskDescriptor {
            device: device.clone(),
            failure_group: group.id(),
            servers: node.ip.clone(),
            usage: DiskUsage::DataAndMetadata,
            pool: SYSTEM_POOL.to_string(),
        }));
    }

    if inventory.is_multi_az() {
        let descriptor = inventory
            .descriptor_nodes
            .first()
            .ok_or(Error::MissingDescriptorNode {
                zones: inventory.availability_zones.len(),
            })?;
        disks.push(DiskDescriptor {
            device: descriptor.disk.clone(),
            failure_group: DESCRIPTOR_FAILURE_GROUP,
            servers: descriptor.ip.clone(),
            usage: DiskUsage::DescOnly,
            pool: SYSTEM_POOL.to_string(),
        });
    }
    debug!("planned {} disks", disks.len());
    Ok(disks)
}

/// Plans the filesystem, `None` when there are no storage nodes to hold it.
pub fn plan_filesystem(inventory: &Inventory, failure_groups: &FailureGroups) -> Result<Option<Filesystem>> {
    if inventory.storage_nodes.is_empty() {
        return Ok(None);
    }
    Ok(Some(Filesystem {
        filesystem: inventory.filesystem_name(),
        block_size: inventory.filesystem_block_size.clone(),
        default_data_replicas: data_replicas(inventory.availability_zones.len()),
        default_metadata_replicas: METADATA_REPLICAS,
        automatic_mount_option: "true".to_string(),
        default_mount_point: inventory.filesystem_mountpoint.clone(),
        disks: plan_disks(inventory, failure_groups)?,
    }))
}
