//! Typed view of the provisioning tool's inventory output.

use std::path::Path;

use log::{debug, info};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    document::DocumentFormat,
    error::{Error, Result},
};

/// Storage node together with the devices it exports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageNode {
    pub ip: String,
    pub disks: Vec<String>,
}

/// Lightweight node of a multi-AZ deployment which only hosts the tie-breaker disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DescriptorNode {
    pub ip: String,
    /// Device exposed as the `descOnly` disk.
    pub disk: String,
}

/// Filesystem block size exactly as the inventory states it, e.g. `"4M"` or `262144`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockSize {
    Bytes(u64),
    Text(String),
}

/// Inventory of provisioned nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inventory {
    pub availability_zones: Vec<String>,
    /// Compute nodes in the order the provisioning tool listed them.
    pub compute_instances: Vec<String>,
    /// Descriptor nodes, meaningful only for multi-AZ deployments.
    pub descriptor_nodes: Vec<DescriptorNode>,
    /// Storage nodes in the order the provisioning tool listed them.
    pub storage_nodes: Vec<StorageNode>,
    pub filesystem_mountpoint: String,
    pub filesystem_block_size: BlockSize,
    pub cluster_name: String,
}

const AVAILABILITY_ZONES: &str = "availability_zones";
const COMPUTE_INSTANCES: &str = "compute_instances_by_ip";
const DESCRIPTOR_MAP: &str = "compute_instance_desc_map";
const STORAGE_DISK_MAP: &str = "storage_instance_disk_map";
const MOUNTPOINT: &str = "filesystem_mountpoint";
const BLOCK_SIZE: &str = "filesystem_block_size";
const STACK_NAME: &str = "stack_name";

const REQUIRED_KEYS: [&str; 6] = [
    AVAILABILITY_ZONES,
    COMPUTE_INSTANCES,
    STORAGE_DISK_MAP,
    MOUNTPOINT,
    BLOCK_SIZE,
    STACK_NAME,
];

fn field<T: DeserializeOwned>(object: &Map<String, Value>, key: &'static str) -> Result<T> {
    let value = object.get(key).ok_or(Error::MissingKey(key))?;
    serde_json::from_value(value.clone()).map_err(|e| Error::Shape {
        key,
        reason: e.to_string(),
    })
}

/// Reads an object-valued field keeping the order of its entries.
fn ordered_map<T: DeserializeOwned>(object: &Map<String, Value>, key: &'static str) -> Result<Vec<(String, T)>> {
    match object.get(key) {
        None => Err(Error::MissingKey(key)),
        Some(Value::Object(entries)) => entries
            .iter()
            .map(|(name, value)| {
                serde_json::from_value(value.clone())
                    .map(|parsed| (name.clone(), parsed))
                    .map_err(|e| Error::Shape {
                        key,
                        reason: format!("entry `{name}`: {e}"),
                    })
            })
            .collect(),
        Some(other) => Err(Error::Shape {
            key,
            reason: format!("expected an object, got {other}"),
        }),
    }
}

impl Inventory {
    /// Reads an inventory from a JSON or YAML file, see [DocumentFormat::from_path].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::ReadInventory {
            path: path.to_path_buf(),
            source,
        })?;
        let inventory = Self::from_value(DocumentFormat::from_path(path).parse(&text)?)?;
        info!(
            "loaded inventory {}: {} zones, {} compute, {} storage, {} descriptor nodes",
            path.display(),
            inventory.availability_zones.len(),
            inventory.compute_instances.len(),
            inventory.storage_nodes.len(),
            inventory.descriptor_nodes.len()
        );
        Ok(inventory)
    }

    /// Converts a generic document into an inventory.
    ///
    /// All required keys are checked before any of them is converted, so a missing key is reported even if
    /// another key is malformed.
    pub fn from_value(value: Value) -> Result<Self> {
        let object = match value {
            Value::Object(object) => object,
            other => {
                return Err(Error::Shape {
                    key: "inventory",
                    reason: format!("expected an object at the top level, got {other}"),
                })
            }
        };
        if let Some(key) = REQUIRED_KEYS.iter().find(|key| !object.contains_key(**key)) {
            return Err(Error::MissingKey(*key));
        }

        let descriptor_nodes = match object.get(DESCRIPTOR_MAP) {
            None | Some(Value::Null) => Vec::new(),
            Some(_) => ordered_map::<String>(&object, DESCRIPTOR_MAP)?
                .into_iter()
                .map(|(ip, disk)| DescriptorNode { ip, disk })
                .collect(),
        };

        let inventory = Inventory {
            availability_zones: field(&object, AVAILABILITY_ZONES)?,
            compute_instances: field(&object, COMPUTE_INSTANCES)?,
            descriptor_nodes,
            storage_nodes: ordered_map::<Vec<String>>(&object, STORAGE_DISK_MAP)?
                .into_iter()
                .map(|(ip, disks)| StorageNode { ip, disks })
                .collect(),
            filesystem_mountpoint: field(&object, MOUNTPOINT)?,
            filesystem_block_size: field(&object, BLOCK_SIZE)?,
            cluster_name: field(&object, STACK_NAME)?,
        };
        if inventory.availability_zones.is_empty() {
            return Err(Error::NoAvailabilityZones);
        }
        debug!("parsed inventory: {inventory:?}");
        Ok(inventory)
    }

    /// Deployments spanning several zones get descriptor nodes and synchronous replication.
    pub fn is_multi_az(&self) -> bool {
        self.availability_zones.len() > 1
    }

    /// Descriptor nodes that take part in the cluster. Empty for single-AZ deployments.
    pub fn active_descriptor_nodes(&self) -> &[DescriptorNode] {
        if self.is_multi_az() {
            &self.descriptor_nodes
        } else {
            &[]
        }
    }

    /// Number of nodes which will be members of the cluster.
    pub fn total_node_count(&self) -> usize {
        self.compute_instances.len() + self.storage_nodes.len() + self.active_descriptor_nodes().len()
    }

    /// Filesystem device name, the last component of the mount point.
    pub fn filesystem_name(&self) -> String {
        Path::new(&self.filesystem_mountpoint)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
