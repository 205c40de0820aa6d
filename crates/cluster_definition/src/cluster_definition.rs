//! Cluster definition document and its assembly.

use std::path::Path;

use log::{debug, info};
use serde::{ser::SerializeMap, Serialize, Serializer};

use crate::{
    error::Result,
    failure_group_strategy::FailureGroupStrategy,
    inventory::Inventory,
    node::{NodeClass, NodeRecord},
    role_planner::plan_roles,
    storage::{plan_filesystem, Filesystem},
};

/// Flags are consumed by the installer as `"True"` / `"False"` strings.
fn python_bool<S: Serializer>(value: &bool, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "True" } else { "False" })
}

/// Cluster-wide settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClusterSettings {
    #[serde(rename = "scale_cluster_name")]
    pub name: String,
    #[serde(rename = "scale_service_gui_start", serialize_with = "python_bool")]
    pub gui_start: bool,
    #[serde(rename = "scale_sync_replication_config", serialize_with = "python_bool")]
    pub sync_replication: bool,
    #[serde(rename = "scale_cluster_profile_name")]
    pub profile_name: String,
    #[serde(rename = "scale_cluster_profile_dir_path")]
    pub profile_dir_path: String,
}

impl ClusterSettings {
    /// Settings for cluster `name` tuned with the profile at `profile_file`.
    ///
    /// Only the file name stem and the directory of the profile are recorded, the file itself is never read.
    pub fn new(name: impl Into<String>, profile_file: impl AsRef<Path>, sync_replication: bool) -> Self {
        let profile_file = profile_file.as_ref();
        let profile_dir_path = match profile_file.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.display().to_string(),
            None if profile_file.has_root() => profile_file.display().to_string(),
            _ => ".".to_string(),
        };
        ClusterSettings {
            name: name.into(),
            gui_start: false,
            sync_replication,
            profile_name: profile_file
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default(),
            profile_dir_path,
        }
    }
}

/// Single configuration parameter, serialized as a one-entry map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigParam {
    pub name: String,
    pub value: String,
}

impl Serialize for ConfigParam {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.value)?;
        map.end()
    }
}

/// Configuration parameters applied to every node of a nodeclass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NodeClassConfig {
    pub nodeclass: NodeClass,
    pub params: Vec<ConfigParam>,
}

impl NodeClassConfig {
    pub fn new(nodeclass: NodeClass, name: &str, value: &str) -> Self {
        NodeClassConfig {
            nodeclass,
            params: vec![ConfigParam {
                name: name.to_string(),
                value: value.to_string(),
            }],
        }
    }
}

fn filesystem_list<S: Serializer>(
    filesystem: &Option<Filesystem>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_seq(filesystem.iter())
}

/// Complete cluster definition consumed by the installer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClusterDefinition {
    #[serde(rename = "node_details")]
    pub nodes: Vec<NodeRecord>,
    #[serde(rename = "scale_cluster")]
    pub cluster: ClusterSettings,
    #[serde(rename = "scale_config")]
    pub config: Vec<NodeClassConfig>,
    #[serde(
        rename = "scale_storage",
        skip_serializing_if = "Option::is_none",
        serialize_with = "filesystem_list"
    )]
    pub filesystem: Option<Filesystem>,
}

/// Collects the parts of a [ClusterDefinition] in a fixed order.
pub struct ClusterDefinitionBuilder {
    cluster: ClusterSettings,
    config: Vec<NodeClassConfig>,
    nodes: Vec<NodeRecord>,
    filesystem: Option<Filesystem>,
}

impl ClusterDefinitionBuilder {
    pub fn new(cluster: ClusterSettings) -> Self {
        ClusterDefinitionBuilder {
            cluster,
            config: Vec::new(),
            nodes: Vec::new(),
            filesystem: None,
        }
    }

    pub fn nodes(mut self, nodes: Vec<NodeRecord>) -> Self {
        self.nodes = nodes;
        self
    }

    pub fn nodeclass_config(mut self, config: NodeClassConfig) -> Self {
        self.config.push(config);
        self
    }

    pub fn filesystem(mut self, filesystem: Option<Filesystem>) -> Self {
        self.filesystem = filesystem;
        self
    }

    pub fn build(self) -> ClusterDefinition {
        ClusterDefinition {
            nodes: self.nodes,
            cluster: self.cluster,
            config: self.config,
            filesystem: self.filesystem,
        }
    }
}

/// Nodeclass parameters for the node classes present in `inventory`.
pub fn nodeclass_configs(inventory: &Inventory) -> Vec<NodeClassConfig> {
    let mut configs = Vec::new();
    if !inventory.compute_instances.is_empty() {
        configs.push(NodeClassConfig::new(NodeClass::Compute, "pagepool", "1G"));
    }
    if !inventory.storage_nodes.is_empty() {
        configs.push(NodeClassConfig::new(NodeClass::Storage, "pagepool", "1G"));
    }
    if inventory.is_multi_az() {
        configs.push(NodeClassConfig::new(NodeClass::Descriptor, "unmountOnDiskFail", "yes"));
    }
    configs
}

/// Runs role, disk and filesystem planning for `inventory` and assembles the result.
pub fn build_cluster_definition(
    inventory: &Inventory,
    profile_file: impl AsRef<Path>,
    strategy: &dyn FailureGroupStrategy,
) -> Result<ClusterDefinition> {
    let plan = plan_roles(inventory, strategy)?;
    let filesystem = plan_filesystem(inventory, &plan.failure_groups)?;
    info!(
        "planned {} nodes with {} of {} quorum seats filled",
        plan.nodes.len(),
        plan.quorum_count(),
        plan.quorum_target
    );

    let mut builder = ClusterDefinitionBuilder::new(ClusterSettings::new(
        &inventory.cluster_name,
        profile_file,
        inventory.is_multi_az(),
    ));
    for config in nodeclass_configs(inventory) {
        debug!("nodeclass {} config: {:?}", config.nodeclass.as_str(), config.params);
        builder = builder.nodeclass_config(config);
    }
    Ok(builder.nodes(plan.nodes).filesystem(filesystem).build())
}
