//! Errors produced while turning an inventory into a cluster definition.

use std::path::PathBuf;

use thiserror::Error;

/// A specialized `Result` type for cluster definition operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Inventory file can't be opened or read.
    #[error("can't read inventory {}", path.display())]
    ReadInventory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("can't parse inventory as JSON")]
    JsonSyntax(#[source] serde_json::Error),

    #[error("can't parse inventory as YAML")]
    YamlSyntax(#[source] serde_yaml::Error),

    /// Required inventory key is absent.
    #[error("inventory is missing required key `{0}`")]
    MissingKey(&'static str),

    /// Inventory key is present but holds a value of an unexpected type.
    #[error("inventory key `{key}` has unexpected shape: {reason}")]
    Shape { key: &'static str, reason: String },

    #[error("inventory lists no availability zones")]
    NoAvailabilityZones,

    /// Multi-AZ deployments need a descriptor node to host the tie-breaker disk.
    #[error("{zones} availability zones but `compute_instance_desc_map` is empty")]
    MissingDescriptorNode { zones: usize },

    /// Every descriptor node is a quorum node, so there can't be more of them than quorum seats.
    #[error("{descriptors} descriptor nodes exceed the quorum target of {quorum_target}")]
    TooManyDescriptorNodes { descriptors: usize, quorum_target: usize },

    /// Storage identifier can't be used by the subnet failure group strategy.
    #[error("storage node `{0}` is not an IPv4 address")]
    NotIpv4(String),

    #[error("unknown failure group strategy `{0}`")]
    UnknownStrategy(String),

    /// Failure group strategy lost, duplicated or invented a storage node.
    #[error("failure group strategy `{strategy}` produced an invalid partition: {reason}")]
    InvalidPartition { strategy: &'static str, reason: String },

    /// Storage node whose disks can't be planned because it belongs to no failure group.
    #[error("storage node `{0}` is in no failure group")]
    UngroupedStorageNode(String),

    #[error("can't serialize cluster definition as JSON")]
    JsonSerialize(#[source] serde_json::Error),

    #[error("can't serialize cluster definition as YAML")]
    YamlSerialize(#[source] serde_yaml::Error),

    #[error("serialized cluster definition is not valid UTF-8")]
    Encoding(#[source] std::string::FromUtf8Error),

    /// Cluster definition can't be written to its destination.
    #[error("can't write cluster definition {}", path.display())]
    WriteDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
