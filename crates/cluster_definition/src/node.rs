//! Cluster nodes and the roles they play.

use serde::{ser::SerializeStruct, Serialize, Serializer};

/// Group of nodes sharing configuration parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum NodeClass {
    #[serde(rename = "computenodegrp")]
    Compute,
    #[serde(rename = "storagenodegrp")]
    Storage,
    #[serde(rename = "computedescnodegrp")]
    Descriptor,
}

impl NodeClass {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeClass::Compute => "computenodegrp",
            NodeClass::Storage => "storagenodegrp",
            NodeClass::Descriptor => "computedescnodegrp",
        }
    }
}

/// Set of role flags of a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoleSet {
    pub nsd_server: bool,
    pub quorum: bool,
    pub manager: bool,
    pub collector: bool,
    pub gui_server: bool,
    pub admin: bool,
}

impl RoleSet {
    /// Node without any role.
    pub const NONE: RoleSet = RoleSet {
        nsd_server: false,
        quorum: false,
        manager: false,
        collector: false,
        gui_server: false,
        admin: false,
    };

    pub const fn with_gui_server(self) -> Self {
        RoleSet {
            gui_server: true,
            ..self
        }
    }
}

/// Node of the cluster definition. Never changes once planned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeRecord {
    /// Node address, also used as its name since no name resolution is done.
    pub ip: String,
    pub nodeclass: NodeClass,
    pub roles: RoleSet,
}

impl NodeRecord {
    pub fn new(ip: impl Into<String>, nodeclass: NodeClass, roles: RoleSet) -> Self {
        NodeRecord {
            ip: ip.into(),
            nodeclass,
            roles,
        }
    }
}

impl Serialize for NodeRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut node = serializer.serialize_struct("NodeRecord", 10)?;
        node.serialize_field("fqdn", &self.ip)?;
        node.serialize_field("ip_address", &self.ip)?;
        node.serialize_field("state", "present")?;
        node.serialize_field("is_nsd_server", &self.roles.nsd_server)?;
        node.serialize_field("is_quorum_node", &self.roles.quorum)?;
        node.serialize_field("is_manager_node", &self.roles.manager)?;
        node.serialize_field("is_collector_node", &self.roles.collector)?;
        node.serialize_field("is_gui_server", &self.roles.gui_server)?;
        node.serialize_field("is_admin_node", &self.roles.admin)?;
        node.serialize_field("scale_nodeclass", &[self.nodeclass])?;
        node.end()
    }
}
