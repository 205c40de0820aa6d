//! Assignment of roles to every node of the cluster.
//!
//! Nodes are walked once in priority order: descriptor nodes, storage nodes alternating between failure groups,
//! then compute nodes. Quorum seats are handed out along the way until the quorum target is reached.

use log::debug;

use crate::{
    error::{Error, Result},
    failure_group_strategy::{FailureGroupStrategy, FailureGroups},
    inventory::Inventory,
    node::{NodeClass, NodeRecord, RoleSet},
    quorum::{quorum_target, MANAGER_TARGET},
};

/// Band of the interleaved storage order a node falls into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    /// Quorum seat inside the manager pool.
    Manager,
    /// Quorum seat beyond the manager pool.
    Quorum,
    /// No quorum seat left.
    Unassigned,
}

impl Slot {
    /// Slot of the storage node at `index` when storage holds `quorum_seats` quorum seats.
    pub fn of(index: usize, quorum_seats: usize) -> Self {
        if index >= quorum_seats {
            Slot::Unassigned
        } else if index < MANAGER_TARGET {
            Slot::Manager
        } else {
            Slot::Quorum
        }
    }
}

const DESCRIPTOR_ROLES: RoleSet = RoleSet {
    nsd_server: true,
    quorum: true,
    ..RoleSet::NONE
};

const STORAGE_MANAGER_ROLES: RoleSet = RoleSet {
    nsd_server: true,
    quorum: true,
    manager: true,
    admin: true,
    ..RoleSet::NONE
};

const STORAGE_COLLECTOR_ROLES: RoleSet = RoleSet {
    collector: true,
    ..STORAGE_MANAGER_ROLES
};

const STORAGE_QUORUM_ROLES: RoleSet = RoleSet {
    nsd_server: true,
    quorum: true,
    admin: true,
    ..RoleSet::NONE
};

const STORAGE_PLAIN_ROLES: RoleSet = RoleSet {
    nsd_server: true,
    admin: true,
    ..RoleSet::NONE
};

const COMPUTE_QUORUM_ROLES: RoleSet = RoleSet {
    quorum: true,
    admin: true,
    ..RoleSet::NONE
};

/// Row of the storage role table. `index: None` matches any position within the slot.
struct StorageRule {
    slot: Slot,
    index: Option<usize>,
    roles: RoleSet,
}

/// Evaluated top to bottom, the first matching rule wins.
const STORAGE_RULES: [StorageRule; 5] = [
    StorageRule {
        slot: Slot::Manager,
        index: Some(0),
        roles: STORAGE_COLLECTOR_ROLES.with_gui_server(),
    },
    StorageRule {
        slot: Slot::Manager,
        index: Some(1),
        roles: STORAGE_COLLECTOR_ROLES,
    },
    StorageRule {
        slot: Slot::Manager,
        index: None,
        roles: STORAGE_MANAGER_ROLES,
    },
    StorageRule {
        slot: Slot::Quorum,
        index: None,
        roles: STORAGE_QUORUM_ROLES,
    },
    StorageRule {
        slot: Slot::Unassigned,
        index: None,
        roles: STORAGE_PLAIN_ROLES,
    },
];

/// Roles of the storage node at `index` of the interleaved order.
pub fn storage_roles(index: usize, quorum_seats: usize) -> RoleSet {
    let slot = Slot::of(index, quorum_seats);
    STORAGE_RULES
        .iter()
        .find(|rule| rule.slot == slot && rule.index.map_or(true, |i| i == index))
        .map_or(STORAGE_PLAIN_ROLES, |rule| rule.roles)
}

/// Result of role planning.
#[derive(Clone, Debug)]
pub struct RolePlan {
    pub quorum_target: usize,
    pub failure_groups: FailureGroups,
    /// Nodes in assignment order.
    pub nodes: Vec<NodeRecord>,
}

impl RolePlan {
    /// Number of planned nodes holding a quorum seat.
    pub fn quorum_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.roles.quorum).count()
    }
}

/// Plans roles for all nodes of `inventory`, splitting storage nodes with `strategy`.
pub fn plan_roles(inventory: &Inventory, strategy: &dyn FailureGroupStrategy) -> Result<RolePlan> {
    let total_nodes = inventory.total_node_count();
    let quorum_target = quorum_target(total_nodes);
    debug!("total node count: {total_nodes}, quorum target: {quorum_target}");

    let mut nodes = Vec::with_capacity(total_nodes);

    let descriptors = inventory.active_descriptor_nodes();
    for descriptor in descriptors.iter() {
        nodes.push(NodeRecord::new(&descriptor.ip, NodeClass::Descriptor, DESCRIPTOR_ROLES));
    }

    if descriptors.len() > quorum_target {
        return Err(Error::TooManyDescriptorNodes {
            descriptors: descriptors.len(),
            quorum_target,
        });
    }

    let failure_groups = strategy.partition(&inventory.storage_nodes)?;
    failure_groups.validate(&inventory.storage_nodes, strategy.name())?;
    debug!(
        "failure groups ({}): first {:?}, second {:?}",
        strategy.name(),
        failure_groups.first,
        failure_groups.second
    );
    let storage_order = failure_groups.interleaved();
    debug!("storage nodes alternating by failure group: {storage_order:?}");

    // The first storage node hosts the GUI even when descriptor nodes took every quorum seat.
    let storage_quorum_seats = quorum_target - descriptors.len();
    for (index, ip) in storage_order.into_iter().enumerate() {
        let mut roles = storage_roles(index, storage_quorum_seats);
        if index == 0 {
            roles = roles.with_gui_server();
        }
        nodes.push(NodeRecord::new(ip, NodeClass::Storage, roles));
    }

    let quorums_left = quorum_target.saturating_sub(inventory.storage_nodes.len() + descriptors.len());
    debug!("quorum seats left for compute nodes: {quorums_left}");

    let has_gui = nodes.iter().any(|node| node.roles.gui_server);
    for (index, ip) in inventory.compute_instances.iter().enumerate() {
        let mut roles = if index < quorums_left {
            COMPUTE_QUORUM_ROLES
        } else {
            RoleSet::NONE
        };
        if index == 0 && !has_gui {
            roles = roles.with_gui_server();
        }
        nodes.push(NodeRecord::new(ip, NodeClass::Compute, roles));
    }

    Ok(RolePlan {
        quorum_target,
        failure_groups,
        nodes,
    })
}
