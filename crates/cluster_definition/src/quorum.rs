//! Quorum and manager pool sizing.

/// Number of nodes in the manager pool, independent of cluster size.
pub const MANAGER_TARGET: usize = 2;

/// Number of quorum nodes for a cluster of `total_nodes` nodes.
///
/// Small clusters make every node a quorum node, larger ones use 3, 5 or 7 quorum nodes.
pub fn quorum_target(total_nodes: usize) -> usize {
    match total_nodes {
        0..=3 => total_nodes,
        4..=9 => 3,
        10..=18 => 5,
        _ => 7,
    }
}
