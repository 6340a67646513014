//! Phase 3: Threshold rows into links and track connected components online.
//!
//! Clusters live in an arena of registry slots. Each node maps to at most one
//! live slot; a merge keeps the source's slot and retires the target's, so slot
//! positions stay stable for naming and debugging.

use log::debug;

use crate::config::{Link, Row};
use crate::phases::nodes::NodeTable;

/// Position of a cluster in the registry.
pub type ClusterId = usize;

/// A registry position: either a live cluster's ordered members or a tombstone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterSlot {
    Live(Vec<usize>),
    Retired,
}

impl ClusterSlot {
    pub fn members(&self) -> Option<&[usize]> {
        match self {
            Self::Live(members) => Some(members),
            Self::Retired => None,
        }
    }

    pub fn is_retired(&self) -> bool {
        matches!(self, Self::Retired)
    }
}

/// What linking two nodes did to the cluster registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEffect {
    /// Both endpoints were unclustered; a new slot was allocated.
    Created(ClusterId),
    /// One endpoint joined the other's cluster.
    Joined(ClusterId),
    /// Both endpoints already shared a cluster.
    AlreadyConnected,
    /// Two clusters were merged into `survivor`; `retired` is now a tombstone.
    Merged {
        survivor: ClusterId,
        retired: ClusterId,
    },
}

/// `node → cluster` back-pointers plus the `cluster → members` slot table.
#[derive(Debug, Clone)]
pub struct ClusterRegistry {
    slots: Vec<ClusterSlot>,
    membership: Vec<Option<ClusterId>>,
}

impl ClusterRegistry {
    pub fn new(node_count: usize) -> Self {
        Self {
            slots: Vec::new(),
            membership: vec![None; node_count],
        }
    }

    pub fn cluster_of(&self, node: usize) -> Option<ClusterId> {
        self.membership.get(node).copied().flatten()
    }

    pub fn members(&self, id: ClusterId) -> Option<&[usize]> {
        self.slots.get(id).and_then(|s| s.members())
    }

    pub fn slots(&self) -> &[ClusterSlot] {
        &self.slots
    }

    /// Live clusters in registry order, with their slot positions.
    pub fn live_clusters(&self) -> impl Iterator<Item = (ClusterId, &[usize])> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.members().map(|m| (id, m)))
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_retired()).count()
    }

    /// Consume the registry, yielding live clusters in registry order.
    pub fn into_live_clusters(self) -> impl Iterator<Item = (ClusterId, Vec<usize>)> {
        self.slots
            .into_iter()
            .enumerate()
            .filter_map(|(id, slot)| match slot {
                ClusterSlot::Live(members) => Some((id, members)),
                ClusterSlot::Retired => None,
            })
    }

    /// Record an above-threshold link between `source` and `target`.
    ///
    /// Both indices must be below the node count the registry was built for.
    pub fn connect(&mut self, source: usize, target: usize) -> LinkEffect {
        match (self.membership[source], self.membership[target]) {
            (None, None) => {
                let id = self.slots.len();
                let members = if source == target {
                    vec![source]
                } else {
                    vec![source, target]
                };
                self.slots.push(ClusterSlot::Live(members));
                self.membership[source] = Some(id);
                self.membership[target] = Some(id);
                LinkEffect::Created(id)
            }
            (Some(id), None) => {
                self.push_member(id, target);
                LinkEffect::Joined(id)
            }
            (None, Some(id)) => {
                self.push_member(id, source);
                LinkEffect::Joined(id)
            }
            (Some(a), Some(b)) if a == b => LinkEffect::AlreadyConnected,
            (Some(survivor), Some(retired)) => {
                self.merge(survivor, retired);
                LinkEffect::Merged { survivor, retired }
            }
        }
    }

    fn push_member(&mut self, id: ClusterId, node: usize) {
        if let ClusterSlot::Live(members) = &mut self.slots[id] {
            members.push(node);
        }
        self.membership[node] = Some(id);
    }

    /// Append `retired`'s members after `survivor`'s and tombstone `retired`.
    ///
    /// Survivor members already point at the surviving slot, so only the
    /// absorbed members are re-tagged.
    fn merge(&mut self, survivor: ClusterId, retired: ClusterId) {
        let absorbed = match std::mem::replace(&mut self.slots[retired], ClusterSlot::Retired) {
            ClusterSlot::Live(members) => members,
            ClusterSlot::Retired => Vec::new(),
        };
        for &node in &absorbed {
            self.membership[node] = Some(survivor);
        }
        if let ClusterSlot::Live(members) = &mut self.slots[survivor] {
            members.extend(absorbed);
        }
    }
}

/// Strict comparison; a NaN correlation never passes.
pub fn passes_threshold(corr: f64, threshold: f64) -> bool {
    corr > threshold
}

/// Links and cluster registry produced by the clusters phase.
#[derive(Debug, Clone)]
pub struct ClusterOutput {
    pub links: Vec<Link>,
    pub registry: ClusterRegistry,
}

/// Run the clusters phase over `rows` in order.
///
/// A row links its endpoints only when `corr > threshold`; NaN never passes.
/// Rows naming entities missing from `table` are skipped.
pub fn run_clusters_phase(rows: &[Row], table: &NodeTable, threshold: f64) -> ClusterOutput {
    let mut links = Vec::new();
    let mut registry = ClusterRegistry::new(table.len());

    for (row_idx, row) in rows.iter().enumerate() {
        if !passes_threshold(row.corr, threshold) {
            continue;
        }
        let (Some(source), Some(target)) = (table.get(&row.file_a), table.get(&row.file_b)) else {
            debug!("row {row_idx}: endpoint missing from node table, skipped");
            continue;
        };

        links.push(Link { source, target });

        match registry.connect(source, target) {
            LinkEffect::Created(id) => {
                debug!("row {row_idx}: cluster {id} created for {source}-{target}")
            }
            LinkEffect::Merged { survivor, retired } => {
                debug!("row {row_idx}: cluster {retired} merged into {survivor} and retired")
            }
            LinkEffect::Joined(_) | LinkEffect::AlreadyConnected => {}
        }
    }

    ClusterOutput { links, registry }
}
