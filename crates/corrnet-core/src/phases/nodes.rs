//! Phase 2: Deduplicate entity names into an order-stable, indexed node set.

use std::collections::HashMap;

use crate::config::{Node, Row};

/// Name → index table over the unique entity names.
///
/// Indices are assigned in first-occurrence order and never change.
pub struct NodeTable {
    names: Vec<String>,
    lookup: HashMap<String, usize>,
}

impl NodeTable {
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    /// Get or assign the index for a name.
    pub fn ensure(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.lookup.get(name) {
            idx
        } else {
            let idx = self.names.len();
            self.lookup.insert(name.to_string(), idx);
            self.names.push(name.to_string());
            idx
        }
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.lookup.get(name).copied()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(|s| s.as_str())
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Undecorated node records, one per name, in index order.
    pub fn to_nodes(&self) -> Vec<Node> {
        self.names
            .iter()
            .enumerate()
            .map(|(index, name)| Node::new(name, index))
            .collect()
    }
}

impl Default for NodeTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the nodes phase: the whole `file_a` column first, then `file_b`.
pub fn run_nodes_phase(rows: &[Row]) -> NodeTable {
    let mut table = NodeTable::new();
    for row in rows {
        table.ensure(&row.file_a);
    }
    for row in rows {
        table.ensure(&row.file_b);
    }
    table
}
