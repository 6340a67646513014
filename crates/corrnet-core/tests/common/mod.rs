//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::path::{Path, PathBuf};

use corrnet_core::config::{LabelFormat, Network, Palette, Row};

// ---------------------------------------------------------------------------
// Fixture path resolution
// ---------------------------------------------------------------------------

/// Resolve `tests/fixtures/{name}` relative to the workspace root.
pub fn fixture_path(name: &str) -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir)
        .join("../../tests/fixtures")
        .join(name)
        .canonicalize()
        .unwrap_or_else(|_| {
            Path::new(manifest_dir)
                .join("../../tests/fixtures")
                .join(name)
        })
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Rows from `(file_a, file_b, corr)` triples.
pub fn rows(triples: &[(&str, &str, f64)]) -> Vec<Row> {
    triples.iter().map(|&(a, b, c)| Row::new(a, b, c)).collect()
}

/// Build a network with the default palette and HTML labels.
pub fn build(rows: &[Row], threshold: f64) -> Network {
    corrnet_core::compute_network(rows, threshold, &Palette::default(), LabelFormat::Html)
}

// ---------------------------------------------------------------------------
// Extractors
// ---------------------------------------------------------------------------

/// Node names in index order.
pub fn node_names(network: &Network) -> Vec<String> {
    network.nodes.iter().map(|n| n.name.clone()).collect()
}

/// `(source, target)` pairs in link order.
pub fn link_pairs(network: &Network) -> Vec<(usize, usize)> {
    network
        .links
        .iter()
        .map(|l| (l.source, l.target))
        .collect()
}

/// The node partition induced by group membership, as sorted name sets.
/// Isolated nodes are left out.
pub fn group_partition(network: &Network) -> BTreeSet<BTreeSet<String>> {
    let mut by_group: HashMap<&str, BTreeSet<String>> = HashMap::new();
    for node in &network.nodes {
        if let Some(group) = node.group.as_deref() {
            by_group.entry(group).or_default().insert(node.name.clone());
        }
    }
    by_group.into_values().collect()
}

/// Reference partition: BFS over the undirected link graph, components of
/// size one without a self-link left out.
pub fn bfs_partition(node_count: usize, links: &[(usize, usize)]) -> Vec<Option<usize>> {
    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    let mut touched = vec![false; node_count];
    for &(a, b) in links {
        adj[a].push(b);
        adj[b].push(a);
        touched[a] = true;
        touched[b] = true;
    }

    let mut component: Vec<Option<usize>> = vec![None; node_count];
    let mut next = 0;
    for start in 0..node_count {
        if !touched[start] || component[start].is_some() {
            continue;
        }
        let mut queue = VecDeque::from([start]);
        component[start] = Some(next);
        while let Some(n) = queue.pop_front() {
            for &m in &adj[n] {
                if component[m].is_none() {
                    component[m] = Some(next);
                    queue.push_back(m);
                }
            }
        }
        next += 1;
    }
    component
}
