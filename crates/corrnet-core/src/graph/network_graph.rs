//! Undirected petgraph view of a network, for graph algorithms downstream of
//! the build.

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::Bfs;

use crate::config::Network;

/// Wrapper around petgraph::UnGraph keyed by node index.
///
/// Graph node `i` is network node `i`; edge weights carry the link's position
/// in the link list.
pub struct NetworkGraph {
    graph: UnGraph<String, usize>,
}

impl NetworkGraph {
    pub fn from_network(network: &Network) -> Self {
        let mut graph = UnGraph::with_capacity(network.nodes.len(), network.links.len());
        for node in &network.nodes {
            graph.add_node(node.name.clone());
        }
        for (i, link) in network.links.iter().enumerate() {
            graph.add_edge(NodeIndex::new(link.source), NodeIndex::new(link.target), i);
        }
        Self { graph }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Distinct neighbours of a node, sorted by index.
    pub fn neighbours(&self, index: usize) -> Vec<usize> {
        if index >= self.graph.node_count() {
            return Vec::new();
        }
        let mut out: Vec<usize> = self
            .graph
            .neighbors(NodeIndex::new(index))
            .map(|n| n.index())
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Every node reachable from `index`, including itself, sorted by index.
    pub fn component_of(&self, index: usize) -> Vec<usize> {
        if index >= self.graph.node_count() {
            return Vec::new();
        }
        let mut bfs = Bfs::new(&self.graph, NodeIndex::new(index));
        let mut out = Vec::new();
        while let Some(n) = bfs.next(&self.graph) {
            out.push(n.index());
        }
        out.sort_unstable();
        out
    }

    /// Connected components (isolated nodes included), ordered by lowest member.
    pub fn components(&self) -> Vec<Vec<usize>> {
        let mut seen = vec![false; self.graph.node_count()];
        let mut out = Vec::new();
        for start in 0..self.graph.node_count() {
            if seen[start] {
                continue;
            }
            let component = self.component_of(start);
            for &n in &component {
                seen[n] = true;
            }
            out.push(component);
        }
        out
    }

    /// Number of connected components, isolated nodes included.
    pub fn component_count(&self) -> usize {
        petgraph::algo::connected_components(&self.graph)
    }

    /// Access the underlying petgraph for algorithms that need it.
    pub fn inner_graph(&self) -> &UnGraph<String, usize> {
        &self.graph
    }
}
