//! Evolution graph.
//!
//! Provides the `EvolutionGraph` type: species as nodes, evolutions as
//! edges. Master data must form a directed acyclic graph so that the
//! recursive evolution walk of a query always terminates.

use crate::error::MasterDataError;
use crate::master::MasterData;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{HashMap, HashSet};

/// A directed graph of species ids, with an edge from each species to
/// every species it can evolve into.
///
/// # Examples
///
/// ```rust
/// use ivrank::graph::EvolutionGraph;
///
/// let mut graph = EvolutionGraph::new();
/// graph.add_edge(1, 2);
/// graph.add_edge(2, 3);
/// assert!(graph.detect_cycles().is_ok());
/// assert_eq!(graph.longest_chain().unwrap(), 2);
///
/// graph.add_edge(3, 1);
/// assert!(graph.detect_cycles().is_err());
/// ```
#[derive(Debug, Default)]
pub struct EvolutionGraph {
    graph: DiGraph<u16, ()>,
    node_map: HashMap<u16, NodeIndex>,
}

impl EvolutionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from every species and form evolution in `master`,
    /// including alternate regional forms (which point at the same
    /// species).
    pub fn from_master(master: &MasterData) -> Self {
        let mut graph = Self::new();
        for (&pokemon, record) in &master.pokemon {
            graph.add_node(pokemon);
            let form_evolutions = record.forms.values().flat_map(|form| form.evolutions.iter());
            for evolution in record.evolutions.iter().chain(form_evolutions) {
                graph.add_edge(pokemon, evolution.pokemon);
            }
        }
        graph
    }

    /// Add a node if it doesn't exist and return its index.
    pub fn add_node(&mut self, pokemon: u16) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&pokemon) {
            idx
        } else {
            let idx = self.graph.add_node(pokemon);
            self.node_map.insert(pokemon, idx);
            idx
        }
    }

    /// `from` evolves into `to`.
    pub fn add_edge(&mut self, from: u16, to: u16) {
        let from_idx = self.add_node(from);
        let to_idx = self.add_node(to);
        self.graph.update_edge(from_idx, to_idx, ());
    }

    pub fn contains(&self, pokemon: u16) -> bool {
        self.node_map.contains_key(&pokemon)
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Detect evolution cycles.
    ///
    /// Returns `Err(MasterDataError::Cycle)` with the species on the first
    /// cycle found, the first species repeated at the end.
    pub fn detect_cycles(&self) -> Result<(), MasterDataError> {
        let mut visited = HashSet::new();
        let mut on_stack = HashSet::new();

        for node_idx in self.graph.node_indices() {
            if !visited.contains(&node_idx) {
                let mut path = Vec::new();
                if let Some(cycle) =
                    self.dfs_cycle_detect(node_idx, &mut visited, &mut on_stack, &mut path)
                {
                    return Err(MasterDataError::Cycle { path: cycle });
                }
            }
        }
        Ok(())
    }

    fn dfs_cycle_detect(
        &self,
        node: NodeIndex,
        visited: &mut HashSet<NodeIndex>,
        on_stack: &mut HashSet<NodeIndex>,
        path: &mut Vec<u16>,
    ) -> Option<Vec<u16>> {
        visited.insert(node);
        on_stack.insert(node);
        path.push(self.graph[node]);

        for neighbor in self.graph.neighbors_directed(node, Direction::Outgoing) {
            if !visited.contains(&neighbor) {
                if let Some(cycle) = self.dfs_cycle_detect(neighbor, visited, on_stack, path) {
                    return Some(cycle);
                }
            } else if on_stack.contains(&neighbor) {
                let start = self.graph[neighbor];
                let from = path.iter().position(|id| *id == start).unwrap_or(0);
                let mut cycle = path[from..].to_vec();
                cycle.push(start);
                return Some(cycle);
            }
        }

        on_stack.remove(&node);
        path.pop();
        None
    }

    /// Number of evolution steps in the longest chain.
    pub fn longest_chain(&self) -> Result<usize, MasterDataError> {
        self.detect_cycles()?;
        let order = toposort(&self.graph, None).map_err(|cycle| MasterDataError::Cycle {
            path: vec![self.graph[cycle.node_id()]],
        })?;

        let mut depth: HashMap<NodeIndex, usize> = HashMap::new();
        for &node in order.iter().rev() {
            let below = self
                .graph
                .neighbors_directed(node, Direction::Outgoing)
                .map(|next| depth.get(&next).copied().unwrap_or(0) + 1)
                .max()
                .unwrap_or(0);
            depth.insert(node, below);
        }
        Ok(depth.values().copied().max().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acyclic_chain() {
        let mut graph = EvolutionGraph::new();
        graph.add_edge(1, 2);
        graph.add_edge(2, 3);
        graph.add_edge(133, 134);
        graph.add_edge(133, 135);
        assert!(graph.detect_cycles().is_ok());
        assert_eq!(graph.longest_chain().unwrap(), 2);
        assert_eq!(graph.len(), 6);
    }

    #[test]
    fn test_cycle_path() {
        let mut graph = EvolutionGraph::new();
        graph.add_edge(1, 2);
        graph.add_edge(2, 3);
        graph.add_edge(3, 1);
        match graph.detect_cycles() {
            Err(MasterDataError::Cycle { path }) => {
                assert_eq!(path.len(), 4);
                assert_eq!(path.first(), path.last());
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_self_loop_is_cycle() {
        let mut graph = EvolutionGraph::new();
        graph.add_edge(7, 7);
        assert!(graph.detect_cycles().is_err());
        assert!(graph.longest_chain().is_err());
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        let mut graph = EvolutionGraph::new();
        graph.add_edge(25, 26);
        graph.add_edge(25, 26);
        assert!(graph.contains(25));
        assert_eq!(graph.longest_chain().unwrap(), 1);
    }
}
