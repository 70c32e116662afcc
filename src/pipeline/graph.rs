// src/pipeline/graph.rs

use std::collections::{HashMap, HashSet};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, Reversed};

use crate::pipeline::model::Asset;

/// Index-based dependency graph over a pipeline's assets.
///
/// Node `i` is the asset at position `i` in the pipeline. Edges point from an
/// upstream to the asset depending on it. When names are duplicated, upstream
/// references resolve to the first asset with that name; references to unknown
/// assets are left out of the graph.
#[derive(Debug, Clone)]
pub struct AssetGraph {
    graph: DiGraph<usize, ()>,
    index: HashMap<String, usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

impl AssetGraph {
    pub fn from_assets(assets: &[Asset]) -> Self {
        let mut graph = DiGraph::with_capacity(assets.len(), assets.len());
        let mut index = HashMap::with_capacity(assets.len());

        for (i, asset) in assets.iter().enumerate() {
            graph.add_node(i);
            index.entry(asset.name.clone()).or_insert(i);
        }

        for (i, asset) in assets.iter().enumerate() {
            for upstream in &asset.upstreams {
                if let Some(&u) = index.get(upstream) {
                    graph.update_edge(NodeIndex::new(u), NodeIndex::new(i), ());
                }
            }
        }

        Self { graph, index }
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Direct upstreams of asset `idx`, in definition order.
    pub fn upstream_indices(&self, idx: usize) -> Vec<usize> {
        self.neighbors(idx, Direction::Incoming)
    }

    /// Direct downstreams of asset `idx`, in definition order.
    pub fn downstream_indices(&self, idx: usize) -> Vec<usize> {
        self.neighbors(idx, Direction::Outgoing)
    }

    /// Transitive upstreams of asset `idx`, excluding `idx` itself.
    pub fn ancestor_indices(&self, idx: usize) -> Vec<usize> {
        let reversed = Reversed(&self.graph);
        let mut dfs = Dfs::new(reversed, NodeIndex::new(idx));
        let mut found = Vec::new();
        while let Some(node) = dfs.next(reversed) {
            if node.index() != idx {
                found.push(node.index());
            }
        }
        found.sort_unstable();
        found
    }

    /// Transitive downstreams of asset `idx`, excluding `idx` itself.
    pub fn descendant_indices(&self, idx: usize) -> Vec<usize> {
        let mut dfs = Dfs::new(&self.graph, NodeIndex::new(idx));
        let mut found = Vec::new();
        while let Some(node) = dfs.next(&self.graph) {
            if node.index() != idx {
                found.push(node.index());
            }
        }
        found.sort_unstable();
        found
    }

    fn neighbors(&self, idx: usize, dir: Direction) -> Vec<usize> {
        if idx >= self.len() {
            return Vec::new();
        }
        let mut out: Vec<usize> = self
            .graph
            .neighbors_directed(NodeIndex::new(idx), dir)
            .map(|n| n.index())
            .collect();
        out.sort_unstable();
        out
    }
}

/// Dependency graph over distinct asset names.
///
/// Node `i` is the `i`-th distinct name in definition order. Every asset
/// holding a name contributes its upstream edges, so an asset whose name is
/// duplicated still closes a cycle when it depends on itself.
#[derive(Debug, Clone)]
pub struct NameGraph {
    names: Vec<String>,
    adjacency: Vec<Vec<usize>>,
}

impl NameGraph {
    pub fn from_assets(assets: &[Asset]) -> Self {
        let mut names: Vec<String> = Vec::new();
        let mut ids: HashMap<&str, usize> = HashMap::new();
        for asset in assets {
            ids.entry(asset.name.as_str()).or_insert_with(|| {
                names.push(asset.name.clone());
                names.len() - 1
            });
        }

        let mut adjacency = vec![Vec::new(); names.len()];
        for asset in assets {
            let downstream = ids[asset.name.as_str()];
            for upstream in &asset.upstreams {
                if let Some(&u) = ids.get(upstream.as_str()) {
                    adjacency[u].push(downstream);
                }
            }
        }
        for edges in adjacency.iter_mut() {
            edges.sort_unstable();
            edges.dedup();
        }

        Self { names, adjacency }
    }

    /// Distinct names, in order of first appearance.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Find dependency cycles.
    ///
    /// Iterative depth-first search with an explicit stack; each edge is
    /// followed once. Every edge that points back into the current stack closes
    /// a cycle, returned as name indices in dependency order starting from the
    /// node the edge points to. Cycles over the same set of names are reported
    /// once.
    pub fn find_cycles(&self) -> Vec<Vec<usize>> {
        let n = self.names.len();
        let mut marks = vec![Mark::Unvisited; n];
        let mut stack_pos: Vec<Option<usize>> = vec![None; n];
        let mut seen: HashSet<Vec<usize>> = HashSet::new();
        let mut cycles = Vec::new();

        for root in 0..n {
            if marks[root] != Mark::Unvisited {
                continue;
            }

            // (node, next neighbour to visit)
            let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
            marks[root] = Mark::OnStack;
            stack_pos[root] = Some(0);

            while let Some(frame) = stack.last_mut() {
                let node = frame.0;
                let Some(&next) = self.adjacency[node].get(frame.1) else {
                    marks[node] = Mark::Done;
                    stack_pos[node] = None;
                    stack.pop();
                    continue;
                };
                frame.1 += 1;

                match marks[next] {
                    Mark::Unvisited => {
                        marks[next] = Mark::OnStack;
                        stack_pos[next] = Some(stack.len());
                        stack.push((next, 0));
                    }
                    Mark::OnStack => {
                        if let Some(start) = stack_pos[next] {
                            let cycle: Vec<usize> =
                                stack[start..].iter().map(|(n, _)| *n).collect();
                            let mut key = cycle.clone();
                            key.sort_unstable();
                            if seen.insert(key) {
                                cycles.push(cycle);
                            }
                        }
                    }
                    Mark::Done => {}
                }
            }
        }

        cycles
    }
}
