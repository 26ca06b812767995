//! Directed graph utilities over `(input, output)` edge lists.
use crate::NodeId;

use ahash::RandomState;

use std::collections::{HashMap, HashSet, VecDeque};

type NodeSet = HashSet<NodeId, RandomState>;

/// Returns whether adding `edge` to an acyclic graph would create a cycle.
pub(crate) fn creates_cycle(edges: &[(NodeId, NodeId)], edge: (NodeId, NodeId)) -> bool {
    let (input, output) = edge;
    input == output || path_exists(edges, &[output], &[input])
}

/// Returns whether any of `goals` is reachable from any of `sources`.
/// A node reaches itself.
pub(crate) fn path_exists(edges: &[(NodeId, NodeId)], sources: &[NodeId], goals: &[NodeId]) -> bool {
    let goals: NodeSet = goals.iter().copied().collect();
    let mut visited: NodeSet = sources.iter().copied().collect();
    let mut queue: VecDeque<NodeId> = sources.iter().copied().collect();

    while let Some(node) = queue.pop_front() {
        if goals.contains(&node) {
            return true;
        }
        for &(_, next) in edges.iter().filter(|(from, _)| *from == node) {
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
    false
}

/// Returns the nodes whose value can influence any of
/// `outputs`, outputs included.
pub(crate) fn required_for_output(edges: &[(NodeId, NodeId)], outputs: &[NodeId]) -> NodeSet {
    let mut required: NodeSet = outputs.iter().copied().collect();
    let mut queue: VecDeque<NodeId> = outputs.iter().copied().collect();

    while let Some(node) = queue.pop_front() {
        for &(from, _) in edges.iter().filter(|(_, to)| *to == node) {
            if required.insert(from) {
                queue.push_back(from);
            }
        }
    }
    required
}

/// Sorts `nodes` so that every edge goes from an earlier node
/// to a later one (Kahn's algorithm). Ties keep the order
/// of `nodes`. Returns `None` if the edges contain a cycle.
///
/// Edges must only reference nodes in `nodes`.
pub(crate) fn topological_order(
    nodes: &[NodeId],
    edges: &[(NodeId, NodeId)],
) -> Option<Vec<NodeId>> {
    let mut in_degree: HashMap<NodeId, usize, RandomState> =
        nodes.iter().map(|&node| (node, 0)).collect();
    for (_, to) in edges {
        *in_degree.get_mut(to)? += 1;
    }

    let mut queue: VecDeque<NodeId> = nodes
        .iter()
        .copied()
        .filter(|node| in_degree[node] == 0)
        .collect();
    let mut order = Vec::with_capacity(nodes.len());

    while let Some(node) = queue.pop_front() {
        order.push(node);
        for &(_, to) in edges.iter().filter(|(from, _)| *from == node) {
            let degree = in_degree.get_mut(&to)?;
            *degree -= 1;
            if *degree == 0 {
                queue.push_back(to);
            }
        }
    }

    (order.len() == nodes.len()).then(|| order)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles() {
        let edges = [(0, 2), (2, 3), (3, 1)];
        assert!(creates_cycle(&edges, (1, 0)));
        assert!(creates_cycle(&edges, (3, 2)));
        assert!(creates_cycle(&edges, (2, 2)));
        assert!(!creates_cycle(&edges, (0, 3)));
        assert!(!creates_cycle(&edges, (1, 4)));
    }

    #[test]
    fn paths() {
        let edges = [(0, 2), (2, 3), (4, 3)];
        assert!(path_exists(&edges, &[0], &[3]));
        assert!(path_exists(&edges, &[1, 4], &[3]));
        assert!(!path_exists(&edges, &[3], &[0]));
        assert!(path_exists(&edges, &[5], &[5]));
    }

    #[test]
    fn required_nodes() {
        // 5 hangs off the network; 4 feeds the output without inputs.
        let edges = [(0, 3), (3, 2), (4, 2), (0, 5), (1, 5)];
        let required = required_for_output(&edges, &[2]);
        let mut required: Vec<_> = required.into_iter().collect();
        required.sort_unstable();
        assert_eq!(required, [0, 2, 3, 4]);
    }

    #[test]
    fn sorting() {
        let nodes = [0, 1, 2, 3, 4];
        let edges = [(3, 2), (0, 3), (1, 4), (4, 2)];
        assert_eq!(topological_order(&nodes, &edges), Some(vec![0, 1, 3, 4, 2]));
    }

    #[test]
    fn sorting_cycle() {
        let nodes = [0, 1, 2];
        let edges = [(0, 1), (1, 2), (2, 1)];
        assert_eq!(topological_order(&nodes, &edges), None);
    }
}
