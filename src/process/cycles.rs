use std::collections::{HashMap, HashSet};

/// Undirected simple graph built from the edges of one face.
///
/// Nodes and neighbor lists keep insertion order so the cycle basis is
/// deterministic. Duplicate edges collapse into one.
#[derive(Debug, Default)]
pub struct FaceGraph {
    nodes: Vec<usize>,
    adjacency: HashMap<usize, Vec<usize>>,
}

impl FaceGraph {
    /// Graph of a closed polygon: consecutive indices plus the wraparound edge.
    pub fn from_face(face: &[usize]) -> Self {
        let mut graph = Self::default();
        if let (Some(&first), Some(&last)) = (face.first(), face.last()) {
            for pair in face.windows(2) {
                graph.add_edge(pair[0], pair[1]);
            }
            graph.add_edge(last, first);
        }
        graph
    }

    pub fn add_edge(&mut self, a: usize, b: usize) {
        self.add_neighbor(a, b);
        if a != b {
            self.add_neighbor(b, a);
        }
    }

    fn add_neighbor(&mut self, node: usize, neighbor: usize) {
        if !self.adjacency.contains_key(&node) {
            self.nodes.push(node);
        }
        let neighbors = self.adjacency.entry(node).or_default();
        if !neighbors.contains(&neighbor) {
            neighbors.push(neighbor);
        }
    }

    pub(crate) fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    pub fn neighbors(&self, node: usize) -> &[usize] {
        self.adjacency.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Fundamental cycles of a depth-first spanning forest.
    ///
    /// Each component is rooted at its earliest inserted node. The stack is
    /// popped last-in first, and every non-tree edge closes one cycle made of
    /// the edge plus the tree path between its endpoints. A self loop yields a
    /// one-node cycle.
    ///
    /// A simple face comes back as one cycle with its winding preserved,
    /// rotated by one position.
    pub fn cycle_basis(&self) -> Vec<Vec<usize>> {
        let mut cycles = Vec::new();
        let mut visited: HashSet<usize> = HashSet::new();

        for &root in &self.nodes {
            if visited.contains(&root) {
                continue;
            }

            let mut stack = vec![root];
            let mut pred: HashMap<usize, usize> = HashMap::from([(root, root)]);
            let mut used: HashMap<usize, HashSet<usize>> = HashMap::from([(root, HashSet::new())]);

            while let Some(z) = stack.pop() {
                for &nbr in self.neighbors(z) {
                    if !used.contains_key(&nbr) {
                        pred.insert(nbr, z);
                        stack.push(nbr);
                        used.insert(nbr, HashSet::from([z]));
                    } else if nbr == z {
                        cycles.push(vec![z]);
                    } else if !used[&z].contains(&nbr) {
                        let nbr_used = &used[&nbr];
                        let mut cycle = vec![nbr, z];
                        let mut p = pred[&z];
                        while !nbr_used.contains(&p) {
                            cycle.push(p);
                            p = pred[&p];
                        }
                        cycle.push(p);
                        cycles.push(cycle);
                        if let Some(set) = used.get_mut(&nbr) {
                            set.insert(z);
                        }
                    }
                }
            }

            visited.extend(pred.keys().copied());
        }

        cycles
    }
}

/// Splits a possibly self-touching face into its simple cycles.
pub fn face_to_cycles(face: &[usize]) -> Vec<Vec<usize>> {
    FaceGraph::from_face(face).cycle_basis()
}
