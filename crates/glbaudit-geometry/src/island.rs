//! UV island labeling.
//!
//! Triangles are joined through shared UV vertices with a disjoint-set
//! forest. Each set is rooted at its smallest vertex index, which doubles
//! as the island id, so labels do not depend on triangle order.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Disjoint-set forest over vertex indices, rooted at the smallest member.
#[derive(Debug, Clone)]
pub struct IslandLabels {
    parent: Vec<u32>,
}

impl IslandLabels {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            parent: (0..vertex_count as u32).collect(),
        }
    }

    /// Root of the set containing `vertex`, compressing the path walked.
    pub fn find(&mut self, vertex: u32) -> u32 {
        let mut root = vertex;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }

        let mut node = vertex;
        while self.parent[node as usize] != root {
            let next = self.parent[node as usize];
            self.parent[node as usize] = root;
            node = next;
        }
        root
    }

    /// Merges the sets of `a` and `b` under the smaller root.
    pub fn union(&mut self, a: u32, b: u32) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a < root_b {
            self.parent[root_b as usize] = root_a;
        } else if root_b < root_a {
            self.parent[root_a as usize] = root_b;
        }
    }
}

/// A connected group of UV triangles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Island {
    /// Smallest UV vertex index in the island.
    pub id: u32,
    /// Member triangle ids, in index-list order.
    pub triangles: Vec<u32>,
}

/// Island assignment for every UV vertex and triangle of a primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IslandMap {
    /// Island id of each UV vertex.
    pub vertex_islands: Vec<u32>,
    /// Island id of each triangle, by triangle id.
    pub triangle_islands: Vec<u32>,
    /// Islands in order of their first triangle.
    pub islands: Vec<Island>,
}

impl IslandMap {
    pub fn len(&self) -> usize {
        self.islands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.islands.is_empty()
    }
}

/// Labels islands from per-triangle UV vertex indices.
///
/// `corners[t]` holds the three UV store indices of triangle `t`; every index
/// must be below `vertex_count`.
pub fn label_islands(vertex_count: usize, corners: &[[u32; 3]]) -> IslandMap {
    let mut labels = IslandLabels::new(vertex_count);
    for &[a, b, c] in corners {
        labels.union(a, b);
        labels.union(a, c);
    }

    let vertex_islands: Vec<u32> = (0..vertex_count as u32).map(|v| labels.find(v)).collect();

    let mut islands: Vec<Island> = Vec::new();
    let mut position: HashMap<u32, usize> = HashMap::new();
    let mut triangle_islands = Vec::with_capacity(corners.len());
    for (triangle, corner) in corners.iter().enumerate() {
        let id = vertex_islands[corner[0] as usize];
        triangle_islands.push(id);
        let slot = *position.entry(id).or_insert_with(|| {
            islands.push(Island {
                id,
                triangles: Vec::new(),
            });
            islands.len() - 1
        });
        islands[slot].triangles.push(triangle as u32);
    }

    IslandMap {
        vertex_islands,
        triangle_islands,
        islands,
    }
}
