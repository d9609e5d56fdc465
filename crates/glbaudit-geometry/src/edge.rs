//! Undirected edges and their triangle adjacency.
//!
//! The same types serve both the XYZ and the UV topology; an edge only
//! refers to vertex indices of whichever store built it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Order-independent identity of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
    pub low: u32,
    pub high: u32,
}

impl EdgeKey {
    pub fn new(a: u32, b: u32) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }
}

/// An edge between two store vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Position of this edge in its store.
    pub index: u32,
    pub vertex_a: u32,
    pub vertex_b: u32,
    /// Ids of the triangles using this edge, in construction order.
    pub triangles: Vec<u32>,
}

impl Edge {
    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.vertex_a, self.vertex_b)
    }

    /// True when both edges join the same pair of vertices, in either direction.
    pub fn matches(&self, other: &Edge) -> bool {
        self.key() == other.key()
    }

    /// Both endpoints collapsed onto one vertex.
    pub fn is_zero_length(&self) -> bool {
        self.vertex_a == self.vertex_b
    }
}

/// Deduplicating edge store with triangle adjacency.
#[derive(Debug, Clone, Default)]
pub struct EdgeStore {
    edges: Vec<Edge>,
    lookup: HashMap<EdgeKey, u32>,
}

impl EdgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds or creates the edge `a-b` and records `triangle` on it.
    ///
    /// A triangle linking the same edge twice is recorded twice.
    pub fn link(&mut self, a: u32, b: u32, triangle: u32) -> u32 {
        let key = EdgeKey::new(a, b);
        let next = self.edges.len() as u32;
        let index = *self.lookup.entry(key).or_insert(next);
        if index == next {
            self.edges.push(Edge {
                index,
                vertex_a: a,
                vertex_b: b,
                triangles: Vec::with_capacity(2),
            });
        }
        self.edges[index as usize].triangles.push(triangle);
        index
    }

    /// Links the AB, BC and CA edges of a triangle and returns their indices.
    pub fn link_triangle(&mut self, corners: [u32; 3], triangle: u32) -> [u32; 3] {
        let [a, b, c] = corners;
        [
            self.link(a, b, triangle),
            self.link(b, c, triangle),
            self.link(c, a, triangle),
        ]
    }

    pub fn get(&self, index: u32) -> Option<&Edge> {
        self.edges.get(index as usize)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn into_edges(self) -> Vec<Edge> {
        self.edges
    }
}
