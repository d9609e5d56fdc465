//! Vertex deduplication.
//!
//! glTF exporters split a vertex whenever any attribute differs, so a cube
//! usually arrives as 24 positions rather than 8. The stores here merge
//! coincident points back together and hand out stable, dense indices.

use std::collections::HashMap;

/// Decimal digits kept when comparing coordinates.
///
/// Values that were equal before a 32-bit float round trip can drift at the
/// sixth digit, so matching stops at the fifth.
pub const MATCH_PRECISION: i32 = 5;

const MATCH_SCALE: f64 = 100_000.0;

/// Rounds a coordinate to `MATCH_PRECISION` digits, halves toward +inf.
///
/// The key is the bit pattern of the rounded value. NaN has no key.
fn quantize(value: f64) -> Option<u64> {
    if value.is_nan() {
        return None;
    }
    Some((value * MATCH_SCALE + 0.5).floor().to_bits())
}

fn match_key<const N: usize>(coords: &[f64; N]) -> Option<[u64; N]> {
    let mut key = [0u64; N];
    for (slot, &value) in key.iter_mut().zip(coords.iter()) {
        *slot = quantize(value)?;
    }
    Some(key)
}

/// A unique point: `N = 3` for positions, `N = 2` for texture coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex<const N: usize> {
    /// Position of this vertex in its store.
    pub index: u32,
    pub coords: [f64; N],
}

/// A unique XYZ position.
pub type VertexXyz = Vertex<3>;

/// A unique UV coordinate.
pub type VertexUv = Vertex<2>;

impl<const N: usize> Vertex<N> {
    /// True when every coordinate agrees with `other` after rounding.
    pub fn matches(&self, other: &[f64; N]) -> bool {
        match (match_key(&self.coords), match_key(other)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// Deduplicating vertex store.
///
/// Indices are assigned in first-seen order starting at 0 and never change.
#[derive(Debug, Clone)]
pub struct VertexStore<const N: usize> {
    vertices: Vec<Vertex<N>>,
    lookup: HashMap<[u64; N], u32>,
}

/// Store of unique XYZ positions.
pub type VertexStoreXyz = VertexStore<3>;

/// Store of unique UV coordinates.
pub type VertexStoreUv = VertexStore<2>;

impl<const N: usize> Default for VertexStore<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> VertexStore<N> {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(capacity),
            lookup: HashMap::with_capacity(capacity),
        }
    }

    /// Returns the index of the vertex matching `coords`, registering a new
    /// vertex when nothing matches.
    pub fn insert(&mut self, coords: [f64; N]) -> u32 {
        let key = match_key(&coords);
        if let Some(index) = key.as_ref().and_then(|k| self.lookup.get(k)) {
            return *index;
        }

        let index = self.vertices.len() as u32;
        self.vertices.push(Vertex { index, coords });
        if let Some(key) = key {
            self.lookup.insert(key, index);
        }
        index
    }

    pub fn get(&self, index: u32) -> Option<&Vertex<N>> {
        self.vertices.get(index as usize)
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[Vertex<N>] {
        &self.vertices
    }

    pub fn into_vertices(self) -> Vec<Vertex<N>> {
        self.vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_assigns_sequential_indices() {
        let mut store = VertexStoreXyz::new();
        assert_eq!(store.insert([0.0, 0.0, 0.0]), 0);
        assert_eq!(store.insert([1.0, 0.0, 0.0]), 1);
        assert_eq!(store.insert([0.0, 1.0, 0.0]), 2);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_insert_dedupes_coincident_points() {
        let mut store = VertexStoreXyz::new();
        let a = store.insert([0.5, 0.25, -1.0]);
        let b = store.insert([0.5, 0.25, -1.0]);
        assert_eq!(a, b);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_sixth_digit_difference_matches() {
        let mut store = VertexStoreUv::new();
        let a = store.insert([0.123_451, 0.5]);
        let b = store.insert([0.123_452, 0.5]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_fifth_digit_difference_is_distinct() {
        let mut store = VertexStoreUv::new();
        let a = store.insert([0.12341, 0.5]);
        let b = store.insert([0.12342, 0.5]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_f32_round_trip_matches() {
        let exact = 0.1_f64;
        let through_f32 = 0.1_f32 as f64;
        assert_ne!(exact, through_f32);

        let mut store = VertexStoreUv::new();
        assert_eq!(store.insert([exact, exact]), store.insert([through_f32, through_f32]));
    }

    #[test]
    fn test_values_either_side_of_zero_match() {
        let mut store = VertexStoreUv::new();
        let a = store.insert([-0.000_004, 0.0]);
        let b = store.insert([0.000_004, 0.0]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_nan_never_matches() {
        let mut store = VertexStoreUv::new();
        let a = store.insert([f64::NAN, 0.0]);
        let b = store.insert([f64::NAN, 0.0]);
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);

        let vertex = store.get(a).copied();
        assert!(vertex.is_some_and(|v| !v.matches(&[f64::NAN, 0.0])));
    }

    #[test]
    fn test_vertex_matches() {
        let vertex = VertexXyz {
            index: 0,
            coords: [1.0, 2.0, 3.0],
        };
        assert!(vertex.matches(&[1.000_001, 2.0, 3.0]));
        assert!(!vertex.matches(&[1.0, 2.0, 3.1]));
    }
}
