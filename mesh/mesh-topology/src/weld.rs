//! Vertex welding for triangle soups.
//!
//! A triangle soup repeats every shared corner once per triangle. The
//! [`VertexWelder`] folds those repeats into a single indexed vertex as the
//! soup streams in, so decoding and welding happen in one pass.
//!
//! Matching is delegated to a [`WeldKey`]: [`ExactKey`] compares the raw
//! `f32` bit patterns, [`GridKey`] snaps onto a quantization grid.

use std::fmt;
use std::hash::Hash;

use hashbrown::HashMap;
use mesh_types::IndexedMesh;
use nalgebra::Point3;
use tracing::debug;

use crate::result::{WeldOutput, WeldSummary};

/// Strategy that maps a raw position to the key vertices are deduplicated by.
///
/// Positions with equal keys become the same vertex; the first one seen
/// supplies the stored coordinates.
pub trait WeldKey {
    /// Hashable key type.
    type Key: Eq + Hash;

    /// Compute the key for a position.
    fn key(&self, position: [f32; 3]) -> Self::Key;
}

/// Bit-exact matching on the three `f32` coordinates.
///
/// `0.0` and `-0.0` have different bit patterns and are **not** welded;
/// identical NaN payloads are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExactKey;

impl WeldKey for ExactKey {
    type Key = [u32; 3];

    #[inline]
    fn key(&self, [x, y, z]: [f32; 3]) -> Self::Key {
        [x.to_bits(), y.to_bits(), z.to_bits()]
    }
}

/// Quantized-grid matching.
///
/// Positions are welded when they fall in the same cube of side
/// `cell_size`. Non-finite positions fall back to bit-exact matching.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridKey {
    cell_size: f64,
}

/// Key produced by [`GridKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridCell {
    /// Integer cell coordinates of a finite position.
    Cell(i64, i64, i64),
    /// Bit pattern of a position with a NaN or infinite coordinate.
    Exact([u32; 3]),
}

impl GridKey {
    /// Create a grid key. Returns `None` unless `cell_size` is finite and positive.
    #[must_use]
    pub fn new(cell_size: f64) -> Option<Self> {
        (cell_size.is_finite() && cell_size > 0.0).then_some(Self { cell_size })
    }

    /// Edge length of a grid cell.
    #[must_use]
    pub const fn cell_size(&self) -> f64 {
        self.cell_size
    }
}

impl WeldKey for GridKey {
    type Key = GridCell;

    #[allow(clippy::cast_possible_truncation)]
    // Truncation: cell coordinates saturate for positions beyond ~9e18 cells
    fn key(&self, position: [f32; 3]) -> Self::Key {
        if position.iter().all(|c| c.is_finite()) {
            let [x, y, z] = position.map(|c| (f64::from(c) / self.cell_size).floor() as i64);
            GridCell::Cell(x, y, z)
        } else {
            GridCell::Exact(ExactKey.key(position))
        }
    }
}

/// Incremental vertex welder.
///
/// Feed triangles with [`VertexWelder::push_triangle`] (or single positions
/// with [`VertexWelder::insert`]) and call [`VertexWelder::finish`] to take
/// the indexed mesh. Output is a pure function of input order: the first
/// occurrence of a key fixes its index.
///
/// A triangle whose corners weld onto fewer than three distinct vertices is
/// not stored; it is counted as collapsed in the [`WeldSummary`].
///
/// # Example
///
/// ```
/// use mesh_topology::VertexWelder;
///
/// let mut welder = VertexWelder::new();
/// welder.push_triangle([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
/// welder.push_triangle([[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]);
///
/// let output = welder.finish();
/// assert_eq!(output.mesh.vertices.len(), 4);
/// assert_eq!(output.mesh.faces, vec![[0, 1, 2], [1, 3, 2]]);
/// ```
pub struct VertexWelder<K: WeldKey = ExactKey> {
    key: K,
    lookup: HashMap<K::Key, u32>,
    mesh: IndexedMesh,
    positions_in: usize,
    triangles_in: usize,
    collapsed_faces: usize,
}

impl VertexWelder<ExactKey> {
    /// Create a bit-exact welder.
    #[must_use]
    pub fn new() -> Self {
        Self::with_key(ExactKey)
    }
}

impl Default for VertexWelder<ExactKey> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: WeldKey> VertexWelder<K> {
    /// Create a welder using the given key strategy.
    #[must_use]
    pub fn with_key(key: K) -> Self {
        Self::with_capacity(key, 0)
    }

    /// Create a welder sized for roughly `triangles` input triangles.
    ///
    /// Closed surfaces have about half as many vertices as triangles.
    #[must_use]
    pub fn with_capacity(key: K, triangles: usize) -> Self {
        let vertices = triangles / 2 + 3;
        Self {
            key,
            lookup: HashMap::with_capacity(vertices),
            mesh: IndexedMesh::with_capacity(vertices, triangles),
            positions_in: 0,
            triangles_in: 0,
            collapsed_faces: 0,
        }
    }

    /// Resolve a position to a vertex index, appending a new vertex on first sight.
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: mesh indices are u32, meshes with >4B vertices are unsupported
    pub fn insert(&mut self, position: [f32; 3]) -> u32 {
        self.positions_in += 1;
        let vertices = &mut self.mesh.vertices;
        *self
            .lookup
            .entry(self.key.key(position))
            .or_insert_with(|| {
                let index = vertices.len() as u32;
                vertices.push(Point3::from(position.map(f64::from)));
                index
            })
    }

    /// Weld one triangle's corners and store the face.
    ///
    /// Returns the new face index, or `None` if the corners collapsed onto
    /// fewer than three distinct vertices.
    pub fn push_triangle(&mut self, corners: [[f32; 3]; 3]) -> Option<usize> {
        self.triangles_in += 1;
        let [a, b, c] = corners.map(|p| self.insert(p));

        if a == b || b == c || a == c {
            self.collapsed_faces += 1;
            debug!(
                triangle = self.triangles_in - 1,
                "Triangle collapsed during welding"
            );
            return None;
        }

        self.mesh.faces.push([a, b, c]);
        Some(self.mesh.faces.len() - 1)
    }

    /// Number of distinct vertices so far.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.mesh.vertices.len()
    }

    /// Number of stored faces so far.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.mesh.faces.len()
    }

    /// Number of triangles pushed so far, including collapsed ones.
    #[must_use]
    pub const fn triangles_seen(&self) -> usize {
        self.triangles_in
    }

    /// Consume the welder and return the indexed mesh with its summary.
    #[must_use]
    pub fn finish(self) -> WeldOutput {
        let summary = WeldSummary {
            input_triangles: self.triangles_in,
            input_positions: self.positions_in,
            unique_vertices: self.mesh.vertices.len(),
            collapsed_faces: self.collapsed_faces,
        };
        debug!(
            positions = summary.input_positions,
            vertices = summary.unique_vertices,
            collapsed = summary.collapsed_faces,
            "Welding finished"
        );
        WeldOutput {
            mesh: self.mesh,
            summary,
        }
    }
}

impl<K: WeldKey> fmt::Debug for VertexWelder<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VertexWelder")
            .field("vertices", &self.mesh.vertices.len())
            .field("faces", &self.mesh.faces.len())
            .field("positions_in", &self.positions_in)
            .field("collapsed_faces", &self.collapsed_faces)
            .finish_non_exhaustive()
    }
}

/// Weld a flat triangle stream (three positions per triangle) bit-exactly.
///
/// A trailing partial triangle (fewer than three positions) is ignored.
///
/// # Example
///
/// ```
/// use mesh_topology::weld;
///
/// let soup = [
///     [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0],
///     [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0],
/// ];
/// let output = weld(&soup);
/// assert_eq!(output.mesh.vertices.len(), 4);
/// assert_eq!(output.summary.merged_positions(), 2);
/// ```
#[must_use]
pub fn weld(positions: &[[f32; 3]]) -> WeldOutput {
    weld_with(positions, ExactKey)
}

/// Weld a flat triangle stream with a custom key strategy.
#[must_use]
pub fn weld_with<K: WeldKey>(positions: &[[f32; 3]], key: K) -> WeldOutput {
    let triangles = positions.chunks_exact(3);
    if !triangles.remainder().is_empty() {
        debug!(
            leftover = triangles.remainder().len(),
            "Ignoring trailing positions that do not form a triangle"
        );
    }

    let mut welder = VertexWelder::with_capacity(key, positions.len() / 3);
    for tri in triangles {
        welder.push_triangle([tri[0], tri[1], tri[2]]);
    }
    welder.finish()
}

/// Expand an indexed mesh back into a triangle stream of `f32` positions.
///
/// Faces with out-of-range indices are skipped.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
// Truncation: f64 to f32 matches the binary STL storage precision
pub fn triangle_soup(mesh: &IndexedMesh) -> Vec<[f32; 3]> {
    let mut soup = Vec::with_capacity(mesh.faces.len() * 3);
    for face in &mesh.faces {
        let corners: Option<Vec<[f32; 3]>> = face
            .iter()
            .map(|&i| {
                mesh.vertices
                    .get(i as usize)
                    .map(|p| [p.x as f32, p.y as f32, p.z as f32])
            })
            .collect();
        if let Some(corners) = corners {
            soup.extend(corners);
        }
    }
    soup
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: [f32; 3] = [0.0, 0.0, 0.0];
    const B: [f32; 3] = [1.0, 0.0, 0.0];
    const C: [f32; 3] = [0.0, 1.0, 0.0];
    const D: [f32; 3] = [1.0, 1.0, 0.0];

    #[test]
    fn single_triangle() {
        let output = weld(&[A, B, C]);
        assert_eq!(output.mesh.vertices.len(), 3);
        assert_eq!(output.mesh.faces, vec![[0, 1, 2]]);
        assert_eq!(output.summary.merged_positions(), 0);
    }

    #[test]
    fn shared_edge_welds_to_four_vertices() {
        let output = weld(&[A, B, C, B, D, C]);
        assert_eq!(output.mesh.vertices.len(), 4);
        assert_eq!(output.mesh.faces, vec![[0, 1, 2], [1, 3, 2]]);
        assert_eq!(output.summary.input_positions, 6);
        assert_eq!(output.summary.merged_positions(), 2);
    }

    #[test]
    fn first_seen_order_fixes_indices() {
        let output = weld(&[C, A, B, B, D, C]);
        assert_eq!(output.mesh.vertices[0], Point3::new(0.0, 1.0, 0.0));
        assert_eq!(output.mesh.vertices[1], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(output.mesh.vertices[3], Point3::new(1.0, 1.0, 0.0));
        assert_eq!(output.mesh.faces[1], [2, 3, 0]);
    }

    #[test]
    fn rounding_noise_is_not_welded() {
        let nudged = [f32::from_bits(1.0f32.to_bits() + 1), 0.0, 0.0];
        let output = weld(&[A, B, C, nudged, D, C]);
        assert_eq!(output.mesh.vertices.len(), 5);
    }

    #[test]
    fn signed_zero_is_distinct() {
        let neg = [-0.0, 0.0, 0.0];
        let output = weld(&[A, B, C, neg, B, C]);
        assert_eq!(output.mesh.vertices.len(), 4);
    }

    #[test]
    fn grid_key_welds_rounding_noise() {
        let nudged = [f32::from_bits(1.0f32.to_bits() + 1), 0.0, 0.0];
        let key = GridKey::new(0.5).unwrap();
        // Offset into the middle of a cell so the noise cannot cross a boundary.
        let shift = |p: [f32; 3]| p.map(|c| c + 0.25);
        let output = weld_with(
            &[shift(A), shift(B), shift(C), shift(nudged), shift(D), shift(C)],
            key,
        );
        assert_eq!(output.mesh.vertices.len(), 4);
    }

    #[test]
    fn grid_key_rejects_bad_cell_size() {
        assert!(GridKey::new(0.0).is_none());
        assert!(GridKey::new(-1.0).is_none());
        assert!(GridKey::new(f64::NAN).is_none());
        assert!(GridKey::new(f64::INFINITY).is_none());
    }

    #[test]
    fn grid_key_keeps_non_finite_positions_apart() {
        let key = GridKey::new(1.0).unwrap();
        assert_ne!(key.key([f32::NAN, 0.0, 0.0]), key.key([0.0, 0.0, 0.0]));
        assert_ne!(key.key([f32::INFINITY, 0.0, 0.0]), key.key([0.5, 0.0, 0.0]));
    }

    #[test]
    fn collapsed_triangle_is_dropped_and_counted() {
        let output = weld(&[A, A, B, A, B, C]);
        assert_eq!(output.mesh.faces, vec![[0, 1, 2]]);
        assert_eq!(output.summary.input_triangles, 2);
        assert_eq!(output.summary.collapsed_faces, 1);
    }

    #[test]
    fn trailing_positions_ignored() {
        let output = weld(&[A, B, C, D]);
        assert_eq!(output.mesh.faces.len(), 1);
        assert_eq!(output.summary.input_positions, 3);
    }

    #[test]
    fn reweld_is_identical() {
        let first = weld(&[A, B, C, B, D, C, D, A, B]);
        let second = weld(&triangle_soup(&first.mesh));
        assert_eq!(first.mesh, second.mesh);
    }

    #[test]
    fn triangle_soup_skips_bad_faces() {
        let mesh = IndexedMesh::from_raw(&[0.0; 9], &[0, 1, 2, 0, 1, 9]);
        assert_eq!(triangle_soup(&mesh).len(), 3);
    }
}
