//! Indexed triangle mesh.

use crate::{BoundingBox, MeshBounds, MeshTopology, Triangle};
use nalgebra::Point3;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An indexed triangle mesh.
///
/// Vertices are stored once (unique by weld key) and faces reference them
/// by 0-based index. The mesh is append-only while a decoder or welder
/// builds it; afterwards it is treated as immutable, and anything derived
/// from it (connectivity, normals) goes stale if it is mutated.
///
/// # Memory Layout
///
/// - `vertices`: `Vec<Point3<f64>>` - Welded vertex positions
/// - `faces`: `Vec<[u32; 3]>` - Triangle faces as vertex indices
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, MeshTopology, Point3};
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
/// mesh.vertices.push(Point3::new(1.0, 0.0, 0.0));
/// mesh.vertices.push(Point3::new(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexedMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3<f64>>,

    /// Triangle faces as indices into the vertex array.
    /// Each face is `[v0, v1, v2]` with counter-clockwise winding.
    pub faces: Vec<[u32; 3]>,
}

/// A face that violates the triangle invariant.
///
/// Every face must reference three distinct, in-range vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FaceDefect {
    /// A face references a vertex index past the end of the vertex array.
    #[error("face {face} references vertex {index} but the mesh has {vertex_count} vertices")]
    OutOfRange {
        /// Index of the offending face.
        face: usize,
        /// The out-of-range vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// A face uses the same vertex more than once.
    #[error("face {face} repeats vertex {index}")]
    RepeatedIndex {
        /// Index of the offending face.
        face: usize,
        /// The repeated vertex index.
        index: u32,
    },
}

impl IndexedMesh {
    /// Create a new empty mesh.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{IndexedMesh, MeshTopology};
    ///
    /// let mesh = IndexedMesh::new();
    /// assert!(mesh.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Create a mesh from vertices and faces.
    ///
    /// No validation is performed; call [`IndexedMesh::validate`] when the
    /// faces come from an untrusted source.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Point3<f64>>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Create a mesh from raw coordinate and index data.
    ///
    /// Returns an empty mesh if either slice length is not a multiple of 3.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{IndexedMesh, MeshTopology};
    ///
    /// let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    /// let indices = [0, 1, 2];
    ///
    /// let mesh = IndexedMesh::from_raw(&positions, &indices);
    /// assert_eq!(mesh.vertex_count(), 3);
    /// assert_eq!(mesh.face_count(), 1);
    /// ```
    #[must_use]
    pub fn from_raw(positions: &[f64], indices: &[u32]) -> Self {
        if positions.len() % 3 != 0 || indices.len() % 3 != 0 {
            return Self::new();
        }

        let vertices = positions
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();

        let faces = indices
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();

        Self { vertices, faces }
    }

    /// Check that every face references three distinct, in-range vertices.
    ///
    /// # Errors
    ///
    /// Returns the first [`FaceDefect`] found, scanning faces in order.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{FaceDefect, IndexedMesh};
    ///
    /// let mesh = IndexedMesh::from_raw(&[0.0; 9], &[0, 1, 1]);
    /// assert_eq!(
    ///     mesh.validate(),
    ///     Err(FaceDefect::RepeatedIndex { face: 0, index: 1 })
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), FaceDefect> {
        let vertex_count = self.vertices.len();
        for (face_idx, &[a, b, c]) in self.faces.iter().enumerate() {
            for index in [a, b, c] {
                if index as usize >= vertex_count {
                    return Err(FaceDefect::OutOfRange {
                        face: face_idx,
                        index,
                        vertex_count,
                    });
                }
            }
            if a == b || a == c {
                return Err(FaceDefect::RepeatedIndex {
                    face: face_idx,
                    index: a,
                });
            }
            if b == c {
                return Err(FaceDefect::RepeatedIndex {
                    face: face_idx,
                    index: b,
                });
            }
        }
        Ok(())
    }

    /// Reserve capacity for additional vertices and faces.
    pub fn reserve(&mut self, additional_vertices: usize, additional_faces: usize) {
        self.vertices.reserve(additional_vertices);
        self.faces.reserve(additional_faces);
    }

    /// Compute the total surface area of the mesh.
    ///
    /// Faces with out-of-range indices are skipped.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.triangles().map(|tri| tri.area()).sum()
    }
}

impl MeshTopology for IndexedMesh {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn vertex(&self, index: usize) -> Option<&Point3<f64>> {
        self.vertices.get(index)
    }

    fn face(&self, index: usize) -> Option<[u32; 3]> {
        self.faces.get(index).copied()
    }

    fn triangle(&self, face_index: usize) -> Option<Triangle> {
        let [i0, i1, i2] = self.face(face_index)?;
        Some(Triangle {
            v0: *self.vertices.get(i0 as usize)?,
            v1: *self.vertices.get(i1 as usize)?,
            v2: *self.vertices.get(i2 as usize)?,
        })
    }

    fn faces(&self) -> impl Iterator<Item = [u32; 3]> {
        self.faces.iter().copied()
    }

    fn triangles(&self) -> impl Iterator<Item = Triangle> {
        (0..self.faces.len()).filter_map(|i| self.triangle(i))
    }
}

impl MeshBounds for IndexedMesh {
    fn bounds(&self) -> BoundingBox {
        BoundingBox::from_points(self.vertices.iter())
    }
}

/// Helper function to create a unit cube mesh.
///
/// Creates a cube from (0,0,0) to (1,1,1) with outward-facing normals.
///
/// # Example
///
/// ```
/// use mesh_types::{unit_cube, MeshTopology};
///
/// let cube = unit_cube();
/// assert_eq!(cube.vertex_count(), 8);
/// assert_eq!(cube.face_count(), 12);
/// ```
#[must_use]
pub fn unit_cube() -> IndexedMesh {
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0), // 0
        Point3::new(1.0, 0.0, 0.0), // 1
        Point3::new(1.0, 1.0, 0.0), // 2
        Point3::new(0.0, 1.0, 0.0), // 3
        Point3::new(0.0, 0.0, 1.0), // 4
        Point3::new(1.0, 0.0, 1.0), // 5
        Point3::new(1.0, 1.0, 1.0), // 6
        Point3::new(0.0, 1.0, 1.0), // 7
    ];

    // 12 triangles (2 per side), CCW winding when viewed from outside
    let faces = vec![
        [0, 2, 1],
        [0, 3, 2], // bottom, -Z
        [4, 5, 6],
        [4, 6, 7], // top, +Z
        [0, 1, 5],
        [0, 5, 4], // front, -Y
        [3, 7, 6],
        [3, 6, 2], // back, +Y
        [0, 4, 7],
        [0, 7, 3], // left, -X
        [1, 2, 6],
        [1, 6, 5], // right, +X
    ];

    IndexedMesh::from_parts(vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_is_empty() {
        let mesh = IndexedMesh::new();
        assert!(mesh.is_empty());

        let mut mesh2 = IndexedMesh::new();
        mesh2.vertices.push(Point3::origin());
        assert!(mesh2.is_empty()); // no faces
    }

    #[test]
    fn mesh_from_raw() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let indices = [0, 1, 2];

        let mesh = IndexedMesh::from_raw(&positions, &indices);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn mesh_from_raw_rejects_ragged_input() {
        let mesh = IndexedMesh::from_raw(&[0.0, 1.0], &[0, 1, 2]);
        assert_eq!(mesh, IndexedMesh::new());
    }

    #[test]
    fn mesh_bounds() {
        let mesh = IndexedMesh::from_parts(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(10.0, 5.0, 3.0),
                Point3::new(-2.0, 8.0, 1.0),
            ],
            Vec::new(),
        );

        let bounds = mesh.bounds();
        assert_eq!(bounds.min, Point3::new(-2.0, 0.0, 0.0));
        assert_eq!(bounds.max, Point3::new(10.0, 8.0, 3.0));
    }

    #[test]
    fn empty_mesh_bounds_invalid() {
        let mesh = IndexedMesh::new();
        assert!(!mesh.bounds().is_valid());
        assert!(mesh.bounds_opt().is_none());
    }

    #[test]
    fn validate_accepts_cube() {
        assert_eq!(unit_cube().validate(), Ok(()));
    }

    #[test]
    fn validate_reports_out_of_range() {
        let mesh = IndexedMesh::from_raw(&[0.0; 9], &[0, 1, 2, 0, 1, 7]);
        assert_eq!(
            mesh.validate(),
            Err(FaceDefect::OutOfRange {
                face: 1,
                index: 7,
                vertex_count: 3
            })
        );
    }

    #[test]
    fn validate_reports_repeated_index() {
        let mesh = IndexedMesh::from_raw(&[0.0; 9], &[2, 0, 2]);
        assert_eq!(
            mesh.validate(),
            Err(FaceDefect::RepeatedIndex { face: 0, index: 2 })
        );
    }

    #[test]
    fn triangle_lookup_out_of_range_is_none() {
        let mesh = IndexedMesh::from_raw(&[0.0; 9], &[0, 1, 5]);
        assert!(mesh.triangle(0).is_none());
        assert!(mesh.triangle(1).is_none());
        assert_eq!(mesh.triangles().count(), 0);
    }

    #[test]
    fn unit_cube_surface_area() {
        let area = unit_cube().surface_area();
        assert!(
            (area - 6.0).abs() < 1e-10,
            "Unit cube surface area should be 6.0, got {area}"
        );
    }

    #[test]
    fn unit_cube_normals_point_outward() {
        let cube = unit_cube();
        let center = cube.center();
        for tri in cube.triangles() {
            let n = tri.normal().unwrap();
            let outward = tri.centroid() - center;
            assert!(n.dot(&outward) > 0.0);
        }
    }
}
