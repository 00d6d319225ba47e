//! Render-ready data derived from a surface.
//!
//! [`PreparedSurface`] runs connectivity, normal estimation and bounds once;
//! [`RenderBuffers`] flattens the result into the interleaved `f32` vertex
//! data and `u32` index data a GPU upload expects.

use mesh_topology::{estimate_normals, Connectivity, NormalEstimate, NormalParams};
use mesh_types::{BoundingBox, FaceDefect, IndexedMesh, MeshBounds, Vector3};
use tracing::{info, warn};

use crate::asset::SurfaceAsset;
use crate::error::{IngestError, IngestResult};

/// Floats per interleaved vertex: position xyz then normal xyz.
pub const FLOATS_PER_VERTEX: usize = 6;

/// Connectivity, normals and bounds for one mesh.
#[derive(Debug, Clone)]
pub struct PreparedSurface {
    /// Vertex-to-face adjacency.
    pub connectivity: Connectivity,

    /// Face and vertex normals with their degeneracy report.
    pub normals: NormalEstimate,

    /// Bounding box of the vertices.
    pub bounds: BoundingBox,
}

impl PreparedSurface {
    /// Derive everything a renderer needs from `mesh`.
    ///
    /// # Errors
    ///
    /// Returns the first [`FaceDefect`] if a face is out of range or
    /// repeats a vertex.
    pub fn prepare(mesh: &IndexedMesh, params: &NormalParams) -> Result<Self, FaceDefect> {
        mesh.validate()?;
        let connectivity = Connectivity::build(mesh);
        let normals = estimate_normals(mesh, &connectivity, params);
        Ok(Self {
            connectivity,
            normals,
            bounds: mesh.bounds(),
        })
    }
}

impl SurfaceAsset {
    /// Derive render data for this surface.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::InvalidMesh`] if a face breaks the triangle invariant.
    pub fn prepare(&self, params: &NormalParams) -> IngestResult<PreparedSurface> {
        PreparedSurface::prepare(&self.mesh, params).map_err(|defect| IngestError::InvalidMesh {
            name: self.name.clone(),
            defect,
        })
    }
}

/// Flat buffers for drawing a surface as indexed triangles.
///
/// # Example
///
/// ```
/// use mesh_ingest::{RenderBuffers, FLOATS_PER_VERTEX};
/// use mesh_topology::NormalParams;
/// use mesh_types::unit_cube;
///
/// let cube = unit_cube();
/// let buffers = RenderBuffers::from_mesh(&cube, &NormalParams::default()).unwrap();
///
/// assert_eq!(buffers.vertex_count, 8);
/// assert_eq!(buffers.vertices.len(), 8 * FLOATS_PER_VERTEX);
/// assert_eq!(buffers.indices.len(), 36);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RenderBuffers {
    /// Interleaved `[px, py, pz, nx, ny, nz]` per vertex.
    pub vertices: Vec<f32>,

    /// Three vertex indices per face.
    pub indices: Vec<u32>,

    /// Number of vertices.
    pub vertex_count: usize,

    /// Number of faces.
    pub face_count: usize,

    /// Bounding box of the vertices.
    pub bounds: BoundingBox,
}

impl RenderBuffers {
    /// Flatten a mesh and its prepared data.
    ///
    /// `prepared` should have been built from `mesh`. The buffer always holds
    /// `vertex_count * FLOATS_PER_VERTEX` floats: a vertex without a prepared
    /// normal gets the zero normal.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: f64 to f32 is the GPU vertex format
    pub fn from_prepared(mesh: &IndexedMesh, prepared: &PreparedSurface) -> Self {
        let normals = &prepared.normals.vertex_normals;
        if normals.len() != mesh.vertices.len() {
            warn!(
                vertices = mesh.vertices.len(),
                normals = normals.len(),
                "Prepared normals do not match the mesh, filling with zero normals"
            );
        }

        let mut vertices = Vec::with_capacity(mesh.vertices.len() * FLOATS_PER_VERTEX);
        for (i, p) in mesh.vertices.iter().enumerate() {
            let n = normals.get(i).copied().unwrap_or_else(Vector3::zeros);
            vertices.extend_from_slice(&[
                p.x as f32, p.y as f32, p.z as f32, n.x as f32, n.y as f32, n.z as f32,
            ]);
        }

        let indices = mesh.faces.iter().flatten().copied().collect();

        Self {
            vertices,
            indices,
            vertex_count: mesh.vertices.len(),
            face_count: mesh.faces.len(),
            bounds: prepared.bounds,
        }
    }

    /// Prepare and flatten a mesh in one step.
    ///
    /// # Errors
    ///
    /// Returns the first [`FaceDefect`] in the mesh.
    pub fn from_mesh(mesh: &IndexedMesh, params: &NormalParams) -> Result<Self, FaceDefect> {
        let prepared = PreparedSurface::prepare(mesh, params)?;
        Ok(Self::from_prepared(mesh, &prepared))
    }

    /// Prepare and flatten a surface in one step.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::InvalidMesh`] if a face breaks the triangle invariant.
    pub fn from_surface(surface: &SurfaceAsset, params: &NormalParams) -> IngestResult<Self> {
        let prepared = surface.prepare(params)?;
        let buffers = Self::from_prepared(&surface.mesh, &prepared);
        info!(
            name = %surface.name,
            vertices = buffers.vertex_count,
            faces = buffers.face_count,
            zero_normals = prepared.normals.report.total(),
            "Surface prepared for rendering"
        );
        Ok(buffers)
    }

    /// Position of vertex `i` as stored in the buffer.
    #[must_use]
    pub fn position(&self, i: usize) -> Option<[f32; 3]> {
        self.triple(i, 0)
    }

    /// Normal of vertex `i` as stored in the buffer.
    #[must_use]
    pub fn normal(&self, i: usize) -> Option<[f32; 3]> {
        self.triple(i, 3)
    }

    fn triple(&self, vertex: usize, offset: usize) -> Option<[f32; 3]> {
        let start = vertex.checked_mul(FLOATS_PER_VERTEX)?.checked_add(offset)?;
        match self.vertices.get(start..start.checked_add(3)?)? {
            &[x, y, z] => Some([x, y, z]),
            _ => None,
        }
    }

    /// Size of the vertex buffer in bytes.
    #[must_use]
    pub fn vertex_bytes(&self) -> usize {
        self.vertices.len() * std::mem::size_of::<f32>()
    }

    /// Size of the index buffer in bytes.
    #[must_use]
    pub fn index_bytes(&self) -> usize {
        self.indices.len() * std::mem::size_of::<u32>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;
    use approx::assert_relative_eq;
    use mesh_types::unit_cube;

    #[test]
    fn single_triangle_buffers() {
        let mesh = IndexedMesh::from_raw(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], &[0, 1, 2]);
        let buffers = RenderBuffers::from_mesh(&mesh, &NormalParams::default()).unwrap();

        assert_eq!(buffers.indices, vec![0, 1, 2]);
        assert_eq!(buffers.position(1), Some([1.0, 0.0, 0.0]));
        for i in 0..3 {
            assert_eq!(buffers.normal(i), Some([0.0, 0.0, 1.0]));
        }
        assert_eq!(buffers.position(3), None);
        assert_eq!(buffers.vertex_bytes(), 3 * 6 * 4);
        assert_eq!(buffers.index_bytes(), 3 * 4);
    }

    #[test]
    fn cube_normals_are_unit() {
        let buffers = RenderBuffers::from_mesh(&unit_cube(), &NormalParams::default()).unwrap();
        for i in 0..buffers.vertex_count {
            let [x, y, z] = buffers.normal(i).unwrap();
            assert_relative_eq!((x * x + y * y + z * z).sqrt(), 1.0, epsilon = 1e-6);
        }
        assert!(buffers.bounds.is_valid());
    }

    #[test]
    fn orphan_vertex_gets_zero_normal() {
        let mesh = IndexedMesh::from_raw(
            &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 9.0, 9.0, 9.0],
            &[0, 1, 2],
        );
        let prepared = PreparedSurface::prepare(&mesh, &NormalParams::default()).unwrap();
        assert_eq!(prepared.normals.report.orphan_vertices, vec![3]);

        let buffers = RenderBuffers::from_prepared(&mesh, &prepared);
        assert_eq!(buffers.normal(3), Some([0.0, 0.0, 0.0]));
        // Orphans still count towards the bounds.
        assert_eq!(buffers.bounds.max.x, 9.0);
    }

    #[test]
    fn mismatched_prepared_data_keeps_buffer_whole() {
        let small = IndexedMesh::from_raw(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], &[0, 1, 2]);
        let prepared = PreparedSurface::prepare(&small, &NormalParams::default()).unwrap();

        let cube = unit_cube();
        let buffers = RenderBuffers::from_prepared(&cube, &prepared);
        assert_eq!(buffers.vertex_count, 8);
        assert_eq!(buffers.vertices.len(), 8 * FLOATS_PER_VERTEX);
        assert_eq!(buffers.normal(0), Some([0.0, 0.0, 1.0]));
        assert_eq!(buffers.normal(7), Some([0.0, 0.0, 0.0]));
        assert_eq!(buffers.position(7), Some([0.0, 1.0, 1.0]));
    }

    #[test]
    fn invalid_mesh_is_rejected_with_name() {
        let mesh = IndexedMesh::from_raw(&[0.0; 9], &[0, 1, 4]);
        let surface = SurfaceAsset::new("broken.stl", Color::RED, mesh);
        let err = RenderBuffers::from_surface(&surface, &NormalParams::default()).unwrap_err();
        match err {
            IngestError::InvalidMesh { name, defect } => {
                assert_eq!(name, "broken.stl");
                assert!(matches!(defect, FaceDefect::OutOfRange { index: 4, .. }));
            }
            other @ IngestError::Io(_) => panic!("unexpected error: {other}"),
        }
    }
}
