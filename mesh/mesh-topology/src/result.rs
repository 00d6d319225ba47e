//! Result types for welding and normal estimation.

// Vertex counts don't overflow f64 precision in practice
#![allow(clippy::cast_precision_loss)]

use mesh_types::IndexedMesh;
use nalgebra::Vector3;

/// Counters describing one welding pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeldSummary {
    /// Triangles fed to the welder, including collapsed ones.
    pub input_triangles: usize,

    /// Raw positions fed to the welder.
    pub input_positions: usize,

    /// Distinct vertices produced.
    pub unique_vertices: usize,

    /// Triangles dropped because their corners welded together.
    pub collapsed_faces: usize,
}

impl WeldSummary {
    /// Number of positions that resolved to an existing vertex.
    #[must_use]
    pub const fn merged_positions(&self) -> usize {
        self.input_positions.saturating_sub(self.unique_vertices)
    }

    /// Ratio of unique vertices to input positions (1.0 when nothing merged).
    #[must_use]
    pub fn weld_ratio(&self) -> f64 {
        if self.input_positions == 0 {
            1.0
        } else {
            self.unique_vertices as f64 / self.input_positions as f64
        }
    }

    /// Number of triangles that made it into the mesh.
    #[must_use]
    pub const fn stored_faces(&self) -> usize {
        self.input_triangles.saturating_sub(self.collapsed_faces)
    }
}

impl std::fmt::Display for WeldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Weld: {} positions → {} vertices ({} merged), {} faces ({} collapsed)",
            self.input_positions,
            self.unique_vertices,
            self.merged_positions(),
            self.stored_faces(),
            self.collapsed_faces
        )
    }
}

/// Indexed mesh produced by welding, with its counters.
#[derive(Debug, Clone, Default)]
pub struct WeldOutput {
    /// The welded mesh.
    pub mesh: IndexedMesh,

    /// What happened during welding.
    pub summary: WeldSummary,
}

/// Degenerate conditions met while estimating normals.
///
/// Each listed element received the zero-vector normal. None of these are
/// errors; the report exists so callers can decide whether to care.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DegeneracyReport {
    /// Faces with zero area or non-finite coordinates.
    pub degenerate_faces: Vec<u32>,

    /// Vertices referenced by no face.
    pub orphan_vertices: Vec<u32>,

    /// Vertices whose adjacent face normals summed to zero (or were all degenerate).
    pub cancelled_vertices: Vec<u32>,
}

impl DegeneracyReport {
    /// Whether every face and vertex received a unit normal.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.degenerate_faces.is_empty()
            && self.orphan_vertices.is_empty()
            && self.cancelled_vertices.is_empty()
    }

    /// Total number of elements that fell back to the zero normal.
    #[must_use]
    pub fn total(&self) -> usize {
        self.degenerate_faces.len() + self.orphan_vertices.len() + self.cancelled_vertices.len()
    }
}

impl std::fmt::Display for DegeneracyReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} degenerate faces, {} orphan vertices, {} cancelled vertex normals",
            self.degenerate_faces.len(),
            self.orphan_vertices.len(),
            self.cancelled_vertices.len()
        )
    }
}

/// Face and vertex normals for a mesh.
///
/// `face_normals` is parallel to `mesh.faces`, `vertex_normals` to
/// `mesh.vertices`. Every entry is either a unit vector or exactly zero.
#[derive(Debug, Clone, Default)]
pub struct NormalEstimate {
    /// One normal per face.
    pub face_normals: Vec<Vector3<f64>>,

    /// One normal per vertex.
    pub vertex_normals: Vec<Vector3<f64>>,

    /// Elements that received the zero sentinel.
    pub report: DegeneracyReport,
}
