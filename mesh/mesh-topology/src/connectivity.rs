//! Vertex-to-face connectivity.
//!
//! Adjacency is stored as a dense arena indexed by vertex: each slot holds
//! the sorted, duplicate-free list of faces referencing that vertex.

use mesh_types::IndexedMesh;
use tracing::warn;

/// Maps every vertex index to the set of faces that reference it.
///
/// Built once from a completed [`IndexedMesh`]; it goes stale if the mesh is
/// mutated afterwards.
///
/// # Example
///
/// ```
/// use mesh_topology::Connectivity;
/// use mesh_types::IndexedMesh;
///
/// let mesh = IndexedMesh::from_raw(&[0.0; 12], &[0, 1, 2, 1, 3, 2]);
/// let connectivity = Connectivity::build(&mesh);
///
/// assert_eq!(connectivity.faces_for_vertex(2), &[0, 1]);
/// assert_eq!(connectivity.faces_for_vertex(0), &[0]);
/// assert_eq!(connectivity.orphan_vertices().count(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Connectivity {
    /// `vertex_faces[v]` lists faces touching vertex `v`, ascending.
    vertex_faces: Vec<Vec<u32>>,
    /// Face corners that pointed past the vertex array.
    skipped_references: usize,
}

impl Connectivity {
    /// Build connectivity for a mesh in O(faces) time.
    ///
    /// Every vertex in `[0, vertices.len())` gets a slot, empty for vertices
    /// no face references. A face that lists the same vertex twice is
    /// recorded once. Corners with out-of-range indices are skipped.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: face count is bounded by the u32 count in the STL header
    pub fn build(mesh: &IndexedMesh) -> Self {
        let mut vertex_faces: Vec<Vec<u32>> = vec![Vec::new(); mesh.vertices.len()];
        let mut skipped_references = 0;

        for (face_idx, face) in mesh.faces.iter().enumerate() {
            let face_idx = face_idx as u32;
            for &v in face {
                let Some(slot) = vertex_faces.get_mut(v as usize) else {
                    skipped_references += 1;
                    continue;
                };
                // Faces arrive in ascending order, so a repeat can only be the last entry.
                if slot.last() != Some(&face_idx) {
                    slot.push(face_idx);
                }
            }
        }

        if skipped_references > 0 {
            warn!(
                skipped = skipped_references,
                vertices = mesh.vertices.len(),
                "Skipped face corners with out-of-range vertex indices"
            );
        }

        Self {
            vertex_faces,
            skipped_references,
        }
    }

    /// Number of vertex slots (equals the mesh vertex count at build time).
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertex_faces.len()
    }

    /// Faces adjacent to a vertex, in ascending order.
    ///
    /// Returns an empty slice for orphan or out-of-range vertices.
    #[must_use]
    pub fn faces_for_vertex(&self, v: u32) -> &[u32] {
        self.vertex_faces
            .get(v as usize)
            .map_or(&[], Vec::as_slice)
    }

    /// Number of faces adjacent to a vertex.
    #[must_use]
    pub fn valence(&self, v: u32) -> usize {
        self.faces_for_vertex(v).len()
    }

    /// Whether a vertex has no adjacent faces.
    #[must_use]
    pub fn is_orphan(&self, v: u32) -> bool {
        self.faces_for_vertex(v).is_empty()
    }

    /// Iterate over vertices with no adjacent faces.
    #[allow(clippy::cast_possible_truncation)]
    pub fn orphan_vertices(&self) -> impl Iterator<Item = u32> + '_ {
        self.vertex_faces
            .iter()
            .enumerate()
            .filter(|(_, faces)| faces.is_empty())
            .map(|(v, _)| v as u32)
    }

    /// Iterate over `(vertex, adjacent faces)` pairs in vertex order.
    #[allow(clippy::cast_possible_truncation)]
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[u32])> + '_ {
        self.vertex_faces
            .iter()
            .enumerate()
            .map(|(v, faces)| (v as u32, faces.as_slice()))
    }

    /// Total number of (vertex, face) incidences recorded.
    #[must_use]
    pub fn incidence_count(&self) -> usize {
        self.vertex_faces.iter().map(Vec::len).sum()
    }

    /// Number of face corners skipped because their index was out of range.
    #[must_use]
    pub const fn skipped_references(&self) -> usize {
        self.skipped_references
    }
}
