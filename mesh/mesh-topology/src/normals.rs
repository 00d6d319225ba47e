//! Face and vertex normal estimation.
//!
//! Face normals follow the winding: `normalize((v1 - v0) x (v2 - v0))`.
//! Vertex normals average the normals of adjacent faces and renormalize.
//! Undefined normals are reported as the zero vector, never NaN.

use mesh_types::{IndexedMesh, MeshTopology};
use nalgebra::Vector3;
use tracing::{debug, warn};

use crate::connectivity::Connectivity;
use crate::params::{NormalParams, NormalWeighting};
use crate::result::{DegeneracyReport, NormalEstimate};

/// Compute one unit normal per face.
///
/// Zero-area faces, faces with non-finite coordinates, and faces with
/// out-of-range indices get the zero vector.
///
/// # Example
///
/// ```
/// use mesh_topology::face_normals;
/// use mesh_types::IndexedMesh;
///
/// let mesh = IndexedMesh::from_raw(
///     &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
///     &[0, 1, 2],
/// );
/// let normals = face_normals(&mesh);
/// assert_eq!(normals[0].z, 1.0);
/// ```
#[must_use]
pub fn face_normals(mesh: &IndexedMesh) -> Vec<Vector3<f64>> {
    (0..mesh.faces.len())
        .map(|i| {
            mesh.triangle(i)
                .map_or_else(Vector3::zeros, |tri| tri.unit_normal_or_zero())
        })
        .collect()
}

/// Per-face contribution to its vertices' sums.
fn face_contributions(
    mesh: &IndexedMesh,
    unit_normals: &[Vector3<f64>],
    weighting: NormalWeighting,
) -> Vec<Vector3<f64>> {
    match weighting {
        NormalWeighting::Uniform => unit_normals.to_vec(),
        NormalWeighting::AreaWeighted => unit_normals
            .iter()
            .enumerate()
            .map(|(i, n)| {
                // Degenerate faces already carry a zero normal; keep them out of the sum.
                if *n == Vector3::zeros() {
                    return Vector3::zeros();
                }
                mesh.triangle(i)
                    .map_or_else(Vector3::zeros, |tri| n * tri.area())
            })
            .collect(),
    }
}

/// Estimate face and vertex normals.
///
/// The connectivity must have been built from `mesh`. Each vertex normal is
/// the normalized sum of its adjacent face contributions, summed in
/// ascending face order so results are reproducible. Vertices without
/// faces, and vertices whose sum cannot be normalized, get the zero vector;
/// both cases are listed in the returned [`DegeneracyReport`].
///
/// # Example
///
/// ```
/// use mesh_topology::{estimate_normals, Connectivity, NormalParams};
/// use mesh_types::unit_cube;
///
/// let cube = unit_cube();
/// let connectivity = Connectivity::build(&cube);
/// let normals = estimate_normals(&cube, &connectivity, &NormalParams::default());
///
/// assert_eq!(normals.face_normals.len(), 12);
/// assert_eq!(normals.vertex_normals.len(), 8);
/// assert!(normals.report.is_clean());
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
// Truncation: indices fit u32 like the mesh faces they came from
pub fn estimate_normals(
    mesh: &IndexedMesh,
    connectivity: &Connectivity,
    params: &NormalParams,
) -> NormalEstimate {
    let face_normals = face_normals(mesh);
    let mut report = DegeneracyReport::default();

    for (i, n) in face_normals.iter().enumerate() {
        if *n == Vector3::zeros() {
            report.degenerate_faces.push(i as u32);
        }
    }

    let contributions = face_contributions(mesh, &face_normals, params.weighting);

    let mut vertex_normals = Vec::with_capacity(mesh.vertices.len());
    for v in 0..mesh.vertices.len() {
        let v = v as u32;
        let faces = connectivity.faces_for_vertex(v);
        if faces.is_empty() {
            report.orphan_vertices.push(v);
            vertex_normals.push(Vector3::zeros());
            continue;
        }

        let sum: Vector3<f64> = faces
            .iter()
            .filter_map(|&f| contributions.get(f as usize))
            .sum();
        let len = sum.norm();
        if len > 0.0 && len.is_finite() {
            vertex_normals.push(sum / len);
        } else {
            report.cancelled_vertices.push(v);
            vertex_normals.push(Vector3::zeros());
        }
    }

    if report.is_clean() {
        debug!(
            faces = face_normals.len(),
            vertices = vertex_normals.len(),
            "Normals estimated"
        );
    } else {
        warn!(
            degenerate_faces = report.degenerate_faces.len(),
            orphan_vertices = report.orphan_vertices.len(),
            cancelled_vertices = report.cancelled_vertices.len(),
            "Normals estimated with zero-vector fallbacks"
        );
    }

    NormalEstimate {
        face_normals,
        vertex_normals,
        report,
    }
}
