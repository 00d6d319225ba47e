//! Conformance and property tests for the binary STL codec.
//!
//! To run: cargo test -p mesh-io --test stl_conformance

#![allow(clippy::unwrap_used, clippy::expect_used)]

use mesh_io::{
    decode_stl, encode_stl, encoded_len, load_stl, save_stl, DecodeStatus, FileStore, IoError,
    StlReadParams, HEADER_SIZE, RECORD_SIZE,
};
use mesh_types::{IndexedMesh, MeshBounds, Point3};
use proptest::prelude::*;
use tempfile::tempdir;

// =============================================================================
// Helpers
// =============================================================================

/// Triangles of a mesh as sorted position triples, so meshes can be compared
/// regardless of vertex numbering.
fn triangle_set(mesh: &IndexedMesh) -> Vec<[[u64; 3]; 3]> {
    let mut tris: Vec<[[u64; 3]; 3]> = mesh
        .faces
        .iter()
        .map(|face| {
            face.map(|i| {
                let p = mesh.vertices[i as usize];
                [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()]
            })
        })
        .collect();
    tris.sort_unstable();
    tris
}

/// Distinct positions on a lattice, indexed so faces are never degenerate by index.
fn arb_mesh() -> impl Strategy<Value = IndexedMesh> {
    prop::collection::btree_set(prop::array::uniform3(-50i16..50), 3..30).prop_flat_map(|points| {
        let vertices: Vec<Point3<f64>> = points
            .into_iter()
            .map(|[x, y, z]| Point3::new(f64::from(x) * 0.25, f64::from(y) * 0.25, f64::from(z) * 0.25))
            .collect();
        let n = vertices.len() as u32;
        let face = prop::sample::subsequence((0..n).collect::<Vec<_>>(), 3)
            .prop_shuffle()
            .prop_map(|v| [v[0], v[1], v[2]]);
        prop::collection::vec(face, 0..40)
            .prop_map(move |faces| IndexedMesh::from_parts(vertices.clone(), faces))
    })
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// Encoding then decoding keeps every triangle.
    #[test]
    fn roundtrip_preserves_triangle_set(mesh in arb_mesh()) {
        let bytes = encode_stl(&mesh).unwrap();
        prop_assert_eq!(bytes.len(), encoded_len(mesh.faces.len()));

        let decoded = decode_stl(&bytes);
        prop_assert!(decoded.is_complete());
        prop_assert_eq!(triangle_set(&decoded.mesh), triangle_set(&mesh));
    }

    /// Re-encoding a decoded mesh reproduces the bytes exactly.
    #[test]
    fn encode_is_stable_after_decode(mesh in arb_mesh()) {
        let first = encode_stl(&mesh).unwrap();
        let second = encode_stl(&decode_stl(&first).mesh).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Any prefix of a valid file decodes exactly the whole records it contains.
    #[test]
    fn prefixes_decode_whole_records(mesh in arb_mesh(), cut in 0.0..1.0f64) {
        let bytes = encode_stl(&mesh).unwrap();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let len = (bytes.len() as f64 * cut) as usize;
        let decoded = decode_stl(&bytes[..len]);

        if len < HEADER_SIZE + 4 {
            prop_assert_eq!(decoded.status, DecodeStatus::Truncated { declared: None, decoded: 0 });
        } else {
            let whole = ((len - HEADER_SIZE - 4) / RECORD_SIZE) as u32;
            prop_assert_eq!(decoded.summary.records_decoded, whole);
            prop_assert_eq!(decoded.status.is_complete(), whole as usize == mesh.faces.len());
        }
    }

    /// Arbitrary bytes never panic and never claim more faces than fit.
    #[test]
    fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..600)) {
        let decoded = decode_stl(&bytes);
        let room = bytes.len().saturating_sub(HEADER_SIZE + 4) / RECORD_SIZE;
        prop_assert!(decoded.summary.records_decoded as usize <= room);
        prop_assert!(decoded.mesh.validate().is_ok());
    }

    /// Every decoded record is either a face or listed as collapsed.
    #[test]
    fn every_record_is_accounted_for(bytes in prop::collection::vec(any::<u8>(), 84..600)) {
        let decoded = decode_stl(&bytes);
        prop_assert_eq!(
            decoded.mesh.faces.len() + decoded.collapsed_records.len(),
            decoded.summary.records_decoded as usize
        );
        prop_assert_eq!(decoded.collapsed_records.len(), decoded.summary.weld.collapsed_faces);
    }

    /// Bounds survive the round trip.
    #[test]
    fn roundtrip_preserves_bounds(mesh in arb_mesh()) {
        prop_assume!(!mesh.faces.is_empty());
        let used: Vec<Point3<f64>> = mesh
            .faces
            .iter()
            .flatten()
            .map(|&i| mesh.vertices[i as usize])
            .collect();
        let expected = mesh_types::BoundingBox::from_points(used.iter());
        let decoded = decode_stl(&encode_stl(&mesh).unwrap());
        prop_assert_eq!(decoded.mesh.bounds(), expected);
    }
}

// =============================================================================
// Precision collisions
// =============================================================================

/// Two vertices that differ in `f64` but share an `f32`, both used by one face.
fn f32_collision_mesh() -> IndexedMesh {
    IndexedMesh::from_parts(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0 + 1e-12, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ],
        vec![[0, 1, 3], [1, 2, 3]],
    )
}

#[test]
fn f32_collision_is_reported_not_silent() {
    let mesh = f32_collision_mesh();
    assert!(mesh.validate().is_ok());

    let decoded = decode_stl(&encode_stl(&mesh).unwrap());
    assert_eq!(decoded.summary.records_decoded, 2);
    assert_eq!(decoded.mesh.faces.len(), 1);
    assert_eq!(decoded.collapsed_records, vec![1]);
    assert!(!decoded.all_records_kept());
    assert!(decoded.mesh.validate().is_ok());
    assert!(decoded.summary.to_string().contains("(1 collapsed)"));

    // The surviving face keeps its positions.
    assert_eq!(
        triangle_set(&decoded.mesh),
        triangle_set(&IndexedMesh::from_parts(mesh.vertices.clone(), vec![[0, 1, 3]]))
    );
}

#[test]
fn f32_collision_through_store() {
    let dir = tempdir().unwrap();
    let mut store = FileStore::rooted(dir.path());
    save_stl(&mut store, "thin.stl", &f32_collision_mesh()).unwrap();

    let decoded = load_stl(&store, "thin.stl", &StlReadParams::default()).unwrap();
    assert!(decoded.is_complete());
    assert_eq!(decoded.collapsed_records, vec![1]);
}

// =============================================================================
// File store
// =============================================================================

#[test]
fn file_store_end_to_end() {
    let dir = tempdir().unwrap();
    let mut store = FileStore::rooted(dir.path());
    let cube = mesh_types::unit_cube();

    save_stl(&mut store, "cube.stl", &cube).unwrap();
    let on_disk = std::fs::metadata(dir.path().join("cube.stl")).unwrap();
    assert_eq!(on_disk.len() as usize, encoded_len(12));

    let decoded = load_stl(&store, "cube.stl", &StlReadParams::default()).unwrap();
    assert!(decoded.is_complete());
    assert_eq!(triangle_set(&decoded.mesh), triangle_set(&cube));
}

#[test]
fn file_store_missing_file() {
    let dir = tempdir().unwrap();
    let store = FileStore::rooted(dir.path());
    let err = load_stl(&store, "nope.stl", &StlReadParams::default()).unwrap_err();
    assert!(matches!(err, IoError::ResourceUnavailable { .. }));
    assert!(err.to_string().contains("nope.stl"));
}

#[test]
fn file_store_truncated_file() {
    let dir = tempdir().unwrap();
    let mut bytes = encode_stl(&mesh_types::unit_cube()).unwrap();
    bytes.truncate(encoded_len(5) + 10);
    std::fs::write(dir.path().join("cut.stl"), &bytes).unwrap();

    let store = FileStore::rooted(dir.path());
    let decoded = load_stl(&store, "cut.stl", &StlReadParams::default()).unwrap();
    assert_eq!(
        decoded.status,
        DecodeStatus::Truncated {
            declared: Some(12),
            decoded: 5
        }
    );
    assert_eq!(decoded.mesh.faces.len(), 5);
}
