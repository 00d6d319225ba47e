//! Binary STL decoding and encoding.
//!
//! # Binary Format
//!
//! ```text
//! UINT8[80]    – Header (ignored on read, zero on write)
//! UINT32       – Number of triangles (little-endian)
//! foreach triangle
//!     REAL32[3] – Normal vector (ignored on read, recomputed on write)
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count (ignored on read, zero on write)
//! end
//! ```
//!
//! Decoding welds vertices as records are read, so a file becomes an
//! [`IndexedMesh`] in a single pass. A buffer that ends early still yields
//! the faces read so far, flagged with [`DecodeStatus::Truncated`]. A record
//! whose corners weld onto fewer than three vertices has no face; its index
//! is listed in [`StlDecode::collapsed_records`].

use std::fmt;
use std::io::Write;
use std::path::Path;

use mesh_topology::{ExactKey, GridKey, VertexWelder, WeldKey, WeldMode, WeldSummary};
use mesh_types::{IndexedMesh, Triangle};
use tracing::{debug, info, warn};

use crate::error::{IoError, IoResult};
use crate::params::StlReadParams;
use crate::store::ByteStore;

/// STL binary header size in bytes.
pub const HEADER_SIZE: usize = 80;

/// Header plus the face count.
const PREFIX_SIZE: usize = HEADER_SIZE + 4;

/// Size of one triangle in binary STL (normal + 3 vertices + attribute).
pub const RECORD_SIZE: usize = 50;

/// Bytes of the stored normal at the start of each record.
const NORMAL_SIZE: usize = 12;

/// Bytes of the three vertex positions in each record.
const POSITIONS_SIZE: usize = 36;

/// Whether a decode consumed everything the header promised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStatus {
    /// Every declared face record was present.
    Complete,

    /// The buffer ran out before the declared face count was reached.
    Truncated {
        /// Face count from the header, or `None` if the buffer was too
        /// short to hold the header and count.
        declared: Option<u32>,
        /// Complete face records read before the data ran out.
        decoded: u32,
    },
}

impl DecodeStatus {
    /// Whether the decode saw every declared record.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Whether the buffer ended early.
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }
}

/// Counters describing one decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeSummary {
    /// Face count from the header, if it was present.
    pub declared_faces: Option<u32>,

    /// Complete records read.
    pub records_decoded: u32,

    /// Bytes after the last decoded record that were not consumed.
    ///
    /// Trailing padding on a complete file, or the partial record on a
    /// truncated one.
    pub unread_bytes: usize,

    /// Welding counters for the decoded records.
    pub weld: WeldSummary,
}

impl fmt::Display for DecodeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.declared_faces {
            Some(declared) => write!(f, "STL: {}/{} records", self.records_decoded, declared)?,
            None => write!(f, "STL: no header")?,
        }
        write!(
            f,
            ", {} vertices, {} faces",
            self.weld.unique_vertices,
            self.weld.stored_faces()
        )?;
        if self.weld.collapsed_faces > 0 {
            write!(f, " ({} collapsed)", self.weld.collapsed_faces)?;
        }
        if self.unread_bytes > 0 {
            write!(f, ", {} bytes unread", self.unread_bytes)?;
        }
        Ok(())
    }
}

/// Outcome of decoding a binary STL buffer.
///
/// The mesh is always present; check [`StlDecode::status`] before treating
/// it as the whole file, or call [`StlDecode::into_complete`].
#[derive(Debug, Clone)]
pub struct StlDecode {
    /// Welded mesh built from the records that were read.
    pub mesh: IndexedMesh,

    /// Whether all declared records were present.
    pub status: DecodeStatus,

    /// Decode and weld counters.
    pub summary: DecodeSummary,

    /// Records whose corners welded onto fewer than three distinct vertices.
    ///
    /// These records have no face in `mesh`, so `mesh.faces.len()` plus this
    /// length equals `summary.records_decoded`. Two distinct `f64` vertices
    /// that round to the same `f32` end up here after an encode/decode trip.
    pub collapsed_records: Vec<u32>,
}

impl StlDecode {
    /// Whether every declared record was decoded.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.status.is_complete()
    }

    /// Whether every decoded record produced a face.
    #[must_use]
    pub fn all_records_kept(&self) -> bool {
        self.collapsed_records.is_empty()
    }

    /// Take the mesh, failing if the buffer was truncated.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Truncated`] if the decode did not see every
    /// declared record.
    pub fn into_complete(self) -> IoResult<IndexedMesh> {
        match self.status {
            DecodeStatus::Complete => Ok(self.mesh),
            DecodeStatus::Truncated { declared, decoded } => {
                Err(IoError::Truncated { declared, decoded })
            }
        }
    }
}

/// Decode a binary STL buffer with bit-exact welding.
///
/// Never fails and never reads past the end of `bytes`: a short buffer
/// produces whatever faces were complete plus a [`DecodeStatus::Truncated`]
/// status.
///
/// # Example
///
/// ```
/// use mesh_io::{decode_stl, DecodeStatus};
///
/// let mut bytes = vec![0u8; 80];
/// bytes.extend_from_slice(&10u32.to_le_bytes());
/// let decoded = decode_stl(&bytes);
///
/// assert_eq!(decoded.mesh.faces.len(), 0);
/// assert_eq!(
///     decoded.status,
///     DecodeStatus::Truncated { declared: Some(10), decoded: 0 }
/// );
/// ```
#[must_use]
pub fn decode_stl(bytes: &[u8]) -> StlDecode {
    decode_with_key(bytes, ExactKey, StlReadParams::default().reserve_limit)
}

/// Decode a binary STL buffer with the given parameters.
///
/// # Errors
///
/// Returns [`IoError::InvalidParams`] if grid welding is requested with a
/// cell size that is not finite and positive. Truncation is not an error
/// here; it is reported through [`StlDecode::status`].
pub fn decode_stl_with(bytes: &[u8], params: &StlReadParams) -> IoResult<StlDecode> {
    match params.weld {
        WeldMode::Exact => Ok(decode_with_key(bytes, ExactKey, params.reserve_limit)),
        WeldMode::Grid { cell_size } => {
            let key = GridKey::new(cell_size).ok_or_else(|| IoError::InvalidParams {
                message: format!("grid cell size must be finite and positive, got {cell_size}"),
            })?;
            Ok(decode_with_key(bytes, key, params.reserve_limit))
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
// Truncation: records read never exceed the u32 face count they were bounded by
fn decode_with_key<K: WeldKey>(bytes: &[u8], key: K, reserve_limit: usize) -> StlDecode {
    let Some((prefix, body)) = bytes.split_at_checked(PREFIX_SIZE) else {
        warn!(len = bytes.len(), "STL buffer ends inside the header");
        return StlDecode {
            mesh: IndexedMesh::new(),
            status: DecodeStatus::Truncated {
                declared: None,
                decoded: 0,
            },
            summary: DecodeSummary {
                unread_bytes: bytes.len(),
                ..DecodeSummary::default()
            },
            collapsed_records: Vec::new(),
        };
    };

    let declared = u32::from_le_bytes([
        prefix[HEADER_SIZE],
        prefix[HEADER_SIZE + 1],
        prefix[HEADER_SIZE + 2],
        prefix[HEADER_SIZE + 3],
    ]);

    let records = body.chunks_exact(RECORD_SIZE);
    let to_read = records.len().min(declared as usize);

    let mut welder = VertexWelder::with_capacity(key, to_read.min(reserve_limit));
    let mut collapsed_records = Vec::new();
    for (index, record) in records.take(to_read).enumerate() {
        if welder.push_triangle(read_corners(record)).is_none() {
            collapsed_records.push(index as u32);
        }
    }
    let weld = welder.finish();
    if let Some(&first) = collapsed_records.first() {
        warn!(
            collapsed = collapsed_records.len(),
            first,
            "STL records welded onto repeated vertices, faces dropped"
        );
    }

    let decoded = to_read as u32;
    let unread_bytes = body.len() - to_read * RECORD_SIZE;
    let status = if decoded < declared {
        warn!(declared, decoded, "STL data truncated");
        DecodeStatus::Truncated {
            declared: Some(declared),
            decoded,
        }
    } else {
        if unread_bytes > 0 {
            debug!(unread_bytes, "Ignoring bytes after the last STL record");
        }
        DecodeStatus::Complete
    };

    let summary = DecodeSummary {
        declared_faces: Some(declared),
        records_decoded: decoded,
        unread_bytes,
        weld: weld.summary,
    };
    debug!(%summary, "Decoded STL");

    StlDecode {
        mesh: weld.mesh,
        status,
        summary,
        collapsed_records,
    }
}

/// Read the three vertex positions of a record, skipping the stored normal.
fn read_corners(record: &[u8]) -> [[f32; 3]; 3] {
    let mut corners = [[0.0f32; 3]; 3];
    let coords = record[NORMAL_SIZE..NORMAL_SIZE + POSITIONS_SIZE]
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]));
    for (slot, value) in corners.iter_mut().flatten().zip(coords) {
        *slot = value;
    }
    corners
}

/// Size in bytes of a binary STL with `faces` triangles.
#[must_use]
pub const fn encoded_len(faces: usize) -> usize {
    PREFIX_SIZE + faces * RECORD_SIZE
}

/// Normal followed by the three corners, all as stored.
type Record = [[f32; 3]; 4];

/// Resolve and check one face for writing.
#[allow(clippy::cast_possible_truncation)]
// Truncation: f64 to f32 is the binary STL storage precision
fn prepare_record(mesh: &IndexedMesh, face: usize, indices: [u32; 3]) -> IoResult<Record> {
    let vertex_count = mesh.vertices.len();
    let resolve = |index: u32| {
        mesh.vertices
            .get(index as usize)
            .copied()
            .ok_or(IoError::FaceIndexOutOfRange {
                face,
                index,
                vertex_count,
            })
    };
    let [a, b, c] = indices;
    let tri = Triangle::new(resolve(a)?, resolve(b)?, resolve(c)?);

    let corners = tri.vertices().map(|p| [p.x as f32, p.y as f32, p.z as f32]);
    if corners.iter().flatten().any(|c| !c.is_finite()) {
        return Err(IoError::invalid_geometry(
            face,
            "vertex coordinate is not a finite f32",
        ));
    }

    if tri.normal_unnormalized().iter().any(|c| !c.is_finite()) {
        return Err(IoError::invalid_geometry(face, "normal is not finite"));
    }
    let n = tri.unit_normal_or_zero();
    let normal = [n.x as f32, n.y as f32, n.z as f32];

    Ok([normal, corners[0], corners[1], corners[2]])
}

/// Encode a mesh as binary STL.
///
/// Face normals are recomputed from the vertex positions; a zero-area face
/// is written with a zero normal. Nothing is produced unless every face can
/// be written.
///
/// # Errors
///
/// - [`IoError::InvalidGeometry`] if a vertex (after conversion to `f32`)
///   or a recomputed normal is not finite
/// - [`IoError::FaceIndexOutOfRange`] if a face references a missing vertex
/// - [`IoError::TooManyFaces`] if the face count does not fit in 32 bits
///
/// # Example
///
/// ```
/// use mesh_io::{decode_stl, encode_stl};
/// use mesh_types::unit_cube;
///
/// let bytes = encode_stl(&unit_cube()).unwrap();
/// assert_eq!(bytes.len(), 84 + 12 * 50);
///
/// let decoded = decode_stl(&bytes);
/// assert!(decoded.is_complete());
/// assert_eq!(decoded.mesh.vertices.len(), 8);
/// ```
pub fn encode_stl(mesh: &IndexedMesh) -> IoResult<Vec<u8>> {
    let face_count = u32::try_from(mesh.faces.len()).map_err(|_| IoError::TooManyFaces {
        count: mesh.faces.len(),
    })?;

    let records = mesh
        .faces
        .iter()
        .enumerate()
        .map(|(face, &indices)| prepare_record(mesh, face, indices))
        .collect::<IoResult<Vec<Record>>>()?;

    let mut bytes = Vec::with_capacity(encoded_len(records.len()));
    bytes.extend_from_slice(&[0u8; HEADER_SIZE]);
    bytes.extend_from_slice(&face_count.to_le_bytes());
    for record in &records {
        for value in record.iter().flatten() {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes.extend_from_slice(&0u16.to_le_bytes());
    }

    debug!(faces = face_count, bytes = bytes.len(), "Encoded STL");
    Ok(bytes)
}

/// Encode a mesh as binary STL into a writer.
///
/// The mesh is fully validated before the first byte is written.
///
/// # Errors
///
/// Same as [`encode_stl`], plus [`IoError::Io`] if the writer fails.
pub fn write_stl<W: Write>(mesh: &IndexedMesh, mut writer: W) -> IoResult<()> {
    let bytes = encode_stl(mesh)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Whether a resource name carries the `.stl` extension (any case).
#[must_use]
pub fn is_stl_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("stl"))
}

fn require_stl_name(name: &str) -> IoResult<()> {
    if is_stl_name(name) {
        return Ok(());
    }
    Err(IoError::UnknownFormat {
        extension: Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Read a named binary STL from a store and decode it.
///
/// A truncated file is returned with [`DecodeStatus::Truncated`] rather
/// than as an error.
///
/// # Errors
///
/// - [`IoError::UnknownFormat`] if `name` does not end in `.stl`
/// - [`IoError::ResourceUnavailable`] if the store cannot supply the bytes
/// - [`IoError::InvalidParams`] if `params` are unusable
///
/// # Example
///
/// ```
/// use mesh_io::{encode_stl, load_stl, MemoryStore, StlReadParams};
/// use mesh_types::unit_cube;
///
/// let mut store = MemoryStore::new();
/// store.insert("cube.stl", encode_stl(&unit_cube()).unwrap());
///
/// let decoded = load_stl(&store, "cube.stl", &StlReadParams::default()).unwrap();
/// assert_eq!(decoded.mesh.faces.len(), 12);
/// ```
pub fn load_stl<S: ByteStore + ?Sized>(
    store: &S,
    name: &str,
    params: &StlReadParams,
) -> IoResult<StlDecode> {
    require_stl_name(name)?;
    let bytes = store
        .read(name)
        .ok_or_else(|| IoError::ResourceUnavailable {
            name: name.to_string(),
        })?;

    let decoded = decode_stl_with(&bytes, params)?;
    info!(
        name,
        vertices = decoded.mesh.vertices.len(),
        faces = decoded.mesh.faces.len(),
        complete = decoded.is_complete(),
        collapsed = decoded.collapsed_records.len(),
        "Loaded STL"
    );
    Ok(decoded)
}

/// Encode a mesh and write it to a store under `name`.
///
/// # Errors
///
/// - [`IoError::UnknownFormat`] if `name` does not end in `.stl`
/// - any error from [`encode_stl`]; nothing is written in that case
/// - [`IoError::WriteFailure`] if the store rejects the write
pub fn save_stl<S: ByteStore + ?Sized>(
    store: &mut S,
    name: &str,
    mesh: &IndexedMesh,
) -> IoResult<()> {
    require_stl_name(name)?;
    let bytes = encode_stl(mesh)?;
    if !store.write(name, &bytes) {
        return Err(IoError::WriteFailure {
            name: name.to_string(),
        });
    }
    info!(name, faces = mesh.faces.len(), bytes = bytes.len(), "Saved STL");
    Ok(())
}
