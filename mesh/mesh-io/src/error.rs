//! Error types for STL I/O operations.

use thiserror::Error;

/// Result type for STL I/O operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur while loading, decoding, encoding or saving STL data.
#[derive(Debug, Error)]
pub enum IoError {
    /// The byte store could not supply the named resource.
    #[error("resource unavailable: {name}")]
    ResourceUnavailable {
        /// Name the store was asked for.
        name: String,
    },

    /// The byte store rejected a write.
    #[error("write rejected for: {name}")]
    WriteFailure {
        /// Name the store was asked to write.
        name: String,
    },

    /// Unknown file format (unrecognized extension).
    #[error("unknown file format: .{extension}")]
    UnknownFormat {
        /// The unrecognized extension.
        extension: String,
    },

    /// The buffer ended before the declared number of faces.
    #[error("truncated STL: decoded {decoded} of {} faces", declared_label(.declared))]
    Truncated {
        /// Face count from the header, or `None` if the header itself was cut off.
        declared: Option<u32>,
        /// Complete face records decoded before the data ran out.
        decoded: u32,
    },

    /// A face cannot be written because its geometry is not representable.
    #[error("invalid geometry in face {face}: {reason}")]
    InvalidGeometry {
        /// Index of the offending face.
        face: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {index} but the mesh has {vertex_count} vertices")]
    FaceIndexOutOfRange {
        /// Index of the offending face.
        face: usize,
        /// The out-of-range vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// The mesh has more faces than the 32-bit face count can express.
    #[error("too many faces for binary STL: {count}")]
    TooManyFaces {
        /// Number of faces in the mesh.
        count: usize,
    },

    /// Read parameters are unusable.
    #[error("invalid read parameters: {message}")]
    InvalidParams {
        /// Description of what was invalid.
        message: String,
    },

    /// I/O error from a writer passed to a streaming encoder.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn declared_label(declared: &Option<u32>) -> String {
    declared.map_or_else(|| "?".to_string(), |d| d.to_string())
}

impl IoError {
    /// Create an `InvalidGeometry` error for the given face.
    #[must_use]
    pub fn invalid_geometry(face: usize, reason: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            face,
            reason: reason.into(),
        }
    }

    /// Whether this error came from the byte store rather than the data.
    #[must_use]
    pub const fn is_store_error(&self) -> bool {
        matches!(
            self,
            Self::ResourceUnavailable { .. } | Self::WriteFailure { .. }
        )
    }
}
