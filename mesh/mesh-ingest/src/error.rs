//! Error types for the ingestion pipeline.

use mesh_io::IoError;
use mesh_types::FaceDefect;
use thiserror::Error;

/// Result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// Errors that can occur while loading, preparing or saving a surface.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Loading or saving the STL data failed.
    #[error(transparent)]
    Io(#[from] IoError),

    /// The mesh breaks the triangle invariant and cannot be rendered.
    #[error("surface {name:?} has an invalid face: {defect}")]
    InvalidMesh {
        /// Name of the surface.
        name: String,
        /// The first defect found.
        #[source]
        defect: FaceDefect,
    },
}

impl IngestError {
    /// Whether the error is a truncated STL file.
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        matches!(self, Self::Io(IoError::Truncated { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_pass_through() {
        let err: IngestError = IoError::ResourceUnavailable {
            name: "part.stl".into(),
        }
        .into();
        assert_eq!(err.to_string(), "resource unavailable: part.stl");
        assert!(!err.is_truncated());
    }

    #[test]
    fn truncation_is_detected() {
        let err: IngestError = IoError::Truncated {
            declared: Some(4),
            decoded: 1,
        }
        .into();
        assert!(err.is_truncated());
    }

    #[test]
    fn invalid_mesh_message() {
        let err = IngestError::InvalidMesh {
            name: "part.stl".into(),
            defect: FaceDefect::RepeatedIndex { face: 2, index: 5 },
        };
        assert_eq!(
            err.to_string(),
            "surface \"part.stl\" has an invalid face: face 2 repeats vertex 5"
        );
    }
}
