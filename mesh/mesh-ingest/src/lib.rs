//! Binary STL ingestion: from bytes to a renderable surface.
//!
//! This umbrella crate re-exports the pipeline crates and adds the
//! caller-side pieces that tie them together:
//!
//! - [`types`] - `IndexedMesh`, `Triangle`, `BoundingBox`
//! - [`topology`] - Vertex welding, connectivity, normals
//! - [`io`] - Binary STL decode/encode over a `ByteStore`
//! - [`SurfaceAsset`] / [`load_surface`] - Named, coloured surfaces
//! - [`RenderBuffers`] - Interleaved vertex data and indices for a renderer
//!
//! # Quick Start
//!
//! ```
//! use mesh_ingest::prelude::*;
//!
//! let mut store = MemoryStore::new();
//! save_stl(&mut store, "cube.stl", &mesh_ingest::types::unit_cube()).unwrap();
//!
//! let mut colors = ColorCycle::new();
//! let surface = load_surface(&store, "cube.stl", &StlReadParams::default(), &mut colors).unwrap();
//! let buffers = RenderBuffers::from_surface(&surface, &NormalParams::default()).unwrap();
//!
//! assert_eq!(buffers.face_count, 12);
//! assert!(scene_bounds([&surface]).is_valid());
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod asset;
mod color;
mod error;
mod render;

// =============================================================================
// Re-exports
// =============================================================================

/// Core data structures: `IndexedMesh`, `Triangle`, `BoundingBox`.
pub use mesh_types as types;

/// Vertex welding, connectivity and normal estimation.
pub use mesh_topology as topology;

/// Binary STL decoding and encoding.
pub use mesh_io as io;

pub use asset::{display_name, load_surface, save_surface, scene_bounds, SurfaceAsset};
pub use color::{Color, ColorCycle};
pub use error::{IngestError, IngestResult};
pub use render::{PreparedSurface, RenderBuffers, FLOATS_PER_VERTEX};

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for the ingestion pipeline.
///
/// ```
/// use mesh_ingest::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use mesh_types::{BoundingBox, IndexedMesh, MeshBounds, MeshTopology, Point3, Triangle};

    // Topology
    pub use mesh_topology::{estimate_normals, weld, Connectivity, NormalParams, WeldMode};

    // I/O
    pub use mesh_io::{
        decode_stl, encode_stl, load_stl, save_stl, ByteStore, DecodeStatus, FileStore,
        MemoryStore, StlReadParams,
    };

    // Surfaces
    pub use crate::{
        load_surface, scene_bounds, ColorCycle, IngestError, RenderBuffers, SurfaceAsset,
    };
}
