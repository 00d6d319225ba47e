//! Binary STL I/O for the ingestion pipeline.
//!
//! This crate decodes binary STL buffers straight into welded
//! [`IndexedMesh`](mesh_types::IndexedMesh) values and encodes meshes back,
//! recomputing every face normal on the way out.
//!
//! - [`decode_stl`] / [`decode_stl_with`] - Bytes to mesh, with truncation reported in the status
//! - [`encode_stl`] / [`write_stl`] - Mesh to bytes, rejecting non-finite geometry
//! - [`load_stl`] / [`save_stl`] - The same, through a named [`ByteStore`]
//!
//! Decoding and encoding work on byte slices. Named resources go through a
//! [`ByteStore`]; [`FileStore`] and [`MemoryStore`] are provided.
//!
//! # Example
//!
//! ```
//! use mesh_io::{load_stl, save_stl, MemoryStore, StlReadParams};
//! use mesh_types::unit_cube;
//!
//! let mut store = MemoryStore::new();
//! save_stl(&mut store, "cube.stl", &unit_cube()).unwrap();
//!
//! let decoded = load_stl(&store, "cube.stl", &StlReadParams::default()).unwrap();
//! assert!(decoded.is_complete());
//! assert_eq!(decoded.mesh.vertices.len(), 8);
//! ```
//!
//! # Truncated Input
//!
//! ```
//! use mesh_io::{decode_stl, IoError};
//!
//! let decoded = decode_stl(&[0u8; 40]);
//! assert!(decoded.status.is_truncated());
//! assert!(matches!(decoded.into_complete(), Err(IoError::Truncated { .. })));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod params;
mod stl;
mod store;

pub use error::{IoError, IoResult};
pub use params::StlReadParams;
pub use stl::{
    decode_stl, decode_stl_with, encode_stl, encoded_len, is_stl_name, load_stl, save_stl,
    write_stl, DecodeStatus, DecodeSummary, StlDecode, HEADER_SIZE, RECORD_SIZE,
};
pub use store::{ByteStore, FileStore, MemoryStore};
