//! Vertex welding, connectivity and normal estimation for triangle soups.
//!
//! This crate turns an unindexed triangle stream into an [`IndexedMesh`] and
//! derives the per-vertex data a renderer needs:
//!
//! - [`VertexWelder`] - Deduplicate positions into indexed vertices
//! - [`Connectivity`] - Vertex-to-face adjacency, stored as a dense arena
//! - [`estimate_normals`] - Face normals and averaged vertex normals
//!
//! Undefined normals (degenerate faces, orphan vertices) come back as the
//! zero vector and are listed in a [`DegeneracyReport`]; they are never NaN.
//!
//! # Example
//!
//! ```
//! use mesh_topology::{estimate_normals, weld, Connectivity, NormalParams};
//!
//! let soup = [
//!     [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0],
//!     [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0],
//! ];
//! let welded = weld(&soup);
//! let connectivity = Connectivity::build(&welded.mesh);
//! let normals = estimate_normals(&welded.mesh, &connectivity, &NormalParams::default());
//!
//! assert_eq!(welded.mesh.vertices.len(), 4);
//! assert_eq!(connectivity.valence(1), 2);
//! assert_eq!(normals.vertex_normals.len(), 4);
//! ```
//!
//! [`IndexedMesh`]: mesh_types::IndexedMesh

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod connectivity;
mod normals;
mod params;
mod result;
mod weld;

pub use connectivity::Connectivity;
pub use normals::{estimate_normals, face_normals};
pub use params::{NormalParams, NormalWeighting, WeldMode};
pub use result::{DegeneracyReport, NormalEstimate, WeldOutput, WeldSummary};
pub use weld::{
    triangle_soup, weld, weld_with, ExactKey, GridCell, GridKey, VertexWelder, WeldKey,
};
