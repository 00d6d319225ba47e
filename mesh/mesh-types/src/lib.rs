//! Core mesh types for the STL ingestion pipeline.
//!
//! This crate provides the foundational value types shared by every stage:
//!
//! - [`IndexedMesh`] - Welded vertices plus triangles that index into them
//! - [`Triangle`] - A concrete triangle with resolved vertex positions
//! - [`BoundingBox`] - Axis-aligned extent with an explicit "invalid" state
//! - [`FaceDefect`] - Why a face breaks the triangle invariant
//!
//! # Units
//!
//! This library is **unit-agnostic**. All coordinates are `f64`; binary STL
//! stores `f32`, which is promoted on read and downcast on write.
//!
//! # Coordinate System
//!
//! Uses a **right-handed coordinate system**. Face winding is
//! **counter-clockwise (CCW) when viewed from outside**, so face normals
//! follow the right-hand rule.
//!
//! # Example
//!
//! ```
//! use mesh_types::{IndexedMesh, MeshBounds, MeshTopology, Point3};
//!
//! let mut mesh = IndexedMesh::new();
//! mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
//! mesh.vertices.push(Point3::new(1.0, 0.0, 0.0));
//! mesh.vertices.push(Point3::new(0.0, 1.0, 0.0));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert!(mesh.validate().is_ok());
//! assert!(mesh.bounds().is_valid());
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod bounds;
mod mesh;
mod traits;
mod triangle;

pub use bounds::BoundingBox;
pub use mesh::{unit_cube, FaceDefect, IndexedMesh};
pub use traits::{MeshBounds, MeshTopology};
pub use triangle::Triangle;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
