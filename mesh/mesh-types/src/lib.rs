//! Core mesh types for the SDF generation pipeline.
//!
//! This crate provides the foundational types shared by every stage of the
//! pipeline:
//!
//! - [`Mesh`] - An indexed triangle mesh with `f32` positions
//! - [`Triangle`] - A concrete triangle with vertex positions
//! - [`Aabb`] - Axis-aligned bounding box
//!
//! # Units and precision
//!
//! The library is unit-agnostic. All coordinates are `f32`, matching the
//! precision of the distance fields built on top of them; predicates that
//! need extra headroom (see `mesh-sdf`) widen to `f64` internally.
//!
//! # Coordinate system
//!
//! Right-handed, with counter-clockwise face winding when viewed from
//! outside. Normals point outward by the right-hand rule. The SDF core does
//! not require consistent winding, but diagnostics such as
//! [`Mesh::signed_volume`] assume it.
//!
//! # Example
//!
//! ```
//! use mesh_types::Mesh;
//! use nalgebra::Point3;
//!
//! let mut mesh = Mesh::new();
//! mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
//! mesh.vertices.push(Point3::new(1.0, 0.0, 0.0));
//! mesh.vertices.push(Point3::new(0.5, 1.0, 0.0));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert!(!mesh.is_empty());
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod bounds;
mod mesh;
mod triangle;

pub use bounds::Aabb;
pub use mesh::{unit_cube, Mesh};
pub use triangle::Triangle;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
