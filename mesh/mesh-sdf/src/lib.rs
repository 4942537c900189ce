//! Signed distance field generation on a regular voxel grid.
//!
//! Converts a triangle mesh into a dense 3D grid where every cell stores
//! the signed Euclidean distance from its center to the closest point on
//! the mesh: negative inside, positive outside.
//!
//! The pipeline behind [`make_level_set`] runs four stages:
//!
//! 1. **Narrow band** - for every triangle, exact point-to-triangle
//!    distances are written into the voxels within a configurable band of
//!    its bounding box (parallel over triangle batches).
//! 2. **Intersection parity** - axis-aligned rays through every grid
//!    column count oriented surface crossings to classify voxels as
//!    inside or outside (parallel over grid rows).
//! 3. **Sweep propagation** - six directional sweeps extend the exact
//!    narrow-band distances across the whole grid.
//! 4. **Sign application** - odd-parity voxels are negated.
//!
//! The parity test is correct for any closed manifold surface and
//! tolerates the inside-out faces that hole filling can introduce, which
//! is why imperfect inputs should run through `mesh-repair` first.
//!
//! # Example
//!
//! ```
//! use mesh_sdf::{make_level_set, GridSpec, LevelSetParams};
//! use mesh_types::unit_cube;
//!
//! let mesh = unit_cube();
//! let spec = GridSpec::from_cell_size(&mesh.bounds(), 0.1, 2).unwrap();
//! let phi = make_level_set(&mesh, &spec, &LevelSetParams::default()).unwrap();
//!
//! // The cell at the cube's center is well inside
//! let (ci, cj, ck) = (spec.nx / 2, spec.ny / 2, spec.nz / 2);
//! assert!(phi.get(ci, cj, ck) < 0.0);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod backend;
mod error;
mod grid;
mod level_set;
mod narrow_band;
mod parity;
pub mod query;
mod sweep;

pub use backend::{is_gpu_available, Backend};
pub use error::{SdfError, SdfResult};
pub use grid::{Grid3, GridSpec};
pub use level_set::{make_level_set, LevelSetParams};
