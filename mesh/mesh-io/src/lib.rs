//! Mesh and SDF file I/O.
//!
//! Input formats:
//!
//! - **OBJ** (ASCII): `v x y z` vertex lines in order, `f` lines with
//!   1-indexed vertices and optional `/t`, `//n`, `/t/n` suffixes;
//!   polygons are triangulated as a fan.
//! - **STL**: binary (80-byte header, u32 triangle count, 50-byte
//!   records) and ASCII, auto-detected. STL stores one vertex triple per
//!   triangle; callers should weld the result (tolerance `1e-5`) before
//!   topological analysis or SDF generation.
//!
//! Output format:
//!
//! - **`.sdf`** binary distance fields: a 36-byte header (grid dimensions,
//!   world origin of voxel (0,0,0)'s corner, cell size, 8 reserved zero
//!   bytes) followed by `nx * ny * nz` little-endian `f32` values in
//!   i-fastest order. See [`SdfFile`].

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod obj;
mod sdf;
mod stl;

use std::path::Path;

use mesh_types::Mesh;

pub use error::{IoError, IoResult};
pub use obj::load_obj;
pub use sdf::{read_sdf, write_sdf, SdfFile};
pub use stl::load_stl;

/// Load a mesh, dispatching on the lowercased file extension.
///
/// # Errors
///
/// Returns [`IoError::UnknownFormat`] for extensions other than `obj` and
/// `stl`, or the underlying loader error.
pub fn load_mesh<P: AsRef<Path>>(path: P) -> IoResult<Mesh> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "obj" => load_obj(path),
        "stl" => load_stl(path),
        _ => Err(IoError::UnknownFormat { extension }),
    }
}
