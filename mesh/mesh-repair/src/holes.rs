//! Hole filling by ear clipping.
//!
//! New triangles follow the boundary-loop order; their winding is not
//! checked against the rest of the mesh, so filling can introduce
//! inside-out faces. The parity-based sign computation downstream is
//! unaffected. Holes that fold in space may receive self-intersecting
//! triangles; callers expecting a geometrically clean surface should
//! treat the result as sign-repair only.

use mesh_types::Mesh;
use tracing::{info, warn};

use crate::analyze::{analyze, BoundaryLoop};
use crate::error::{RepairError, RepairResult};

/// Minimum cross-product magnitude for an ear to count as non-degenerate.
const EAR_EPSILON: f32 = 1e-10;

/// Triangulate a boundary loop by ear clipping.
///
/// While more than three vertices remain, the first vertex whose incident
/// edges have a non-degenerate cross product is clipped as an ear. When no
/// such ear exists the triangle (0, 1, 2) is emitted and vertex 1 removed
/// as a fallback. The final three vertices become the last triangle.
///
/// Returns the new faces; empty when the loop has fewer than 3 vertices.
#[must_use]
pub fn fill_hole_ear_clipping(mesh: &Mesh, boundary: &BoundaryLoop) -> Vec<[u32; 3]> {
    if boundary.len() < 3 {
        return Vec::new();
    }

    let mut remaining = boundary.vertices.clone();
    let mut triangles = Vec::with_capacity(remaining.len() - 2);

    while remaining.len() > 3 {
        let mut ear_found = false;

        for i in 0..remaining.len() {
            let prev = remaining[(i + remaining.len() - 1) % remaining.len()];
            let curr = remaining[i];
            let next = remaining[(i + 1) % remaining.len()];

            let v0 = mesh.vertices[prev as usize];
            let v1 = mesh.vertices[curr as usize];
            let v2 = mesh.vertices[next as usize];

            let normal = (v1 - v0).cross(&(v2 - v1));
            if normal.norm() < EAR_EPSILON {
                continue;
            }

            triangles.push([prev, curr, next]);
            remaining.remove(i);
            ear_found = true;
            break;
        }

        if !ear_found {
            warn!(
                remaining = remaining.len(),
                "no non-degenerate ear found, emitting fallback triangle"
            );
            triangles.push([remaining[0], remaining[1], remaining[2]]);
            remaining.remove(1);
        }
    }

    if remaining.len() == 3 {
        triangles.push([remaining[0], remaining[1], remaining[2]]);
    }

    triangles
}

/// Fill all holes in the mesh.
///
/// Runs [`analyze`] and ear-clips every boundary loop. Returns the number
/// of holes filled.
///
/// # Errors
///
/// Returns [`RepairError::HoleFillFailed`] if a loop yields no triangles.
///
/// # Example
///
/// ```
/// use mesh_repair::{analyze, fill_holes};
/// use mesh_types::unit_cube;
///
/// let mut mesh = unit_cube();
/// mesh.faces.pop();
/// mesh.faces.pop();
///
/// let filled = fill_holes(&mut mesh).unwrap();
/// assert_eq!(filled, 1);
/// assert!(analyze(&mesh).is_watertight);
/// ```
pub fn fill_holes(mesh: &mut Mesh) -> RepairResult<usize> {
    let analysis = analyze(mesh);

    if analysis.loops.is_empty() {
        return Ok(0);
    }

    let mut filled = 0;
    for hole in &analysis.loops {
        let triangles = fill_hole_ear_clipping(mesh, hole);
        if triangles.is_empty() {
            return Err(RepairError::HoleFillFailed {
                reason: format!("loop with {} vertices produced no triangles", hole.len()),
            });
        }
        mesh.faces.extend(triangles);
        filled += 1;
    }

    info!(holes = filled, "filled holes");

    Ok(filled)
}
