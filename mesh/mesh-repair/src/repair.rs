//! Combined repair driver.

use mesh_types::Mesh;
use tracing::{info, warn};

use crate::analyze::analyze;
use crate::error::RepairResult;
use crate::holes::fill_holes;
use crate::weld::weld_vertices;

/// Summary of a repair run.
#[derive(Debug, Clone, Default)]
pub struct RepairReport {
    /// Vertices merged by welding.
    pub vertices_welded: usize,
    /// Boundary loops triangulated.
    pub holes_filled: usize,
    /// Faces added by hole filling.
    pub faces_added: usize,
    /// Whether the mesh analyzed as watertight after repair.
    pub watertight_after: bool,
}

impl std::fmt::Display for RepairReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Repair: {} vertices welded, {} holes filled ({} faces added), watertight: {}",
            self.vertices_welded,
            self.holes_filled,
            self.faces_added,
            if self.watertight_after { "yes" } else { "NO" }
        )
    }
}

/// Weld vertices (when `weld_tolerance > 0`) and fill all holes.
///
/// A watertight input is left untouched apart from the optional weld.
/// Non-manifold meshes are repaired best-effort with a warning; the sign
/// stage downstream may still classify some voxels incorrectly in that
/// case.
///
/// # Errors
///
/// Propagates [`crate::RepairError`] from hole filling.
pub fn repair(mesh: &mut Mesh, weld_tolerance: f32) -> RepairResult<RepairReport> {
    let vertices_welded = weld_vertices(mesh, weld_tolerance);

    let analysis = analyze(mesh);
    if analysis.is_watertight {
        return Ok(RepairReport {
            vertices_welded,
            holes_filled: 0,
            faces_added: 0,
            watertight_after: true,
        });
    }

    if analysis.non_manifold_edge_count > 0 {
        warn!(
            non_manifold_edges = analysis.non_manifold_edge_count,
            "mesh has non-manifold edges, repair may not produce a watertight result"
        );
    }

    let faces_before = mesh.face_count();
    let holes_filled = fill_holes(mesh)?;
    let faces_added = mesh.face_count() - faces_before;

    let after = analyze(mesh);
    if after.is_watertight {
        info!(holes_filled, faces_added, "mesh is now watertight");
    } else {
        warn!(
            remaining_holes = after.hole_count(),
            "mesh still has holes after repair"
        );
    }

    Ok(RepairReport {
        vertices_welded,
        holes_filled,
        faces_added,
        watertight_after: after.is_watertight,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::unit_cube;

    #[test]
    fn repair_open_cube() {
        let mut mesh = unit_cube();
        mesh.faces.pop();
        mesh.faces.pop();

        let report = repair(&mut mesh, 0.0).unwrap();

        assert_eq!(report.holes_filled, 1);
        assert_eq!(report.faces_added, 2);
        assert!(report.watertight_after);
        assert_eq!(mesh.face_count(), 12);
    }

    #[test]
    fn repair_watertight_is_noop() {
        let mut mesh = unit_cube();
        let faces_before = mesh.faces.clone();

        let report = repair(&mut mesh, 0.0).unwrap();

        assert_eq!(report.holes_filled, 0);
        assert_eq!(report.faces_added, 0);
        assert!(report.watertight_after);
        assert_eq!(mesh.faces, faces_before);
    }

    #[test]
    fn repair_welds_when_requested() {
        // Open cube expressed with duplicated vertices
        let indexed = {
            let mut m = unit_cube();
            m.faces.pop();
            m.faces.pop();
            m
        };
        let mut mesh = Mesh::new();
        for &[i0, i1, i2] in &indexed.faces {
            let base = mesh.vertices.len() as u32;
            mesh.vertices.push(indexed.vertices[i0 as usize]);
            mesh.vertices.push(indexed.vertices[i1 as usize]);
            mesh.vertices.push(indexed.vertices[i2 as usize]);
            mesh.faces.push([base, base + 1, base + 2]);
        }

        let report = repair(&mut mesh, 1e-5).unwrap();

        assert!(report.vertices_welded > 0);
        assert_eq!(report.holes_filled, 1);
        assert!(report.watertight_after);
    }
}
