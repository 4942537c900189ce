//! Intersection-parity pass.
//!
//! Classifies voxels as inside or outside by counting oriented surface
//! crossings along axis-aligned rays through every (i, j) column. A
//! crossing below a voxel center contributes the projected triangle's
//! orientation sign; after accumulation, odd parity means inside. The
//! test holds for any closed manifold surface and is unaffected by the
//! winding inversions hole filling can introduce.
//!
//! The `inside` buffer uses a column-contiguous layout, index
//! `(j * nx + i) * nz + k`, so each worker owns a disjoint contiguous
//! j-row and no synchronization is needed. Crossings are recorded as a
//! delta at the first voxel center above the crossing and prefix-summed
//! per column, which equals incrementing every voxel above it.

use mesh_types::Triangle;
use rayon::prelude::*;

use crate::grid::GridSpec;
use crate::query::point_in_triangle_2d;

/// Triangle vertices in grid-index space, split per axis.
struct ProjectedTri {
    x: [f64; 3],
    y: [f64; 3],
    z: [f64; 3],
}

/// Run the parity pass, filling `inside` (column-contiguous layout).
pub(crate) fn compute_intersection_parity(
    triangles: &[Triangle],
    spec: &GridSpec,
    inside: &mut [i32],
) {
    debug_assert_eq!(inside.len(), spec.cell_count());

    let projected: Vec<ProjectedTri> = triangles.iter().map(|tri| project(tri, spec)).collect();

    // Bin triangles by the j-rows their footprint can touch
    let mut rows: Vec<Vec<u32>> = vec![Vec::new(); spec.ny];
    for (t, p) in projected.iter().enumerate() {
        let Some((j0, j1)) = center_range(&p.y, spec.ny) else {
            continue;
        };
        for row in &mut rows[j0..=j1] {
            row.push(t as u32);
        }
    }

    let (nx, nz) = (spec.nx, spec.nz);

    inside
        .par_chunks_mut(nx * nz)
        .enumerate()
        .for_each(|(j, row)| {
            for &t in &rows[j] {
                let p = &projected[t as usize];
                let Some((i0, i1)) = center_range(&p.x, nx) else {
                    continue;
                };

                for i in i0..=i1 {
                    let Some((sign, a, b, c)) = point_in_triangle_2d(
                        i as f64, j as f64, p.x[0], p.y[0], p.x[1], p.y[1], p.x[2], p.y[2],
                    ) else {
                        continue;
                    };

                    // Ray-plane crossing in index-space z
                    let fz = a * p.z[0] + b * p.z[1] + c * p.z[2];

                    // First voxel center strictly above the crossing
                    let k_start = (fz.floor() as i64 + 1).max(0);
                    if (k_start as usize) < nz {
                        row[i * nz + k_start as usize] += sign;
                    }
                }
            }

            // Turn per-crossing deltas into cumulative counts
            for i in 0..nx {
                let mut total = 0;
                for v in &mut row[i * nz..(i + 1) * nz] {
                    total += *v;
                    *v = total;
                }
            }
        });
}

/// Transform a triangle into grid-index space, where integer coordinates
/// land on voxel centers.
fn project(tri: &Triangle, spec: &GridSpec) -> ProjectedTri {
    let to_index = |w: f32, o: f32| f64::from((w - o) / spec.dx) - 0.5;
    ProjectedTri {
        x: [
            to_index(tri.a.x, spec.origin.x),
            to_index(tri.b.x, spec.origin.x),
            to_index(tri.c.x, spec.origin.x),
        ],
        y: [
            to_index(tri.a.y, spec.origin.y),
            to_index(tri.b.y, spec.origin.y),
            to_index(tri.c.y, spec.origin.y),
        ],
        z: [
            to_index(tri.a.z, spec.origin.z),
            to_index(tri.b.z, spec.origin.z),
            to_index(tri.c.z, spec.origin.z),
        ],
    }
}

/// Integer coordinates in [0, n) covered by the coordinate span, or
/// `None` when the span misses every voxel center.
fn center_range(coords: &[f64; 3], n: usize) -> Option<(usize, usize)> {
    let min = coords[0].min(coords[1]).min(coords[2]);
    let max = coords[0].max(coords[1]).max(coords[2]);

    let lo = (min.ceil() as i64).max(0);
    let hi = (max.floor() as i64).min(n as i64 - 1);
    if lo > hi {
        return None;
    }
    Some((lo as usize, hi as usize))
}
