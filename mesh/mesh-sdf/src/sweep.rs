//! Fast sweep propagation.
//!
//! After the narrow-band pass, distances are exact only near the surface;
//! everywhere else the grid holds the sentinel. Six directional sweeps
//! (+i, -i, +j, -j, +k, -k) extend them: each sweep rasters the grid with
//! its travel axis running in the sweep direction, and every voxel
//! adopts the best distance offered by a face neighbor's closest
//! triangle. Neighbors ahead of the sweep front still hold sentinel or
//! older values; taking the minimum keeps that harmless.
//!
//! The schedule is fixed (two passes of the six sweeps), not
//! convergence-based, and runs single-threaded because each voxel
//! depends on earlier voxels of the same sweep.

use mesh_types::Triangle;

use crate::grid::GridSpec;
use crate::query::point_triangle_distance;

const DIRECTIONS: [(i32, i32, i32); 6] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
];

const NEIGHBOR_OFFSETS: [(i32, i32, i32); 6] = [
    (-1, 0, 0),
    (1, 0, 0),
    (0, -1, 0),
    (0, 1, 0),
    (0, 0, -1),
    (0, 0, 1),
];

/// Number of full six-sweep passes.
const PASSES: usize = 2;

/// Propagate narrow-band distances across the whole grid.
pub(crate) fn sweep_distances(
    triangles: &[Triangle],
    spec: &GridSpec,
    phi: &mut [f32],
    closest: &mut [i32],
) {
    for _ in 0..PASSES {
        for dir in DIRECTIONS {
            sweep_once(triangles, spec, phi, closest, dir);
        }
    }
}

/// One directional sweep over the grid.
fn sweep_once(
    triangles: &[Triangle],
    spec: &GridSpec,
    phi: &mut [f32],
    closest: &mut [i32],
    (di, dj, dk): (i32, i32, i32),
) {
    let order = |n: usize, d: i32| -> Vec<usize> {
        if d < 0 {
            (0..n).rev().collect()
        } else {
            (0..n).collect()
        }
    };

    let is = order(spec.nx, di);
    let js = order(spec.ny, dj);
    let ks = order(spec.nz, dk);

    for &k in &ks {
        for &j in &js {
            for &i in &is {
                let idx = (k * spec.ny + j) * spec.nx + i;
                let center = spec.cell_center(i, j, k);

                for (oi, oj, ok) in NEIGHBOR_OFFSETS {
                    let ni = i as i32 + oi;
                    let nj = j as i32 + oj;
                    let nk = k as i32 + ok;
                    if ni < 0
                        || nj < 0
                        || nk < 0
                        || ni >= spec.nx as i32
                        || nj >= spec.ny as i32
                        || nk >= spec.nz as i32
                    {
                        continue;
                    }

                    let nidx = (nk as usize * spec.ny + nj as usize) * spec.nx + ni as usize;
                    let ct = closest[nidx];
                    if ct < 0 {
                        continue;
                    }

                    let tri = &triangles[ct as usize];
                    let d = point_triangle_distance(&center, &tri.a, &tri.b, &tri.c);
                    if d < phi[idx] {
                        phi[idx] = d;
                        closest[idx] = ct;
                    }
                }
            }
        }
    }
}
