//! Exact narrow-band distance pass.
//!
//! For every triangle, visits the voxels within `exact_band` cells of its
//! bounding box and writes the exact point-to-triangle distance wherever
//! it improves on the stored value, recording the winning triangle index
//! alongside.
//!
//! Triangle footprints overlap, so workers never share a grid: each gets
//! a contiguous batch of triangles and a private scratch (phi, closest)
//! pair, and the scratches are reduced in batch order afterwards. The
//! result is the per-voxel minimum distance over all triangles, ties
//! broken toward the smallest triangle index, independent of scheduling.

use mesh_types::Triangle;
use rayon::prelude::*;
use tracing::debug;

use crate::grid::GridSpec;
use crate::query::point_triangle_distance;

/// Run the narrow-band pass. Must be called from inside the job's worker
/// pool; batches triangles one per available worker.
pub(crate) fn compute_narrow_band(
    triangles: &[Triangle],
    spec: &GridSpec,
    exact_band: usize,
    phi: &mut [f32],
    closest: &mut [i32],
    sentinel: f32,
) {
    let num_batches = rayon::current_num_threads().max(1).min(triangles.len());
    if num_batches == 0 {
        return;
    }
    let batch_size = triangles.len().div_ceil(num_batches);

    let batches: Vec<(usize, &[Triangle])> = triangles
        .chunks(batch_size)
        .enumerate()
        .map(|(b, chunk)| (b * batch_size, chunk))
        .collect();

    let scratches: Vec<(Vec<f32>, Vec<i32>)> = batches
        .par_iter()
        .map(|&(first_index, chunk)| {
            let mut scratch_phi = vec![sentinel; spec.cell_count()];
            let mut scratch_closest = vec![-1i32; spec.cell_count()];
            scan_triangles(
                chunk,
                first_index,
                spec,
                exact_band,
                &mut scratch_phi,
                &mut scratch_closest,
            );
            (scratch_phi, scratch_closest)
        })
        .collect();

    // Reduce in batch order: batches hold ascending triangle indices, so
    // keeping the incumbent on distance ties preserves smallest-index wins
    for (scratch_phi, scratch_closest) in scratches {
        for idx in 0..phi.len() {
            let d = scratch_phi[idx];
            let t = scratch_closest[idx];
            if t < 0 {
                continue;
            }
            if d < phi[idx] || (d == phi[idx] && t < closest[idx]) {
                phi[idx] = d;
                closest[idx] = t;
            }
        }
    }
}

/// Scan one batch of triangles into a scratch grid.
fn scan_triangles(
    triangles: &[Triangle],
    first_index: usize,
    spec: &GridSpec,
    exact_band: usize,
    phi: &mut [f32],
    closest: &mut [i32],
) {
    let band = exact_band as i64;
    let mut skipped = 0usize;

    for (offset, tri) in triangles.iter().enumerate() {
        if tri.is_degenerate(1e-30) {
            skipped += 1;
            continue;
        }

        let t = (first_index + offset) as i32;

        // Triangle vertices in grid-index space, where integer
        // coordinates land on voxel centers
        let to_index = |w: f32, o: f32| f64::from((w - o) / spec.dx) - 0.5;
        let fx = [
            to_index(tri.a.x, spec.origin.x),
            to_index(tri.b.x, spec.origin.x),
            to_index(tri.c.x, spec.origin.x),
        ];
        let fy = [
            to_index(tri.a.y, spec.origin.y),
            to_index(tri.b.y, spec.origin.y),
            to_index(tri.c.y, spec.origin.y),
        ];
        let fz = [
            to_index(tri.a.z, spec.origin.z),
            to_index(tri.b.z, spec.origin.z),
            to_index(tri.c.z, spec.origin.z),
        ];

        let (i0, i1) = footprint_range(&fx, band, spec.nx);
        let (j0, j1) = footprint_range(&fy, band, spec.ny);
        let (k0, k1) = footprint_range(&fz, band, spec.nz);

        for k in k0..=k1 {
            for j in j0..=j1 {
                for i in i0..=i1 {
                    let center = spec.cell_center(i, j, k);
                    let d = point_triangle_distance(&center, &tri.a, &tri.b, &tri.c);
                    let idx = (k * spec.ny + j) * spec.nx + i;
                    if d < phi[idx] {
                        phi[idx] = d;
                        closest[idx] = t;
                    }
                }
            }
        }
    }

    if skipped > 0 {
        debug!(skipped, "skipped degenerate triangles in distance pass");
    }
}

/// Bounding range of a triangle along one axis, expanded by the band and
/// clamped to the grid.
fn footprint_range(coords: &[f64; 3], band: i64, n: usize) -> (usize, usize) {
    let min = coords[0].min(coords[1]).min(coords[2]);
    let max = coords[0].max(coords[1]).max(coords[2]);

    let lo = (min.floor() as i64 - band).clamp(0, n as i64 - 1) as usize;
    let hi = (max.ceil() as i64 + band).clamp(0, n as i64 - 1) as usize;
    (lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::Point3;

    fn spec_10() -> GridSpec {
        GridSpec::new(10, 10, 10, Point3::new(0.0, 0.0, 0.0), 0.1).unwrap()
    }

    #[test]
    fn footprint_clamps_to_grid() {
        let coords = [-5.0, 2.3, 14.0];
        assert_eq!(footprint_range(&coords, 1, 10), (0, 9));

        let tight = [2.4, 2.6, 3.1];
        assert_eq!(footprint_range(&tight, 1, 10), (1, 5));
    }

    #[test]
    fn single_triangle_band_distances() {
        let spec = spec_10();
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.5),
            Point3::new(1.0, 0.0, 0.5),
            Point3::new(0.0, 1.0, 0.5),
        );
        let triangles = vec![tri];

        let sentinel = 100.0;
        let mut phi = vec![sentinel; spec.cell_count()];
        let mut closest = vec![-1i32; spec.cell_count()];

        compute_narrow_band(&triangles, &spec, 1, &mut phi, &mut closest, sentinel);

        // A voxel whose center projects onto the triangle: distance is
        // purely vertical
        let idx = spec_index(&spec, 2, 2, 4);
        let expected = (0.5 - spec.cell_center(2, 2, 4).z).abs();
        assert!((phi[idx] - expected).abs() < 1e-5);
        assert_eq!(closest[idx], 0);

        // A voxel far outside the band keeps the sentinel
        let far = spec_index(&spec, 9, 9, 9);
        assert_eq!(phi[far], sentinel);
        assert_eq!(closest[far], -1);
    }

    #[test]
    fn closest_tie_breaks_to_smaller_index() {
        let spec = spec_10();
        // Two identical triangles: every voxel must report the first
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.5),
            Point3::new(1.0, 0.0, 0.5),
            Point3::new(0.0, 1.0, 0.5),
        );
        let triangles = vec![tri, tri];

        let sentinel = 100.0;
        let mut phi = vec![sentinel; spec.cell_count()];
        let mut closest = vec![-1i32; spec.cell_count()];

        compute_narrow_band(&triangles, &spec, 1, &mut phi, &mut closest, sentinel);

        for &c in &closest {
            assert!(c == -1 || c == 0);
        }
    }

    #[test]
    fn degenerate_triangles_are_skipped() {
        let spec = spec_10();
        let degenerate = Triangle::new(
            Point3::new(0.0, 0.0, 0.5),
            Point3::new(1.0, 0.0, 0.5),
            Point3::new(2.0, 0.0, 0.5),
        );
        let triangles = vec![degenerate];

        let sentinel = 100.0;
        let mut phi = vec![sentinel; spec.cell_count()];
        let mut closest = vec![-1i32; spec.cell_count()];

        compute_narrow_band(&triangles, &spec, 1, &mut phi, &mut closest, sentinel);

        assert!(phi.iter().all(|&d| d == sentinel));
        assert!(closest.iter().all(|&c| c == -1));
    }

    fn spec_index(spec: &GridSpec, i: usize, j: usize, k: usize) -> usize {
        (k * spec.ny + j) * spec.nx + i
    }
}
