//! End-to-end tests for the level-set pipeline.
//!
//! Fixtures are meshes with known analytic distance fields (a unit cube
//! and a tessellated sphere), so every voxel of the output can be checked
//! against geometry rather than golden data. Assertions involving the
//! sign stay away from voxel centers lying exactly on the surface, where
//! ray-crossing ownership is a rounding question.

use mesh_sdf::{make_level_set, GridSpec, LevelSetParams};
use mesh_types::{unit_cube, Mesh, Point3};

/// Signed distance from a point to the surface of the unit cube [0,1]^3.
fn cube_signed_distance(p: &Point3<f32>) -> f32 {
    let q = [
        (p.x - 0.5).abs() - 0.5,
        (p.y - 0.5).abs() - 0.5,
        (p.z - 0.5).abs() - 0.5,
    ];

    let outside: f32 = q
        .iter()
        .map(|&c| c.max(0.0) * c.max(0.0))
        .sum::<f32>()
        .sqrt();
    let inside = q[0].max(q[1]).max(q[2]).min(0.0);
    outside + inside
}

/// Lat-long sphere of radius `r` centered at the origin.
fn uv_sphere(r: f32, stacks: usize, slices: usize) -> Mesh {
    let mut mesh = Mesh::new();

    mesh.vertices.push(Point3::new(0.0, 0.0, r)); // north pole
    for s in 1..stacks {
        let theta = std::f32::consts::PI * s as f32 / stacks as f32;
        for l in 0..slices {
            let lambda = 2.0 * std::f32::consts::PI * l as f32 / slices as f32;
            mesh.vertices.push(Point3::new(
                r * theta.sin() * lambda.cos(),
                r * theta.sin() * lambda.sin(),
                r * theta.cos(),
            ));
        }
    }
    mesh.vertices.push(Point3::new(0.0, 0.0, -r)); // south pole

    let ring = |s: usize, l: usize| -> u32 { (1 + (s - 1) * slices + (l % slices)) as u32 };
    let south = (mesh.vertices.len() - 1) as u32;

    for l in 0..slices {
        mesh.faces.push([0, ring(1, l), ring(1, l + 1)]);
    }
    for s in 1..stacks - 1 {
        for l in 0..slices {
            let (a, b) = (ring(s, l), ring(s, l + 1));
            let (c, d) = (ring(s + 1, l), ring(s + 1, l + 1));
            mesh.faces.push([a, c, d]);
            mesh.faces.push([a, d, b]);
        }
    }
    for l in 0..slices {
        mesh.faces.push([south, ring(stacks - 1, l + 1), ring(stacks - 1, l)]);
    }

    mesh
}

/// The seed scenario: unit cube on a 15^3 grid, dx = 0.1, origin at
/// (-0.25, -0.25, -0.25).
fn cube_field() -> (GridSpec, mesh_sdf::Grid3<f32>) {
    let mesh = unit_cube();
    let spec = GridSpec::new(15, 15, 15, Point3::new(-0.25, -0.25, -0.25), 0.1).unwrap();
    let phi = make_level_set(&mesh, &spec, &LevelSetParams::default()).unwrap();
    (spec, phi)
}

#[test]
fn cube_center_distance() {
    let (spec, phi) = cube_field();

    // Voxel (7,7,7) sits at the cube center (0.5, 0.5, 0.5)
    let center = spec.cell_center(7, 7, 7);
    assert!((center.x - 0.5).abs() < 1e-6);

    let d = phi.get(7, 7, 7);
    assert!((d + 0.5).abs() < 1e-3, "expected ~-0.5, got {d}");
}

#[test]
fn cube_corners_positive() {
    let (spec, phi) = cube_field();
    let last = (spec.nx - 1, spec.ny - 1, spec.nz - 1);

    for (i, j, k) in [
        (0, 0, 0),
        (last.0, 0, 0),
        (0, last.1, 0),
        (0, 0, last.2),
        (last.0, last.1, 0),
        (last.0, 0, last.2),
        (0, last.1, last.2),
        (last.0, last.1, last.2),
    ] {
        assert!(phi.get(i, j, k) > 0.0, "corner ({i},{j},{k}) not positive");
    }
}

#[test]
fn cube_sign_matches_geometry() {
    let (spec, phi) = cube_field();

    // Voxel centers lie on a 0.1 lattice through the cube faces, so some
    // sit exactly on the surface; only assert where there is margin
    let margin = 0.01;
    let mut negative = 0usize;

    for k in 0..spec.nz {
        for j in 0..spec.ny {
            for i in 0..spec.nx {
                let d = phi.get(i, j, k);
                if d < 0.0 {
                    negative += 1;
                }

                let analytic = cube_signed_distance(&spec.cell_center(i, j, k));
                if analytic.abs() > margin {
                    assert_eq!(
                        d < 0.0,
                        analytic < 0.0,
                        "sign mismatch at ({i},{j},{k}): phi={d}, analytic={analytic}"
                    );
                }
            }
        }
    }

    // 9 interior centers per axis, plus up to one boundary layer on each
    // side whose ownership is a rounding question
    assert!(
        (729..=1331).contains(&negative),
        "negative voxel count {negative} outside [729, 1331]"
    );
}

#[test]
fn cube_distances_match_analytic() {
    let (spec, phi) = cube_field();

    for k in 0..spec.nz {
        for j in 0..spec.ny {
            for i in 0..spec.nx {
                let analytic = cube_signed_distance(&spec.cell_center(i, j, k));
                if analytic.abs() <= 0.01 {
                    continue;
                }
                let d = phi.get(i, j, k);
                assert!(
                    (d - analytic).abs() < 1e-3,
                    "({i},{j},{k}): phi={d}, analytic={analytic}"
                );
            }
        }
    }
}

#[test]
fn cube_field_is_finite_and_bounded() {
    let (spec, phi) = cube_field();
    let diagonal = spec.diagonal();

    for &d in phi.values() {
        assert!(d.is_finite());
        assert!(d.abs() <= diagonal, "|{d}| exceeds grid diagonal {diagonal}");
    }
}

#[test]
fn cube_field_satisfies_eikonal_bound() {
    let (spec, phi) = cube_field();
    let bound = spec.dx * (1.0 + 1e-4);

    for k in 0..spec.nz {
        for j in 0..spec.ny {
            for i in 0..spec.nx {
                let d = phi.get(i, j, k);
                if i + 1 < spec.nx {
                    assert!((d - phi.get(i + 1, j, k)).abs() <= bound);
                }
                if j + 1 < spec.ny {
                    assert!((d - phi.get(i, j + 1, k)).abs() <= bound);
                }
                if k + 1 < spec.nz {
                    assert!((d - phi.get(i, j, k + 1)).abs() <= bound);
                }
            }
        }
    }
}

#[test]
fn narrow_band_values_bound_triangle_distance() {
    // For every triangle and voxel in its one-cell band, the final field
    // can only improve on the exact distance to that triangle
    let mesh = unit_cube();
    let spec = GridSpec::new(15, 15, 15, Point3::new(-0.25, -0.25, -0.25), 0.1).unwrap();
    let phi = make_level_set(&mesh, &spec, &LevelSetParams::default()).unwrap();

    let to_index = |w: f32, o: f32| (w - o) / spec.dx - 0.5;
    for tri in mesh.triangles() {
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
        let range = |f: &[f32; 3], n: usize| {
            let lo = (f[0].min(f[1]).min(f[2]).floor() as i64 - 1).clamp(0, n as i64 - 1) as usize;
            let hi = (f[0].max(f[1]).max(f[2]).ceil() as i64 + 1).clamp(0, n as i64 - 1) as usize;
            lo..=hi
        };

        for k in range(&fz, spec.nz) {
            for j in range(&fy, spec.ny) {
                for i in range(&fx, spec.nx) {
                    let center = spec.cell_center(i, j, k);
                    let exact = mesh_sdf::query::point_triangle_distance(
                        &center, &tri.a, &tri.b, &tri.c,
                    );
                    assert!(
                        phi.get(i, j, k).abs() <= exact + 1e-5,
                        "({i},{j},{k}) above band bound"
                    );
                }
            }
        }
    }
}

#[test]
fn field_is_deterministic_across_thread_counts() {
    let mesh = uv_sphere(0.5, 8, 16);
    let spec = GridSpec::from_cell_size(&mesh.bounds(), 0.08, 2).unwrap();

    let single = make_level_set(
        &mesh,
        &spec,
        &LevelSetParams {
            num_threads: 1,
            ..Default::default()
        },
    )
    .unwrap();
    let multi = make_level_set(
        &mesh,
        &spec,
        &LevelSetParams {
            num_threads: 4,
            ..Default::default()
        },
    )
    .unwrap();

    // The batch-ordered reduction makes the result identical, not merely
    // close, whatever the worker count
    for (a, b) in single.values().iter().zip(multi.values()) {
        assert_eq!(a.to_bits(), b.to_bits());
    }
}

#[test]
fn sphere_field_matches_analytic_distance() {
    let radius = 0.5;
    let mesh = uv_sphere(radius, 16, 32);
    let spec = GridSpec::new(28, 28, 28, Point3::new(-0.7, -0.7, -0.7), 0.05).unwrap();

    let phi = make_level_set(&mesh, &spec, &LevelSetParams::default()).unwrap();

    // Chord-vs-arc tessellation error for this resolution
    let tessellation_error = radius * (1.0 - (std::f32::consts::PI / 32.0).cos()) * 2.0;
    let tolerance = tessellation_error + spec.dx * 0.5;

    for k in 0..spec.nz {
        for j in 0..spec.ny {
            for i in 0..spec.nx {
                let center = spec.cell_center(i, j, k);
                let analytic = center.coords.norm() - radius;
                let d = phi.get(i, j, k);

                assert!(
                    (d - analytic).abs() <= tolerance,
                    "({i},{j},{k}): phi={d}, analytic={analytic}"
                );

                if analytic.abs() > tessellation_error + 0.01 {
                    assert_eq!(d < 0.0, analytic < 0.0, "sign mismatch at ({i},{j},{k})");
                }
            }
        }
    }
}

#[test]
fn inverted_winding_keeps_interior_negative() {
    // Parity-based sign ignores face orientation entirely
    let mut mesh = unit_cube();
    for face in &mut mesh.faces {
        face.swap(1, 2);
    }

    let spec = GridSpec::new(15, 15, 15, Point3::new(-0.25, -0.25, -0.25), 0.1).unwrap();
    let phi = make_level_set(&mesh, &spec, &LevelSetParams::default()).unwrap();

    assert!(phi.get(7, 7, 7) < 0.0);
    assert!(phi.get(0, 0, 0) > 0.0);
}
