//! Vertex welding via spatial hashing.

use hashbrown::HashMap;
use mesh_types::Mesh;
use nalgebra::Point3;
use tracing::debug;

/// Merge vertices that lie within `tolerance` of each other.
///
/// Iterates vertices in input order; each vertex is hashed into an integer
/// bucket of side `tolerance` and compared against already-emitted vertices
/// in the 3x3x3 bucket neighborhood. The first occurrence wins, so the
/// output vertex order is a prefix-stable subsequence of the input — STL
/// loaders rely on this to get reproducible indices.
///
/// Face indices are rewritten through the merge map and faces that collapse
/// (two equal indices) are dropped. Returns the number of vertices merged
/// away. A tolerance of zero or less is a no-op.
///
/// # Example
///
/// ```
/// use mesh_repair::weld_vertices;
/// use mesh_types::Mesh;
/// use nalgebra::Point3;
///
/// let mut mesh = Mesh::new();
/// mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
/// mesh.vertices.push(Point3::new(1.0, 0.0, 0.0));
/// mesh.vertices.push(Point3::new(0.0, 1.0, 0.0));
/// mesh.vertices.push(Point3::new(1.0 + 1e-7, 0.0, 0.0)); // duplicate of 1
/// mesh.faces.push([0, 1, 2]);
/// mesh.faces.push([0, 3, 2]);
///
/// let merged = weld_vertices(&mut mesh, 1e-5);
/// assert_eq!(merged, 1);
/// assert_eq!(mesh.vertex_count(), 3);
/// ```
pub fn weld_vertices(mesh: &mut Mesh, tolerance: f32) -> usize {
    if tolerance <= 0.0 || mesh.vertices.is_empty() {
        return 0;
    }

    let inv_tol = 1.0 / tolerance;

    let mut new_vertices: Vec<Point3<f32>> = Vec::with_capacity(mesh.vertices.len());
    let mut vertex_map: Vec<u32> = Vec::with_capacity(mesh.vertices.len());
    let mut buckets: HashMap<(i64, i64, i64), Vec<u32>> = HashMap::new();

    let mut welded = 0;

    for v in &mesh.vertices {
        let (gx, gy, gz) = bucket_of(v, inv_tol);

        let mut found: Option<u32> = None;
        'probe: for dx in -1..=1_i64 {
            for dy in -1..=1_i64 {
                for dz in -1..=1_i64 {
                    let Some(candidates) = buckets.get(&(gx + dx, gy + dy, gz + dz)) else {
                        continue;
                    };
                    for &idx in candidates {
                        if (new_vertices[idx as usize] - v).norm() < tolerance {
                            found = Some(idx);
                            break 'probe;
                        }
                    }
                }
            }
        }

        match found {
            Some(idx) => {
                vertex_map.push(idx);
                welded += 1;
            }
            None => {
                let idx = new_vertices.len() as u32;
                new_vertices.push(*v);
                vertex_map.push(idx);
                buckets.entry((gx, gy, gz)).or_default().push(idx);
            }
        }
    }

    for face in &mut mesh.faces {
        face[0] = vertex_map[face[0] as usize];
        face[1] = vertex_map[face[1] as usize];
        face[2] = vertex_map[face[2] as usize];
    }

    // Drop faces that collapsed onto a repeated vertex
    mesh.faces
        .retain(|&[i0, i1, i2]| i0 != i1 && i1 != i2 && i0 != i2);

    mesh.vertices = new_vertices;

    if welded > 0 {
        debug!(welded, remaining = mesh.vertices.len(), "welded vertices");
    }

    welded
}

#[inline]
fn bucket_of(v: &Point3<f32>, inv_tol: f32) -> (i64, i64, i64) {
    (
        (v.x * inv_tol).floor() as i64,
        (v.y * inv_tol).floor() as i64,
        (v.z * inv_tol).floor() as i64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::unit_cube;

    /// Cube with one vertex triple per triangle, the way STL stores it.
    fn stl_style_cube() -> Mesh {
        let indexed = unit_cube();
        let mut mesh = Mesh::with_capacity(36, 12);
        for &[i0, i1, i2] in &indexed.faces {
            let base = mesh.vertices.len() as u32;
            mesh.vertices.push(indexed.vertices[i0 as usize]);
            mesh.vertices.push(indexed.vertices[i1 as usize]);
            mesh.vertices.push(indexed.vertices[i2 as usize]);
            mesh.faces.push([base, base + 1, base + 2]);
        }
        mesh
    }

    #[test]
    fn weld_stl_style_cube() {
        let mut mesh = stl_style_cube();
        assert_eq!(mesh.vertex_count(), 36);

        let merged = weld_vertices(&mut mesh, 1e-5);

        assert_eq!(merged, 28);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 12);

        let analysis = crate::analyze(&mesh);
        assert!(analysis.is_watertight);
    }

    #[test]
    fn weld_is_idempotent() {
        let mut mesh = stl_style_cube();
        weld_vertices(&mut mesh, 1e-5);

        let vertices_before = mesh.vertices.clone();
        let faces_before = mesh.faces.clone();

        let merged = weld_vertices(&mut mesh, 1e-5);
        assert_eq!(merged, 0);
        assert_eq!(mesh.vertices, vertices_before);
        assert_eq!(mesh.faces, faces_before);
    }

    #[test]
    fn weld_keeps_first_occurrence_order() {
        let mut mesh = Mesh::new();
        mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
        mesh.vertices.push(Point3::new(5.0, 0.0, 0.0));
        mesh.vertices.push(Point3::new(0.0, 0.0, 1e-7)); // merges into 0
        mesh.vertices.push(Point3::new(9.0, 0.0, 0.0));
        mesh.faces.push([1, 2, 3]);

        let merged = weld_vertices(&mut mesh, 1e-5);

        assert_eq!(merged, 1);
        assert_eq!(mesh.vertices[0], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(mesh.vertices[1], Point3::new(5.0, 0.0, 0.0));
        assert_eq!(mesh.vertices[2], Point3::new(9.0, 0.0, 0.0));
        assert_eq!(mesh.faces[0], [1, 0, 2]);
    }

    #[test]
    fn weld_drops_collapsed_faces() {
        let mut mesh = Mesh::new();
        mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
        mesh.vertices.push(Point3::new(1e-7, 0.0, 0.0)); // duplicate of 0
        mesh.vertices.push(Point3::new(1.0, 0.0, 0.0));
        mesh.faces.push([0, 1, 2]); // collapses to [0, 0, 1]

        weld_vertices(&mut mesh, 1e-5);
        assert_eq!(mesh.face_count(), 0);
    }

    #[test]
    fn zero_tolerance_is_noop() {
        let mut mesh = stl_style_cube();
        let merged = weld_vertices(&mut mesh, 0.0);
        assert_eq!(merged, 0);
        assert_eq!(mesh.vertex_count(), 36);
    }

    #[test]
    fn vertices_across_bucket_boundary_still_weld() {
        // Two vertices within tolerance but in neighboring buckets
        let mut mesh = Mesh::new();
        mesh.vertices.push(Point3::new(1e-5 - 1e-9, 0.0, 0.0));
        mesh.vertices.push(Point3::new(1e-5 + 1e-9, 0.0, 0.0));
        mesh.faces.push([0, 1, 0]);

        let merged = weld_vertices(&mut mesh, 1e-5);
        assert_eq!(merged, 1);
        assert_eq!(mesh.vertex_count(), 1);
    }
}
