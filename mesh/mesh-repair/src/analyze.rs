//! Mesh watertightness analysis.
//!
//! Classifies edges, discovers boundary loops (holes) and reports whether
//! the mesh is manifold and watertight. Analysis never mutates the mesh.

use hashbrown::{HashMap, HashSet};
use mesh_types::Mesh;
use tracing::debug;

use crate::adjacency::EdgeAdjacency;

/// An ordered cyclic sequence of vertex indices along the boundary of a
/// hole.
///
/// Loops shorter than 3 vertices are discarded during analysis.
#[derive(Debug, Clone)]
pub struct BoundaryLoop {
    /// Ordered vertex indices forming the loop.
    pub vertices: Vec<u32>,
}

impl BoundaryLoop {
    /// Number of edges (and vertices) in the loop.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the loop has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Result of mesh analysis.
#[derive(Debug, Clone, Default)]
pub struct MeshAnalysis {
    /// Total number of vertices.
    pub vertex_count: usize,
    /// Total number of faces.
    pub face_count: usize,
    /// Total number of unique edges.
    pub edge_count: usize,
    /// Edges with exactly one incident triangle.
    pub boundary_edge_count: usize,
    /// Edges with more than two incident triangles.
    pub non_manifold_edge_count: usize,
    /// Boundary loops (holes) of length >= 3.
    pub loops: Vec<BoundaryLoop>,
    /// No edge has more than two incident triangles.
    pub is_manifold: bool,
    /// Manifold and no boundary edges.
    pub is_watertight: bool,
}

impl MeshAnalysis {
    /// Number of holes (boundary loops) found.
    #[must_use]
    pub fn hole_count(&self) -> usize {
        self.loops.len()
    }
}

impl std::fmt::Display for MeshAnalysis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Mesh analysis:")?;
        writeln!(f, "  Vertices:           {}", self.vertex_count)?;
        writeln!(f, "  Faces:              {}", self.face_count)?;
        writeln!(f, "  Total edges:        {}", self.edge_count)?;
        writeln!(f, "  Boundary edges:     {}", self.boundary_edge_count)?;
        writeln!(f, "  Non-manifold edges: {}", self.non_manifold_edge_count)?;
        writeln!(f, "  Holes:              {}", self.hole_count())?;
        writeln!(
            f,
            "  Manifold:           {}",
            if self.is_manifold { "yes" } else { "NO" }
        )?;
        write!(
            f,
            "  Watertight:         {}",
            if self.is_watertight { "yes" } else { "NO" }
        )
    }
}

/// Analyze a mesh's edge topology.
///
/// Builds the edge table, counts boundary and non-manifold edges, and
/// walks the boundary-vertex adjacency graph to discover holes.
///
/// # Example
///
/// ```
/// use mesh_repair::analyze;
/// use mesh_types::unit_cube;
///
/// let analysis = analyze(&unit_cube());
/// assert_eq!(analysis.edge_count, 18);
/// assert!(analysis.is_watertight);
/// assert_eq!(analysis.hole_count(), 0);
/// ```
#[must_use]
pub fn analyze(mesh: &Mesh) -> MeshAnalysis {
    let adjacency = EdgeAdjacency::build(&mesh.faces);
    let loops = trace_boundary_loops(&adjacency);

    let is_manifold = adjacency.is_manifold();
    let boundary_edge_count = adjacency.boundary_edge_count();

    debug!(
        edges = adjacency.edge_count(),
        boundary = boundary_edge_count,
        holes = loops.len(),
        "mesh analyzed"
    );

    MeshAnalysis {
        vertex_count: mesh.vertices.len(),
        face_count: mesh.faces.len(),
        edge_count: adjacency.edge_count(),
        boundary_edge_count,
        non_manifold_edge_count: adjacency.non_manifold_edge_count(),
        loops,
        is_manifold,
        is_watertight: is_manifold && boundary_edge_count == 0,
    }
}

/// Walk the boundary-vertex adjacency graph into closed loops.
///
/// Repeatedly picks an unvisited boundary vertex and follows unvisited
/// neighbors until the walk returns to its start or dead-ends. Vertices
/// and neighbor lists are visited in sorted order so the result is
/// deterministic regardless of hash-map iteration order.
fn trace_boundary_loops(adjacency: &EdgeAdjacency) -> Vec<BoundaryLoop> {
    let mut boundary_adj: HashMap<u32, Vec<u32>> = HashMap::new();
    for (a, b) in adjacency.boundary_edges() {
        boundary_adj.entry(a).or_default().push(b);
        boundary_adj.entry(b).or_default().push(a);
    }

    if boundary_adj.is_empty() {
        return Vec::new();
    }

    let mut starts: Vec<u32> = boundary_adj.keys().copied().collect();
    starts.sort_unstable();
    for neighbors in boundary_adj.values_mut() {
        neighbors.sort_unstable();
    }

    let mut visited: HashSet<u32> = HashSet::new();
    let mut loops = Vec::new();

    for &start in &starts {
        if visited.contains(&start) {
            continue;
        }

        let mut loop_vertices = Vec::new();
        let mut current = start;
        let mut prev: Option<u32> = None;

        loop {
            loop_vertices.push(current);
            visited.insert(current);

            let neighbors = boundary_adj
                .get(&current)
                .map(Vec::as_slice)
                .unwrap_or(&[]);

            let next = neighbors
                .iter()
                .copied()
                .find(|&n| Some(n) != prev && (!visited.contains(&n) || n == start));

            match next {
                None => break,
                Some(n) if n == start => break,
                Some(n) => {
                    prev = Some(current);
                    current = n;
                }
            }
        }

        if loop_vertices.len() >= 3 {
            loops.push(BoundaryLoop {
                vertices: loop_vertices,
            });
        }
    }

    loops
}
