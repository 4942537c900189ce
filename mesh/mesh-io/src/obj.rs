//! Wavefront OBJ loading.
//!
//! Only the subset the SDF pipeline needs: `v` vertex positions and `f`
//! faces. Texture/normal references (`f 1/2/3`, `f 1//3`) are stripped to
//! the vertex index; polygons with more than three vertices are
//! triangulated as a fan around the first vertex. All other line types
//! (normals, texture coordinates, groups, materials) are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use mesh_types::{Mesh, Point3};

use crate::error::{IoError, IoResult};

/// Load a mesh from an OBJ file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a vertex or face line is
/// malformed, or a face references a vertex that does not exist.
///
/// # Example
///
/// ```no_run
/// use mesh_io::load_obj;
///
/// let mesh = load_obj("model.obj").unwrap();
/// println!("loaded {} faces", mesh.face_count());
/// ```
pub fn load_obj<P: AsRef<Path>>(path: P) -> IoResult<Mesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IoError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IoError::Io(e)
        }
    })?;

    parse_obj(BufReader::new(file))
}

/// Parse OBJ content from any buffered reader.
pub(crate) fn parse_obj<R: BufRead>(reader: R) -> IoResult<Mesh> {
    let mut mesh = Mesh::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();

        let mut parts = trimmed.split_whitespace();
        match parts.next() {
            Some("v") => {
                let mut coord = |axis: &str| -> IoResult<f32> {
                    parts
                        .next()
                        .ok_or_else(|| {
                            IoError::invalid_content(format!(
                                "line {}: vertex missing {axis} coordinate",
                                line_no + 1
                            ))
                        })?
                        .parse::<f32>()
                        .map_err(IoError::from)
                };
                let x = coord("x")?;
                let y = coord("y")?;
                let z = coord("z")?;
                mesh.vertices.push(Point3::new(x, y, z));
            }
            Some("f") => {
                let mut indices = Vec::with_capacity(4);
                for token in parts {
                    indices.push(parse_face_index(token, mesh.vertices.len(), line_no)?);
                }

                if indices.len() < 3 {
                    return Err(IoError::invalid_content(format!(
                        "line {}: face with fewer than 3 vertices",
                        line_no + 1
                    )));
                }

                // Fan triangulation around the first vertex
                for i in 1..indices.len() - 1 {
                    mesh.faces.push([indices[0], indices[i], indices[i + 1]]);
                }
            }
            _ => {}
        }
    }

    Ok(mesh)
}

/// Parse one `f`-line token into a zero-based vertex index.
///
/// Tokens look like `7`, `7/2`, `7//3` or `7/2/3`; only the leading vertex
/// index matters. OBJ indices are 1-based.
fn parse_face_index(token: &str, vertex_count: usize, line_no: usize) -> IoResult<u32> {
    let vertex_part = token.split('/').next().unwrap_or(token);
    let index: i64 = vertex_part.parse()?;

    if index < 1 || index as usize > vertex_count {
        return Err(IoError::invalid_content(format!(
            "line {}: face index {index} out of range (1..={vertex_count})",
            line_no + 1
        )));
    }

    Ok((index - 1) as u32)
}
