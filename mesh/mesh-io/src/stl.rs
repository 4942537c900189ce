//! STL (stereolithography) loading.
//!
//! Binary and ASCII formats, auto-detected:
//! - ASCII files start with `solid` (after optional whitespace)
//! - Binary files have an 80-byte header followed by a triangle count;
//!   headers that merely *say* "solid" but contain null bytes are treated
//!   as binary
//!
//! Binary layout, little-endian:
//!
//! ```text
//! UINT8[80]     - header (ignored)
//! UINT32        - number of triangles
//! foreach triangle
//!     REAL32[3] - normal (ignored, recomputed when needed)
//!     REAL32[3] - vertex 1
//!     REAL32[3] - vertex 2
//!     REAL32[3] - vertex 3
//!     UINT16    - attribute byte count
//! end
//! ```
//!
//! STL has no shared vertices: the loader emits one vertex triple per
//! triangle. Weld the result (`mesh_repair::weld_vertices`, tolerance
//! `1e-5`) before topological analysis or SDF generation.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use mesh_types::{Mesh, Point3};

use crate::error::{IoError, IoResult};

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Size of one triangle record in binary STL.
const TRIANGLE_SIZE: usize = 50;

/// Load a mesh from an STL file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or its content is not
/// valid STL.
///
/// # Example
///
/// ```no_run
/// use mesh_io::load_stl;
///
/// let mesh = load_stl("model.stl").unwrap();
/// println!("loaded {} faces", mesh.face_count());
/// ```
pub fn load_stl<P: AsRef<Path>>(path: P) -> IoResult<Mesh> {
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

    let mut reader = BufReader::new(file);

    // Read enough to determine the format
    let mut header = [0u8; HEADER_SIZE + 4];
    let bytes_read = read_up_to(&mut reader, &mut header)?;

    if bytes_read < 6 {
        return Err(IoError::invalid_content("file too small to be valid STL"));
    }

    let header_str = String::from_utf8_lossy(&header[..bytes_read.min(HEADER_SIZE)]);
    if header_str.trim_start().starts_with("solid") && !looks_binary(&header[..bytes_read]) {
        // ASCII: re-read from the start
        let file = File::open(path)?;
        parse_stl_ascii(BufReader::new(file))
    } else {
        parse_stl_binary(&header[..bytes_read], reader)
    }
}

/// Read as many bytes as the reader will give, up to the buffer size.
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> IoResult<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

/// Some binary STLs happen to start with "solid"; their headers usually
/// contain null bytes, which legal ASCII never does.
fn looks_binary(header: &[u8]) -> bool {
    header.len() >= HEADER_SIZE + 4 && header[..HEADER_SIZE].contains(&0)
}

/// Parse a binary STL given the already-read header bytes.
fn parse_stl_binary<R: Read>(header: &[u8], mut reader: R) -> IoResult<Mesh> {
    if header.len() < HEADER_SIZE + 4 {
        return Err(IoError::InvalidHeader {
            expected: HEADER_SIZE + 4,
            got: header.len(),
        });
    }

    let face_count = u32::from_le_bytes([
        header[HEADER_SIZE],
        header[HEADER_SIZE + 1],
        header[HEADER_SIZE + 2],
        header[HEADER_SIZE + 3],
    ]);

    let mut mesh = Mesh::with_capacity(face_count as usize * 3, face_count as usize);

    let mut record = [0u8; TRIANGLE_SIZE];
    for i in 0..face_count {
        let bytes_read = read_up_to(&mut reader, &mut record)?;
        if bytes_read < TRIANGLE_SIZE {
            return Err(IoError::InvalidFaceCount {
                expected: face_count,
                got: i,
            });
        }

        // Skip the 12-byte normal; read the three vertices
        let v0 = read_point(&record[12..24]);
        let v1 = read_point(&record[24..36]);
        let v2 = read_point(&record[36..48]);

        let base = mesh.vertices.len() as u32;
        mesh.vertices.push(v0);
        mesh.vertices.push(v1);
        mesh.vertices.push(v2);
        mesh.faces.push([base, base + 1, base + 2]);
    }

    Ok(mesh)
}

/// Read a point from 12 bytes (3 little-endian f32s).
fn read_point(buf: &[u8]) -> Point3<f32> {
    Point3::new(
        f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]),
        f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
        f32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]),
    )
}

/// Parse an ASCII STL file.
fn parse_stl_ascii<R: BufRead>(reader: R) -> IoResult<Mesh> {
    let mut mesh = Mesh::new();
    let mut in_facet = false;
    let mut in_loop = false;
    let mut facet_vertices: Vec<Point3<f32>> = Vec::with_capacity(3);

    for line in reader.lines() {
        let line = line?;
        let mut parts = line.split_whitespace();

        match parts.next() {
            Some("facet") => {
                in_facet = true;
            }
            Some("outer") => {
                in_loop = true;
                facet_vertices.clear();
            }
            Some("vertex") if in_loop => {
                let mut coord = || -> IoResult<f32> {
                    parts
                        .next()
                        .ok_or_else(|| IoError::invalid_content("vertex line missing coordinate"))?
                        .parse::<f32>()
                        .map_err(IoError::from)
                };
                let x = coord()?;
                let y = coord()?;
                let z = coord()?;
                facet_vertices.push(Point3::new(x, y, z));
            }
            Some("endloop") => {
                in_loop = false;
            }
            Some("endfacet") => {
                if in_facet && facet_vertices.len() == 3 {
                    let base = mesh.vertices.len() as u32;
                    mesh.vertices.append(&mut facet_vertices);
                    mesh.faces.push([base, base + 1, base + 2]);
                }
                in_facet = false;
            }
            Some("endsolid") => break,
            _ => {}
        }
    }

    Ok(mesh)
}
