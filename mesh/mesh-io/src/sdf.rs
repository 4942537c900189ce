//! Binary `.sdf` distance-field files.
//!
//! Layout (all values little-endian):
//!
//! ```text
//! bytes  0..12  three i32: nx, ny, nz
//! bytes 12..24  three f32: ox, oy, oz  (corner of voxel (0,0,0), not center)
//! bytes 24..28  f32: dx
//! bytes 28..36  reserved, written as zero
//! bytes 36..    nx * ny * nz f32 values, i-fastest order
//! ```
//!
//! Write followed by read yields bit-identical values and identical grid
//! metadata.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::{IoError, IoResult};

/// Size of the fixed header in bytes.
const HEADER_SIZE: usize = 36;

/// In-memory representation of a `.sdf` file.
#[derive(Debug, Clone, PartialEq)]
pub struct SdfFile {
    /// Grid dimensions.
    pub nx: i32,
    /// Grid dimensions.
    pub ny: i32,
    /// Grid dimensions.
    pub nz: i32,
    /// World position of voxel (0,0,0)'s corner.
    pub origin: [f32; 3],
    /// Uniform cell size.
    pub dx: f32,
    /// Distance values, i-fastest order; length `nx * ny * nz`.
    pub values: Vec<f32>,
}

impl SdfFile {
    /// Number of voxels the header declares.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.nx as usize * self.ny as usize * self.nz as usize
    }
}

/// Write a distance field to a `.sdf` file.
///
/// # Errors
///
/// Returns [`IoError::InvalidContent`] when the value count does not match
/// the header dimensions, or an I/O error from the filesystem.
pub fn write_sdf<P: AsRef<Path>>(path: P, sdf: &SdfFile) -> IoResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    encode_sdf(&mut writer, sdf)?;
    writer.flush()?;
    Ok(())
}

/// Read a distance field from a `.sdf` file.
///
/// # Errors
///
/// Returns an error if the file is missing, the header declares
/// non-positive dimensions, or the value payload is truncated.
pub fn read_sdf<P: AsRef<Path>>(path: P) -> IoResult<SdfFile> {
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

    decode_sdf(BufReader::new(file))
}

/// Encode to any writer.
pub(crate) fn encode_sdf<W: Write>(writer: &mut W, sdf: &SdfFile) -> IoResult<()> {
    let expected = sdf.cell_count();
    if sdf.values.len() != expected {
        return Err(IoError::invalid_content(format!(
            "value count {} does not match {}x{}x{} grid",
            sdf.values.len(),
            sdf.nx,
            sdf.ny,
            sdf.nz
        )));
    }

    writer.write_all(&sdf.nx.to_le_bytes())?;
    writer.write_all(&sdf.ny.to_le_bytes())?;
    writer.write_all(&sdf.nz.to_le_bytes())?;
    for c in sdf.origin {
        writer.write_all(&c.to_le_bytes())?;
    }
    writer.write_all(&sdf.dx.to_le_bytes())?;
    writer.write_all(&[0u8; 8])?; // reserved

    for value in &sdf.values {
        writer.write_all(&value.to_le_bytes())?;
    }

    Ok(())
}

/// Decode from any reader.
pub(crate) fn decode_sdf<R: Read>(mut reader: R) -> IoResult<SdfFile> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let nx = i32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    let ny = i32::from_le_bytes([header[4], header[5], header[6], header[7]]);
    let nz = i32::from_le_bytes([header[8], header[9], header[10], header[11]]);

    if nx <= 0 || ny <= 0 || nz <= 0 {
        return Err(IoError::invalid_content(format!(
            "non-positive grid dimensions {nx}x{ny}x{nz}"
        )));
    }

    let origin = [
        f32::from_le_bytes([header[12], header[13], header[14], header[15]]),
        f32::from_le_bytes([header[16], header[17], header[18], header[19]]),
        f32::from_le_bytes([header[20], header[21], header[22], header[23]]),
    ];
    let dx = f32::from_le_bytes([header[24], header[25], header[26], header[27]]);

    let count = nx as usize * ny as usize * nz as usize;
    let mut values = Vec::with_capacity(count);
    let mut buf = [0u8; 4];
    for _ in 0..count {
        reader.read_exact(&mut buf)?;
        values.push(f32::from_le_bytes(buf));
    }

    Ok(SdfFile {
        nx,
        ny,
        nz,
        origin,
        dx,
        values,
    })
}
