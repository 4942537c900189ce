//! Voxel grid geometry and dense storage.

use mesh_types::Aabb;
use nalgebra::{Point3, Vector3};

use crate::error::{SdfError, SdfResult};

/// Geometry of a regular voxel grid.
///
/// `origin` is the world position of voxel (0,0,0)'s *corner*; the center
/// of voxel (i, j, k) is `origin + (i + 1/2, j + 1/2, k + 1/2) * dx`.
///
/// # Example
///
/// ```
/// use mesh_sdf::GridSpec;
/// use nalgebra::Point3;
///
/// let spec = GridSpec::new(10, 10, 10, Point3::new(0.0, 0.0, 0.0), 0.1).unwrap();
/// let center = spec.cell_center(0, 0, 0);
/// assert!((center.x - 0.05).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    /// Number of cells along x.
    pub nx: usize,
    /// Number of cells along y.
    pub ny: usize,
    /// Number of cells along z.
    pub nz: usize,
    /// World position of voxel (0,0,0)'s corner.
    pub origin: Point3<f32>,
    /// Uniform cell size.
    pub dx: f32,
}

impl GridSpec {
    /// Create a grid spec, validating dimensions and cell size.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::InvalidGrid`] when any dimension is zero or
    /// `dx` is not a positive finite number.
    pub fn new(
        nx: usize,
        ny: usize,
        nz: usize,
        origin: Point3<f32>,
        dx: f32,
    ) -> SdfResult<Self> {
        let spec = Self {
            nx,
            ny,
            nz,
            origin,
            dx,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Check that the spec describes a usable grid.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::InvalidGrid`] on zero dimensions or
    /// non-positive / non-finite `dx`.
    pub fn validate(&self) -> SdfResult<()> {
        if self.nx == 0
            || self.ny == 0
            || self.nz == 0
            || !(self.dx.is_finite() && self.dx > 0.0)
            || !self.origin.coords.iter().all(|c| c.is_finite())
        {
            return Err(SdfError::InvalidGrid {
                nx: self.nx,
                ny: self.ny,
                nz: self.nz,
                dx: self.dx,
            });
        }
        Ok(())
    }

    /// Size the grid from a cell size (legacy OBJ mode).
    ///
    /// The bounds are padded by `padding` cells of `dx` on every side and
    /// the dimensions derived as the rounded-up cell count per axis.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::InvalidSizing`] for empty bounds and
    /// [`SdfError::InvalidGrid`] for a bad `dx`.
    pub fn from_cell_size(bounds: &Aabb, dx: f32, padding: usize) -> SdfResult<Self> {
        if bounds.is_empty() {
            return Err(SdfError::InvalidSizing {
                message: "mesh bounding box is empty".to_owned(),
            });
        }
        if !(dx.is_finite() && dx > 0.0) {
            return Err(SdfError::InvalidGrid {
                nx: 0,
                ny: 0,
                nz: 0,
                dx,
            });
        }

        let padding = padding.max(1) as f32;
        let padded = bounds.padded(padding * dx);
        let size = padded.size();

        let cells = |extent: f32| ((extent / dx).ceil() as usize).max(1);

        Self::new(
            cells(size.x),
            cells(size.y),
            cells(size.z),
            padded.min,
            dx,
        )
    }

    /// Size the grid from fixed dimensions (STL manual mode).
    ///
    /// The cell size is the largest per-axis fit that leaves `padding`
    /// cells of clearance, and the mesh is centered in the grid.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::InvalidSizing`] when a dimension leaves no
    /// cells after padding or the bounds are empty.
    pub fn from_dims(
        bounds: &Aabb,
        nx: usize,
        ny: usize,
        nz: usize,
        padding: usize,
    ) -> SdfResult<Self> {
        if bounds.is_empty() {
            return Err(SdfError::InvalidSizing {
                message: "mesh bounding box is empty".to_owned(),
            });
        }

        let padding = padding.max(1);
        let size = bounds.size();

        let fit = |extent: f32, n: usize| -> SdfResult<f32> {
            if n <= 2 * padding {
                return Err(SdfError::InvalidSizing {
                    message: format!(
                        "grid dimension {n} leaves no cells after {padding} cells of padding"
                    ),
                });
            }
            Ok(extent / (n - 2 * padding) as f32)
        };

        let dx = fit(size.x, nx)?.max(fit(size.y, ny)?).max(fit(size.z, nz)?);
        if !(dx.is_finite() && dx > 0.0) {
            return Err(SdfError::InvalidSizing {
                message: "mesh bounding box is degenerate on every axis".to_owned(),
            });
        }

        let grid_size = Vector3::new(nx as f32, ny as f32, nz as f32) * dx;
        let origin = bounds.center() - grid_size * 0.5;

        Self::new(nx, ny, nz, origin, dx)
    }

    /// Size the grid proportionally from an x dimension (STL
    /// proportional mode).
    ///
    /// `dx` comes from fitting the x extent into `nx` minus padding; the
    /// y and z dimensions follow the mesh aspect ratio, rounded to the
    /// nearest cell, plus padding on both sides.
    ///
    /// # Errors
    ///
    /// Same failure cases as [`GridSpec::from_dims`].
    pub fn from_nx_proportional(bounds: &Aabb, nx: usize, padding: usize) -> SdfResult<Self> {
        if bounds.is_empty() {
            return Err(SdfError::InvalidSizing {
                message: "mesh bounding box is empty".to_owned(),
            });
        }

        let padding = padding.max(1);
        if nx <= 2 * padding {
            return Err(SdfError::InvalidSizing {
                message: format!(
                    "grid dimension {nx} leaves no cells after {padding} cells of padding"
                ),
            });
        }

        let size = bounds.size();
        let dx = size.x / (nx - 2 * padding) as f32;
        if !(dx.is_finite() && dx > 0.0) {
            return Err(SdfError::InvalidSizing {
                message: "mesh has zero extent along x".to_owned(),
            });
        }

        let ny = (size.y / dx + 0.5) as usize + 2 * padding;
        let nz = (size.z / dx + 0.5) as usize + 2 * padding;

        Self::from_dims(bounds, nx, ny.max(1), nz.max(1), padding)
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    /// World-space center of voxel (i, j, k).
    #[inline]
    #[must_use]
    pub fn cell_center(&self, i: usize, j: usize, k: usize) -> Point3<f32> {
        Point3::new(
            self.origin.x + (i as f32 + 0.5) * self.dx,
            self.origin.y + (j as f32 + 0.5) * self.dx,
            self.origin.z + (k as f32 + 0.5) * self.dx,
        )
    }

    /// Length of the grid's world-space diagonal.
    #[must_use]
    pub fn diagonal(&self) -> f32 {
        Vector3::new(
            self.nx as f32 * self.dx,
            self.ny as f32 * self.dx,
            self.nz as f32 * self.dx,
        )
        .norm()
    }
}

/// Dense 3-D array in row-major k-outer / i-fastest layout.
///
/// Linear index of (i, j, k) is `(k * ny + j) * nx + i`, matching the
/// on-disk `.sdf` value order.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid3<T> {
    nx: usize,
    ny: usize,
    nz: usize,
    data: Vec<T>,
}

impl<T: Copy> Grid3<T> {
    /// Allocate a grid filled with `value`.
    #[must_use]
    pub fn new(nx: usize, ny: usize, nz: usize, value: T) -> Self {
        Self {
            nx,
            ny,
            nz,
            data: vec![value; nx * ny * nz],
        }
    }

    /// Grid dimensions (nx, ny, nz).
    #[must_use]
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.nz)
    }

    /// Linear index of (i, j, k).
    #[inline]
    #[must_use]
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        debug_assert!(i < self.nx && j < self.ny && k < self.nz);
        (k * self.ny + j) * self.nx + i
    }

    /// Value at (i, j, k).
    ///
    /// # Panics
    ///
    /// Panics when the coordinates are out of range.
    #[inline]
    #[must_use]
    pub fn get(&self, i: usize, j: usize, k: usize) -> T {
        self.data[self.index(i, j, k)]
    }

    /// Store a value at (i, j, k).
    ///
    /// # Panics
    ///
    /// Panics when the coordinates are out of range.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, k: usize, value: T) {
        let idx = self.index(i, j, k);
        self.data[idx] = value;
    }

    /// The backing slice in linear order.
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.data
    }

    /// Mutable access to the backing slice.
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the grid and return the backing vector.
    #[must_use]
    pub fn into_values(self) -> Vec<T> {
        self.data
    }
}
