//! Error types for SDF generation.

use thiserror::Error;

/// Result type for SDF operations.
pub type SdfResult<T> = Result<T, SdfError>;

/// Errors that can occur during SDF generation.
#[derive(Debug, Error)]
pub enum SdfError {
    /// Grid dimensions or cell size are unusable.
    #[error("invalid grid: {nx}x{ny}x{nz} cells with dx={dx}")]
    InvalidGrid {
        /// Requested x dimension.
        nx: usize,
        /// Requested y dimension.
        ny: usize,
        /// Requested z dimension.
        nz: usize,
        /// Requested cell size.
        dx: f32,
    },

    /// Grid sizing parameters leave no room for the mesh.
    #[error("invalid grid sizing: {message}")]
    InvalidSizing {
        /// Description of the sizing problem.
        message: String,
    },

    /// The requested hardware backend is not available in this build.
    #[error("backend {backend} is not available")]
    BackendUnavailable {
        /// The backend that was requested.
        backend: crate::Backend,
    },

    /// The worker thread pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
