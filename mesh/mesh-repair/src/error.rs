//! Error types for mesh repair operations.

use thiserror::Error;

/// Result type for repair operations.
pub type RepairResult<T> = Result<T, RepairError>;

/// Errors that can occur during mesh repair.
#[derive(Debug, Error)]
pub enum RepairError {
    /// Hole filling produced no triangles for a boundary loop.
    #[error("failed to fill hole: {reason}")]
    HoleFillFailed {
        /// Reason for failure.
        reason: String,
    },
}
