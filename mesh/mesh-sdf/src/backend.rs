//! Hardware backend selection.
//!
//! The level-set contract admits a GPU implementation producing the same
//! field within float tolerance. This build ships only the CPU pipeline;
//! the enum keeps the seam so callers written against `Backend::Auto`
//! pick up a GPU variant transparently if one is ever compiled in.

use crate::error::{SdfError, SdfResult};

/// Hardware backend for SDF generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Use the GPU when available, otherwise the CPU.
    #[default]
    Auto,
    /// Force the multi-threaded CPU pipeline.
    Cpu,
    /// Require the GPU implementation.
    Gpu,
}

impl Backend {
    /// Resolve to the concrete backend this build will run.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::BackendUnavailable`] when [`Backend::Gpu`] is
    /// requested and no GPU implementation is available.
    pub fn resolve(self) -> SdfResult<Self> {
        match self {
            Self::Cpu => Ok(Self::Cpu),
            Self::Auto => Ok(if is_gpu_available() {
                Self::Gpu
            } else {
                Self::Cpu
            }),
            Self::Gpu => {
                if is_gpu_available() {
                    Ok(Self::Gpu)
                } else {
                    Err(SdfError::BackendUnavailable { backend: self })
                }
            }
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::Cpu => "cpu",
            Self::Gpu => "gpu",
        };
        f.write_str(name)
    }
}

/// Whether a GPU implementation is compiled into this build.
///
/// Always `false` here; exists so callers can report which backend a job
/// will use without trying to run it.
#[must_use]
pub fn is_gpu_available() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_resolves_to_cpu_without_gpu() {
        assert_eq!(Backend::Auto.resolve().unwrap(), Backend::Cpu);
        assert_eq!(Backend::Cpu.resolve().unwrap(), Backend::Cpu);
    }

    #[test]
    fn gpu_request_fails_without_gpu() {
        let result = Backend::Gpu.resolve();
        assert!(matches!(result, Err(SdfError::BackendUnavailable { .. })));
    }
}
