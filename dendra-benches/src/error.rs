//! Benchmark setup error type.

use dendra_core::DendraError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// The explorer rejected the generated session.
    #[error("explorer setup failed: {0}")]
    Core(#[from] DendraError),
    /// A zero value was passed where a non-zero integer was required.
    #[error("expected a non-zero value for {context}")]
    ZeroValue {
        /// The parameter that was unexpectedly zero.
        context: &'static str,
    },
}
