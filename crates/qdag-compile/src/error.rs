//! Error types for the pass framework.

use thiserror::Error;

use qdag_ir::IrError;

/// Errors raised while running compilation passes.
#[derive(Debug, Error)]
pub enum CompileError {
    /// A graph operation failed.
    #[error(transparent)]
    Ir(#[from] IrError),

    /// The integrity check failed after a transformation.
    #[error("Circuit inconsistent after pass '{after}': {source}")]
    Verification {
        /// Last transformation pass that ran, or `"<input>"`.
        after: String,
        /// The failed check.
        #[source]
        source: IrError,
    },
}

/// Result type for pass operations.
pub type CompileResult<T> = Result<T, CompileError>;
