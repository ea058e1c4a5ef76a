//! Errors reported by the export entry points.
use std::fmt;

use thiserror::Error;

/// Failure of an export call. The output buffer is owned by the failing
/// call, so no partial document ever reaches the caller.
#[derive(Debug, Error)]
pub enum ExportError {
    /// MPS can only encode minimization problems. Callers wanting a
    /// maximization export must negate the objective themselves; an
    /// implicit sign flip here would silently change the reported
    /// objective value.
    #[error("MPS format cannot encode a maximization objective")]
    MaximizationNotSupported,

    /// A coefficient references a variable index outside the model.
    #[error("coefficient references variable #{index}, but the model has {count} variables")]
    VariableIndexOutOfRange {
        /// The offending variable index.
        index: usize,
        /// The model's variable count.
        count: usize,
    },

    /// Formatter failure while building the document.
    #[error("could not write to the output buffer: {0}")]
    Fmt(#[from] fmt::Error),
}
