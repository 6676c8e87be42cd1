use thiserror::Error;

use crate::sheet::FaceNumber;

/// Top-level error type for the sheet-metal kernel.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Sheet(#[from] SheetError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to topological lookups and construction.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),

    #[error("wire is not closed")]
    WireNotClosed,

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors related to kernel operations (construction, queries, transforms).
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation failed: {0}")]
    Failed(String),

    #[error("unsupported surface for {0}")]
    UnsupportedSurface(&'static str),
}

/// Errors raised by the sheet-metal analysis pipeline.
///
/// Recoverable conditions (unclassifiable faces, degenerate bend triplets,
/// parts without thickness pairs) are not errors; they are reported through
/// [`crate::sheet::Diagnostic`] and [`crate::sheet::SheetSummary`].
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("solid has no faces")]
    NoFaces,

    #[error("kernel operation `{operation}` failed on {face}")]
    Kernel {
        face: FaceNumber,
        operation: &'static str,
        #[source]
        source: Box<Error>,
    },
}

/// Convenience type alias for results using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Attaches face/operation context to a failed kernel call.
pub(crate) trait KernelContext<T> {
    fn on_face(self, face: FaceNumber, operation: &'static str) -> Result<T>;
}

impl<T> KernelContext<T> for Result<T> {
    fn on_face(self, face: FaceNumber, operation: &'static str) -> Result<T> {
        self.map_err(|source| {
            SheetError::Kernel {
                face,
                operation,
                source: Box::new(source),
            }
            .into()
        })
    }
}
