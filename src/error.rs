//! Error types for the analysis engine

use thiserror::Error;

/// Main error type for FEA operations
#[derive(Error, Debug)]
pub enum FEAError {
    #[error("Node '{0}' not found in model")]
    NodeNotFound(String),

    #[error("Element '{0}' not found in model")]
    ElementNotFound(String),

    #[error("Load case '{0}' has not been solved")]
    LoadCaseNotFound(String),

    #[error("Label '{0}' is already used by a node or element")]
    DuplicateLabel(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Invalid topology: {0}")]
    InvalidTopology(String),

    #[error("Stiffness matrix is not positive definite: {0}")]
    NonPositiveDefinite(String),

    #[error("Model not analyzed - run solve() first")]
    NotAnalyzed,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl FEAError {
    pub(crate) fn unsupported(what: &str, helper: &str) -> Self {
        Self::UnsupportedOperation(format!("{what} is not available for {helper}"))
    }
}

/// Result type for FEA operations
pub type FEAResult<T> = Result<T, FEAError>;
