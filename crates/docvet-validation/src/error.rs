// Error types for the validation pipeline.

use thiserror::Error;

use crate::engine::CompileError;
use crate::navigate::NavigateError;

/// Result type for validation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal failures of the pipeline itself.
///
/// Conformance violations are not errors in this sense; they come back
/// as localized diagnostics. These variants cover the two cases a
/// caller cannot recover from locally: a schema that does not compile
/// (a configuration defect) and an instance path that disagrees with
/// the document tree (the validator and the tree were built from
/// different instances, a programming-contract violation).
#[derive(Debug, Error)]
pub enum Error {
    #[error("schema compilation failed: {0}")]
    Compile(#[from] CompileError),

    #[error("instance path does not match the document tree: {0}")]
    Navigation(#[from] NavigateError),
}
