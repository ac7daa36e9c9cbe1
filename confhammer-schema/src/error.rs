//! Error types for schema operations

use confhammer_yaml::{NodeKind, YamlError};
use thiserror::Error;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors that can occur while coercing or sanitising a document
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A component document was not a mapping
    #[error("expected a mapping at line {line}, found a {found}")]
    NotAMapping { line: usize, found: NodeKind },

    /// A mapping key that names a field was not a scalar
    #[error("mapping key at line {line} is not a scalar")]
    NonScalarKey { line: usize },

    /// The document could not be loaded or emitted
    #[error(transparent)]
    Yaml(#[from] YamlError),
}
