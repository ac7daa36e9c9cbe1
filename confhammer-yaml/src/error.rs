//! Error types for loading and emitting document trees

use thiserror::Error;
use yaml_rust2::scanner::ScanError;

/// Result type for document tree operations
pub type Result<T> = std::result::Result<T, YamlError>;

/// Errors that can occur while loading or emitting a document tree
#[derive(Debug, Error)]
pub enum YamlError {
    /// The YAML text could not be scanned or parsed
    #[error("failed to parse YAML: {0}")]
    Scan(#[from] ScanError),

    /// An alias referenced an anchor that was never completed
    #[error("alias at line {line} refers to an unknown anchor")]
    UnknownAlias { line: usize },

    /// Aliases expanded into far more nodes than the document spells out
    #[error("excessive aliasing at line {line}")]
    ExcessiveAliasing { line: usize },

    /// Serializing the tree back to YAML failed
    #[error("failed to emit YAML: {0}")]
    Emit(#[from] serde_yaml_ng::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_alias_display() {
        let err = YamlError::UnknownAlias { line: 7 };
        assert_eq!(
            err.to_string(),
            "alias at line 7 refers to an unknown anchor"
        );
    }
}
