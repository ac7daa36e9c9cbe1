//! Positional YAML document trees
//!
//! `confhammer-yaml` turns YAML text into a tree of [`Node`]s that remember
//! where each value was written and which anchor an alias points at. The
//! schema engines in `confhammer-schema` walk this tree to report
//! diagnostics by line, to coerce values, and to rewrite documents.
//!
//! # Architecture
//!
//! - **Positions**: every parsed node carries the 1-based line and 0-based column of its first token
//! - **Identity**: every node has a [`NodeId`]; an alias carries a copy of its target with the target's ids
//! - **Resolution**: plain scalars resolve through the YAML 1.2 core schema, quoted scalars stay strings
//! - **Emission**: trees render back to block YAML through `serde_yaml_ng`
//!
//! ```
//! use confhammer_yaml::parse;
//!
//! let node = parse("input:\n  label: foo\n").unwrap();
//! let label = node.get("input").and_then(|n| n.get("label")).unwrap();
//! assert_eq!(label.line, 2);
//! assert_eq!(label.as_scalar(), Some("foo"));
//! ```

pub mod emit;
pub mod error;
pub mod node;
pub mod parse;
pub mod resolve;

pub use emit::to_yaml_string;
pub use error::{Result, YamlError};
pub use node::{Node, NodeContent, NodeId, NodeKind, ScalarStyle};
pub use parse::parse;
