//! Emitting a [`Node`] tree as block YAML

use crate::error::Result;
use crate::node::Node;

/// Render a node as block-style YAML text.
///
/// Aliases are expanded in place, comments are not preserved.
pub fn to_yaml_string(node: &Node) -> Result<String> {
    Ok(serde_yaml_ng::to_string(&node.to_value())?)
}
