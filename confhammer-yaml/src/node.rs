//! Positional document tree
//!
//! A [`Node`] is one YAML value together with the position of its first token
//! and a [`NodeId`] identity. Aliases carry a copy of their anchor target that
//! keeps the target's identity and positions, so a walker can tell when it
//! reaches the same subtree a second time.

use serde_yaml_ng::{Mapping, Value};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::resolve::{needs_quotes, resolve_plain};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a node, shared between an anchor and every alias of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Allocate an identity that has never been handed out before.
    pub fn fresh() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a scalar was written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalarStyle {
    #[default]
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
    Folded,
}

impl ScalarStyle {
    /// Plain scalars are resolved by the core schema, every other style is a string.
    pub fn is_plain(self) -> bool {
        matches!(self, ScalarStyle::Plain)
    }
}

/// The four shapes a node can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Scalar,
    Sequence,
    Mapping,
    Alias,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Scalar => write!(f, "scalar"),
            NodeKind::Sequence => write!(f, "sequence"),
            NodeKind::Mapping => write!(f, "mapping"),
            NodeKind::Alias => write!(f, "alias"),
        }
    }
}

/// Content of a node.
#[derive(Debug, Clone)]
pub enum NodeContent {
    Scalar { value: String, style: ScalarStyle },
    Sequence(Vec<Node>),
    /// Key/value pairs in declaration order.
    Mapping(Vec<(Node, Node)>),
    /// Copy of the anchored node this alias refers to.
    Alias(Box<Node>),
}

/// A YAML value with its source position and identity.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    /// 1-based line of the node's first token, 0 for synthesized nodes.
    pub line: usize,
    /// 0-based column of the node's first token.
    pub column: usize,
    /// Parser-assigned anchor number when the node was anchored.
    pub anchor: Option<usize>,
    pub content: NodeContent,
}

impl Node {
    /// Create a synthesized node with a fresh identity and no position.
    pub fn new(content: NodeContent) -> Self {
        Self {
            id: NodeId::fresh(),
            line: 0,
            column: 0,
            anchor: None,
            content,
        }
    }

    /// A plain scalar.
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::new(NodeContent::Scalar {
            value: value.into(),
            style: ScalarStyle::Plain,
        })
    }

    /// A scalar that always reads back as a string.
    pub fn string(value: impl Into<String>) -> Self {
        let value = value.into();
        let style = if needs_quotes(&value) {
            ScalarStyle::DoubleQuoted
        } else {
            ScalarStyle::Plain
        };
        Self::new(NodeContent::Scalar { value, style })
    }

    pub fn null() -> Self {
        Self::scalar("null")
    }

    pub fn sequence(items: Vec<Node>) -> Self {
        Self::new(NodeContent::Sequence(items))
    }

    pub fn mapping(pairs: Vec<(Node, Node)>) -> Self {
        Self::new(NodeContent::Mapping(pairs))
    }

    /// Set the source position of this node.
    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    pub fn kind(&self) -> NodeKind {
        match self.content {
            NodeContent::Scalar { .. } => NodeKind::Scalar,
            NodeContent::Sequence(_) => NodeKind::Sequence,
            NodeContent::Mapping(_) => NodeKind::Mapping,
            NodeContent::Alias(_) => NodeKind::Alias,
        }
    }

    /// Follow aliases until a concrete node is reached.
    pub fn resolve(&self) -> &Node {
        match self.content {
            NodeContent::Alias(ref target) => target.resolve(),
            _ => self,
        }
    }

    /// Mutable counterpart of [`Node::resolve`].
    pub fn resolve_mut(&mut self) -> &mut Node {
        match self.content {
            NodeContent::Alias(ref mut target) => target.resolve_mut(),
            _ => self,
        }
    }

    /// Raw scalar text, following aliases.
    pub fn as_scalar(&self) -> Option<&str> {
        match &self.resolve().content {
            NodeContent::Scalar { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match &self.resolve().content {
            NodeContent::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&[(Node, Node)]> {
        match &self.resolve().content {
            NodeContent::Mapping(pairs) => Some(pairs),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Vec<Node>> {
        match &mut self.resolve_mut().content {
            NodeContent::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Vec<(Node, Node)>> {
        match &mut self.resolve_mut().content {
            NodeContent::Mapping(pairs) => Some(pairs),
            _ => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        self.resolve().kind() == NodeKind::Scalar
    }

    pub fn is_sequence(&self) -> bool {
        self.resolve().kind() == NodeKind::Sequence
    }

    pub fn is_mapping(&self) -> bool {
        self.resolve().kind() == NodeKind::Mapping
    }

    /// True for a plain scalar that resolves to null.
    pub fn is_null(&self) -> bool {
        match &self.resolve().content {
            NodeContent::Scalar { value, style } => {
                style.is_plain() && crate::resolve::is_null(value)
            }
            _ => false,
        }
    }

    /// Look up the value of a mapping key.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping()?
            .iter()
            .find(|(k, _)| k.as_scalar() == Some(key))
            .map(|(_, v)| v)
    }

    /// Decode this node into a generic value.
    ///
    /// Plain scalars resolve through the core schema; quoted and block
    /// scalars stay strings. Mapping order is preserved.
    pub fn to_value(&self) -> Value {
        match &self.resolve().content {
            NodeContent::Scalar { value, style } => {
                if style.is_plain() {
                    resolve_plain(value)
                } else {
                    Value::String(value.clone())
                }
            }
            NodeContent::Sequence(items) => {
                Value::Sequence(items.iter().map(Node::to_value).collect())
            }
            NodeContent::Mapping(pairs) => {
                let mut mapping = Mapping::new();
                for (k, v) in pairs {
                    mapping.insert(k.to_value(), v.to_value());
                }
                Value::Mapping(mapping)
            }
            // resolve() never returns an alias
            NodeContent::Alias(target) => target.to_value(),
        }
    }

    /// Build a synthesized tree from a generic value.
    pub fn from_value(value: &Value) -> Node {
        match value {
            Value::Null => Node::null(),
            Value::Bool(b) => Node::scalar(b.to_string()),
            Value::Number(n) => Node::scalar(n.to_string()),
            Value::String(s) => Node::string(s.clone()),
            Value::Sequence(items) => Node::sequence(items.iter().map(Node::from_value).collect()),
            Value::Mapping(mapping) => Node::mapping(
                mapping
                    .iter()
                    .map(|(k, v)| (Node::from_value(k), Node::from_value(v)))
                    .collect(),
            ),
            Value::Tagged(tagged) => Node::from_value(&tagged.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_ids_are_unique() {
        let a = NodeId::fresh();
        let b = NodeId::fresh();
        assert_ne!(a, b);
        assert!(b.as_u64() > a.as_u64());
    }

    #[test]
    fn test_resolve_follows_alias_identity() {
        let target = Node::scalar("foo").with_position(2, 4);
        let target_id = target.id;
        let alias = Node::new(NodeContent::Alias(Box::new(target))).with_position(5, 6);

        assert_eq!(alias.kind(), NodeKind::Alias);
        assert_eq!(alias.resolve().id, target_id);
        assert_eq!(alias.resolve().line, 2);
        assert_eq!(alias.as_scalar(), Some("foo"));
    }

    #[test]
    fn test_get_mapping_key() {
        let node = Node::mapping(vec![
            (Node::scalar("a"), Node::scalar("1")),
            (Node::scalar("b"), Node::scalar("two")),
        ]);
        assert_eq!(node.get("b").and_then(Node::as_scalar), Some("two"));
        assert!(node.get("c").is_none());
    }

    #[test]
    fn test_string_node_quotes_ambiguous_text() {
        assert_eq!(Node::string("10").to_value(), Value::String("10".into()));
        assert_eq!(Node::string("").to_value(), Value::String(String::new()));
        assert_eq!(Node::scalar("10").to_value(), Value::Number(10.into()));
    }

    #[test]
    fn test_from_value_round_trips_generic_values() {
        let value: Value = serde_yaml_ng::from_str("a: [1, true, x]\nb: {c: 2.5}\nd: '10'\n")
            .expect("valid yaml");
        assert_eq!(Node::from_value(&value).to_value(), value);
    }

    #[test]
    fn test_is_null() {
        assert!(Node::null().is_null());
        assert!(Node::scalar("~").is_null());
        assert!(!Node::string("null").is_null());
        assert!(!Node::mapping(vec![]).is_null());
    }
}
