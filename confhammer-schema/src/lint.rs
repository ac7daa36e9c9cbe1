//! Lint diagnostics and the per-call lint context

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::LazyLock;

use confhammer_yaml::NodeId;

use crate::registry::SchemaRegistry;

static EMPTY_REGISTRY: LazyLock<SchemaRegistry> = LazyLock::new(SchemaRegistry::new);

/// Severity of a lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LintLevel {
    Error,
    Warning,
}

impl fmt::Display for LintLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintLevel::Error => write!(f, "error"),
            LintLevel::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic attached to a source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lint {
    pub line: usize,
    pub level: LintLevel,
    pub message: String,
}

impl Lint {
    pub fn error(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            level: LintLevel::Error,
            message: message.into(),
        }
    }

    pub fn warning(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            level: LintLevel::Warning,
            message: message.into(),
        }
    }
}

impl fmt::Display for Lint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.level, self.message)
    }
}

/// State carried through one lint call.
///
/// Holds the registry used to resolve component fields, the labels seen so
/// far and the identities of nodes already linted. A context is created per
/// document and must not be shared between calls.
pub struct LintContext<'a> {
    registry: &'a SchemaRegistry,
    labels: HashMap<String, usize>,
    visited: HashSet<NodeId>,
}

impl<'a> LintContext<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            registry,
            labels: HashMap::new(),
            visited: HashSet::new(),
        }
    }

    pub fn registry(&self) -> &'a SchemaRegistry {
        self.registry
    }

    /// Record a label seen at `line`.
    ///
    /// Returns the line of the first definition when the label was already
    /// recorded; the first definition is kept.
    pub fn record_label(&mut self, label: &str, line: usize) -> Option<usize> {
        if let Some(previous) = self.labels.get(label) {
            return Some(*previous);
        }
        self.labels.insert(label.to_string(), line);
        None
    }

    /// Mark a node as linted. Returns false when it had already been linted.
    pub(crate) fn visit(&mut self, id: NodeId) -> bool {
        self.visited.insert(id)
    }
}

/// A context over an empty registry.
///
/// Enough for [`lint_field`](crate::lint_field) on specs without component
/// fields. Every component lint through this context fails to resolve with
/// `unable to infer ...`, so use [`LintContext::new`] with a populated
/// registry for component documents.
impl Default for LintContext<'static> {
    fn default() -> Self {
        Self::new(&EMPTY_REGISTRY)
    }
}

impl fmt::Debug for LintContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LintContext")
            .field("labels", &self.labels)
            .field("visited", &self.visited.len())
            .finish()
    }
}
