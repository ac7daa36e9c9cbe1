//! Schema registry for component specs
//!
//! The [`SchemaRegistry`] maps a component type and name to the
//! [`ComponentSpec`] describing that component's configuration. It is built
//! once at startup and then shared by reference for read-only use.

use std::collections::{BTreeMap, HashMap};

use confhammer_yaml::Node;
use thiserror::Error;
use tracing::debug;

use crate::component::{ComponentSpec, ComponentType};

/// Reasons a document mapping could not be matched to a registered component
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The component document is not a mapping
    #[error("expected object value")]
    NotAMapping,

    /// An explicit `type` named a component that is not registered
    #[error("{ty} type '{name}' was not recognised")]
    NotRecognised { ty: ComponentType, name: String },

    /// No key of the mapping names a registered component
    #[error("unable to infer {ty} type, candidates were: [{}]", .candidates.join(" "))]
    Uninferable {
        ty: ComponentType,
        candidates: Vec<String>,
    },
}

/// Registry of component specs indexed by type and name
///
/// # Examples
///
/// ```
/// use confhammer_schema::{ComponentSpec, ComponentType, FieldSpec, SchemaRegistry};
///
/// let mut registry = SchemaRegistry::new();
/// registry.register(ComponentSpec::new(
///     "stdin",
///     ComponentType::Input,
///     FieldSpec::component().with_children(vec![FieldSpec::string("codec", "").optional()]),
/// ));
///
/// assert!(registry.contains(ComponentType::Input, "stdin"));
/// assert!(registry.get(ComponentType::Output, "stdin").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    components: HashMap<ComponentType, BTreeMap<String, ComponentSpec>>,
}

impl SchemaRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component spec, replacing any spec already registered under
    /// the same type and name
    pub fn register(&mut self, spec: ComponentSpec) {
        debug!(
            "Registering {} component: {}",
            spec.component_type, spec.name
        );
        let previous = self
            .components
            .entry(spec.component_type)
            .or_default()
            .insert(spec.name.clone(), spec);
        if let Some(previous) = previous {
            debug!(
                "Replaced previously registered {} component: {}",
                previous.component_type, previous.name
            );
        }
    }

    /// Get a component spec by type and name
    pub fn get(&self, ty: ComponentType, name: &str) -> Option<&ComponentSpec> {
        self.components.get(&ty)?.get(name)
    }

    /// Check if a component is registered
    pub fn contains(&self, ty: ComponentType, name: &str) -> bool {
        self.get(ty, name).is_some()
    }

    /// List registered component names of a type, sorted
    pub fn names(&self, ty: ComponentType) -> Vec<&str> {
        self.components
            .get(&ty)
            .map(|specs| specs.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Get the total number of registered components
    pub fn len(&self) -> usize {
        self.components.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find the component a document mapping configures.
    ///
    /// A scalar `type` key names the component explicitly. Otherwise the
    /// first key, in document order, that names a registered component of
    /// type `ty` is taken.
    pub fn resolve(&self, ty: ComponentType, node: &Node) -> Result<&ComponentSpec, ResolveError> {
        let pairs = node.as_mapping().ok_or(ResolveError::NotAMapping)?;

        let explicit = pairs
            .iter()
            .find(|(k, _)| k.as_scalar() == Some("type"))
            .and_then(|(_, v)| v.as_scalar())
            .filter(|name| !name.is_empty());
        if let Some(name) = explicit {
            return self.get(ty, name).ok_or_else(|| ResolveError::NotRecognised {
                ty,
                name: name.to_string(),
            });
        }

        let mut candidates = Vec::with_capacity(pairs.len());
        for (key, _) in pairs {
            let Some(key) = key.as_scalar() else {
                continue;
            };
            if let Some(spec) = self.get(ty, key) {
                return Ok(spec);
            }
            candidates.push(key.to_string());
        }
        candidates.sort();

        debug!(
            "Unable to infer {} component from keys: {:?}",
            ty, candidates
        );
        Err(ResolveError::Uninferable { ty, candidates })
    }
}
