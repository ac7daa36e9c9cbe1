//! Sanitising component documents
//!
//! Sanitising rewrites a component document in place so that it only holds
//! what the schema knows about: the component's own key, the reserved keys
//! of its type and the declared fields of its config, in declaration order.
//! Nested component fields are sanitised through the registry in the same way.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use confhammer_yaml::{parse, to_yaml_string, Node};

use crate::component::ComponentType;
use crate::error::{Result, SchemaError};
use crate::field::{Collection, FieldKind, FieldSpec};
use crate::registry::SchemaRegistry;

/// Predicate deciding whether a field is kept in sanitised output.
pub type FieldFilter = Arc<dyn Fn(&FieldSpec) -> bool + Send + Sync>;

/// Build a filter that rejects deprecated fields when `drop` is set.
pub fn should_drop_deprecated(drop: bool) -> FieldFilter {
    Arc::new(move |spec: &FieldSpec| !(drop && spec.is_deprecated()))
}

/// Switches controlling what sanitising removes.
///
/// The boolean switches can be loaded from YAML or JSON; the filter is only
/// set in code.
///
/// ```
/// use confhammer_schema::{should_drop_deprecated, SanitiseConfig};
///
/// let config: SanitiseConfig = serde_yaml_ng::from_str("remove_type_field: true").unwrap();
/// assert!(config.remove_type_field);
/// assert!(!config.remove_deprecated);
///
/// let config = config.with_filter(should_drop_deprecated(true));
/// assert!(config.filter.is_some());
/// ```
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitiseConfig {
    /// Drop the `type` key when the component's own key is present.
    pub remove_type_field: bool,
    /// Drop deprecated fields.
    pub remove_deprecated: bool,
    #[serde(skip)]
    pub filter: Option<FieldFilter>,
}

impl SanitiseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remove_type_field(mut self, remove: bool) -> Self {
        self.remove_type_field = remove;
        self
    }

    pub fn remove_deprecated(mut self, remove: bool) -> Self {
        self.remove_deprecated = remove;
        self
    }

    pub fn with_filter(mut self, filter: FieldFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Whether a declared field survives sanitising.
    pub fn accepts(&self, spec: &FieldSpec) -> bool {
        if self.remove_deprecated && spec.is_deprecated() {
            return false;
        }
        self.filter.as_ref().is_none_or(|filter| filter(spec))
    }
}

impl fmt::Debug for SanitiseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SanitiseConfig")
            .field("remove_type_field", &self.remove_type_field)
            .field("remove_deprecated", &self.remove_deprecated)
            .field("filter", &self.filter.is_some())
            .finish()
    }
}

/// Sanitise a component document of type `ty` in place.
///
/// Fails when the document is not a mapping. A mapping whose component
/// cannot be resolved keeps only its reserved keys.
pub fn sanitise(
    registry: &SchemaRegistry,
    ty: ComponentType,
    node: &mut Node,
    config: &SanitiseConfig,
) -> Result<()> {
    let root = node.resolve_mut();
    if !root.is_mapping() {
        return Err(SchemaError::NotAMapping {
            line: root.line,
            found: root.kind(),
        });
    }
    sanitise_component(registry, ty, root, config);
    Ok(())
}

/// Parse, sanitise and emit a component document.
pub fn sanitise_str(
    registry: &SchemaRegistry,
    ty: ComponentType,
    src: &str,
    config: &SanitiseConfig,
) -> Result<String> {
    let mut node = parse(src)?;
    sanitise(registry, ty, &mut node, config)?;
    Ok(to_yaml_string(&node)?)
}

fn sanitise_component(
    registry: &SchemaRegistry,
    ty: ComponentType,
    node: &mut Node,
    config: &SanitiseConfig,
) {
    let node = node.resolve_mut();
    let component = match registry.resolve(ty, node) {
        Ok(component) => Some(component),
        Err(err) => {
            debug!("Sanitising unresolved {} component at line {}: {}", ty, node.line, err);
            None
        }
    };
    let Some(pairs) = node.as_mapping_mut() else {
        return;
    };

    let has_component_key = component.is_some_and(|c| {
        pairs
            .iter()
            .any(|(k, _)| k.as_scalar() == Some(c.name.as_str()))
    });
    let reserved = ty.reserved_fields();

    let mut kept = Vec::with_capacity(pairs.len());
    for (key, mut value) in std::mem::take(pairs) {
        let Some(name) = key.as_scalar().map(str::to_string) else {
            debug!("Dropping non-scalar key at line {} from {} component", key.line, ty);
            continue;
        };

        if let Some(component) = component.filter(|c| c.name == name) {
            sanitise_field(registry, &component.config, &mut value, config);
            kept.push((key, value));
        } else if name == "type" {
            if config.remove_type_field && has_component_key {
                debug!("Dropping type field from {} component", ty);
            } else {
                kept.push((key, value));
            }
        } else if let Some(field) = reserved.iter().find(|f| f.name == name) {
            let empty = value.as_sequence().is_some_and(|items| items.is_empty());
            if field.collection == Collection::Array && empty {
                debug!("Dropping empty {} field from {} component", name, ty);
                continue;
            }
            sanitise_field(registry, field, &mut value, config);
            kept.push((key, value));
        } else {
            debug!("Dropping field {} from {} component", name, ty);
        }
    }
    *pairs = kept;
}

fn sanitise_field(
    registry: &SchemaRegistry,
    spec: &FieldSpec,
    node: &mut Node,
    config: &SanitiseConfig,
) {
    let node = node.resolve_mut();
    match spec.collection {
        Collection::Array => {
            if let Some(items) = node.as_sequence_mut() {
                for item in items.iter_mut() {
                    sanitise_element(registry, spec, item, config);
                }
            }
        }
        Collection::Map => {
            if let Some(pairs) = node.as_mapping_mut() {
                for (_, value) in pairs.iter_mut() {
                    sanitise_element(registry, spec, value, config);
                }
            }
        }
        Collection::Scalar => sanitise_element(registry, spec, node, config),
    }
}

fn sanitise_element(
    registry: &SchemaRegistry,
    spec: &FieldSpec,
    node: &mut Node,
    config: &SanitiseConfig,
) {
    if let FieldKind::Component(ty) = spec.kind {
        sanitise_component(registry, ty, node, config);
    } else if !spec.children.is_empty() {
        sanitise_object(registry, &spec.children, node, config);
    }
}

/// Reorder a mapping into declaration order, dropping filtered fields and
/// keeping undeclared keys after the declared ones.
fn sanitise_object(
    registry: &SchemaRegistry,
    children: &[FieldSpec],
    node: &mut Node,
    config: &SanitiseConfig,
) {
    let Some(pairs) = node.as_mapping_mut() else {
        return;
    };

    let mut remaining = std::mem::take(pairs);
    let mut kept = Vec::with_capacity(remaining.len());
    for child in children {
        let Some(pos) = remaining
            .iter()
            .position(|(k, _)| k.as_scalar() == Some(child.name.as_str()))
        else {
            continue;
        };
        let (key, mut value) = remaining.remove(pos);
        if !config.accepts(child) {
            debug!("Dropping filtered field {}", child.name);
            continue;
        }
        sanitise_field(registry, child, &mut value, config);
        kept.push((key, value));
    }
    kept.extend(remaining);
    *pairs = kept;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentSpec;

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry.register(ComponentSpec::new(
            "file",
            ComponentType::Input,
            FieldSpec::component().with_children(vec![
                FieldSpec::string("path", ""),
                FieldSpec::string("codec", "").has_default("lines"),
                FieldSpec::deprecated_field("multipart"),
            ]),
        ));
        registry
    }

    #[test]
    fn test_config_accepts() {
        let deprecated = FieldSpec::deprecated_field("old");
        let common = FieldSpec::string("new", "");

        assert!(SanitiseConfig::new().accepts(&deprecated));
        assert!(!SanitiseConfig::new().remove_deprecated(true).accepts(&deprecated));
        assert!(!SanitiseConfig::new()
            .with_filter(should_drop_deprecated(true))
            .accepts(&deprecated));
        assert!(SanitiseConfig::new()
            .with_filter(should_drop_deprecated(false))
            .accepts(&deprecated));
        assert!(SanitiseConfig::new()
            .with_filter(should_drop_deprecated(true))
            .accepts(&common));
    }

    #[test]
    fn test_sanitise_reorders_and_keeps_undeclared() {
        let out = sanitise_str(
            &registry(),
            ComponentType::Input,
            "file:\n  extra: 1\n  codec: csv\n  path: /tmp/a\n",
            &SanitiseConfig::default(),
        )
        .unwrap();
        assert_eq!(out, "file:\n  path: /tmp/a\n  codec: csv\n  extra: 1\n");
    }

    #[test]
    fn test_type_field_kept_without_component_key() {
        let config = SanitiseConfig::new().remove_type_field(true);
        let out = sanitise_str(&registry(), ComponentType::Input, "type: file\nfile:\n  path: a\n", &config).unwrap();
        assert_eq!(out, "file:\n  path: a\n");

        let out = sanitise_str(&registry(), ComponentType::Input, "type: file\nlabel: x\n", &config).unwrap();
        assert_eq!(out, "type: file\nlabel: x\n");
    }

    #[test]
    fn test_remove_deprecated_switch() {
        let config = SanitiseConfig::new().remove_deprecated(true);
        let out = sanitise_str(
            &registry(),
            ComponentType::Input,
            "file:\n  multipart: true\n  path: a\n",
            &config,
        )
        .unwrap();
        assert_eq!(out, "file:\n  path: a\n");
    }

    #[test]
    fn test_unresolved_component_keeps_reserved_keys() {
        let out = sanitise_str(
            &registry(),
            ComponentType::Input,
            "label: a\nmystery: {}\nprocessors: []\n",
            &SanitiseConfig::default(),
        )
        .unwrap();
        assert_eq!(out, "label: a\n");
    }

    #[test]
    fn test_root_must_be_mapping() {
        let mut node = parse("- file\n").unwrap();
        let err = sanitise(&registry(), ComponentType::Input, &mut node, &SanitiseConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::NotAMapping {
                line: 1,
                found: confhammer_yaml::NodeKind::Sequence
            }
        ));
    }
}
