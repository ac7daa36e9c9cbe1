//! Linting documents against field specs
//!
//! The linter walks a document tree in document order and reports shape
//! mismatches, unknown and missing fields, omitted fields and the output of
//! custom lint hooks. Component fields are resolved through the registry held
//! by the [`LintContext`]. Every node is linted at most once per context, so
//! a subtree reached again through an alias adds nothing.

use serde_yaml_ng::Value;
use tracing::{debug, trace};

use confhammer_yaml::Node;

use crate::coerce::{element_to_value, field_to_value, to_generic_value};
use crate::component::ComponentType;
use crate::field::{Collection, FieldKind, FieldSpec};
use crate::lint::{Lint, LintContext};

/// Lint a document node against a single field spec.
///
/// ```
/// use confhammer_schema::{lint_field, FieldSpec, LintContext};
///
/// let spec = FieldSpec::new("foo", "").with_children(vec![
///     FieldSpec::string("bar", "").has_default("barv"),
///     FieldSpec::string("baz", ""),
/// ]);
/// let node = confhammer_yaml::parse("bar: hello\n").unwrap();
/// let lints = lint_field(&mut LintContext::default(), &spec, &node);
/// assert_eq!(lints.len(), 1);
/// assert_eq!(lints[0].message, "field baz is required");
/// ```
pub fn lint_field(ctx: &mut LintContext<'_>, spec: &FieldSpec, node: &Node) -> Vec<Lint> {
    match enter(ctx, node) {
        Some(node) => lint_value(ctx, spec, node),
        None => Vec::new(),
    }
}

/// Lint a component document of type `ty`, resolving the component through
/// the context's registry.
pub fn lint_component(ctx: &mut LintContext<'_>, ty: ComponentType, node: &Node) -> Vec<Lint> {
    match enter(ctx, node) {
        Some(node) => lint_component_resolved(ctx, ty, node),
        None => Vec::new(),
    }
}

/// Resolve aliases and mark the target as linted. Returns `None` when the
/// target was already linted.
fn enter<'n>(ctx: &mut LintContext<'_>, node: &'n Node) -> Option<&'n Node> {
    let node = node.resolve();
    if ctx.visit(node.id) {
        Some(node)
    } else {
        trace!(id = %node.id, line = node.line, "skipping node that was already linted");
        None
    }
}

fn lint_value(ctx: &mut LintContext<'_>, spec: &FieldSpec, node: &Node) -> Vec<Lint> {
    match spec.collection {
        Collection::Array => {
            let Some(items) = node.as_sequence() else {
                return vec![Lint::error(node.line, "expected array value")];
            };
            let mut lints = Vec::new();
            for item in items {
                if let Some(item) = enter(ctx, item) {
                    lints.extend(lint_element(ctx, spec, item));
                }
            }
            lints
        }
        Collection::Map => {
            let Some(pairs) = node.as_mapping() else {
                return vec![Lint::error(node.line, "expected object value")];
            };
            let mut lints = Vec::new();
            for (_, value) in pairs {
                if let Some(value) = enter(ctx, value) {
                    lints.extend(lint_element(ctx, spec, value));
                }
            }
            lints
        }
        Collection::Scalar => lint_element(ctx, spec, node),
    }
}

fn lint_element(ctx: &mut LintContext<'_>, spec: &FieldSpec, node: &Node) -> Vec<Lint> {
    if let FieldKind::Component(ty) = spec.kind {
        let mut lints = run_linter(ctx, spec, node);
        lints.extend(lint_component_resolved(ctx, ty, node));
        return lints;
    }

    if spec.is_object() {
        if !node.is_mapping() {
            return vec![Lint::error(node.line, "expected object value")];
        }
        let mut lints = run_linter(ctx, spec, node);
        lints.extend(lint_object(ctx, &spec.children, node));
        return lints;
    }

    match spec.kind {
        FieldKind::String | FieldKind::Int | FieldKind::Float | FieldKind::Bool
            if !node.is_scalar() =>
        {
            vec![Lint::error(
                node.line,
                format!("expected {} value", spec.kind),
            )]
        }
        _ => run_linter(ctx, spec, node),
    }
}

fn run_linter(ctx: &mut LintContext<'_>, spec: &FieldSpec, node: &Node) -> Vec<Lint> {
    let Some(linter) = &spec.linter else {
        return Vec::new();
    };
    let value = element_to_value(spec, false, node).unwrap_or_else(|_| node.to_value());
    linter(ctx, node.line, node.column, &value)
}

/// Lint the keys of a mapping against the children of an object.
fn lint_object(ctx: &mut LintContext<'_>, children: &[FieldSpec], node: &Node) -> Vec<Lint> {
    let Some(pairs) = node.as_mapping() else {
        return Vec::new();
    };

    let mut lints = Vec::new();
    let mut parent = ParentValue::new(children, node);
    for (key, value) in pairs {
        let Some(name) = key.as_scalar() else {
            continue;
        };
        match children.iter().find(|c| c.name == name) {
            Some(child) => {
                lints.extend(lint_present_field(ctx, child, key, value, &mut parent));
            }
            None if children.is_empty() => {}
            None => lints.push(Lint::error(
                key.line,
                format!("field {} not recognised", name),
            )),
        }
    }

    for child in children.iter().filter(|c| c.is_required()) {
        let present = pairs
            .iter()
            .any(|(k, _)| k.as_scalar() == Some(child.name.as_str()));
        if !present {
            lints.push(Lint::error(
                node.line,
                format!("field {} is required", child.name),
            ));
        }
    }

    lints
}

/// Lint a field whose key is present in its parent mapping.
fn lint_present_field(
    ctx: &mut LintContext<'_>,
    spec: &FieldSpec,
    key: &Node,
    value: &Node,
    parent: &mut ParentValue<'_>,
) -> Vec<Lint> {
    let Some(value) = enter(ctx, value) else {
        return Vec::new();
    };

    if let Some(omit) = &spec.omit {
        let field_value = field_to_value(spec, false, value).unwrap_or_else(|_| value.to_value());
        if let Some(reason) = omit(&field_value, parent.get()) {
            return vec![Lint::error(key.line, reason)];
        }
    }

    lint_value(ctx, spec, value)
}

/// Lint a component mapping: the component's own key, the reserved keys of
/// its type and nothing else.
fn lint_component_resolved(ctx: &mut LintContext<'_>, ty: ComponentType, node: &Node) -> Vec<Lint> {
    let Some(pairs) = node.as_mapping() else {
        return vec![Lint::error(node.line, "expected object value")];
    };

    let registry = ctx.registry();
    let component = match registry.resolve(ty, node) {
        Ok(component) => component,
        Err(err) => {
            debug!("Failed to resolve {} component at line {}: {}", ty, node.line, err);
            return vec![Lint::error(node.line, err.to_string())];
        }
    };

    let reserved = ty.reserved_fields();
    let mut parent = ParentValue::new(&reserved, node);
    let mut lints = Vec::new();
    for (key, value) in pairs {
        let Some(name) = key.as_scalar() else {
            continue;
        };
        if name == component.name {
            if let Some(value) = enter(ctx, value) {
                lints.extend(lint_value(ctx, &component.config, value));
            }
        } else if let Some(field) = reserved.iter().find(|f| f.name == name) {
            lints.extend(lint_present_field(ctx, field, key, value, &mut parent));
        } else {
            lints.push(Lint::error(
                key.line,
                format!(
                    "field {} is invalid when the component type is {} ({})",
                    name, component.name, ty
                ),
            ));
        }
    }
    lints
}

/// Coerced value of a parent mapping, computed the first time an omit hook
/// asks for it.
struct ParentValue<'a> {
    specs: &'a [FieldSpec],
    node: &'a Node,
    value: Option<Value>,
}

impl<'a> ParentValue<'a> {
    fn new(specs: &'a [FieldSpec], node: &'a Node) -> Self {
        Self {
            specs,
            node,
            value: None,
        }
    }

    fn get(&mut self) -> &Value {
        let (specs, node) = (self.specs, self.node);
        self.value.get_or_insert_with(|| {
            to_generic_value(specs, false, node).unwrap_or_else(|_| node.to_value())
        })
    }
}
