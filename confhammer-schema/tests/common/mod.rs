//! Common test utilities and fixtures
//!
//! Registries of test components registered under every component type, and
//! helpers for loading and emitting documents.

#![allow(dead_code)]

use confhammer_schema::{ComponentSpec, ComponentType, FieldKind, FieldSpec, Lint, SchemaRegistry};
use confhammer_yaml::{parse, to_yaml_string, Node};

/// Parse a document, panicking on invalid YAML.
pub fn node(src: &str) -> Node {
    parse(src).expect("test document should parse")
}

/// Emit a document after a parse round trip, for layout-independent
/// comparisons.
pub fn canonical(src: &str) -> String {
    to_yaml_string(&node(src)).expect("test document should emit")
}

/// Registry holding `testlintfoo<type>` for every component type.
///
/// `foo1` rejects the value `lint me please`, `foo2` must not be set to
/// `drop me`, and the remaining fields cover component, array and map
/// shapes.
pub fn lint_registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    for ty in ComponentType::ALL {
        registry.register(ComponentSpec::new(
            format!("testlintfoo{}", ty),
            ty,
            FieldSpec::component().with_children(vec![
                FieldSpec::string("foo1", "")
                    .linter(|_, line, _, value| {
                        if value.as_str() == Some("lint me please") {
                            vec![Lint::error(line, "this is a custom lint")]
                        } else {
                            Vec::new()
                        }
                    })
                    .optional(),
                FieldSpec::string("foo2", "")
                    .advanced()
                    .omit_when(|field, _| {
                        (field.as_str() == Some("drop me")).then(|| "because foo".to_string())
                    })
                    .optional(),
                FieldSpec::new("foo3", "")
                    .has_type(FieldKind::Component(ComponentType::Processor))
                    .optional(),
                FieldSpec::new("foo4", "")
                    .advanced()
                    .array()
                    .has_type(FieldKind::Component(ComponentType::Processor))
                    .optional(),
                FieldSpec::new("foo5", "")
                    .map()
                    .has_type(FieldKind::Component(ComponentType::Processor))
                    .optional(),
                FieldSpec::deprecated_field("foo6").optional(),
                FieldSpec::new("foo7", "")
                    .advanced()
                    .array()
                    .with_children(vec![FieldSpec::string("foochild1", "").optional()])
                    .optional(),
                FieldSpec::new("foo8", "")
                    .advanced()
                    .map()
                    .with_children(vec![FieldSpec::int("foochild1", "").optional()])
                    .optional(),
            ]),
        ));
    }
    registry
}

/// Registry holding `testyamlsanitfoo<type>` (an object config),
/// `testyamlsanitbar<type>` (an array of objects) and
/// `testyamlsanitbaz<type>` (a map of objects) for every component type.
pub fn sanitise_registry() -> SchemaRegistry {
    let processor = || FieldKind::Component(ComponentType::Processor);

    let mut registry = SchemaRegistry::new();
    for ty in ComponentType::ALL {
        registry.register(ComponentSpec::new(
            format!("testyamlsanitfoo{}", ty),
            ty,
            FieldSpec::component().with_children(vec![
                FieldSpec::new("foo1", ""),
                FieldSpec::new("foo2", "").advanced(),
                FieldSpec::new("foo3", "").has_type(processor()),
                FieldSpec::new("foo4", "").advanced().array().has_type(processor()),
                FieldSpec::new("foo5", "").map().has_type(processor()),
                FieldSpec::deprecated_field("foo6"),
            ]),
        ));
        registry.register(ComponentSpec::new(
            format!("testyamlsanitbar{}", ty),
            ty,
            FieldSpec::component().array().with_children(vec![
                FieldSpec::new("bar1", ""),
                FieldSpec::new("bar2", "").advanced(),
                FieldSpec::new("bar3", "").has_type(processor()),
            ]),
        ));
        registry.register(ComponentSpec::new(
            format!("testyamlsanitbaz{}", ty),
            ty,
            FieldSpec::component().map().with_children(vec![
                FieldSpec::new("baz1", ""),
                FieldSpec::new("baz2", "").advanced(),
                FieldSpec::new("baz3", "").has_type(processor()),
            ]),
        ));
    }
    registry
}
