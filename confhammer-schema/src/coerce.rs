//! Coercion of document trees into generic values
//!
//! Values are decoded under the guidance of their field specs: declared
//! fields take the type their spec names, absent fields take their defaults
//! and undeclared fields are decoded as the document wrote them. A value that
//! cannot be coerced to its declared type is passed through in its generic
//! form, so coercion only fails on structural problems.

use serde_yaml_ng::{Mapping, Number, Value};

use confhammer_yaml::resolve::{is_null, parse_bool, parse_float, parse_int};
use confhammer_yaml::{Node, NodeContent};

use crate::error::{Result, SchemaError};
use crate::field::{Collection, FieldKind, FieldSpec};

/// Decode a mapping node into a generic value using a list of field specs.
///
/// Declared fields come first, in declaration order, followed by undeclared
/// keys in document order. When `remove_deprecated` is set, deprecated
/// fields present in the document are left out. A node that is not a
/// mapping is decoded generically.
///
/// ```
/// use confhammer_schema::{to_generic_value, FieldSpec};
///
/// let specs = vec![
///     FieldSpec::string("a", "").has_default("foo"),
///     FieldSpec::bool("b", "").has_default(true),
/// ];
/// let node = confhammer_yaml::parse("a: hello\n").unwrap();
/// let value = to_generic_value(&specs, false, &node).unwrap();
/// assert_eq!(value, serde_yaml_ng::from_str::<serde_yaml_ng::Value>("a: hello\nb: true\n").unwrap());
/// ```
pub fn to_generic_value(specs: &[FieldSpec], remove_deprecated: bool, node: &Node) -> Result<Value> {
    let node = node.resolve();
    let Some(pairs) = node.as_mapping() else {
        return Ok(node.to_value());
    };

    let mut entries = Vec::with_capacity(pairs.len());
    for (key, value) in pairs {
        entries.push((scalar_key(key)?, value));
    }
    let mut mapping = Mapping::new();
    for spec in specs {
        let present = entries
            .iter()
            .find(|(k, _)| *k == spec.name)
            .map(|(_, v)| *v);
        match present {
            Some(_) if remove_deprecated && spec.is_deprecated() => {}
            Some(value) => {
                mapping.insert(
                    Value::String(spec.name.clone()),
                    field_to_value(spec, remove_deprecated, value)?,
                );
            }
            None => {
                if let Some(default) = &spec.default {
                    mapping.insert(Value::String(spec.name.clone()), default.clone());
                }
            }
        }
    }

    for (key, value) in &entries {
        if specs.iter().any(|s| s.name == *key) {
            continue;
        }
        let key = Value::String(key.to_string());
        if !mapping.contains_key(&key) {
            mapping.insert(key, value.to_value());
        }
    }

    Ok(Value::Mapping(mapping))
}

/// Decode the value of a single field.
///
/// Arrays and maps are coerced element-wise, object elements recurse into
/// their children and scalars are coerced to the declared kind.
pub fn field_to_value(spec: &FieldSpec, remove_deprecated: bool, node: &Node) -> Result<Value> {
    let node = node.resolve();
    match spec.collection {
        Collection::Array => match node.as_sequence() {
            Some(items) => items
                .iter()
                .map(|item| element_to_value(spec, remove_deprecated, item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Sequence),
            None => Ok(node.to_value()),
        },
        Collection::Map => match node.as_mapping() {
            Some(pairs) => {
                let mut mapping = Mapping::new();
                for (key, value) in pairs {
                    mapping.insert(
                        Value::String(scalar_key(key)?.to_string()),
                        element_to_value(spec, remove_deprecated, value)?,
                    );
                }
                Ok(Value::Mapping(mapping))
            }
            None => Ok(node.to_value()),
        },
        Collection::Scalar => element_to_value(spec, remove_deprecated, node),
    }
}

/// Decode one element of a field, ignoring its collection.
pub(crate) fn element_to_value(
    spec: &FieldSpec,
    remove_deprecated: bool,
    node: &Node,
) -> Result<Value> {
    if !spec.children.is_empty() {
        return to_generic_value(&spec.children, remove_deprecated, node);
    }
    Ok(match spec.kind {
        FieldKind::String | FieldKind::Int | FieldKind::Float | FieldKind::Bool => {
            coerce_scalar(spec.kind, node)
        }
        FieldKind::Object | FieldKind::Component(_) | FieldKind::Unknown => node.to_value(),
    })
}

fn coerce_scalar(kind: FieldKind, node: &Node) -> Value {
    let NodeContent::Scalar { value, style } = &node.resolve().content else {
        return node.to_value();
    };
    let coerced = match kind {
        // A null token decodes to the empty string
        FieldKind::String if style.is_plain() && is_null(value) => Some(Value::String(String::new())),
        FieldKind::String => Some(Value::String(value.clone())),
        FieldKind::Bool => parse_bool(value).map(Value::Bool),
        FieldKind::Int => parse_int(value).map(|i| Value::Number(Number::from(i))),
        FieldKind::Float => parse_float(value).map(|f| Value::Number(Number::from(f))),
        _ => None,
    };
    coerced.unwrap_or_else(|| node.to_value())
}

fn scalar_key(key: &Node) -> Result<&str> {
    key.as_scalar()
        .ok_or(SchemaError::NonScalarKey { line: key.line })
}

#[cfg(test)]
mod tests {
    use super::*;
    use confhammer_yaml::parse;
    use rstest::rstest;

    fn yaml(src: &str) -> Value {
        serde_yaml_ng::from_str(src).unwrap()
    }

    #[rstest]
    #[case(FieldKind::String, "no", Value::String("no".into()))]
    #[case(FieldKind::String, "10", Value::String("10".into()))]
    #[case(FieldKind::String, "~", Value::String(String::new()))]
    #[case(FieldKind::String, "'~'", Value::String("~".into()))]
    #[case(FieldKind::Bool, "yes", Value::Bool(true))]
    #[case(FieldKind::Bool, "Off", Value::Bool(false))]
    #[case(FieldKind::Bool, "maybe", Value::String("maybe".into()))]
    #[case(FieldKind::Int, "13.4", Value::Number(13.into()))]
    #[case(FieldKind::Int, "-12", Value::Number((-12).into()))]
    #[case(FieldKind::Int, "abc", Value::String("abc".into()))]
    #[case(FieldKind::Float, "11", Value::Number(11.0.into()))]
    #[case(FieldKind::Unknown, "yes", Value::String("yes".into()))]
    fn test_scalar_coercion(#[case] kind: FieldKind, #[case] src: &str, #[case] expected: Value) {
        let spec = FieldSpec::new("a", "").has_type(kind);
        let node = parse(src).unwrap();
        assert_eq!(field_to_value(&spec, false, &node).unwrap(), expected);
    }

    #[test]
    fn test_declared_fields_precede_undeclared() {
        let specs = vec![
            FieldSpec::string("a", "").has_default("x"),
            FieldSpec::int("b", "").optional(),
        ];
        let node = parse("extra: [1, 2]\nb: 3\n").unwrap();
        let value = to_generic_value(&specs, false, &node).unwrap();
        assert_eq!(value, yaml("a: x\nb: 3\nextra: [1, 2]\n"));
    }

    #[test]
    fn test_remove_deprecated_drops_present_fields() {
        let specs = vec![
            FieldSpec::string("a", ""),
            FieldSpec::deprecated_field("old"),
        ];
        let node = parse("a: x\nold: y\n").unwrap();
        assert_eq!(
            to_generic_value(&specs, false, &node).unwrap(),
            yaml("a: x\nold: y\n")
        );
        assert_eq!(to_generic_value(&specs, true, &node).unwrap(), yaml("a: x\n"));
    }

    #[test]
    fn test_non_mapping_passes_through() {
        let specs = vec![FieldSpec::string("a", "")];
        let node = parse("[1, two]").unwrap();
        assert_eq!(
            to_generic_value(&specs, false, &node).unwrap(),
            yaml("[1, two]")
        );
    }

    #[test]
    fn test_non_scalar_key_fails() {
        let spec = FieldSpec::string("m", "").map();
        let node = parse("? [a, b]\n: c\n").unwrap();
        let err = field_to_value(&spec, false, &node).unwrap_err();
        assert!(matches!(err, SchemaError::NonScalarKey { line: 1 }));
    }

    #[test]
    fn test_null_tokens_coerce_to_empty_strings() {
        let specs = vec![
            FieldSpec::string("a", ""),
            FieldSpec::string("b", ""),
            FieldSpec::string("c", ""),
        ];
        let node = parse("a: ~\nb: null\nc:\n").unwrap();
        assert_eq!(
            to_generic_value(&specs, false, &node).unwrap(),
            yaml("a: ''\nb: ''\nc: ''\n")
        );
    }

    #[test]
    fn test_alias_values_are_coerced() {
        let specs = vec![
            FieldSpec::string("a", ""),
            FieldSpec::string("b", ""),
        ];
        let node = parse("a: &v 10\nb: *v\n").unwrap();
        assert_eq!(
            to_generic_value(&specs, false, &node).unwrap(),
            yaml("a: '10'\nb: '10'\n")
        );
    }
}
