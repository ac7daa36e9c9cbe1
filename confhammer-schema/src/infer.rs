//! Inferring field specs from an example document

use confhammer_yaml::{Node, NodeContent};
use serde_yaml_ng::{Mapping, Value};

use crate::coerce::field_to_value;
use crate::field::{FieldKind, FieldSpec};

/// Derive field specs from the keys of an example mapping.
///
/// Scalars become typed fields defaulting to the example value, mappings
/// become objects and sequences become arrays typed by their first element.
/// A node that is not a mapping yields no fields.
///
/// ```
/// use confhammer_schema::{infer_fields, FieldKind};
///
/// let node = confhammer_yaml::parse("a: foo\nc: 21\n").unwrap();
/// let fields = infer_fields(&node);
/// assert_eq!(fields[0].kind, FieldKind::String);
/// assert_eq!(fields[1].default, Some(21.into()));
/// ```
pub fn infer_fields(node: &Node) -> Vec<FieldSpec> {
    let Some(pairs) = node.as_mapping() else {
        return Vec::new();
    };
    pairs
        .iter()
        .filter_map(|(key, value)| Some(infer_field(key.as_scalar()?, value)))
        .collect()
}

fn infer_field(name: &str, node: &Node) -> FieldSpec {
    let node = node.resolve();
    let field = FieldSpec::new(name, "");
    match &node.content {
        NodeContent::Mapping(_) => {
            let children = infer_fields(node);
            if children.is_empty() {
                field
                    .has_type(FieldKind::Object)
                    .has_default(Value::Mapping(Mapping::new()))
            } else {
                field.with_children(children)
            }
        }
        NodeContent::Sequence(items) => {
            let mut field = field.array();
            let Some(first) = items.first() else {
                return field;
            };
            let element = infer_field("", first);
            field.kind = element.kind;
            field.children = element.children;
            if matches!(
                field.kind,
                FieldKind::String | FieldKind::Int | FieldKind::Float | FieldKind::Bool
            ) {
                field.default = field_to_value(&field, false, node).ok();
            }
            field
        }
        NodeContent::Scalar { .. } => {
            let value = node.to_value();
            let kind = match &value {
                Value::Bool(_) => FieldKind::Bool,
                Value::Number(n) if n.is_f64() => FieldKind::Float,
                Value::Number(_) => FieldKind::Int,
                Value::String(_) => FieldKind::String,
                _ => return field,
            };
            field.has_type(kind).has_default(value)
        }
        // resolve() never returns an alias
        NodeContent::Alias(_) => field,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confhammer_yaml::parse;

    #[test]
    fn test_null_scalar_is_untyped() {
        let fields = infer_fields(&parse("a: ~\n").unwrap());
        assert_eq!(fields, vec![FieldSpec::new("a", "")]);
    }

    #[test]
    fn test_empty_mapping_defaults_to_empty_object() {
        let fields = infer_fields(&parse("a: {}\n").unwrap());
        assert_eq!(
            fields,
            vec![FieldSpec::new("a", "")
                .has_type(FieldKind::Object)
                .has_default(Value::Mapping(Mapping::new()))]
        );
    }

    #[test]
    fn test_sequence_of_objects() {
        let fields = infer_fields(&parse("a:\n  - b: 1\n  - b: 2\n").unwrap());
        assert_eq!(
            fields,
            vec![FieldSpec::new("a", "")
                .array()
                .with_children(vec![FieldSpec::int("b", "").has_default(1)])]
        );
    }

    #[test]
    fn test_non_mapping_yields_nothing() {
        assert!(infer_fields(&parse("[1, 2]").unwrap()).is_empty());
    }
}
