//! Example document generation

use confhammer_yaml::Node;

use crate::field::{Collection, FieldKind, FieldSpec};

/// Render an example node for a field.
///
/// A declared default always wins. Without `recurse`, objects and maps
/// render as `{}`, arrays as `[]` and anything else as null. With `recurse`,
/// objects list every child in order and leaves render as the zero value of
/// their kind.
///
/// ```
/// use confhammer_schema::{to_example_node, FieldSpec};
/// use confhammer_yaml::to_yaml_string;
///
/// let spec = FieldSpec::new("foo", "").with_children(vec![
///     FieldSpec::string("bar", ""),
///     FieldSpec::int("buz", "").has_default(5),
/// ]);
/// let node = to_example_node(&spec, true);
/// assert_eq!(to_yaml_string(&node).unwrap(), "bar: ''\nbuz: 5\n");
/// ```
pub fn to_example_node(spec: &FieldSpec, recurse: bool) -> Node {
    if let Some(default) = &spec.default {
        return Node::from_value(default);
    }

    match spec.collection {
        Collection::Array => return Node::sequence(Vec::new()),
        Collection::Map => return Node::mapping(Vec::new()),
        Collection::Scalar => {}
    }

    if !spec.children.is_empty() {
        if !recurse {
            return Node::mapping(Vec::new());
        }
        return Node::mapping(
            spec.children
                .iter()
                .map(|child| (Node::string(child.name.clone()), to_example_node(child, true)))
                .collect(),
        );
    }

    if !recurse {
        return Node::null();
    }

    match spec.kind {
        FieldKind::String => Node::string(""),
        FieldKind::Int | FieldKind::Float => Node::scalar("0"),
        FieldKind::Bool => Node::scalar("false"),
        FieldKind::Object | FieldKind::Component(_) => Node::mapping(Vec::new()),
        FieldKind::Unknown => Node::null(),
    }
}
