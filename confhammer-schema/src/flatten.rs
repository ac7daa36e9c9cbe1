//! Flattened field listings for documentation renderers

use serde::Serialize;

use crate::field::{Collection, FieldSpec};

/// One field of a flattened listing.
#[derive(Debug, Clone, Serialize)]
pub struct FlatField<'a> {
    /// Dot path from the listing root, e.g. `batching.processors[].label`.
    pub full_name: String,
    pub spec: &'a FieldSpec,
    /// The default value as JSON text.
    pub default_rendered: Option<String>,
}

impl FieldSpec {
    /// List every non-deprecated descendant depth-first.
    ///
    /// ```
    /// use confhammer_schema::FieldSpec;
    ///
    /// let spec = FieldSpec::new("", "").with_children(vec![FieldSpec::new("batching", "")
    ///     .array()
    ///     .with_children(vec![FieldSpec::int("count", "").has_default(1)])]);
    /// let names: Vec<_> = spec
    ///     .flatten_children_for_docs()
    ///     .into_iter()
    ///     .map(|f| f.full_name)
    ///     .collect();
    /// assert_eq!(names, vec!["batching", "batching[].count"]);
    /// ```
    pub fn flatten_children_for_docs(&self) -> Vec<FlatField<'_>> {
        let mut fields = Vec::new();
        walk("", &self.children, &mut fields);
        fields
    }
}

fn walk<'a>(path: &str, specs: &'a [FieldSpec], out: &mut Vec<FlatField<'a>>) {
    for spec in specs.iter().filter(|s| !s.is_deprecated()) {
        let full_name = format!("{}{}", path, spec.name);
        out.push(FlatField {
            full_name: full_name.clone(),
            spec,
            default_rendered: spec
                .default
                .as_ref()
                .and_then(|d| serde_json::to_string(d).ok()),
        });

        if !spec.children.is_empty() {
            let suffix = match spec.collection {
                Collection::Array => "[]",
                Collection::Map => ".<name>",
                Collection::Scalar => "",
            };
            walk(&format!("{}{}.", full_name, suffix), &spec.children, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_paths_and_defaults() {
        let spec = FieldSpec::component().with_children(vec![
            FieldSpec::string("url", "").has_default("http://localhost"),
            FieldSpec::deprecated_field("old"),
            FieldSpec::new("headers", "")
                .map()
                .with_children(vec![FieldSpec::string("value", "")]),
            FieldSpec::new("tls", "").with_children(vec![
                FieldSpec::bool("enabled", "").has_default(false),
                FieldSpec::new("certs", "")
                    .array()
                    .with_children(vec![FieldSpec::string("cert_file", "")]),
            ]),
        ]);

        let flat = spec.flatten_children_for_docs();
        let listing: Vec<(&str, Option<&str>)> = flat
            .iter()
            .map(|f| (f.full_name.as_str(), f.default_rendered.as_deref()))
            .collect();
        assert_eq!(
            listing,
            vec![
                ("url", Some("\"http://localhost\"")),
                ("headers", None),
                ("headers.<name>.value", None),
                ("tls", None),
                ("tls.enabled", Some("false")),
                ("tls.certs", None),
                ("tls.certs[].cert_file", None),
            ]
        );
    }
}
