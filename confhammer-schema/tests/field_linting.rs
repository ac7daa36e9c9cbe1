//! Linting of documents against standalone field specs

mod common;

use common::node;
use confhammer_schema::{lint_field, FieldSpec, Lint, LintContext};
use rstest::rstest;

#[rstest]
#[case::expected_string_got_array(
    FieldSpec::string("foo", ""),
    r#"["foo","bar"]"#,
    Some((1, "expected string value"))
)]
#[case::expected_array_got_string(
    FieldSpec::string("foo", "").array(),
    r#""foo""#,
    Some((1, "expected array value"))
)]
#[case::expected_object_got_string(
    FieldSpec::new("foo", "").with_children(vec![FieldSpec::string("bar", "")]),
    r#""foo""#,
    Some((1, "expected object value"))
)]
#[case::expected_string_got_object(
    FieldSpec::new("foo", "").with_children(vec![FieldSpec::string("bar", "")]),
    "bar: {}",
    Some((1, "expected string value"))
)]
#[case::expected_string_got_object_nested(
    FieldSpec::new("foo", "").with_children(vec![
        FieldSpec::new("bar", "").with_children(vec![FieldSpec::string("baz", "")]),
    ]),
    "bar:\n  baz: {}",
    Some((2, "expected string value"))
)]
#[case::missing_non_optional_field(
    FieldSpec::new("foo", "").with_children(vec![
        FieldSpec::string("bar", "").has_default("barv"),
        FieldSpec::string("baz", ""),
        FieldSpec::string("buz", "").optional(),
        FieldSpec::string("bev", ""),
    ]),
    "bev: hello world",
    Some((1, "field baz is required"))
)]
#[case::valid_document(
    FieldSpec::new("foo", "").with_children(vec![
        FieldSpec::int("count", ""),
        FieldSpec::bool("enabled", "").optional(),
    ]),
    "count: 5\nenabled: yes",
    None
)]
fn test_field_linting(
    #[case] spec: FieldSpec,
    #[case] src: &str,
    #[case] expected: Option<(usize, &str)>,
) {
    let lints = lint_field(&mut LintContext::default(), &spec, &node(src));
    let expected: Vec<Lint> = expected
        .into_iter()
        .map(|(line, message)| Lint::error(line, message))
        .collect();
    assert_eq!(lints, expected);
}

#[test]
fn test_required_reported_after_present_keys() {
    let spec = FieldSpec::new("foo", "").with_children(vec![
        FieldSpec::string("a", ""),
        FieldSpec::string("b", ""),
    ]);
    let lints = lint_field(
        &mut LintContext::default(),
        &spec,
        &node("\nc: 1\n"),
    );
    assert_eq!(
        lints,
        vec![
            Lint::error(2, "field c not recognised"),
            Lint::error(2, "field a is required"),
            Lint::error(2, "field b is required"),
        ]
    );
}

#[test]
fn test_aliased_subtree_linted_once() {
    let spec = FieldSpec::new("root", "").with_children(vec![
        FieldSpec::new("first", "").with_children(vec![FieldSpec::int("n", "")]),
        FieldSpec::new("second", "").with_children(vec![FieldSpec::int("n", "")]),
    ]);
    let src = "first: &shared\n  n: 1\n  bad: 2\nsecond: *shared\n";
    let lints = lint_field(&mut LintContext::default(), &spec, &node(src));
    assert_eq!(lints, vec![Lint::error(3, "field bad not recognised")]);
}

#[test]
fn test_empty_value_linted_at_its_key() {
    let spec = FieldSpec::new("root", "").with_children(vec![
        FieldSpec::new("a", "").with_children(vec![FieldSpec::string("x", "")]),
        FieldSpec::string("b", ""),
    ]);
    let lints = lint_field(&mut LintContext::default(), &spec, &node("a:\n\n\nb: hi\n"));
    assert_eq!(lints, vec![Lint::error(1, "expected object value")]);
}

#[test]
fn test_empty_array_item_linted_at_its_indicator() {
    let spec = FieldSpec::new("root", "").with_children(vec![FieldSpec::new("items", "")
        .array()
        .with_children(vec![FieldSpec::string("x", "")])]);
    let src = "items:\n  - x: a\n  -\n\n  - x: b\n";
    let lints = lint_field(&mut LintContext::default(), &spec, &node(src));
    assert_eq!(lints, vec![Lint::error(3, "expected object value")]);
}
