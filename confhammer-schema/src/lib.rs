//! Schema-driven handling of component configuration documents
//!
//! `confhammer-schema` describes configuration with [`FieldSpec`] trees and
//! uses them to lint, coerce, sanitise and generate documents loaded with
//! `confhammer-yaml`. Polymorphic fields refer to a [`ComponentType`] and are
//! resolved at call time through a [`SchemaRegistry`].
//!
//! # Architecture
//!
//! - **Schema model**: [`FieldSpec`], [`ComponentSpec`] and the [`SchemaRegistry`] built at startup
//! - **Linting**: [`lint_field`] and [`lint_component`] return [`Lint`]s with source lines
//! - **Coercion**: [`to_generic_value`] and [`field_to_value`] produce typed generic values
//! - **Sanitising**: [`sanitise`] rewrites a document to canonical form
//! - **Examples**: [`to_example_node`] renders example documents from specs
//! - **Inference**: [`infer_fields`] derives specs from example documents
//!
//! # Example
//!
//! ```
//! use confhammer_schema::{
//!     lint_component, ComponentSpec, ComponentType, FieldSpec, LintContext, SchemaRegistry,
//! };
//!
//! let mut registry = SchemaRegistry::new();
//! registry.register(ComponentSpec::new(
//!     "stdin",
//!     ComponentType::Input,
//!     FieldSpec::component().with_children(vec![FieldSpec::string("codec", "").optional()]),
//! ));
//!
//! let node = confhammer_yaml::parse("stdin:\n  codec: lines\n  wat: 1\n").unwrap();
//! let lints = lint_component(&mut LintContext::new(&registry), ComponentType::Input, &node);
//! assert_eq!(lints.len(), 1);
//! assert_eq!(lints[0].line, 3);
//! assert_eq!(lints[0].message, "field wat not recognised");
//! ```

pub mod coerce;
pub mod component;
pub mod error;
pub mod example;
pub mod field;
pub mod flatten;
pub mod infer;
pub mod lint;
pub mod linter;
pub mod registry;
pub mod sanitise;

pub use coerce::{field_to_value, to_generic_value};
pub use component::{ComponentSpec, ComponentType};
pub use error::{Result, SchemaError};
pub use example::to_example_node;
pub use field::{Collection, FieldKind, FieldSpec, LintFn, OmitFn, Status};
pub use flatten::FlatField;
pub use infer::infer_fields;
pub use lint::{Lint, LintContext, LintLevel};
pub use linter::{lint_component, lint_field};
pub use registry::{ResolveError, SchemaRegistry};
pub use sanitise::{sanitise, sanitise_str, should_drop_deprecated, FieldFilter, SanitiseConfig};
