//! Field specs: the schema model
//!
//! A [`FieldSpec`] describes one named configuration field: its kind, whether
//! it holds a single value, an array or a map of them, its default, its
//! documentation status and optional hooks for custom linting and for
//! flagging disallowed combinations. Object fields carry an ordered list of
//! child specs, which is also the canonical field order used when sanitising.
//!
//! Specs are built with chained constructors:
//!
//! ```
//! use confhammer_schema::{ComponentType, FieldKind, FieldSpec};
//!
//! let spec = FieldSpec::new("batching", "Batch messages before sending.").with_children(vec![
//!     FieldSpec::int("count", "Messages per batch.").has_default(10),
//!     FieldSpec::string("period", "Flush period.").optional(),
//!     FieldSpec::new("processors", "")
//!         .array()
//!         .has_type(FieldKind::Component(ComponentType::Processor))
//!         .advanced()
//!         .optional(),
//! ]);
//!
//! assert_eq!(spec.kind, FieldKind::Object);
//! assert!(!spec.child("count").unwrap().is_required());
//! ```

use serde::{Deserialize, Serialize};
use serde_yaml_ng::Value;
use std::fmt;
use std::sync::Arc;

use crate::component::ComponentType;
use crate::lint::{Lint, LintContext};

/// Custom lint hook: receives the context, the line and column of the field's
/// value and its coerced value.
pub type LintFn =
    Arc<dyn Fn(&mut LintContext<'_>, usize, usize, &Value) -> Vec<Lint> + Send + Sync>;

/// Omission hook: receives the field's coerced value and its parent's coerced
/// value, and returns a reason when the field must not be set.
pub type OmitFn = Arc<dyn Fn(&Value, &Value) -> Option<String> + Send + Sync>;

/// The type of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Int,
    Float,
    Bool,
    Object,
    /// A component of the given type, resolved through the registry by the
    /// key present in the document.
    Component(ComponentType),
    /// Declared without a type; values are decoded generically.
    #[default]
    Unknown,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::String => write!(f, "string"),
            FieldKind::Int => write!(f, "int"),
            FieldKind::Float => write!(f, "float"),
            FieldKind::Bool => write!(f, "bool"),
            FieldKind::Object => write!(f, "object"),
            FieldKind::Component(ty) => write!(f, "{}", ty),
            FieldKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// Whether a field holds one value, an array of values or a map of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    #[default]
    Scalar,
    Array,
    Map,
}

/// Documentation significance of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Common,
    Advanced,
    Deprecated,
}

/// Schema of one configuration field.
#[derive(Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub collection: Collection,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FieldSpec>,
    #[serde(skip)]
    pub linter: Option<LintFn>,
    #[serde(skip)]
    pub omit: Option<OmitFn>,
}

impl FieldSpec {
    /// An untyped common field.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind: FieldKind::Unknown,
            collection: Collection::Scalar,
            status: Status::Common,
            optional: false,
            default: None,
            children: Vec::new(),
            linter: None,
            omit: None,
        }
    }

    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description).has_type(FieldKind::String)
    }

    pub fn int(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description).has_type(FieldKind::Int)
    }

    pub fn float(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description).has_type(FieldKind::Float)
    }

    pub fn bool(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description).has_type(FieldKind::Bool)
    }

    /// A deprecated field with no further documentation.
    pub fn deprecated_field(name: impl Into<String>) -> Self {
        Self::new(name, "DEPRECATED: Do not use.").deprecated()
    }

    /// The anonymous root spec of a component's configuration body.
    pub fn component() -> Self {
        Self::new("", "").has_type(FieldKind::Object)
    }

    pub fn has_type(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    /// Declare child fields. An untyped field becomes an object.
    pub fn with_children(mut self, children: Vec<FieldSpec>) -> Self {
        if self.kind == FieldKind::Unknown {
            self.kind = FieldKind::Object;
        }
        self.children = children;
        self
    }

    pub fn has_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn array(mut self) -> Self {
        self.collection = Collection::Array;
        self
    }

    pub fn map(mut self) -> Self {
        self.collection = Collection::Map;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn advanced(mut self) -> Self {
        self.status = Status::Advanced;
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.status = Status::Deprecated;
        self
    }

    /// Attach a custom lint hook, run on the field's coerced value once its
    /// shape is valid.
    pub fn linter<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut LintContext<'_>, usize, usize, &Value) -> Vec<Lint> + Send + Sync + 'static,
    {
        self.linter = Some(Arc::new(hook));
        self
    }

    /// Attach an omission hook. When it returns a reason the field is
    /// reported at its key with that reason.
    pub fn omit_when<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Value, &Value) -> Option<String> + Send + Sync + 'static,
    {
        self.omit = Some(Arc::new(hook));
        self
    }

    /// A field is required when it is neither optional nor defaulted.
    pub fn is_required(&self) -> bool {
        !self.optional && self.default.is_none()
    }

    pub fn is_deprecated(&self) -> bool {
        self.status == Status::Deprecated
    }

    pub fn is_advanced(&self) -> bool {
        self.status == Status::Advanced
    }

    /// Look up a direct child by name.
    pub fn child(&self, name: &str) -> Option<&FieldSpec> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Whether values of this field are mappings of named children.
    pub fn is_object(&self) -> bool {
        self.kind == FieldKind::Object || !self.children.is_empty()
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("collection", &self.collection)
            .field("status", &self.status)
            .field("optional", &self.optional)
            .field("default", &self.default)
            .field("children", &self.children)
            .field("linter", &self.linter.is_some())
            .field("omit", &self.omit.is_some())
            .finish()
    }
}

/// Hooks compare by identity.
impl PartialEq for FieldSpec {
    fn eq(&self, other: &Self) -> bool {
        fn same_hook<T: ?Sized>(a: &Option<Arc<T>>, b: &Option<Arc<T>>) -> bool {
            match (a, b) {
                (None, None) => true,
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                _ => false,
            }
        }

        self.name == other.name
            && self.description == other.description
            && self.kind == other.kind
            && self.collection == other.collection
            && self.status == other.status
            && self.optional == other.optional
            && self.default == other.default
            && self.children == other.children
            && same_hook(&self.linter, &other.linter)
            && same_hook(&self.omit, &other.omit)
    }
}
