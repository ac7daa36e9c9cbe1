//! Component types and component specs
//!
//! A component is a named, typed unit of the host system (an input, a
//! processor, an output, ...). Each registered component publishes the field
//! spec of its configuration body.
//!
//! # Example
//!
//! ```
//! use confhammer_schema::ComponentType;
//!
//! let ty: ComponentType = "rate_limit".parse().unwrap();
//! assert_eq!(ty, ComponentType::RateLimit);
//! assert_eq!(ty.to_string(), "rate_limit");
//! ```

use serde::{Deserialize, Serialize};
use serde_yaml_ng::Value;
use std::fmt;

use crate::field::{FieldKind, FieldSpec, Status};
use crate::lint::Lint;

/// The kinds of component a configuration document can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    Buffer,
    Cache,
    Input,
    Metrics,
    Output,
    Processor,
    RateLimit,
    Tracer,
}

impl ComponentType {
    /// Every component type, in a stable order.
    pub const ALL: [ComponentType; 8] = [
        ComponentType::Buffer,
        ComponentType::Cache,
        ComponentType::Input,
        ComponentType::Metrics,
        ComponentType::Output,
        ComponentType::Processor,
        ComponentType::RateLimit,
        ComponentType::Tracer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentType::Buffer => "buffer",
            ComponentType::Cache => "cache",
            ComponentType::Input => "input",
            ComponentType::Metrics => "metrics",
            ComponentType::Output => "output",
            ComponentType::Processor => "processor",
            ComponentType::RateLimit => "rate_limit",
            ComponentType::Tracer => "tracer",
        }
    }

    /// Whether components of this type may carry a `label`.
    pub fn supports_label(self) -> bool {
        matches!(
            self,
            ComponentType::Input
                | ComponentType::Processor
                | ComponentType::Output
                | ComponentType::Cache
                | ComponentType::RateLimit
        )
    }

    /// Whether components of this type may carry a `processors` list.
    pub fn supports_processors(self) -> bool {
        matches!(self, ComponentType::Input | ComponentType::Output)
    }

    /// Fields accepted beside the component key at the root of a component
    /// mapping.
    ///
    /// `type` names the component explicitly. `label` is checked for
    /// collisions across the whole document and `processors` holds a list of
    /// processor components.
    pub fn reserved_fields(self) -> Vec<FieldSpec> {
        let mut fields = vec![FieldSpec::string(
            "type",
            "The name of the component, when not implied by its key.",
        )
        .optional()];

        if self.supports_label() {
            fields.push(
                FieldSpec::string("label", "A unique label for the component.")
                    .optional()
                    .linter(|ctx, line, _column, value| {
                        let Some(label) = value.as_str() else {
                            return Vec::new();
                        };
                        if label.is_empty() {
                            return Vec::new();
                        }
                        match ctx.record_label(label, line) {
                            Some(previous) => vec![Lint::error(
                                line,
                                format!(
                                    "Label '{}' collides with a previously defined label at line {}",
                                    label, previous
                                ),
                            )],
                            None => Vec::new(),
                        }
                    }),
            );
        }

        if self.supports_processors() {
            fields.push(
                FieldSpec::new(
                    "processors",
                    "A list of processors to apply to messages of this component.",
                )
                .array()
                .has_type(FieldKind::Component(ComponentType::Processor))
                .optional()
                .omit_when(|field, _parent| match field {
                    Value::Sequence(items) if items.is_empty() => {
                        Some("field processors is empty and can be removed".to_string())
                    }
                    _ => None,
                }),
            );
        }

        fields
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ComponentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| format!("Invalid component type: {}", s))
    }
}

/// The published schema of one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub status: Status,
    /// Spec of the value found under the component's key.
    pub config: FieldSpec,
}

impl ComponentSpec {
    pub fn new(name: impl Into<String>, component_type: ComponentType, config: FieldSpec) -> Self {
        Self {
            name: name.into(),
            component_type,
            summary: String::new(),
            status: Status::Common,
            config,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }
}
