//! Schema composition and whole-resource validation.
//!
//! A [`BaseSchema`] composes attribute definitions under a schema URN and
//! orchestrates validation of an entire payload; extension schemas layer
//! additional URN-qualified attributes onto it. `validate` never fails for
//! a well-formed schema definition — it always returns a (possibly
//! partially invalid) result container plus the full issue tree.

use serde_json::Value;

use crate::container::{ScimData, ScimValue};
use crate::error::{ScimError, ValidationError};
use crate::issues::{Location, ValidationIssues};
use crate::path::AttrRep;
use crate::schema::attribute::{Attribute, Attrs};

/// An additional named schema layered onto a base resource type.
#[derive(Debug, Clone)]
pub struct SchemaExtension {
    schema: String,
    attrs: Attrs,
    required: bool,
}

impl SchemaExtension {
    /// Builds an extension; its attributes become qualified under the
    /// extension's URN.
    pub fn new(schema: &str, attrs: Vec<Attribute>, required: bool) -> Result<Self, ScimError> {
        let bound = attrs
            .into_iter()
            .map(|attr| attr.bound_to(schema, true))
            .collect();
        Ok(SchemaExtension {
            schema: schema.to_owned(),
            attrs: Attrs::new(bound)?,
            required,
        })
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    pub fn required(&self) -> bool {
        self.required
    }
}

/// A named schema URN plus its top-level attribute definitions.
#[derive(Debug, Clone)]
pub struct BaseSchema {
    schema: String,
    attrs: Attrs,
    extensions: Vec<SchemaExtension>,
}

impl BaseSchema {
    /// Builds a schema; the given attributes become qualified under its
    /// URN.
    pub fn new(schema: &str, attrs: Vec<Attribute>) -> Result<Self, ScimError> {
        let bound = attrs
            .into_iter()
            .map(|attr| attr.bound_to(schema, false))
            .collect();
        Ok(BaseSchema {
            schema: schema.to_owned(),
            attrs: Attrs::new(bound)?,
            extensions: Vec::new(),
        })
    }

    /// Registers an extension schema; order of registration is the order
    /// of validation.
    pub fn with_extension(mut self, extension: SchemaExtension) -> Result<Self, ScimError> {
        if self
            .extensions
            .iter()
            .any(|known| known.schema.eq_ignore_ascii_case(&extension.schema))
        {
            return Err(ScimError::DuplicateExtension {
                schema: extension.schema,
            });
        }
        self.extensions.push(extension);
        Ok(self)
    }

    /// The schema's URN.
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// All URNs this schema answers to: its own, then its extensions'.
    pub fn schemas(&self) -> Vec<&str> {
        std::iter::once(self.schema.as_str())
            .chain(self.extensions.iter().map(|ext| ext.schema()))
            .collect()
    }

    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    pub fn extensions(&self) -> &[SchemaExtension] {
        &self.extensions
    }

    /// Resolves an attribute reference against the base schema first,
    /// then against each extension in registration order.
    pub fn get_attr(&self, rep: &AttrRep) -> Option<&Attribute> {
        self.attrs
            .get(rep)
            .or_else(|| self.extensions.iter().find_map(|ext| ext.attrs.get(rep)))
    }

    /// Validates a whole payload against this schema.
    ///
    /// Walks the base schema's top-level attributes, then each extension
    /// in registration order, merging per-attribute results into one
    /// typed container and one issue tree keyed by fully qualified path.
    /// Unknown top-level keys are carried through to the output and
    /// flagged with an advisory issue rather than dropped silently.
    pub fn validate(&self, resource: &Value) -> (ScimData, ValidationIssues) {
        let mut issues = ValidationIssues::new();
        let Some(object) = resource.as_object() else {
            issues.add(
                ValidationError::BadType {
                    expected: "complex",
                    actual: json_type_name(resource),
                },
                false,
            );
            return (ScimData::new(), issues);
        };
        let data = ScimData::from_json_object(object);
        let mut out = ScimData::new();

        for attr in self.attrs.iter() {
            let value = data.get(attr.rep());
            let (parsed, attr_issues) = attr.validate(&value);
            issues.merge_at(Location::attr(attr.name()), attr_issues);
            if !parsed.is_missing() {
                out.insert(attr.name(), parsed);
            }
        }

        for extension in &self.extensions {
            let location = Location::attr(extension.schema());
            match data.get_key(extension.schema()) {
                ScimValue::Missing => {
                    if extension.required() {
                        issues.add_at(location, ValidationError::Required, false);
                    }
                }
                ScimValue::Data(ext_data) => {
                    let mut ext_out = ScimData::new();
                    for attr in extension.attrs().iter() {
                        let value = ext_data.get(&attr.rep().unqualified());
                        let (parsed, attr_issues) = attr.validate(&value);
                        issues.merge_at(location.clone().join(attr.name()), attr_issues);
                        if !parsed.is_missing() {
                            ext_out.insert(attr.name(), parsed);
                        }
                    }
                    out.insert(extension.schema(), ScimValue::Data(ext_out));
                }
                other => {
                    issues.add_at(
                        location,
                        ValidationError::BadType {
                            expected: "complex",
                            actual: other.type_name(),
                        },
                        false,
                    );
                }
            }
        }

        for key in data.keys() {
            let known = self
                .attrs
                .iter()
                .any(|attr| attr.name().eq_ignore_ascii_case(key))
                || self
                    .extensions
                    .iter()
                    .any(|ext| ext.schema().eq_ignore_ascii_case(key));
            if !known {
                log::trace!("unknown attribute '{key}' in '{}' payload", self.schema);
                issues.add_at(
                    Location::attr(key),
                    ValidationError::UnknownAttribute {
                        attribute: key.to_owned(),
                        schema: self.schema.clone(),
                    },
                    true,
                );
                out.insert(key, data.get_key(key));
            }
        }

        (out, issues)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() => "integer",
        Value::Number(_) => "decimal",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "complex",
    }
}
