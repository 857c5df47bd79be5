//! Attribute definitions and the per-attribute validation engine.
//!
//! An [`Attribute`] is an immutable declarative description of one field:
//! its value type, cardinality, policies, canonical values, and attached
//! parsers and validators. Complex attributes own an ordered, name-unique
//! collection of sub-attributes. [`Attribute::validate`] walks one raw
//! value against its definition and produces a typed value plus a
//! [`ValidationIssues`] tree.

use std::sync::Arc;

use crate::container::{ScimData, ScimValue};
use crate::error::{ScimError, ValidationError};
use crate::issues::{Location, ValidationIssues};
use crate::path::AttrRep;
use crate::schema::types::{AttributeIssuer, AttributeType, Mutability, Returned, Uniqueness};
use crate::schema::validators::{SinglePrimaryValue, ValueValidator};

/// A post-parse processing step attached to an attribute.
///
/// Parsers may refine the typed value (e.g. turn an error status string
/// into an integer) and contribute issues of their own. A non-proceeding
/// issue from a parser stops the chain.
pub type ValueParser = fn(&ScimValue) -> (ScimValue, ValidationIssues);

/// Immutable definition of a single schema attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    rep: AttrRep,
    kind: AttributeType,
    required: bool,
    case_exact: bool,
    multi_valued: bool,
    canonical_values: Vec<String>,
    validate_canonical_values: bool,
    mutability: Mutability,
    returned: Returned,
    uniqueness: Uniqueness,
    issuer: AttributeIssuer,
    reference_types: Vec<String>,
    parsers: Vec<ValueParser>,
    validators: Vec<Arc<dyn ValueValidator>>,
    sub_attrs: Attrs,
}

impl Attribute {
    /// Starts building an attribute of the given type.
    pub fn builder(name: &str, kind: AttributeType) -> AttributeBuilder {
        AttributeBuilder::new(name, kind)
    }

    /// Starts building a complex attribute.
    pub fn complex(name: &str) -> AttributeBuilder {
        AttributeBuilder::new(name, AttributeType::Complex)
    }

    pub fn rep(&self) -> &AttrRep {
        &self.rep
    }

    /// The attribute's declared name, in its declared casing.
    pub fn name(&self) -> &str {
        self.rep.attr()
    }

    pub fn kind(&self) -> AttributeType {
        self.kind
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn case_exact(&self) -> bool {
        self.case_exact
    }

    pub fn multi_valued(&self) -> bool {
        self.multi_valued
    }

    pub fn canonical_values(&self) -> &[String] {
        &self.canonical_values
    }

    pub fn mutability(&self) -> Mutability {
        self.mutability
    }

    pub fn returned(&self) -> Returned {
        self.returned
    }

    pub fn uniqueness(&self) -> Uniqueness {
        self.uniqueness
    }

    pub fn issuer(&self) -> AttributeIssuer {
        self.issuer
    }

    pub fn reference_types(&self) -> &[String] {
        &self.reference_types
    }

    /// Sub-attributes of a complex attribute; empty otherwise.
    pub fn sub_attrs(&self) -> &Attrs {
        &self.sub_attrs
    }

    /// A copy of this definition with its reference qualified under
    /// `schema`, as done when a schema adopts its attribute literals.
    pub(crate) fn bound_to(&self, schema: &str, extension: bool) -> Attribute {
        let mut bound = self.clone();
        bound.rep = self.rep.qualified(schema, extension);
        bound
    }

    /// Validates one raw value against this definition.
    ///
    /// Implements the attribute engine: required check, list-shape check
    /// for multi-valued attributes, per-element type parsing with sibling
    /// independence, canonical-value check, then attached parsers and
    /// validators. The first structural failure on a value short-circuits
    /// the semantic checks on that value.
    pub fn validate(&self, value: &ScimValue) -> (ScimValue, ValidationIssues) {
        let mut issues = ValidationIssues::new();

        if let ScimValue::Missing | ScimValue::Null = value {
            if self.required {
                issues.add(ValidationError::Required, false);
                // An explicit null does not satisfy a required attribute
                // and must not surface in the output either.
                return (ScimValue::Missing, issues);
            }
            return (value.clone(), issues);
        }

        let parsed = if self.multi_valued {
            match value {
                ScimValue::List(items) => {
                    let mut out = Vec::with_capacity(items.len());
                    for (i, item) in items.iter().enumerate() {
                        let (item, item_issues) = self.validate_one(item);
                        issues.merge_at(Location::index(i), item_issues);
                        out.push(item);
                    }
                    ScimValue::List(out)
                }
                other => {
                    issues.add(
                        ValidationError::BadType {
                            expected: "list",
                            actual: other.type_name(),
                        },
                        false,
                    );
                    ScimValue::Invalid
                }
            }
        } else {
            let (parsed, one_issues) = self.validate_one(value);
            issues.merge(one_issues);
            parsed
        };

        if parsed.is_invalid() || !issues.can_proceed() {
            return (parsed, issues);
        }

        let mut parsed = parsed;
        for parser in &self.parsers {
            let (next, parser_issues) = parser(&parsed);
            let blocked = !parser_issues.can_proceed();
            issues.merge(parser_issues);
            parsed = next;
            if blocked {
                return (parsed, issues);
            }
        }
        for validator in &self.validators {
            issues.merge(validator.validate(&parsed));
        }
        (parsed, issues)
    }

    /// Validates a single element: type parse, canonical values, and for
    /// complex attributes the recursion into declared sub-attributes.
    fn validate_one(&self, value: &ScimValue) -> (ScimValue, ValidationIssues) {
        let (parsed, mut issues) = self.kind.parse(value);
        if parsed.is_invalid() {
            return (parsed, issues);
        }

        if self.kind == AttributeType::Complex {
            let ScimValue::Data(data) = &parsed else {
                return (parsed, issues);
            };
            let mut out = ScimData::new();
            for sub_attr in self.sub_attrs.iter() {
                let sub_value = data.get(&sub_attr.rep().unqualified());
                if sub_value.is_missing() && !sub_attr.required() {
                    continue;
                }
                let (sub_parsed, sub_issues) = sub_attr.validate(&sub_value);
                issues.merge_at(Location::attr(sub_attr.name()), sub_issues);
                if !sub_parsed.is_missing() {
                    out.insert(sub_attr.name(), sub_parsed);
                }
            }
            return (ScimValue::Data(out), issues);
        }

        if !self.canonical_values.is_empty() {
            if let ScimValue::Str(provided) = &parsed {
                let matched = self.canonical_values.iter().any(|canonical| {
                    self.kind
                        .compare(&ScimValue::Str(canonical.clone()), &parsed, self.case_exact)
                });
                if !matched {
                    issues.add(
                        ValidationError::MustBeOneOf {
                            allowed: self.canonical_values.clone(),
                            provided: provided.clone(),
                        },
                        !self.validate_canonical_values,
                    );
                    if self.validate_canonical_values {
                        return (ScimValue::Invalid, issues);
                    }
                }
            }
        }

        (parsed, issues)
    }
}

/// Builder for [`Attribute`], validating the declaration at `build`.
#[derive(Debug, Clone)]
pub struct AttributeBuilder {
    name: String,
    kind: AttributeType,
    required: bool,
    case_exact: bool,
    multi_valued: bool,
    canonical_values: Vec<String>,
    validate_canonical_values: bool,
    mutability: Mutability,
    returned: Returned,
    uniqueness: Uniqueness,
    issuer: AttributeIssuer,
    reference_types: Vec<String>,
    parsers: Vec<ValueParser>,
    validators: Vec<Arc<dyn ValueValidator>>,
    sub_attrs: Vec<Attribute>,
}

impl AttributeBuilder {
    fn new(name: &str, kind: AttributeType) -> Self {
        AttributeBuilder {
            name: name.to_owned(),
            kind,
            required: false,
            case_exact: false,
            multi_valued: false,
            canonical_values: Vec::new(),
            validate_canonical_values: false,
            mutability: Mutability::default(),
            returned: Returned::default(),
            uniqueness: Uniqueness::default(),
            issuer: AttributeIssuer::default(),
            reference_types: Vec::new(),
            parsers: Vec::new(),
            validators: Vec::new(),
            sub_attrs: Vec::new(),
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn case_exact(mut self, case_exact: bool) -> Self {
        self.case_exact = case_exact;
        self
    }

    pub fn multi_valued(mut self, multi_valued: bool) -> Self {
        self.multi_valued = multi_valued;
        self
    }

    /// Declares the permitted string values.
    pub fn canonical_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.canonical_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Makes a canonical-value violation a hard error instead of a
    /// warning.
    pub fn validate_canonical_values(mut self, validate: bool) -> Self {
        self.validate_canonical_values = validate;
        self
    }

    pub fn mutability(mut self, mutability: Mutability) -> Self {
        self.mutability = mutability;
        self
    }

    pub fn returned(mut self, returned: Returned) -> Self {
        self.returned = returned;
        self
    }

    pub fn uniqueness(mut self, uniqueness: Uniqueness) -> Self {
        self.uniqueness = uniqueness;
        self
    }

    pub fn issuer(mut self, issuer: AttributeIssuer) -> Self {
        self.issuer = issuer;
        self
    }

    pub fn reference_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reference_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn parser(mut self, parser: ValueParser) -> Self {
        self.parsers.push(parser);
        self
    }

    pub fn validator(mut self, validator: impl ValueValidator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    pub fn sub_attribute(mut self, attr: Attribute) -> Self {
        self.sub_attrs.push(attr);
        self
    }

    pub fn sub_attributes(mut self, attrs: impl IntoIterator<Item = Attribute>) -> Self {
        self.sub_attrs.extend(attrs);
        self
    }

    /// Finalizes the definition, checking it against the attribute-model
    /// constraints.
    pub fn build(mut self) -> Result<Attribute, ScimError> {
        let rep = AttrRep::new(&self.name)?;

        if self.kind != AttributeType::Complex && !self.sub_attrs.is_empty() {
            return Err(ScimError::SubAttributesNotAllowed {
                attr: self.name.clone(),
            });
        }
        if !self.canonical_values.is_empty() && !self.kind.is_string_like() {
            return Err(ScimError::CanonicalValuesNotAllowed {
                attr: self.name.clone(),
            });
        }

        if self.kind == AttributeType::Complex && self.multi_valued {
            self.validators.push(Arc::new(SinglePrimaryValue));
        }

        let sub_attrs = Attrs::new(self.sub_attrs).map_err(|err| match err {
            ScimError::DuplicateAttribute { attr } => ScimError::DuplicateSubAttribute {
                attr: self.name.clone(),
                sub_attr: attr,
            },
            other => other,
        })?;

        Ok(Attribute {
            rep,
            kind: self.kind,
            required: self.required,
            case_exact: self.case_exact,
            multi_valued: self.multi_valued,
            canonical_values: self.canonical_values,
            validate_canonical_values: self.validate_canonical_values,
            mutability: self.mutability,
            returned: self.returned,
            uniqueness: self.uniqueness,
            issuer: self.issuer,
            reference_types: self.reference_types,
            parsers: self.parsers,
            validators: self.validators,
            sub_attrs,
        })
    }
}

/// Ordered collection of attributes, unique by case-insensitive name.
#[derive(Debug, Clone, Default)]
pub struct Attrs {
    attrs: Vec<Attribute>,
}

impl Attrs {
    /// Builds the collection, rejecting duplicate names.
    pub fn new(attrs: Vec<Attribute>) -> Result<Self, ScimError> {
        for (i, attr) in attrs.iter().enumerate() {
            if attrs[..i]
                .iter()
                .any(|earlier| earlier.name().eq_ignore_ascii_case(attr.name()))
            {
                return Err(ScimError::DuplicateAttribute {
                    attr: attr.name().to_owned(),
                });
            }
        }
        Ok(Attrs { attrs })
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Declaration-order iteration.
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attrs.iter()
    }

    /// Case-insensitive lookup by path; descends into sub-attributes when
    /// the reference names one.
    pub fn get(&self, rep: &AttrRep) -> Option<&Attribute> {
        let top = self
            .attrs
            .iter()
            .find(|attr| attr.rep().top_level_equals(rep))?;
        match rep.child() {
            None => Some(top),
            Some(child) => top.sub_attrs().get(&child),
        }
    }
}
