//! Error types for the SCIM data model and validation engine.
//!
//! Two tiers are distinguished. [`ScimError`] covers programmer misuse:
//! malformed attribute paths at schema-definition time, keying mistakes in
//! the data container, or inconsistent attribute declarations. These are
//! returned as `Err` immediately because they indicate a static bug, not
//! bad end-user input. [`ValidationError`] is the taxonomy of expected
//! input problems; values of this type are never raised — they travel
//! inside a [`ValidationIssues`](crate::issues::ValidationIssues) tree with
//! a `proceed` flag marking them as blocking or advisory.

/// Errors indicating misuse of the library rather than bad input data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScimError {
    /// Attribute path string does not conform to the path grammar.
    #[error("malformed attribute path '{path}': {reason}")]
    MalformedPath { path: String, reason: &'static str },

    /// Name is not a valid SCIM attribute name.
    #[error("'{name}' is not a valid attribute name")]
    InvalidAttributeName { name: String },

    /// A sub-attribute path was assigned under a key holding a
    /// non-complex value.
    #[error("cannot address sub-attribute under key '{key}' holding non-complex value {value}")]
    NotComplex { key: String, value: String },

    /// Two attributes with the same case-insensitive name were declared
    /// in one collection.
    #[error("attribute '{attr}' declared more than once")]
    DuplicateAttribute { attr: String },

    /// Two sub-attributes with the same case-insensitive name were
    /// declared on one complex attribute.
    #[error("sub-attribute '{sub_attr}' of '{attr}' declared more than once")]
    DuplicateSubAttribute { attr: String, sub_attr: String },

    /// Canonical values were declared on an attribute whose type does not
    /// support them.
    #[error("canonical values are not allowed on non-string attribute '{attr}'")]
    CanonicalValuesNotAllowed { attr: String },

    /// Sub-attributes were declared on a non-complex attribute.
    #[error("sub-attributes are only allowed on complex attributes, but '{attr}' is not complex")]
    SubAttributesNotAllowed { attr: String },

    /// An extension attribute reference was built without a schema URN.
    #[error("schema is required for an attribute from an extension")]
    ExtensionWithoutSchema,

    /// The same extension schema was registered twice.
    #[error("extension '{schema}' already registered")]
    DuplicateExtension { schema: String },
}

/// A single expected validation problem.
///
/// Each variant carries a stable machine-readable code (see
/// [`ValidationError::code`]) plus human-readable text via `Display`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Required attribute has no value.
    #[error("attribute is required")]
    Required,

    /// Value does not have the expected shape for its declared type.
    #[error("expected type '{expected}', got '{actual}' instead")]
    BadType {
        expected: &'static str,
        actual: &'static str,
    },

    /// Value is not a valid absolute URL.
    #[error("'{value}' is not a valid URL")]
    BadUrl { value: String },

    /// Binary value is not valid base64.
    #[error("SCIM '{scim_type}' values are expected to be encoded in base 64")]
    Base64Required { scim_type: &'static str },

    /// DateTime value is not a valid xsd:dateTime.
    #[error("SCIM '{scim_type}' should be encoded as a valid xsd:dateTime")]
    BadDateTime { scim_type: &'static str },

    /// Error status is not an integer, or falls outside [300, 600).
    #[error(
        "error status should be greater or equal to 300 and lesser than 600, \
         but provided '{provided}'"
    )]
    BadErrorStatus { provided: String },

    /// Value is not among the attribute's canonical values.
    #[error("value must be one of {allowed:?}, but provided '{provided}'")]
    MustBeOneOf {
        allowed: Vec<String>,
        provided: String,
    },

    /// More than one element of a multi-valued attribute claims
    /// `primary == true`.
    #[error(
        "'primary' attribute set to 'true' MUST appear no more than once, \
         but these items have it: {items:?}"
    )]
    MultiplePrimaryValues { items: Vec<usize> },

    /// Top-level key does not match any declared attribute.
    #[error("attribute '{attribute}' is not defined in schema '{schema}'")]
    UnknownAttribute { attribute: String, schema: String },
}

impl ValidationError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::Required => "required",
            ValidationError::BadType { .. } => "bad_type",
            ValidationError::BadUrl { .. } => "bad_url",
            ValidationError::Base64Required { .. } => "base_64_encoding_required",
            ValidationError::BadDateTime { .. } => "bad_datetime",
            ValidationError::BadErrorStatus { .. } => "bad_error_status",
            ValidationError::MustBeOneOf { .. } => "must_be_one_of",
            ValidationError::MultiplePrimaryValues { .. } => "multiple_primary_values",
            ValidationError::UnknownAttribute { .. } => "unknown_attribute",
        }
    }
}
