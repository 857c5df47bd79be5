//! Core schema type definitions for SCIM attributes.
//!
//! This module contains the fixed attribute-model vocabulary from RFC 7643:
//! value types with their parse/serialize/compare contracts, and the
//! mutability, returned, uniqueness, and issuer policies.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::container::ScimValue;
use crate::error::ValidationError;
use crate::issues::ValidationIssues;
use crate::schema::validators::is_absolute_url;

/// Attribute mutability characteristics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mutability {
    /// Read-only attribute (managed by the server)
    ReadOnly,
    /// Read-write attribute (can be modified by clients)
    #[default]
    ReadWrite,
    /// Immutable attribute (set once, never modified)
    Immutable,
    /// Write-only attribute (passwords, etc.)
    WriteOnly,
}

/// How an attribute is returned in responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Returned {
    Always,
    #[default]
    Default,
    Never,
    Request,
}

/// Scope of an attribute's uniqueness constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Uniqueness {
    #[default]
    None,
    Server,
    Global,
}

/// Who may supply an attribute's value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AttributeIssuer {
    Server,
    Client,
    #[default]
    NotSpecified,
}

/// SCIM attribute value types.
///
/// The two reference kinds share the wire name `reference` but differ in
/// what they accept: a SCIM reference may be a relative URI pointing at a
/// resource, an external reference must be an absolute URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    Boolean,
    Integer,
    Decimal,
    DateTime,
    Binary,
    ScimReference,
    ExternalReference,
    Complex,
}

impl AttributeType {
    /// The type's name on the wire.
    pub fn scim_name(&self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Boolean => "boolean",
            AttributeType::Integer => "integer",
            AttributeType::Decimal => "decimal",
            AttributeType::DateTime => "dateTime",
            AttributeType::Binary => "binary",
            AttributeType::ScimReference | AttributeType::ExternalReference => "reference",
            AttributeType::Complex => "complex",
        }
    }

    /// Whether values of this type are strings on the wire, making
    /// canonical-value sets applicable.
    pub fn is_string_like(&self) -> bool {
        matches!(
            self,
            AttributeType::String
                | AttributeType::Binary
                | AttributeType::ScimReference
                | AttributeType::ExternalReference
        )
    }

    /// Parses a raw value into this type.
    ///
    /// A shape mismatch is a blocking issue and the returned value is
    /// [`ScimValue::Invalid`]; format problems on string-carried types
    /// (base64, dateTime, URLs) block likewise.
    pub fn parse(&self, value: &ScimValue) -> (ScimValue, ValidationIssues) {
        let mut issues = ValidationIssues::new();
        let parsed = match (self, value) {
            (AttributeType::String, ScimValue::Str(_)) => value.clone(),
            (AttributeType::Boolean, ScimValue::Bool(_)) => value.clone(),
            (AttributeType::Integer, ScimValue::Int(_)) => value.clone(),
            // The upper bound is exclusive: i64::MAX as f64 rounds up to
            // 2^63, which is already out of range.
            (AttributeType::Integer, ScimValue::Decimal(d))
                if d.fract() == 0.0 && *d >= i64::MIN as f64 && *d < i64::MAX as f64 =>
            {
                ScimValue::Int(*d as i64)
            }
            (AttributeType::Decimal, ScimValue::Decimal(_)) => value.clone(),
            (AttributeType::Decimal, ScimValue::Int(i)) => ScimValue::Decimal(*i as f64),
            (AttributeType::Binary, ScimValue::Str(s)) => match BASE64.decode(s) {
                Ok(decoded) if BASE64.encode(&decoded) == *s => value.clone(),
                _ => {
                    issues.add(
                        ValidationError::Base64Required {
                            scim_type: self.scim_name(),
                        },
                        false,
                    );
                    ScimValue::Invalid
                }
            },
            (AttributeType::DateTime, ScimValue::Str(s)) => {
                match DateTime::<FixedOffset>::parse_from_rfc3339(s) {
                    Ok(parsed) => ScimValue::DateTime(parsed),
                    Err(_) => {
                        issues.add(
                            ValidationError::BadDateTime {
                                scim_type: self.scim_name(),
                            },
                            false,
                        );
                        ScimValue::Invalid
                    }
                }
            }
            (AttributeType::ScimReference, ScimValue::Str(s)) => {
                // Relative URIs are fine for references within the server.
                match url::Url::parse(s) {
                    Ok(_) | Err(url::ParseError::RelativeUrlWithoutBase) => value.clone(),
                    Err(_) => {
                        issues.add(ValidationError::BadUrl { value: s.clone() }, false);
                        ScimValue::Invalid
                    }
                }
            }
            (AttributeType::ExternalReference, ScimValue::Str(s)) => {
                if is_absolute_url(s) {
                    value.clone()
                } else {
                    issues.add(ValidationError::BadUrl { value: s.clone() }, false);
                    ScimValue::Invalid
                }
            }
            (AttributeType::Complex, ScimValue::Data(_)) => value.clone(),
            _ => {
                issues.add(
                    ValidationError::BadType {
                        expected: self.scim_name(),
                        actual: value.type_name(),
                    },
                    false,
                );
                ScimValue::Invalid
            }
        };
        (parsed, issues)
    }

    /// Serializes a parsed value back to JSON.
    pub fn serialize(&self, value: &ScimValue) -> serde_json::Value {
        value.to_json()
    }

    /// Canonical comparison used for uniqueness and canonical-value
    /// checks. String comparison honors `case_exact`.
    pub fn compare(&self, a: &ScimValue, b: &ScimValue, case_exact: bool) -> bool {
        match (a, b) {
            (ScimValue::Str(a), ScimValue::Str(b)) if self.is_string_like() && !case_exact => {
                a.eq_ignore_ascii_case(b)
            }
            _ => a == b,
        }
    }
}
