//! Concrete SCIM schema definitions built from attribute literals.
//!
//! The standard Error, User (with the enterprise extension), and Group
//! schemas. Only their declarative shape matters here; they are built once
//! by the [`SchemaRegistry`](crate::schema::registry::SchemaRegistry) and
//! immutable afterwards.

use crate::container::ScimValue;
use crate::error::{ScimError, ValidationError};
use crate::issues::ValidationIssues;
use crate::schema::attribute::Attribute;
use crate::schema::base::{BaseSchema, SchemaExtension};
use crate::schema::types::{AttributeIssuer, AttributeType, Mutability, Returned, Uniqueness};

/// URN of the Error message schema.
pub const ERROR_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:Error";
/// URN of the core User schema.
pub const USER_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:User";
/// URN of the enterprise User extension schema.
pub const ENTERPRISE_USER_SCHEMA: &str =
    "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User";
/// URN of the core Group schema.
pub const GROUP_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:Group";

/// Parses an Error resource's `status` value.
///
/// The value must be a string holding an integer. A non-integer string is
/// a hard error and the value becomes invalid; a parseable status outside
/// [300, 600) is only a warning and the integer is kept.
pub fn parse_error_status(value: &ScimValue) -> (ScimValue, ValidationIssues) {
    let mut issues = ValidationIssues::new();
    let ScimValue::Str(raw) = value else {
        return (value.clone(), issues);
    };
    match raw.parse::<i64>() {
        Err(_) => {
            issues.add(
                ValidationError::BadErrorStatus {
                    provided: raw.clone(),
                },
                false,
            );
            (ScimValue::Invalid, issues)
        }
        Ok(status) => {
            if !(300..600).contains(&status) {
                issues.add(
                    ValidationError::BadErrorStatus {
                        provided: status.to_string(),
                    },
                    true,
                );
            }
            (ScimValue::Int(status), issues)
        }
    }
}

fn schemas_attr() -> Result<Attribute, ScimError> {
    Attribute::builder("schemas", AttributeType::String)
        .required(true)
        .case_exact(true)
        .multi_valued(true)
        .returned(Returned::Always)
        .build()
}

fn id_attr() -> Result<Attribute, ScimError> {
    Attribute::builder("id", AttributeType::String)
        .case_exact(true)
        .mutability(Mutability::ReadOnly)
        .returned(Returned::Always)
        .uniqueness(Uniqueness::Server)
        .issuer(AttributeIssuer::Server)
        .build()
}

fn external_id_attr() -> Result<Attribute, ScimError> {
    Attribute::builder("externalId", AttributeType::String)
        .case_exact(true)
        .issuer(AttributeIssuer::Client)
        .build()
}

fn meta_attr() -> Result<Attribute, ScimError> {
    Attribute::complex("meta")
        .mutability(Mutability::ReadOnly)
        .issuer(AttributeIssuer::Server)
        .sub_attributes([
            Attribute::builder("resourceType", AttributeType::String)
                .case_exact(true)
                .mutability(Mutability::ReadOnly)
                .build()?,
            Attribute::builder("created", AttributeType::DateTime)
                .mutability(Mutability::ReadOnly)
                .build()?,
            Attribute::builder("lastModified", AttributeType::DateTime)
                .mutability(Mutability::ReadOnly)
                .build()?,
            Attribute::builder("location", AttributeType::ScimReference)
                .mutability(Mutability::ReadOnly)
                .build()?,
            Attribute::builder("version", AttributeType::String)
                .case_exact(true)
                .mutability(Mutability::ReadOnly)
                .build()?,
        ])
        .build()
}

/// The Error message schema.
pub fn error_schema() -> Result<BaseSchema, ScimError> {
    BaseSchema::new(
        ERROR_SCHEMA,
        vec![
            schemas_attr()?,
            Attribute::builder("status", AttributeType::String)
                .required(true)
                .returned(Returned::Always)
                .parser(parse_error_status)
                .build()?,
            Attribute::builder("scimType", AttributeType::String)
                .canonical_values([
                    "invalidFilter",
                    "tooMany",
                    "uniqueness",
                    "mutability",
                    "invalidSyntax",
                    "invalidPath",
                    "noTarget",
                    "invalidValue",
                    "invalidVers",
                    "sensitive",
                ])
                .validate_canonical_values(true)
                .returned(Returned::Always)
                .build()?,
            Attribute::builder("detail", AttributeType::String)
                .returned(Returned::Always)
                .build()?,
        ],
    )
}

/// The core User schema with the enterprise extension registered.
pub fn user_schema() -> Result<BaseSchema, ScimError> {
    BaseSchema::new(
        USER_SCHEMA,
        vec![
            schemas_attr()?,
            id_attr()?,
            external_id_attr()?,
            meta_attr()?,
            Attribute::builder("userName", AttributeType::String)
                .required(true)
                .uniqueness(Uniqueness::Server)
                .build()?,
            Attribute::complex("name")
                .sub_attributes([
                    Attribute::builder("formatted", AttributeType::String).build()?,
                    Attribute::builder("familyName", AttributeType::String).build()?,
                    Attribute::builder("givenName", AttributeType::String).build()?,
                    Attribute::builder("middleName", AttributeType::String).build()?,
                    Attribute::builder("honorificPrefix", AttributeType::String).build()?,
                    Attribute::builder("honorificSuffix", AttributeType::String).build()?,
                ])
                .build()?,
            Attribute::builder("displayName", AttributeType::String).build()?,
            Attribute::builder("active", AttributeType::Boolean).build()?,
            Attribute::builder("password", AttributeType::String)
                .mutability(Mutability::WriteOnly)
                .returned(Returned::Never)
                .build()?,
            Attribute::complex("emails")
                .multi_valued(true)
                .sub_attributes([
                    Attribute::builder("value", AttributeType::String).build()?,
                    Attribute::builder("display", AttributeType::String).build()?,
                    Attribute::builder("type", AttributeType::String)
                        .canonical_values(["work", "home", "other"])
                        .build()?,
                    Attribute::builder("primary", AttributeType::Boolean).build()?,
                ])
                .build()?,
            Attribute::complex("groups")
                .multi_valued(true)
                .mutability(Mutability::ReadOnly)
                .issuer(AttributeIssuer::Server)
                .sub_attributes([
                    Attribute::builder("value", AttributeType::String)
                        .mutability(Mutability::ReadOnly)
                        .build()?,
                    Attribute::builder("$ref", AttributeType::ScimReference)
                        .mutability(Mutability::ReadOnly)
                        .reference_types(["User", "Group"])
                        .build()?,
                    Attribute::builder("display", AttributeType::String)
                        .mutability(Mutability::ReadOnly)
                        .build()?,
                    Attribute::builder("type", AttributeType::String)
                        .canonical_values(["direct", "indirect"])
                        .mutability(Mutability::ReadOnly)
                        .build()?,
                ])
                .build()?,
        ],
    )?
    .with_extension(enterprise_user_extension()?)
}

/// The enterprise User extension schema.
pub fn enterprise_user_extension() -> Result<SchemaExtension, ScimError> {
    SchemaExtension::new(
        ENTERPRISE_USER_SCHEMA,
        vec![
            Attribute::builder("employeeNumber", AttributeType::String).build()?,
            Attribute::builder("organization", AttributeType::String).build()?,
            Attribute::complex("manager")
                .sub_attributes([
                    Attribute::builder("value", AttributeType::String).build()?,
                    Attribute::builder("$ref", AttributeType::ScimReference)
                        .reference_types(["User"])
                        .build()?,
                    Attribute::builder("displayName", AttributeType::String)
                        .mutability(Mutability::ReadOnly)
                        .build()?,
                ])
                .build()?,
        ],
        false,
    )
}

/// The core Group schema.
pub fn group_schema() -> Result<BaseSchema, ScimError> {
    BaseSchema::new(
        GROUP_SCHEMA,
        vec![
            schemas_attr()?,
            id_attr()?,
            external_id_attr()?,
            meta_attr()?,
            Attribute::builder("displayName", AttributeType::String)
                .required(true)
                .build()?,
            Attribute::complex("members")
                .multi_valued(true)
                .sub_attributes([
                    Attribute::builder("value", AttributeType::String)
                        .mutability(Mutability::Immutable)
                        .build()?,
                    Attribute::builder("$ref", AttributeType::ScimReference)
                        .mutability(Mutability::Immutable)
                        .reference_types(["User", "Group"])
                        .build()?,
                    Attribute::builder("display", AttributeType::String)
                        .mutability(Mutability::Immutable)
                        .build()?,
                ])
                .build()?,
        ],
    )
}
