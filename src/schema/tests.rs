//! Tests for schema validation and registry functionality.
//!
//! This module contains tests for the standard schemas, the per-attribute
//! engine, and the schema-level walk, including partial-failure and
//! extension scenarios.

use serde_json::json;

use super::attribute::Attribute;
use super::core::{self, ENTERPRISE_USER_SCHEMA, USER_SCHEMA};
use super::registry::SchemaRegistry;
use super::types::AttributeType;
use crate::container::ScimValue;
use crate::error::{ScimError, ValidationError};
use crate::issues::Location;
use crate::path::AttrRep;

fn registry() -> SchemaRegistry {
    SchemaRegistry::new().expect("standard schemas are well-formed")
}

#[test]
fn registry_holds_standard_schemas() {
    let registry = registry();
    assert_eq!(registry.schemas().count(), 3);
    assert!(registry.get_schema(USER_SCHEMA).is_some());
    // Lookup is case-insensitive.
    assert!(registry.get_schema(&USER_SCHEMA.to_uppercase()).is_some());
}

#[test]
fn valid_user_produces_no_issues() {
    let (parsed, issues) = registry().get_user_schema().validate(&json!({
        "schemas": [USER_SCHEMA],
        "userName": "bjensen",
        "displayName": "Barbara Jensen",
        "active": true,
        "name": {"givenName": "Barbara", "familyName": "Jensen"},
        "emails": [
            {"value": "bjensen@example.com", "type": "work", "primary": true}
        ],
    }));
    assert!(issues.is_empty(), "unexpected issues: {:?}", issues);
    assert_eq!(
        parsed.get_path("name.givenName").unwrap(),
        ScimValue::from("Barbara")
    );
    assert_eq!(
        parsed.get_path("emails.value").unwrap(),
        ScimValue::List(vec![ScimValue::from("bjensen@example.com")])
    );
}

#[test]
fn missing_required_attribute_blocks() {
    let (parsed, issues) = registry().get_user_schema().validate(&json!({
        "schemas": [USER_SCHEMA],
        "displayName": "No Name",
    }));
    let location = Location::attr("userName");
    assert!(!issues.can_proceed_at(&location));
    let (_, errors) = issues
        .iter()
        .find(|(at, _)| *at == &location)
        .expect("issue at userName");
    assert_eq!(errors, &[ValidationError::Required]);
    assert!(parsed.get_path("userName").unwrap().is_missing());
}

#[test]
fn explicit_null_for_required_attribute_is_dropped() {
    let (parsed, issues) = registry().get_user_schema().validate(&json!({
        "schemas": [USER_SCHEMA],
        "userName": null,
    }));
    let location = Location::attr("userName");
    assert!(!issues.can_proceed_at(&location));
    // Null does not satisfy a required attribute and is not kept.
    assert!(parsed.get_path("userName").unwrap().is_missing());
    assert!(!parsed.contains_key("userName"));
}

#[test]
fn type_mismatch_yields_invalid_value() {
    let (parsed, issues) = registry().get_user_schema().validate(&json!({
        "schemas": [USER_SCHEMA],
        "userName": "bjensen",
        "active": "not_a_boolean",
    }));
    assert!(!issues.can_proceed_at(&Location::attr("active")));
    assert!(parsed.get_path("active").unwrap().is_invalid());
    // The rest of the payload is still parsed.
    assert_eq!(
        parsed.get_path("userName").unwrap(),
        ScimValue::from("bjensen")
    );
}

#[test]
fn multi_valued_attribute_requires_a_list() {
    let (parsed, issues) = registry().get_user_schema().validate(&json!({
        "schemas": [USER_SCHEMA],
        "userName": "bjensen",
        "emails": {"value": "bjensen@example.com"},
    }));
    let location = Location::attr("emails");
    assert!(!issues.can_proceed_at(&location));
    assert!(parsed.get_path("emails").unwrap().is_invalid());
}

#[test]
fn element_failure_leaves_siblings_intact() {
    let (parsed, issues) = registry().get_user_schema().validate(&json!({
        "schemas": [USER_SCHEMA],
        "userName": "bjensen",
        "emails": [42, {"value": "bjensen@example.com"}],
    }));
    assert!(!issues.can_proceed_at(&Location::attr("emails").join(0usize)));
    assert!(!issues.has_issues_at(&Location::attr("emails").join(1usize)));
    let ScimValue::List(items) = parsed.get_path("emails").unwrap() else {
        panic!("emails should still be a list");
    };
    assert!(items[0].is_invalid());
    assert_eq!(
        items[1],
        ScimValue::Data({
            let mut data = crate::container::ScimData::new();
            data.insert("value", ScimValue::from("bjensen@example.com"));
            data
        })
    );
}

#[test]
fn advisory_canonical_value_warns_and_keeps_value() {
    let (parsed, issues) = registry().get_user_schema().validate(&json!({
        "schemas": [USER_SCHEMA],
        "userName": "bjensen",
        "emails": [{"value": "b@example.com", "type": "office"}],
    }));
    let location = Location::attr("emails").join(0usize).join("type");
    assert!(issues.has_issues_at(&location));
    assert!(issues.can_proceed_at(&location));
    assert_eq!(
        parsed.get_path("emails.type").unwrap(),
        ScimValue::List(vec![ScimValue::from("office")])
    );
}

#[test]
fn hard_canonical_value_blocks() {
    let (parsed, issues) = registry().get_error_schema().validate(&json!({
        "schemas": [core::ERROR_SCHEMA],
        "status": "400",
        "scimType": "notAScimType",
    }));
    let location = Location::attr("scimType");
    assert!(!issues.can_proceed_at(&location));
    assert!(parsed.get_path("scimType").unwrap().is_invalid());
}

#[test]
fn canonical_comparison_honors_case_exactness() {
    // "type" is not case-exact, so a differently-cased canonical value
    // passes without issues.
    let (_, issues) = registry().get_user_schema().validate(&json!({
        "schemas": [USER_SCHEMA],
        "userName": "bjensen",
        "emails": [{"value": "b@example.com", "type": "Work"}],
    }));
    assert!(!issues.has_issues_at(&Location::attr("emails").join(0usize).join("type")));
}

#[test]
fn two_primary_values_warn_once_at_attribute_level() {
    let (_, issues) = registry().get_user_schema().validate(&json!({
        "schemas": [USER_SCHEMA],
        "userName": "bjensen",
        "emails": [
            {"value": "a@example.com", "primary": true},
            {"value": "b@example.com", "primary": true},
        ],
    }));
    let location = Location::attr("emails");
    let (_, errors) = issues
        .iter()
        .find(|(at, _)| *at == &location)
        .expect("issue at emails");
    assert_eq!(
        errors,
        &[ValidationError::MultiplePrimaryValues { items: vec![0, 1] }]
    );
    assert!(issues.can_proceed_at(&location));
}

#[test]
fn extension_attributes_validate_under_their_urn() {
    let (parsed, issues) = registry().get_user_schema().validate(&json!({
        "schemas": [USER_SCHEMA, ENTERPRISE_USER_SCHEMA],
        "userName": "bjensen",
        (ENTERPRISE_USER_SCHEMA): {
            "employeeNumber": "701984",
            "manager": {"value": "26118915", "displayName": "John Smith"},
        },
    }));
    assert!(issues.is_empty(), "unexpected issues: {:?}", issues);
    let rep = AttrRep::parse(&format!("{ENTERPRISE_USER_SCHEMA}:employeeNumber")).unwrap();
    assert_eq!(parsed.get(&rep), ScimValue::from("701984"));
}

#[test]
fn bad_extension_value_is_located_by_urn() {
    let (_, issues) = registry().get_user_schema().validate(&json!({
        "schemas": [USER_SCHEMA, ENTERPRISE_USER_SCHEMA],
        "userName": "bjensen",
        (ENTERPRISE_USER_SCHEMA): {"employeeNumber": 701984},
    }));
    let location = Location::attr(ENTERPRISE_USER_SCHEMA).join("employeeNumber");
    assert!(!issues.can_proceed_at(&location));
}

#[test]
fn unknown_attribute_warns_but_is_kept() {
    let (parsed, issues) = registry().get_user_schema().validate(&json!({
        "schemas": [USER_SCHEMA],
        "userName": "bjensen",
        "x-vendor-flag": true,
    }));
    let location = Location::attr("x-vendor-flag");
    assert!(issues.has_issues_at(&location));
    assert!(issues.can_proceed_at(&location));
    assert_eq!(parsed.get_key("x-vendor-flag"), ScimValue::Bool(true));
}

#[test]
fn meta_timestamps_parse_to_datetimes() {
    let (parsed, issues) = registry().get_user_schema().validate(&json!({
        "schemas": [USER_SCHEMA],
        "userName": "bjensen",
        "meta": {
            "resourceType": "User",
            "created": "2011-08-01T18:29:49.793Z",
            "location": "/Users/2819c223-7f76-453a-919d-413861904646",
        },
    }));
    assert!(issues.is_empty(), "unexpected issues: {:?}", issues);
    assert!(matches!(
        parsed.get_path("meta.created").unwrap(),
        ScimValue::DateTime(_)
    ));
}

#[test]
fn non_object_payload_is_rejected_outright() {
    let (parsed, issues) = registry().get_user_schema().validate(&json!(["not", "an", "object"]));
    assert!(!issues.can_proceed());
    assert!(parsed.is_empty());
}

#[test]
fn attribute_lookup_resolves_base_then_extension() {
    let registry = registry();
    let schema = registry.get_user_schema();
    let bare = AttrRep::parse("employeeNumber").unwrap();
    assert!(schema.get_attr(&bare).is_some());
    let qualified = AttrRep::parse("urn:ietf:params:scim:schemas:core:2.0:User:userName").unwrap();
    assert!(schema.get_attr(&qualified).is_some());
    let sub = AttrRep::parse("name.givenName").unwrap();
    assert_eq!(schema.get_attr(&sub).map(|a| a.name()), Some("givenName"));
}

#[test]
fn builder_rejects_inconsistent_declarations() {
    assert!(matches!(
        Attribute::complex("broken")
            .canonical_values(["a"])
            .build(),
        Err(ScimError::CanonicalValuesNotAllowed { .. })
    ));
    assert!(matches!(
        Attribute::builder("broken", AttributeType::String)
            .sub_attribute(
                Attribute::builder("inner", AttributeType::String)
                    .build()
                    .unwrap()
            )
            .build(),
        Err(ScimError::SubAttributesNotAllowed { .. })
    ));
    assert!(matches!(
        Attribute::complex("broken")
            .sub_attributes([
                Attribute::builder("value", AttributeType::String)
                    .build()
                    .unwrap(),
                Attribute::builder("VALUE", AttributeType::String)
                    .build()
                    .unwrap(),
            ])
            .build(),
        Err(ScimError::DuplicateSubAttribute { .. })
    ));
}

#[test]
fn issues_render_as_nested_json() {
    let (_, issues) = registry().get_user_schema().validate(&json!({
        "schemas": [USER_SCHEMA],
        "active": "nope",
    }));
    let rendered = issues.to_json(true);
    assert_eq!(
        rendered["userName"]["_errors"][0]["code"],
        json!("required")
    );
    assert_eq!(rendered["active"]["_errors"][0]["code"], json!("bad_type"));
    assert!(rendered["active"]["_errors"][0]["error"].is_string());
}
