//! Integration tests for the Error message schema and its status parser.

use serde_json::json;

use scim_data::schema::core::{self, ERROR_SCHEMA};
use scim_data::schema::SchemaRegistry;
use scim_data::{Location, ScimValue, ValidationError};

fn registry() -> SchemaRegistry {
    let _ = env_logger::builder().is_test(true).try_init();
    SchemaRegistry::new().expect("standard schemas are well-formed")
}

#[test]
fn status_string_parses_to_integer() {
    let (parsed, issues) = registry().get_error_schema().validate(&json!({
        "schemas": [ERROR_SCHEMA],
        "status": "404",
        "scimType": "noTarget",
        "detail": "Resource not found",
    }));
    assert!(issues.is_empty(), "unexpected issues: {:?}", issues);
    assert_eq!(parsed.get_path("status").unwrap(), ScimValue::Int(404));
    assert_eq!(
        parsed.get_path("detail").unwrap(),
        ScimValue::from("Resource not found")
    );
}

#[test]
fn out_of_range_status_warns_but_keeps_value() {
    let (parsed, issues) = registry().get_error_schema().validate(&json!({
        "schemas": [ERROR_SCHEMA],
        "status": "650",
    }));
    let location = Location::attr("status");
    assert!(issues.has_issues_at(&location));
    assert!(issues.can_proceed_at(&location));
    assert_eq!(parsed.get_path("status").unwrap(), ScimValue::Int(650));
}

#[test]
fn boundary_statuses_are_accepted() {
    for status in ["300", "450", "599"] {
        let (_, issues) = registry().get_error_schema().validate(&json!({
            "schemas": [ERROR_SCHEMA],
            "status": status,
        }));
        assert!(issues.is_empty(), "status {status} raised {:?}", issues);
    }
}

#[test]
fn non_numeric_status_blocks() {
    let (parsed, issues) = registry().get_error_schema().validate(&json!({
        "schemas": [ERROR_SCHEMA],
        "status": "abc",
    }));
    let location = Location::attr("status");
    assert!(!issues.can_proceed_at(&location));
    assert!(parsed.get_path("status").unwrap().is_invalid());
    let (_, errors) = issues
        .iter()
        .find(|(at, _)| *at == &location)
        .expect("issue at status");
    assert_eq!(
        errors,
        &[ValidationError::BadErrorStatus {
            provided: "abc".into()
        }]
    );
}

#[test]
fn status_parser_runs_only_on_well_typed_input() {
    // A non-string status already fails the type check; the parser never
    // sees it and only the type error is reported.
    let (parsed, issues) = registry().get_error_schema().validate(&json!({
        "schemas": [ERROR_SCHEMA],
        "status": 404,
    }));
    let location = Location::attr("status");
    let (_, errors) = issues
        .iter()
        .find(|(at, _)| *at == &location)
        .expect("issue at status");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code(), "bad_type");
    assert!(parsed.get_path("status").unwrap().is_invalid());
}

#[test]
fn unit_parse_error_status() {
    let (value, issues) = core::parse_error_status(&ScimValue::from("404"));
    assert_eq!(value, ScimValue::Int(404));
    assert!(issues.is_empty());

    let (value, issues) = core::parse_error_status(&ScimValue::from("650"));
    assert_eq!(value, ScimValue::Int(650));
    assert!(issues.has_issues());
    assert!(issues.can_proceed());

    let (value, issues) = core::parse_error_status(&ScimValue::from("not-a-status"));
    assert!(value.is_invalid());
    assert!(!issues.can_proceed());
}

#[test]
fn scim_type_must_match_the_registered_keywords() {
    let (_, issues) = registry().get_error_schema().validate(&json!({
        "schemas": [ERROR_SCHEMA],
        "status": "400",
        "scimType": "invalidValue",
    }));
    assert!(issues.is_empty(), "unexpected issues: {:?}", issues);

    let (parsed, issues) = registry().get_error_schema().validate(&json!({
        "schemas": [ERROR_SCHEMA],
        "status": "400",
        "scimType": "invalidvalue",
    }));
    // scimType is declared with hard canonical values; a case mismatch on
    // a non-case-exact attribute still passes.
    assert!(issues.is_empty(), "unexpected issues: {:?}", issues);
    assert_eq!(
        parsed.get_path("scimType").unwrap(),
        ScimValue::from("invalidvalue")
    );
}
