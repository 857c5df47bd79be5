//! Pluggable value validators attached to attribute definitions.
//!
//! A validator runs after type parsing and contributes its own issues at
//! the attribute's location; it never suppresses structural errors found
//! earlier. Concrete strategies are registered on an attribute at
//! construction time.

use std::fmt;

use url::Url;

use crate::container::ScimValue;
use crate::error::ValidationError;
use crate::issues::ValidationIssues;

/// A cross-field or format check attached to an attribute.
pub trait ValueValidator: fmt::Debug + Send + Sync {
    fn validate(&self, value: &ScimValue) -> ValidationIssues;
}

pub(crate) fn is_absolute_url(value: &str) -> bool {
    Url::parse(value).map(|url| url.has_host()).unwrap_or(false)
}

/// Warns when more than one element of a multi-valued complex value has
/// `primary` set to `true`.
///
/// Attached automatically to every multi-valued complex attribute. The
/// issue lists all offending indices and is advisory (`proceed = true`).
#[derive(Debug, Clone, Copy)]
pub struct SinglePrimaryValue;

impl ValueValidator for SinglePrimaryValue {
    fn validate(&self, value: &ScimValue) -> ValidationIssues {
        let mut issues = ValidationIssues::new();
        let ScimValue::List(items) = value else {
            return issues;
        };
        let primary_entries: Vec<usize> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| match item {
                ScimValue::Data(data) => data.get_key("primary") == ScimValue::Bool(true),
                _ => false,
            })
            .map(|(i, _)| i)
            .collect();
        if primary_entries.len() > 1 {
            issues.add(
                ValidationError::MultiplePrimaryValues {
                    items: primary_entries,
                },
                true,
            );
        }
        issues
    }
}

/// Requires a string value to be an absolute URL with scheme and host.
#[derive(Debug, Clone, Copy)]
pub struct AbsoluteUrl;

impl ValueValidator for AbsoluteUrl {
    fn validate(&self, value: &ScimValue) -> ValidationIssues {
        let mut issues = ValidationIssues::new();
        if let ScimValue::Str(s) = value {
            if !is_absolute_url(s) {
                issues.add(ValidationError::BadUrl { value: s.clone() }, false);
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::ScimData;

    fn entry(primary: Option<bool>) -> ScimValue {
        let mut data = ScimData::new();
        data.insert("value", ScimValue::from("x@example.com"));
        if let Some(primary) = primary {
            data.insert("primary", ScimValue::Bool(primary));
        }
        ScimValue::Data(data)
    }

    #[test]
    fn two_primaries_warn_with_both_indices() {
        let value = ScimValue::List(vec![entry(Some(true)), entry(None), entry(Some(true))]);
        let issues = SinglePrimaryValue.validate(&value);
        assert!(issues.can_proceed());
        let (_, errors) = issues.iter().next().unwrap();
        assert_eq!(
            errors,
            &[ValidationError::MultiplePrimaryValues { items: vec![0, 2] }]
        );
    }

    #[test]
    fn single_primary_is_clean() {
        let value = ScimValue::List(vec![entry(Some(true)), entry(Some(false))]);
        assert!(SinglePrimaryValue.validate(&value).is_empty());
    }

    #[test]
    fn absolute_url_rejects_relative() {
        let issues = AbsoluteUrl.validate(&ScimValue::from("/Users/123"));
        assert!(!issues.can_proceed());
        assert!(AbsoluteUrl.validate(&ScimValue::from("https://example.com/a")).is_empty());
    }
}
