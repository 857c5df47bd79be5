//! Attribute path parsing and representation.
//!
//! An [`AttrRep`] addresses one location within a SCIM resource:
//! `[schema_urn:]attr[.subAttr][[filter]]`. Matching is case-insensitive
//! throughout, and a bare reference is equal to a fully schema-qualified
//! reference to the same field, so both forms map to the same key when
//! used against a container or an issue tree.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ScimError;

static ATTR_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9_]+|\$ref)$").expect("attribute name pattern is valid")
});

static ATTR_REP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?:[\w.-]+:)*)((?:\w+|\$ref)(?:\.(?:\w+|\$ref))?)$")
        .expect("attribute path pattern is valid")
});

/// Reference to an attribute or sub-attribute, optionally qualified by a
/// schema URN.
///
/// The optional bracket filter is carried verbatim for callers that
/// interpret it; the data layer only checks it for balance and excludes it
/// from equality and hashing.
#[derive(Debug, Clone)]
pub struct AttrRep {
    schema: Option<String>,
    attr: String,
    sub_attr: Option<String>,
    extension: bool,
    filter: Option<String>,
}

impl AttrRep {
    /// Builds a bare attribute reference.
    pub fn new(attr: &str) -> Result<Self, ScimError> {
        Self::build(None, attr, None, false)
    }

    /// Builds a reference to a sub-attribute of a complex attribute.
    pub fn with_sub_attr(attr: &str, sub_attr: &str) -> Result<Self, ScimError> {
        Self::build(None, attr, Some(sub_attr), false)
    }

    /// Builds a schema-qualified attribute reference.
    pub fn with_schema(schema: &str, attr: &str) -> Result<Self, ScimError> {
        Self::build(Some(schema), attr, None, false)
    }

    /// Builds a fully qualified reference, sub-attribute included.
    pub fn full(schema: &str, attr: &str, sub_attr: &str) -> Result<Self, ScimError> {
        Self::build(Some(schema), attr, Some(sub_attr), false)
    }

    /// Builds a reference to an attribute supplied by an extension schema.
    pub fn extension(schema: &str, attr: &str) -> Result<Self, ScimError> {
        Self::build(Some(schema), attr, None, true)
    }

    fn build(
        schema: Option<&str>,
        attr: &str,
        sub_attr: Option<&str>,
        extension: bool,
    ) -> Result<Self, ScimError> {
        for name in [Some(attr), sub_attr].into_iter().flatten() {
            if !ATTR_NAME.is_match(name) {
                return Err(ScimError::InvalidAttributeName {
                    name: name.to_owned(),
                });
            }
        }
        if extension && schema.is_none() {
            return Err(ScimError::ExtensionWithoutSchema);
        }
        Ok(AttrRep {
            schema: schema.map(str::to_owned),
            attr: attr.to_owned(),
            sub_attr: sub_attr.map(str::to_owned),
            extension,
            filter: None,
        })
    }

    // Container internals derive child references from names that were
    // already validated on the way in.
    pub(crate) fn unchecked(attr: &str) -> Self {
        AttrRep {
            schema: None,
            attr: attr.to_owned(),
            sub_attr: None,
            extension: false,
            filter: None,
        }
    }

    /// Parses `[schema_urn:]attr[.subAttr][[filter]]`.
    ///
    /// Fails with [`ScimError::MalformedPath`] on empty segments, more
    /// than one top-level dot, or unbalanced/misordered brackets.
    pub fn parse(path: &str) -> Result<Self, ScimError> {
        let malformed = |reason| ScimError::MalformedPath {
            path: path.to_owned(),
            reason,
        };

        let opening = path.find('[');
        let closing = path.find(']');
        if path.matches('[').count() > 1 || path.matches(']').count() > 1 {
            return Err(malformed("at most one bracket filter is allowed"));
        }
        let (stem, filter) = match (opening, closing) {
            (None, None) => (path, None),
            (Some(open), Some(close)) if open < close => {
                if close != path.len() - 1 {
                    return Err(malformed("filter must terminate the path"));
                }
                let filter = &path[open + 1..close];
                if filter.trim().is_empty() {
                    return Err(malformed("empty filter expression"));
                }
                (&path[..open], Some(filter.to_owned()))
            }
            _ => return Err(malformed("unbalanced brackets")),
        };

        let captures = ATTR_REP
            .captures(stem)
            .ok_or_else(|| malformed("does not match the attribute path grammar"))?;
        let schema = match &captures[1] {
            "" => None,
            prefix => Some(prefix[..prefix.len() - 1].to_owned()),
        };
        let (attr, sub_attr) = match captures[2].split_once('.') {
            Some((attr, sub_attr)) => (attr.to_owned(), Some(sub_attr.to_owned())),
            None => (captures[2].to_owned(), None),
        };

        Ok(AttrRep {
            schema,
            attr,
            sub_attr,
            extension: false,
            filter,
        })
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub fn attr(&self) -> &str {
        &self.attr
    }

    pub fn sub_attr(&self) -> Option<&str> {
        self.sub_attr.as_deref()
    }

    pub fn is_extension(&self) -> bool {
        self.extension
    }

    /// The raw bracket filter, if the parsed path carried one.
    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// This reference without its schema qualification.
    pub fn unqualified(&self) -> AttrRep {
        AttrRep {
            schema: None,
            attr: self.attr.clone(),
            sub_attr: self.sub_attr.clone(),
            extension: false,
            filter: None,
        }
    }

    /// This reference re-qualified under `schema`.
    pub fn qualified(&self, schema: &str, extension: bool) -> AttrRep {
        AttrRep {
            schema: Some(schema.to_owned()),
            attr: self.attr.clone(),
            sub_attr: self.sub_attr.clone(),
            extension,
            filter: None,
        }
    }

    /// The top-level part of this reference, sub-attribute dropped.
    pub fn parent(&self) -> AttrRep {
        AttrRep {
            schema: self.schema.clone(),
            attr: self.attr.clone(),
            sub_attr: None,
            extension: self.extension,
            filter: None,
        }
    }

    /// The sub-attribute as a bare reference of its own, if present.
    pub fn child(&self) -> Option<AttrRep> {
        self.sub_attr.as_deref().map(AttrRep::unchecked)
    }

    /// Whether both references name the same top-level attribute.
    pub fn top_level_equals(&self, other: &AttrRep) -> bool {
        if let (Some(a), Some(b)) = (&self.schema, &other.schema) {
            if !a.eq_ignore_ascii_case(b) {
                return false;
            }
        }
        self.attr.eq_ignore_ascii_case(&other.attr)
    }
}

impl PartialEq for AttrRep {
    fn eq(&self, other: &Self) -> bool {
        if let (Some(a), Some(b)) = (&self.schema, &other.schema) {
            if !a.eq_ignore_ascii_case(b) {
                return false;
            }
        }
        if !self.attr.eq_ignore_ascii_case(&other.attr) {
            return false;
        }
        match (&self.sub_attr, &other.sub_attr) {
            (None, None) => true,
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        }
    }
}

impl Eq for AttrRep {}

// The schema stays out of the hash: a bare and a qualified reference to
// the same field are equal, so they must hash alike.
impl Hash for AttrRep {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.attr.to_ascii_lowercase().hash(state);
        if let Some(sub_attr) = &self.sub_attr {
            sub_attr.to_ascii_lowercase().hash(state);
        }
    }
}

impl fmt::Display for AttrRep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(schema) = &self.schema {
            write!(f, "{schema}:")?;
        }
        f.write_str(&self.attr)?;
        if let Some(sub_attr) = &self.sub_attr {
            write!(f, ".{sub_attr}")?;
        }
        Ok(())
    }
}

impl FromStr for AttrRep {
    type Err = ScimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AttrRep::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_attribute() {
        let rep = AttrRep::parse("userName").unwrap();
        assert_eq!(rep.attr(), "userName");
        assert_eq!(rep.schema(), None);
        assert_eq!(rep.sub_attr(), None);
    }

    #[test]
    fn parses_qualified_sub_attribute() {
        let rep = AttrRep::parse("urn:ietf:params:scim:schemas:core:2.0:User:name.givenName")
            .unwrap();
        assert_eq!(rep.schema(), Some("urn:ietf:params:scim:schemas:core:2.0:User"));
        assert_eq!(rep.attr(), "name");
        assert_eq!(rep.sub_attr(), Some("givenName"));
    }

    #[test]
    fn parses_dollar_ref() {
        let rep = AttrRep::parse("members.$ref").unwrap();
        assert_eq!(rep.sub_attr(), Some("$ref"));
    }

    #[test]
    fn keeps_filter_out_of_equality() {
        let plain = AttrRep::parse("emails").unwrap();
        let filtered = AttrRep::parse("emails[type eq \"work\"]").unwrap();
        assert_eq!(filtered.filter(), Some("type eq \"work\""));
        assert_eq!(plain, filtered);
    }

    #[test]
    fn rejects_malformed_paths() {
        for path in ["", "a.b.c", "a.", ".b", "emails[", "emails]", "emails][x", "emails[]"] {
            assert!(
                matches!(AttrRep::parse(path), Err(ScimError::MalformedPath { .. })),
                "{path:?} should be malformed"
            );
        }
    }

    #[test]
    fn equality_is_case_and_schema_insensitive() {
        let bare = AttrRep::parse("username").unwrap();
        let qualified =
            AttrRep::parse("urn:ietf:params:scim:schemas:core:2.0:User:UserName").unwrap();
        assert_eq!(bare, qualified);

        let other_schema = AttrRep::parse("urn:other:userName").unwrap();
        assert_ne!(qualified, other_schema);
    }

    #[test]
    fn extension_requires_schema() {
        assert!(AttrRep::extension("urn:x", "attr").is_ok());
        assert_eq!(
            AttrRep::build(None, "attr", None, true),
            Err(ScimError::ExtensionWithoutSchema)
        );
    }
}
