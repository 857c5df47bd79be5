//! Path-addressable collection of validation problems.
//!
//! Every expected input problem found while walking a schema tree becomes a
//! [`ValidationError`] stored in a [`ValidationIssues`] tree, keyed by the
//! [`Location`] of the offending value. Each entry records whether
//! processing of the value at that location may proceed: a non-proceeding
//! location means the value was replaced by
//! [`ScimValue::Invalid`](crate::container::ScimValue::Invalid) and later
//! structural checks that depend on it were skipped.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use serde_json::{Map, Value, json};

use crate::error::ValidationError;

/// One step of a [`Location`]: an attribute name or a list index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A named attribute or sub-attribute (also used for schema URNs).
    Attr(String),
    /// An element index within a multi-valued attribute.
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Attr(name) => f.write_str(name),
            Segment::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for Segment {
    fn from(name: &str) -> Self {
        Segment::Attr(name.to_owned())
    }
}

impl From<String> for Segment {
    fn from(name: String) -> Self {
        Segment::Attr(name)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

/// Path of an issue within a resource, mirroring the attribute tree.
///
/// The empty location addresses the value the issues were collected for as
/// a whole; merging into a parent tree prepends the parent's location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Location(Vec<Segment>);

impl Location {
    /// The empty location.
    pub fn root() -> Self {
        Location(Vec::new())
    }

    /// Location of a single named attribute.
    pub fn attr(name: &str) -> Self {
        Location(vec![Segment::Attr(name.to_owned())])
    }

    /// Location of an element of a multi-valued attribute.
    pub fn index(index: usize) -> Self {
        Location(vec![Segment::Index(index)])
    }

    /// Extends this location with one more segment.
    pub fn join(mut self, segment: impl Into<Segment>) -> Self {
        self.0.push(segment.into());
        self
    }

    /// Concatenates two locations.
    pub fn joined(&self, suffix: &Location) -> Self {
        let mut segments = self.0.clone();
        segments.extend(suffix.0.iter().cloned());
        Location(segments)
    }

    /// The segments making up this location.
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    fn starts_with(&self, prefix: &Location) -> bool {
        self.0.len() >= prefix.0.len() && self.0[..prefix.0.len()] == prefix.0[..]
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl<S: Into<Segment>> FromIterator<S> for Location {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Location(iter.into_iter().map(Into::into).collect())
    }
}

/// A tree of validation problems collected during one validation run.
#[derive(Debug, Clone, Default)]
pub struct ValidationIssues {
    issues: IndexMap<Location, Vec<ValidationError>>,
    stop_proceeding: HashSet<Location>,
}

impl ValidationIssues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an issue at the root location.
    pub fn add(&mut self, error: ValidationError, proceed: bool) {
        self.add_at(Location::root(), error, proceed);
    }

    /// Records an issue at the given location.
    pub fn add_at(&mut self, location: Location, error: ValidationError, proceed: bool) {
        if !proceed {
            self.stop_proceeding.insert(location.clone());
        }
        self.issues.entry(location).or_default().push(error);
    }

    /// Absorbs another issue tree at the root location.
    pub fn merge(&mut self, other: ValidationIssues) {
        self.merge_at(Location::root(), other);
    }

    /// Absorbs another issue tree, prefixing all its locations.
    pub fn merge_at(&mut self, prefix: Location, other: ValidationIssues) {
        for (location, errors) in other.issues {
            let target = prefix.joined(&location);
            if other.stop_proceeding.contains(&location) {
                self.stop_proceeding.insert(target.clone());
            }
            self.issues.entry(target).or_default().extend(errors);
        }
    }

    /// Whether the value as a whole may still be processed.
    ///
    /// True unless a non-proceeding issue was recorded at the root.
    pub fn can_proceed(&self) -> bool {
        !self.stop_proceeding.contains(&Location::root())
    }

    /// Whether the value at `location` may still be processed.
    ///
    /// A non-proceeding issue at any prefix of `location` blocks it too.
    pub fn can_proceed_at(&self, location: &Location) -> bool {
        !self
            .stop_proceeding
            .iter()
            .any(|stopped| location.starts_with(stopped))
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Whether any issue was recorded at `location` or below it.
    pub fn has_issues_at(&self, location: &Location) -> bool {
        self.issues.keys().any(|known| known.starts_with(location))
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Iterates locations with their issue lists, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Location, &[ValidationError])> {
        self.issues
            .iter()
            .map(|(location, errors)| (location, errors.as_slice()))
    }

    /// Renders the tree as a nested JSON object.
    ///
    /// Issues at each location land in an `"_errors"` array of
    /// `{"code": …}` entries, with `"error"` text included when
    /// `with_messages` is set.
    pub fn to_json(&self, with_messages: bool) -> Value {
        let mut output = Map::new();
        'location: for (location, errors) in &self.issues {
            let mut level = &mut output;
            for segment in location.segments() {
                let entry = level
                    .entry(segment.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                level = match entry {
                    Value::Object(map) => map,
                    // A raw input key may collide with the "_errors"
                    // marker; such a location can not be rendered.
                    _ => continue 'location,
                };
            }
            let rendered = level
                .entry("_errors")
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(items) = rendered {
                for error in errors {
                    let mut item = json!({"code": error.code()});
                    if with_messages {
                        item["error"] = Value::String(error.to_string());
                    }
                    items.push(item);
                }
            }
        }
        Value::Object(output)
    }
}
