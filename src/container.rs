//! Generic nested data container for SCIM resource values.
//!
//! [`ScimData`] holds one resource or one complex value as an ordered,
//! case-insensitive mapping. Keys keep their original spelling for output
//! while lookups normalize to lower case. Values are [`ScimValue`]s, which
//! keep "no value" ([`ScimValue::Missing`]), "value failed to parse"
//! ([`ScimValue::Invalid`]), and JSON `null` strictly apart.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

use crate::error::ScimError;
use crate::path::AttrRep;

/// One SCIM value slot.
///
/// `Missing` marks an absent value and `Invalid` a value that existed but
/// failed to parse; neither ever serializes as a map entry. `Null` is an
/// explicit JSON null supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ScimValue {
    #[default]
    Missing,
    Invalid,
    Null,
    Bool(bool),
    Int(i64),
    Decimal(f64),
    Str(String),
    DateTime(DateTime<FixedOffset>),
    Data(ScimData),
    List(Vec<ScimValue>),
}

impl ScimValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, ScimValue::Missing)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, ScimValue::Invalid)
    }

    /// Whether this slot holds an actual value, `null` included.
    pub fn is_present(&self) -> bool {
        !matches!(self, ScimValue::Missing | ScimValue::Invalid)
    }

    /// SCIM name of the value's shape, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            ScimValue::Missing => "missing",
            ScimValue::Invalid => "invalid",
            ScimValue::Null => "null",
            ScimValue::Bool(_) => "boolean",
            ScimValue::Int(_) => "integer",
            ScimValue::Decimal(_) => "decimal",
            ScimValue::Str(_) => "string",
            ScimValue::DateTime(_) => "dateTime",
            ScimValue::Data(_) => "complex",
            ScimValue::List(_) => "list",
        }
    }

    /// Converts decoded JSON into a value tree.
    pub fn from_json(value: &Value) -> ScimValue {
        match value {
            Value::Null => ScimValue::Null,
            Value::Bool(b) => ScimValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => ScimValue::Int(i),
                None => ScimValue::Decimal(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => ScimValue::Str(s.clone()),
            Value::Array(items) => {
                ScimValue::List(items.iter().map(ScimValue::from_json).collect())
            }
            Value::Object(map) => ScimValue::Data(ScimData::from_json_object(map)),
        }
    }

    /// Re-serializes the value for the wire.
    ///
    /// `Missing` and `Invalid` become `null` here; map entries holding
    /// them are omitted entirely by [`ScimData::to_json`], so `null` only
    /// surfaces for positional slots inside lists.
    pub fn to_json(&self) -> Value {
        match self {
            ScimValue::Missing | ScimValue::Invalid | ScimValue::Null => Value::Null,
            ScimValue::Bool(b) => Value::Bool(*b),
            ScimValue::Int(i) => Value::Number((*i).into()),
            ScimValue::Decimal(d) => Number::from_f64(*d)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ScimValue::Str(s) => Value::String(s.clone()),
            ScimValue::DateTime(dt) => Value::String(dt.to_rfc3339()),
            ScimValue::Data(data) => data.to_json(),
            ScimValue::List(items) => {
                Value::Array(items.iter().map(ScimValue::to_json).collect())
            }
        }
    }
}

impl From<bool> for ScimValue {
    fn from(b: bool) -> Self {
        ScimValue::Bool(b)
    }
}

impl From<i64> for ScimValue {
    fn from(i: i64) -> Self {
        ScimValue::Int(i)
    }
}

impl From<f64> for ScimValue {
    fn from(d: f64) -> Self {
        ScimValue::Decimal(d)
    }
}

impl From<&str> for ScimValue {
    fn from(s: &str) -> Self {
        ScimValue::Str(s.to_owned())
    }
}

impl From<String> for ScimValue {
    fn from(s: String) -> Self {
        ScimValue::Str(s)
    }
}

impl From<ScimData> for ScimValue {
    fn from(data: ScimData) -> Self {
        ScimValue::Data(data)
    }
}

impl From<Vec<ScimValue>> for ScimValue {
    fn from(items: Vec<ScimValue>) -> Self {
        ScimValue::List(items)
    }
}

impl From<&Value> for ScimValue {
    fn from(value: &Value) -> Self {
        ScimValue::from_json(value)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    key: String,
    value: ScimValue,
}

/// Ordered, case-insensitive mapping holding one SCIM resource or one
/// complex value.
#[derive(Debug, Clone, Default)]
pub struct ScimData {
    // Keyed by the lowercased key; the entry retains the original casing.
    entries: IndexMap<String, Entry>,
}

impl ScimData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a container from a decoded JSON object.
    pub fn from_json_object(map: &Map<String, Value>) -> Self {
        let mut data = ScimData::new();
        for (key, value) in map {
            data.insert(key, ScimValue::from_json(value));
        }
        data
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Original-cased keys, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|entry| entry.key.as_str())
    }

    /// Direct single-key lookup, bypassing path resolution.
    pub fn get_key(&self, key: &str) -> ScimValue {
        self.entries
            .get(&key.to_lowercase())
            .map(|entry| entry.value.clone())
            .unwrap_or(ScimValue::Missing)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&key.to_lowercase())
    }

    /// Sets a top-level key directly, keeping the given spelling for
    /// output. Replacing an existing key keeps its position but adopts
    /// the new spelling.
    pub fn insert(&mut self, key: &str, value: ScimValue) {
        self.entries.insert(
            key.to_lowercase(),
            Entry {
                key: key.to_owned(),
                value,
            },
        );
    }

    /// Looks a value up by attribute path.
    ///
    /// Absent keys yield [`ScimValue::Missing`]. A sub-attribute of a
    /// multi-valued attribute broadcasts over its elements; non-complex
    /// elements contribute `Missing`.
    pub fn get(&self, rep: &AttrRep) -> ScimValue {
        if let Some(schema) = rep.schema() {
            if let Some(entry) = self.entries.get(&schema.to_lowercase()) {
                return match &entry.value {
                    ScimValue::Data(extension) => extension.get(&rep.unqualified()),
                    _ => ScimValue::Missing,
                };
            }
            // No extension container under that URN; the reference then
            // resolves against this container's own attributes.
        }

        let Some(entry) = self.entries.get(&rep.attr().to_lowercase()) else {
            return ScimValue::Missing;
        };
        let Some(child) = rep.child() else {
            return entry.value.clone();
        };
        match &entry.value {
            ScimValue::Data(data) => data.get(&child),
            ScimValue::List(items) => ScimValue::List(
                items
                    .iter()
                    .map(|item| match item {
                        ScimValue::Data(data) => data.get(&child),
                        _ => ScimValue::Missing,
                    })
                    .collect(),
            ),
            _ => ScimValue::Missing,
        }
    }

    /// Convenience lookup by dotted path string.
    pub fn get_path(&self, path: &str) -> Result<ScimValue, ScimError> {
        Ok(self.get(&AttrRep::parse(path)?))
    }

    /// Assigns a value at an attribute path.
    ///
    /// Extension paths create the nested extension container on demand.
    /// Assigning a sub-attribute under an existing non-complex value
    /// fails with [`ScimError::NotComplex`]. Assigning a list to a
    /// sub-attribute path broadcasts element-wise over the existing list:
    /// the target is padded with empty containers up to the new list's
    /// length, `Missing` elements of the new list leave their target
    /// untouched, and existing elements past the new list's length are
    /// retained unchanged.
    pub fn set(&mut self, rep: &AttrRep, value: ScimValue) -> Result<(), ScimError> {
        if rep.is_extension() {
            let Some(schema) = rep.schema() else {
                return Err(ScimError::ExtensionWithoutSchema);
            };
            let entry = self
                .entries
                .entry(schema.to_lowercase())
                .or_insert_with(|| Entry {
                    key: schema.to_owned(),
                    value: ScimValue::Data(ScimData::new()),
                });
            return match &mut entry.value {
                ScimValue::Data(extension) => extension.set(&rep.unqualified(), value),
                other => Err(ScimError::NotComplex {
                    key: schema.to_owned(),
                    value: format!("{other:?}"),
                }),
            };
        }

        let Some(child) = rep.child() else {
            self.insert(rep.attr(), value);
            return Ok(());
        };

        let entry = self
            .entries
            .entry(rep.attr().to_lowercase())
            .or_insert_with(|| Entry {
                key: rep.attr().to_owned(),
                value: if matches!(value, ScimValue::List(_)) {
                    ScimValue::List(Vec::new())
                } else {
                    ScimValue::Data(ScimData::new())
                },
            });

        match value {
            ScimValue::List(items) => {
                let existing = match &mut entry.value {
                    ScimValue::List(existing) => existing,
                    other => {
                        return Err(ScimError::NotComplex {
                            key: rep.attr().to_owned(),
                            value: format!("{other:?}"),
                        });
                    }
                };
                if existing.len() < items.len() {
                    existing.resize_with(items.len(), || ScimValue::Data(ScimData::new()));
                }
                for (item, slot) in items.into_iter().zip(existing.iter_mut()) {
                    if item.is_missing() {
                        continue;
                    }
                    match slot {
                        ScimValue::Data(data) => data.set(&child, item)?,
                        other => {
                            return Err(ScimError::NotComplex {
                                key: rep.attr().to_owned(),
                                value: format!("{other:?}"),
                            });
                        }
                    }
                }
                Ok(())
            }
            value => match &mut entry.value {
                ScimValue::Data(data) => data.set(&child, value),
                other => Err(ScimError::NotComplex {
                    key: rep.attr().to_owned(),
                    value: format!("{other:?}"),
                }),
            },
        }
    }

    /// Convenience assignment by dotted path string.
    pub fn set_path(&mut self, path: &str, value: ScimValue) -> Result<(), ScimError> {
        self.set(&AttrRep::parse(path)?, value)
    }

    /// Re-serializes the container as a plain nested JSON object.
    ///
    /// Keys keep their original spelling; `Missing` and `Invalid` entries
    /// are omitted.
    pub fn to_json(&self) -> Value {
        let mut output = Map::new();
        for entry in self.entries.values() {
            if !entry.value.is_present() {
                continue;
            }
            output.insert(entry.key.clone(), entry.value.to_json());
        }
        Value::Object(output)
    }
}

// Key comparison is case-insensitive and order does not matter.
impl PartialEq for ScimData {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self.entries.iter().all(|(lower, entry)| {
                other
                    .entries
                    .get(lower)
                    .is_some_and(|theirs| theirs.value == entry.value)
            })
    }
}

impl From<&Map<String, Value>> for ScimData {
    fn from(map: &Map<String, Value>) -> Self {
        ScimData::from_json_object(map)
    }
}

impl fmt::Display for ScimData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}
