// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Validated measurement records.
//!
//! A [`Datapoint`] is checked once, at construction, against the rules a
//! time-series store needs:
//!
//! 1. `measurement` is a non-empty string
//! 2. `time` is a string
//! 3. `time` matches `YYYY-MM-DDTHH:MM:SSZ` exactly
//! 4. `fields` is a mapping
//! 5. `fields` has at least one entry
//! 6. every `fields` key is a non-empty string, every value a scalar
//! 7. `tags`, if given, maps non-empty string keys to string values
//!
//! Rules run in that order and the first violation is returned. With the
//! typed constructor [`Datapoint::new`] the compiler already guarantees the
//! type rules; [`Datapoint::from_parts`] applies all of them to dynamic
//! JSON input.

use crate::error::DatapointError;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// `strftime` pattern of the `time` string.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Tag set of a datapoint.
pub type Tags = BTreeMap<String, String>;

/// Field set of a datapoint.
pub type Fields = BTreeMap<String, FieldValue>;

/// A scalar value stored in a field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// 64-bit floating point.
    Float(f64),
    /// 64-bit signed integer.
    Integer(i64),
    /// UTF-8 string.
    String(String),
    /// Boolean value.
    Boolean(bool),
}

impl FieldValue {
    /// Convert a JSON scalar. Null, arrays and objects have no field form.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(FieldValue::Integer(i))
                } else {
                    n.as_f64().map(FieldValue::Float)
                }
            }
            Value::String(s) => Some(FieldValue::String(s.clone())),
            Value::Bool(b) => Some(FieldValue::Boolean(*b)),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        FieldValue::Float(v as f64)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Integer(v as i64)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Boolean(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::String(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::String(v.to_string())
    }
}

/// One validated measurement record.
///
/// Immutable after construction. `tags` is empty when none were supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct Datapoint {
    measurement: String,
    time: String,
    timestamp: DateTime<Utc>,
    fields: Fields,
    tags: Tags,
}

impl Datapoint {
    /// Build a datapoint from typed parts.
    pub fn new(
        measurement: impl Into<String>,
        time: impl Into<String>,
        fields: Fields,
        tags: Option<Tags>,
    ) -> Result<Self, DatapointError> {
        let measurement = measurement.into();
        if measurement.is_empty() {
            return Err(DatapointError::EmptyValue {
                field: "measurement",
            });
        }

        let time = time.into();
        let timestamp = parse_time(&time)?;

        if fields.is_empty() {
            return Err(DatapointError::EmptyValue { field: "fields" });
        }
        if fields.contains_key("") {
            return Err(DatapointError::KeyType {
                field: "fields",
                key: "\"\"".to_string(),
            });
        }

        let tags = tags.unwrap_or_default();
        if tags.contains_key("") {
            return Err(DatapointError::KeyType {
                field: "tags",
                key: "\"\"".to_string(),
            });
        }

        Ok(Self {
            measurement,
            time,
            timestamp,
            fields,
            tags,
        })
    }

    /// Start a builder for the given measurement.
    pub fn builder(measurement: impl Into<String>) -> DatapointBuilder {
        DatapointBuilder {
            measurement: measurement.into(),
            time: None,
            fields: Fields::new(),
            tags: None,
        }
    }

    /// Build a datapoint from untyped parts, applying every rule at runtime.
    ///
    /// `tags` of `None` or JSON `null` means no tags.
    pub fn from_parts(
        measurement: &Value,
        time: &Value,
        fields: &Value,
        tags: Option<&Value>,
    ) -> Result<Self, DatapointError> {
        let measurement = expect_str("measurement", measurement)?;
        if measurement.is_empty() {
            return Err(DatapointError::EmptyValue {
                field: "measurement",
            });
        }

        let time = expect_str("time", time)?;
        parse_time(time)?;

        let Value::Object(raw_fields) = fields else {
            return Err(type_error("fields", "a mapping", fields));
        };
        if raw_fields.is_empty() {
            return Err(DatapointError::EmptyValue { field: "fields" });
        }
        let mut typed_fields = Fields::new();
        for (key, value) in raw_fields {
            if key.is_empty() {
                return Err(DatapointError::KeyType {
                    field: "fields",
                    key: "\"\"".to_string(),
                });
            }
            let field = FieldValue::from_json(value).ok_or_else(|| {
                type_error(
                    &format!("fields.{}", key),
                    "a number, string or boolean",
                    value,
                )
            })?;
            typed_fields.insert(key.clone(), field);
        }

        let typed_tags = match tags {
            None | Some(Value::Null) => None,
            Some(Value::Object(raw_tags)) => {
                let mut typed = Tags::new();
                for (key, value) in raw_tags {
                    let Value::String(s) = value else {
                        return Err(type_error(&format!("tags.{}", key), "a string", value));
                    };
                    typed.insert(key.clone(), s.clone());
                }
                Some(typed)
            }
            Some(other) => return Err(type_error("tags", "a mapping", other)),
        };

        Self::new(measurement, time, typed_fields, typed_tags)
    }

    /// Build a datapoint from a JSON record
    /// `{"measurement": .., "time": .., "fields": {..}, "tags": {..}}`.
    pub fn from_json(record: &Value) -> Result<Self, DatapointError> {
        let Value::Object(map) = record else {
            return Err(type_error("record", "a mapping", record));
        };
        let missing = Value::Null;
        Self::from_parts(
            map.get("measurement").unwrap_or(&missing),
            map.get("time").unwrap_or(&missing),
            map.get("fields").unwrap_or(&missing),
            map.get("tags"),
        )
    }

    /// Measurement name.
    pub fn measurement(&self) -> &str {
        &self.measurement
    }

    /// Time exactly as supplied.
    pub fn time(&self) -> &str {
        &self.time
    }

    /// Parsed `time`.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }
}

/// Builder for [`Datapoint`]. Validation runs in [`DatapointBuilder::build`].
#[derive(Debug, Clone)]
pub struct DatapointBuilder {
    measurement: String,
    time: Option<String>,
    fields: Fields,
    tags: Option<Tags>,
}

impl DatapointBuilder {
    /// Set the time string.
    pub fn time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    /// Set the time from a UTC instant, truncated to whole seconds.
    pub fn timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.time = Some(format_time(at));
        self
    }

    /// Add a field.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Add a tag.
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags
            .get_or_insert_with(Tags::new)
            .insert(key.into(), value.into());
        self
    }

    /// Validate and build the datapoint.
    pub fn build(self) -> Result<Datapoint, DatapointError> {
        let time = self.time.ok_or(DatapointError::Type {
            field: "time".to_string(),
            expected: "a string",
            found: "nothing".to_string(),
        })?;
        Datapoint::new(self.measurement, time, self.fields, self.tags)
    }
}

/// Format a UTC instant the way `time` expects it.
pub fn format_time(at: DateTime<Utc>) -> String {
    at.format(TIME_FORMAT).to_string()
}

/// Check the exact `YYYY-MM-DDTHH:MM:SSZ` shape, then the calendar.
///
/// Seconds stop at 59: a leap second would land on the same epoch second
/// as `:59`.
fn parse_time(time: &str) -> Result<DateTime<Utc>, DatapointError> {
    let bytes = time.as_bytes();
    let shape_ok = bytes.len() == 20
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            10 => *b == b'T',
            13 | 16 => *b == b':',
            19 => *b == b'Z',
            _ => b.is_ascii_digit(),
        })
        && &bytes[17..19] < b"60".as_slice();

    let naive = if shape_ok {
        NaiveDateTime::parse_from_str(time, TIME_FORMAT).ok()
    } else {
        None
    };

    naive
        .map(|n| Utc.from_utc_datetime(&n))
        .ok_or_else(|| DatapointError::Format {
            value: time.to_string(),
        })
}

fn expect_str<'a>(field: &str, value: &'a Value) -> Result<&'a str, DatapointError> {
    value
        .as_str()
        .ok_or_else(|| type_error(field, "a string", value))
}

fn type_error(field: &str, expected: &'static str, found: &Value) -> DatapointError {
    DatapointError::Type {
        field: field.to_string(),
        expected,
        found: describe(found),
    }
}

fn describe(value: &Value) -> String {
    let kind = match value {
        Value::Null => return "null".to_string(),
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    format!("{} {}", kind, value)
}
