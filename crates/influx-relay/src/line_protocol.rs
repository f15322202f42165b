// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! InfluxDB v2 Line Protocol encoding for [`Point`] batches.
//!
//! Line Protocol format:
//! ```text
//! measurement,tag1=val1,tag2=val2 field1=val1,field2=val2 timestamp
//! ```
//!
//! See: <https://docs.influxdata.com/influxdb/v2/reference/syntax/line-protocol/>

use crate::config::WritePrecision;
use crate::datapoint::{FieldValue, TIME_FORMAT};
use crate::error::ClientError;
use crate::point::Point;
use chrono::NaiveDateTime;

/// Format a field value for Line Protocol.
///
/// - Float: written as-is (e.g., `3.14`), non-finite values are rejected
/// - Integer: suffixed with `i` (e.g., `42i`)
/// - String: quoted with double quotes, inner quotes escaped (e.g., `"hello"`)
/// - Boolean: `true` or `false`
pub fn encode_field_value(value: &FieldValue) -> Result<String, ClientError> {
    match value {
        FieldValue::Float(v) if !v.is_finite() => Err(ClientError::Encode(format!(
            "non-finite float {} has no line protocol form",
            v
        ))),
        FieldValue::Float(v) => Ok(format!("{}", v)),
        FieldValue::Integer(v) => Ok(format!("{}i", v)),
        FieldValue::String(v) => {
            let escaped = v.replace('\\', "\\\\").replace('"', "\\\"");
            Ok(format!("\"{}\"", escaped))
        }
        FieldValue::Boolean(v) => Ok(v.to_string()),
    }
}

/// Convert a point's `time` to an integer timestamp at `precision`.
pub fn timestamp(time: &str, precision: WritePrecision) -> Result<i64, ClientError> {
    let at = NaiveDateTime::parse_from_str(time, TIME_FORMAT)
        .map_err(|e| ClientError::Encode(format!("invalid time {:?}: {}", time, e)))?
        .and_utc();
    let scaled = match precision {
        WritePrecision::S => Some(at.timestamp()),
        WritePrecision::Ms => Some(at.timestamp_millis()),
        WritePrecision::Us => Some(at.timestamp_micros()),
        WritePrecision::Ns => at.timestamp_nanos_opt(),
    };
    scaled.ok_or_else(|| ClientError::Encode(format!("time {:?} out of range for ns", time)))
}

/// Encode one point as a single Line Protocol line.
///
/// Tags come out sorted by key (the point stores them sorted).
pub fn encode_point(point: &Point, precision: WritePrecision) -> Result<String, ClientError> {
    if point.fields.is_empty() {
        return Err(ClientError::Encode(format!(
            "point '{}' has no fields",
            point.measurement
        )));
    }

    let mut line = escape_measurement(&point.measurement);

    // An empty tag value has no line protocol form; the tag is dropped.
    for (key, value) in point.tags.iter().filter(|(_, v)| !v.is_empty()) {
        line.push(',');
        line.push_str(&escape_key(key));
        line.push('=');
        line.push_str(&escape_key(value));
    }

    line.push(' ');

    for (i, (key, value)) in point.fields.iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        line.push_str(&escape_key(key));
        line.push('=');
        line.push_str(&encode_field_value(value)?);
    }

    line.push(' ');
    line.push_str(&timestamp(&point.time, precision)?.to_string());

    Ok(line)
}

/// Encode a batch, one line per point, newline separated.
pub fn encode_batch(points: &[Point], precision: WritePrecision) -> Result<String, ClientError> {
    let lines = points
        .iter()
        .map(|p| encode_point(p, precision))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lines.join("\n"))
}

/// Escape measurement name: backslashes, control whitespace, commas and spaces.
fn escape_measurement(s: &str) -> String {
    escape(s, &[',', ' '])
}

/// Escape tag keys, tag values and field keys: as measurements, plus equals signs.
fn escape_key(s: &str) -> String {
    escape(s, &[',', '=', ' '])
}

fn escape(s: &str, specials: &[char]) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if specials.contains(&c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}
