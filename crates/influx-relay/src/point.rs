// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Point shape handed to a [`crate::WriteApi`].

use crate::datapoint::{Datapoint, Fields, Tags};
use serde::Serialize;

/// One point of a write batch: `{measurement, tags, time, fields}`.
///
/// `time` is the validated datapoint string; turning it into the store's
/// timestamp representation is up to the write API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub measurement: String,
    pub tags: Tags,
    pub time: String,
    pub fields: Fields,
}

impl From<&Datapoint> for Point {
    fn from(dp: &Datapoint) -> Self {
        Self {
            measurement: dp.measurement().to_string(),
            tags: dp.tags().clone(),
            time: dp.time().to_string(),
            fields: dp.fields().clone(),
        }
    }
}

/// Convert a batch, preserving count and order.
pub fn to_points(datapoints: &[Datapoint]) -> Vec<Point> {
    datapoints.iter().map(Point::from).collect()
}
