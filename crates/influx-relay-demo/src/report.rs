// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Equipment sensor reports and their conversion to datapoints.

use chrono::DateTime;
use influx_relay::{format_time, Datapoint, DatapointError};
use serde::Deserialize;
use serde_json::{json, Value};

/// Readings of every sensor on one piece of equipment at one instant.
#[derive(Debug, Clone, Deserialize)]
pub struct EquipmentReport {
    pub equipment_name: String,
    pub equipment_serial_number: String,
    pub sensors: Vec<SensorReading>,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
}

/// One sensor reading. `type` and `value` stay untyped until validation.
#[derive(Debug, Clone, Deserialize)]
pub struct SensorReading {
    pub sensor_name: String,
    pub sensor_serial_number: String,
    #[serde(rename = "type", default)]
    pub kind: Value,
    #[serde(default)]
    pub value: Value,
    pub measurement_unit: String,
}

/// A sensor that could not become a datapoint.
#[derive(Debug)]
pub struct RejectedSensor {
    pub sensor_name: String,
    pub error: DatapointError,
}

/// Result of converting one report.
#[derive(Debug, Default)]
pub struct ReportBatch {
    pub datapoints: Vec<Datapoint>,
    pub rejected: Vec<RejectedSensor>,
}

impl EquipmentReport {
    /// `time` string of this report. Out-of-range timestamps are rendered
    /// raw so that validation rejects them.
    pub fn time(&self) -> String {
        DateTime::from_timestamp(self.timestamp, 0)
            .map(format_time)
            .unwrap_or_else(|| self.timestamp.to_string())
    }

    /// One datapoint per sensor, measurement named after the sensor type.
    ///
    /// Sensors failing validation are collected in `rejected`; the others
    /// still convert.
    pub fn to_datapoints(&self) -> ReportBatch {
        let time = Value::String(self.time());
        let mut batch = ReportBatch::default();

        for sensor in &self.sensors {
            let tags = json!({
                "equipment_name": self.equipment_name,
                "equipment_serial_number": self.equipment_serial_number,
                "sensor_name": sensor.sensor_name,
                "sensor_serial_number": sensor.sensor_serial_number,
                "measurement_unit": sensor.measurement_unit,
            });
            let fields = json!({ "value": sensor.value });

            match Datapoint::from_parts(&sensor.kind, &time, &fields, Some(&tags)) {
                Ok(dp) => batch.datapoints.push(dp),
                Err(error) => batch.rejected.push(RejectedSensor {
                    sensor_name: sensor.sensor_name.clone(),
                    error,
                }),
            }
        }

        batch
    }
}
