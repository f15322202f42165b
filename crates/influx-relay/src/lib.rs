// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Influx Relay
//!
//! Validates telemetry datapoints and writes them to InfluxDB v2 in batches.
//!
//! This crate provides:
//! - [`Datapoint`], a measurement record validated at construction
//! - [`Writer`], submitting a batch of datapoints in one write call
//! - [`WriteApi`], the seam to the storage client, with [`HttpWriteApi`]
//!   as the default Line Protocol over HTTP implementation
//! - Typed errors for validation and write failures
//!
//! # Overview
//!
//! ```text
//! Datapoint::new --> Writer::write_bulk --> [Point] --> WriteApi::write
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use influx_relay::{ConnectionConfig, Datapoint, Writer};
//!
//! let writer = Writer::connect(ConnectionConfig::new("token", "org", "sensors", "localhost"))?;
//!
//! let dp = Datapoint::builder("temperature_sensor")
//!     .time("2021-07-05T10:04:04Z")
//!     .field("value", 23.45)
//!     .tag("unit", "celsius")
//!     .build()?;
//!
//! if let Err(e) = writer.write_one(&dp) {
//!     eprintln!("write failed: {}", e);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod client;
pub mod config;
pub mod datapoint;
pub mod error;
pub mod line_protocol;
pub mod logging;
pub mod point;
pub mod writer;

pub use client::{HttpWriteApi, WriteApi};
pub use config::{ConnectionConfig, WritePrecision};
pub use datapoint::{format_time, Datapoint, DatapointBuilder, FieldValue, Fields, Tags, TIME_FORMAT};
pub use error::{ClientError, ConfigError, DatapointError, ValidationKind, WriteCall, WriteError};
pub use point::Point;
pub use writer::Writer;
