// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Influx Relay demo
//!
//! Reads equipment sensor reports from a YAML file and forwards each report
//! to InfluxDB as one batch.
//!
//! # Usage
//!
//! ```bash
//! INFLUX_RELAY_CONFIG=config/relay.yaml RUST_LOG=debug influx-relay-demo
//! ```

mod config;
mod report;

use config::{DemoConfig, CONFIG_ENV, DEFAULT_CONFIG_PATH};
use influx_relay::{logging, Writer};
use std::path::PathBuf;
use tracing::{error, info, warn};

fn main() -> anyhow::Result<()> {
    logging::init_stderr("info");

    let path = std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = DemoConfig::from_file(&path)?;
    info!(path = %path.display(), reports = config.reports.len(), "configuration loaded");

    let writer = Writer::connect(config.influxdb)?;

    let mut failed = 0;
    for report in &config.reports {
        let batch = report.to_datapoints();
        for rejected in &batch.rejected {
            warn!(
                equipment = %report.equipment_name,
                sensor = %rejected.sensor_name,
                kind = ?rejected.error.kind(),
                "skipping sensor: {}",
                rejected.error
            );
        }

        match writer.write_bulk(&batch.datapoints) {
            Ok(written) => info!(equipment = %report.equipment_name, written, "report forwarded"),
            Err(e) => {
                failed += 1;
                error!(equipment = %report.equipment_name, "report not forwarded: {}", e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} reports failed to write", failed, config.reports.len());
    }
    Ok(())
}
