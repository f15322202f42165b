// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! YAML configuration of the demo relay.

use crate::report::EquipmentReport;
use anyhow::Context;
use influx_relay::ConnectionConfig;
use serde::Deserialize;
use std::path::Path;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "INFLUX_RELAY_CONFIG";

/// Configuration file used when [`CONFIG_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "relay.yaml";

/// Top-level demo configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DemoConfig {
    /// InfluxDB connection settings.
    pub influxdb: ConnectionConfig,
    /// Reports to forward, one batch each.
    #[serde(default)]
    pub reports: Vec<EquipmentReport>,
}

impl DemoConfig {
    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        let config: DemoConfig = serde_yaml::from_str(yaml).context("YAML parse error")?;
        config.influxdb.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        Self::from_yaml(&content)
    }
}
