// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! InfluxDB v2 connection configuration.
//!
//! The core never reads files; hosts build a [`ConnectionConfig`] in code or
//! deserialize it as part of their own configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv6Addr;
use std::time::Duration;

/// Port used when `address` names only a host.
pub const DEFAULT_PORT: u16 = 8086;

/// Timestamp precision declared on writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WritePrecision {
    #[default]
    S,
    Ms,
    Us,
    Ns,
}

impl WritePrecision {
    /// Value of the `precision` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            WritePrecision::S => "s",
            WritePrecision::Ms => "ms",
            WritePrecision::Us => "us",
            WritePrecision::Ns => "ns",
        }
    }
}

/// Connection parameters held by a [`crate::Writer`] for its lifetime.
#[derive(Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Authentication token.
    pub token: String,
    /// InfluxDB organization.
    pub org: String,
    /// InfluxDB bucket.
    pub bucket: String,
    /// `host`, `host:port` or a full `http(s)://` URL.
    pub address: String,
    /// Write precision.
    #[serde(default)]
    pub precision: WritePrecision,
    /// Request timeout in seconds, passed to the HTTP client. None = client default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ConnectionConfig {
    /// Create a configuration with seconds precision and no explicit timeout.
    pub fn new(
        token: impl Into<String>,
        org: impl Into<String>,
        bucket: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            org: org.into(),
            bucket: bucket.into(),
            address: address.into(),
            precision: WritePrecision::default(),
            timeout_secs: None,
        }
    }

    /// Set the write precision.
    pub fn precision(mut self, precision: WritePrecision) -> Self {
        self.precision = precision;
        self
    }

    /// Set the request timeout in seconds.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Request timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Base URL of the server, without trailing slash.
    ///
    /// Bare IPv6 literals are bracketed; `[addr]:port` is taken as given.
    pub fn url(&self) -> String {
        let address = self.address.trim_end_matches('/');
        if address.starts_with("http://") || address.starts_with("https://") {
            address.to_string()
        } else if let Ok(v6) = address.parse::<Ipv6Addr>() {
            format!("http://[{}]:{}", v6, DEFAULT_PORT)
        } else if address.starts_with('[') {
            if address.contains("]:") {
                format!("http://{}", address)
            } else {
                format!("http://{}:{}", address, DEFAULT_PORT)
            }
        } else if address.contains(':') {
            format!("http://{}", address)
        } else {
            format!("http://{}:{}", address, DEFAULT_PORT)
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("token", &self.token),
            ("org", &self.org),
            ("bucket", &self.bucket),
            ("address", &self.address),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("'{}' must not be empty", name)));
            }
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid("'timeout_secs' must be positive".into()));
        }
        Ok(())
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("token", &"<redacted>")
            .field("org", &self.org)
            .field("bucket", &self.bucket)
            .field("address", &self.address)
            .field("precision", &self.precision)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_from_bare_host() {
        let config = ConnectionConfig::new("t", "o", "b", "192.168.1.20");
        assert_eq!(config.url(), "http://192.168.1.20:8086");
    }

    #[test]
    fn test_url_from_host_port_and_full_url() {
        let config = ConnectionConfig::new("t", "o", "b", "influx.local:9999");
        assert_eq!(config.url(), "http://influx.local:9999");

        let config = ConnectionConfig::new("t", "o", "b", "https://influx.example.com/");
        assert_eq!(config.url(), "https://influx.example.com");
    }

    #[test]
    fn test_url_from_ipv6() {
        let config = ConnectionConfig::new("t", "o", "b", "::1");
        assert_eq!(config.url(), "http://[::1]:8086");

        let config = ConnectionConfig::new("t", "o", "b", "fe80::1:2");
        assert_eq!(config.url(), "http://[fe80::1:2]:8086");

        let config = ConnectionConfig::new("t", "o", "b", "[::1]");
        assert_eq!(config.url(), "http://[::1]:8086");

        let config = ConnectionConfig::new("t", "o", "b", "[::1]:9999");
        assert_eq!(config.url(), "http://[::1]:9999");
    }

    #[test]
    fn test_validate_rejects_empty_values() {
        assert!(ConnectionConfig::new("t", "o", "b", "localhost").validate().is_ok());

        let err = ConnectionConfig::new("t", "", "b", "localhost")
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("'org'"));

        let err = ConnectionConfig::new("t", "o", "b", "localhost")
            .with_timeout_secs(0)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ConnectionConfig::new("super-secret-token", "o", "b", "localhost");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret-token"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let yaml = r#"
token: "mytoken"
org: "myorg"
bucket: "sensors"
address: "localhost"
"#;
        let config: ConnectionConfig = serde_yaml::from_str(yaml).expect("parse yaml");
        assert_eq!(config.precision, WritePrecision::S);
        assert!(config.timeout_secs.is_none());

        let yaml = r#"
token: "mytoken"
org: "myorg"
bucket: "sensors"
address: "localhost"
precision: "ms"
timeout_secs: 5
"#;
        let config: ConnectionConfig = serde_yaml::from_str(yaml).expect("parse yaml");
        assert_eq!(config.precision, WritePrecision::Ms);
        assert_eq!(config.timeout_secs, Some(5));
    }
}
