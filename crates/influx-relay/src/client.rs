// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Write API collaborators.
//!
//! [`WriteApi`] is the only capability the [`crate::Writer`] needs: persist
//! an ordered batch of points into `(bucket, org)` in one call.
//! [`HttpWriteApi`] is the default implementation, posting Line Protocol to
//! the InfluxDB v2 `/api/v2/write` endpoint.

use crate::config::{ConnectionConfig, WritePrecision};
use crate::error::{ClientError, ConfigError};
use crate::line_protocol;
use crate::point::Point;
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;

/// Persist a batch of points as one unit.
///
/// Implementations own transport, authentication and retries. A returned
/// error means the whole batch is to be treated as not written.
pub trait WriteApi {
    fn write(&self, bucket: &str, org: &str, points: &[Point]) -> Result<(), ClientError>;
}

impl<W: WriteApi + ?Sized> WriteApi for &W {
    fn write(&self, bucket: &str, org: &str, points: &[Point]) -> Result<(), ClientError> {
        (**self).write(bucket, org, points)
    }
}

impl<W: WriteApi + ?Sized> WriteApi for Box<W> {
    fn write(&self, bucket: &str, org: &str, points: &[Point]) -> Result<(), ClientError> {
        (**self).write(bucket, org, points)
    }
}

/// Blocking HTTP write API for InfluxDB v2.
pub struct HttpWriteApi {
    http: Client,
    write_url: String,
    token: String,
    precision: WritePrecision,
}

impl HttpWriteApi {
    /// Build the HTTP client from a validated configuration.
    pub fn new(config: &ConnectionConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            write_url: format!("{}/api/v2/write", config.url()),
            token: config.token.clone(),
            precision: config.precision,
        })
    }

    /// Endpoint the batches are posted to.
    pub fn write_url(&self) -> &str {
        &self.write_url
    }
}

impl WriteApi for HttpWriteApi {
    fn write(&self, bucket: &str, org: &str, points: &[Point]) -> Result<(), ClientError> {
        let body = line_protocol::encode_batch(points, self.precision)?;

        let response = self
            .http
            .post(&self.write_url)
            .query(&[
                ("org", org),
                ("bucket", bucket),
                ("precision", self.precision.as_str()),
            ])
            .header(AUTHORIZATION, format!("Token {}", self.token))
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(body)
            .send()?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response.text().unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ClientError::Unauthorized {
                status: status.as_u16(),
                message,
            }),
            _ => Err(ClientError::Rejected {
                status: status.as_u16(),
                message,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_write_api_url() {
        let config = ConnectionConfig::new("t", "o", "b", "10.0.0.5");
        let api = HttpWriteApi::new(&config).expect("client");
        assert_eq!(api.write_url(), "http://10.0.0.5:8086/api/v2/write");
    }

    #[test]
    fn test_http_write_api_rejects_invalid_config() {
        let config = ConnectionConfig::new("", "o", "b", "localhost");
        assert!(matches!(
            HttpWriteApi::new(&config),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_encode_failure_happens_before_send() {
        // Port 9 on localhost is never contacted: encoding fails first.
        let config = ConnectionConfig::new("t", "o", "b", "127.0.0.1:9");
        let api = HttpWriteApi::new(&config).expect("client");
        let point = Point {
            measurement: "m".to_string(),
            tags: Default::default(),
            time: "not-a-time".to_string(),
            fields: [("v".to_string(), crate::FieldValue::Integer(1))]
                .into_iter()
                .collect(),
        };
        let err = api.write("b", "o", &[point]).unwrap_err();
        assert_eq!(err.kind(), "EncodeError");
    }
}
