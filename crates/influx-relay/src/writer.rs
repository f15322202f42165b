// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Batch submission of datapoints.
//!
//! ```text
//! [Datapoint] --> to_points --> WriteApi::write(bucket, org, points)
//! ```
//!
//! A batch is written by exactly one [`WriteApi`] call. Failures are logged
//! and returned as [`WriteError::WriteFailed`]; the writer never panics on a
//! failed write and never retries or splits a batch itself.

use crate::client::{HttpWriteApi, WriteApi};
use crate::config::ConnectionConfig;
use crate::datapoint::Datapoint;
use crate::error::{ConfigError, WriteCall, WriteError};
use crate::point::to_points;
use std::slice;
use tracing::{debug, info, warn};

/// Writes validated datapoints to one bucket of one organization.
pub struct Writer<C = HttpWriteApi> {
    config: ConnectionConfig,
    client: C,
}

impl Writer<HttpWriteApi> {
    /// Create a writer backed by the default HTTP write API.
    pub fn connect(config: ConnectionConfig) -> Result<Self, ConfigError> {
        let client = HttpWriteApi::new(&config)?;
        info!(
            url = %client.write_url(),
            org = %config.org,
            bucket = %config.bucket,
            "InfluxDB writer initialized"
        );
        Ok(Self { config, client })
    }
}

impl<C: WriteApi> Writer<C> {
    /// Create a writer around an injected write API.
    pub fn with_client(config: ConnectionConfig, client: C) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            org = %config.org,
            bucket = %config.bucket,
            "InfluxDB writer initialized"
        );
        Ok(Self { config, client })
    }

    /// Submit a single datapoint as a batch of one.
    pub fn write_one(&self, datapoint: &Datapoint) -> Result<usize, WriteError> {
        self.submit(WriteCall::Single, slice::from_ref(datapoint))
    }

    /// Submit an ordered batch in one call.
    ///
    /// Returns the number of points written. An empty batch makes no call.
    pub fn write_bulk(&self, datapoints: &[Datapoint]) -> Result<usize, WriteError> {
        self.submit(WriteCall::Bulk, datapoints)
    }

    /// Connection parameters this writer was built with.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn submit(&self, call: WriteCall, datapoints: &[Datapoint]) -> Result<usize, WriteError> {
        if datapoints.is_empty() {
            debug!(%call, "empty batch, nothing to write");
            return Ok(0);
        }

        let points = to_points(datapoints);
        match self
            .client
            .write(&self.config.bucket, &self.config.org, &points)
        {
            Ok(()) => {
                debug!(%call, points = points.len(), bucket = %self.config.bucket, "datapoints written");
                Ok(points.len())
            }
            Err(cause) => {
                warn!(
                    %call,
                    points = points.len(),
                    bucket = %self.config.bucket,
                    "{}: Unable to write datapoints: {}",
                    cause.kind(),
                    cause
                );
                Err(WriteError::WriteFailed {
                    call,
                    points: points.len(),
                    cause,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::point::Point;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recording {
        calls: RefCell<Vec<(String, String, Vec<Point>)>>,
        fail_with: Option<String>,
    }

    impl WriteApi for Recording {
        fn write(&self, bucket: &str, org: &str, points: &[Point]) -> Result<(), ClientError> {
            self.calls
                .borrow_mut()
                .push((bucket.to_string(), org.to_string(), points.to_vec()));
            match &self.fail_with {
                Some(msg) => Err(ClientError::Other(msg.clone())),
                None => Ok(()),
            }
        }
    }

    fn config() -> ConnectionConfig {
        ConnectionConfig::new("token", "org", "bucket", "localhost")
    }

    fn sample(measurement: &str) -> Datapoint {
        Datapoint::builder(measurement)
            .time("2021-07-05T10:04:04Z")
            .field("value", 1.5)
            .build()
            .expect("valid datapoint")
    }

    #[test]
    fn test_write_one_is_batch_of_one() {
        let writer = Writer::with_client(config(), Recording::default()).expect("writer");
        assert_eq!(writer.write_one(&sample("a")).expect("write"), 1);

        let calls = writer.client().calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "bucket");
        assert_eq!(calls[0].1, "org");
        assert_eq!(calls[0].2.len(), 1);
        assert_eq!(calls[0].2[0].measurement, "a");
    }

    #[test]
    fn test_write_bulk_single_call() {
        let writer = Writer::with_client(config(), Recording::default()).expect("writer");
        let batch = vec![sample("a"), sample("b"), sample("c")];
        assert_eq!(writer.write_bulk(&batch).expect("write"), 3);

        let calls = writer.client().calls.borrow();
        assert_eq!(calls.len(), 1);
        let names: Vec<_> = calls[0].2.iter().map(|p| p.measurement.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_empty_bulk_makes_no_call() {
        let writer = Writer::with_client(config(), Recording::default()).expect("writer");
        assert_eq!(writer.write_bulk(&[]).expect("write"), 0);
        assert!(writer.client().calls.borrow().is_empty());
    }

    #[test]
    fn test_failure_is_returned_not_raised() {
        let client = Recording {
            fail_with: Some("connection refused".to_string()),
            ..Default::default()
        };
        let writer = Writer::with_client(config(), client).expect("writer");

        let err = writer
            .write_bulk(&[sample("a"), sample("b")])
            .expect_err("write must fail");
        match err {
            WriteError::WriteFailed { call, points, cause } => {
                assert_eq!(call, WriteCall::Bulk);
                assert_eq!(points, 2);
                assert_eq!(cause.to_string(), "connection refused");
            }
        }

        let err = writer.write_one(&sample("a")).expect_err("write must fail");
        assert!(err.to_string().starts_with("write_one:"));
    }

    #[test]
    fn test_borrowed_and_boxed_clients() {
        let shared = Recording::default();
        {
            let writer = Writer::with_client(config(), &shared).expect("writer");
            writer.write_one(&sample("a")).expect("write");
        }
        assert_eq!(shared.calls.borrow().len(), 1);

        let boxed: Box<dyn WriteApi> = Box::new(Recording::default());
        let writer = Writer::with_client(config(), boxed).expect("writer");
        assert_eq!(writer.write_bulk(&[sample("a"), sample("b")]).expect("write"), 2);
    }

    #[test]
    fn test_with_client_validates_config() {
        let bad = ConnectionConfig::new("token", "org", "", "localhost");
        assert!(Writer::with_client(bad, Recording::default()).is_err());
    }
}
