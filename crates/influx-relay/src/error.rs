// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for datapoint validation and writes.

use std::fmt;
use thiserror::Error;

/// Category of a failed datapoint validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationKind {
    /// A value has the wrong primitive type.
    Type,
    /// `time` does not match `YYYY-MM-DDTHH:MM:SSZ`.
    Format,
    /// A required value is empty.
    EmptyValue,
    /// A map key is not a usable string key.
    KeyType,
}

/// Errors raised while constructing a [`crate::Datapoint`].
///
/// Each variant carries the name of the offending input and a rendering of
/// the rejected value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DatapointError {
    #[error("'{field}' must be {expected}, got {found}")]
    Type {
        field: String,
        expected: &'static str,
        found: String,
    },

    #[error("'time' must be in `YYYY-mm-ddTHH:MM:SSZ` format, got {value:?}")]
    Format { value: String },

    #[error("'{field}' must not be empty")]
    EmptyValue { field: &'static str },

    #[error("keys of '{field}' must be non-empty strings, got {key}")]
    KeyType { field: &'static str, key: String },
}

impl DatapointError {
    /// The rule category that failed.
    pub fn kind(&self) -> ValidationKind {
        match self {
            Self::Type { .. } => ValidationKind::Type,
            Self::Format { .. } => ValidationKind::Format,
            Self::EmptyValue { .. } => ValidationKind::EmptyValue,
            Self::KeyType { .. } => ValidationKind::KeyType,
        }
    }
}

/// Errors reported by a [`crate::WriteApi`] implementation.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unauthorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("server rejected write ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("cannot encode point: {0}")]
    Encode(String),

    #[error("{0}")]
    Other(String),
}

impl ClientError {
    /// Stable name of the error variant, used in log records.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "TransportError",
            Self::Unauthorized { .. } => "UnauthorizedError",
            Self::Rejected { .. } => "RejectedError",
            Self::Encode(_) => "EncodeError",
            Self::Other(_) => "ClientError",
        }
    }
}

/// Which writer entry point issued a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteCall {
    Single,
    Bulk,
}

impl fmt::Display for WriteCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteCall::Single => write!(f, "write_one"),
            WriteCall::Bulk => write!(f, "write_bulk"),
        }
    }
}

/// Errors returned by [`crate::Writer`].
#[derive(Debug, Error)]
pub enum WriteError {
    /// The underlying write call failed as a unit; nothing in the batch is
    /// known to be persisted.
    #[error("{call}: unable to write {points} datapoint(s): {cause}")]
    WriteFailed {
        call: WriteCall,
        points: usize,
        #[source]
        cause: ClientError,
    },
}

impl WriteError {
    /// The collaborator error behind this failure.
    pub fn cause(&self) -> &ClientError {
        match self {
            WriteError::WriteFailed { cause, .. } => cause,
        }
    }
}

/// Connection configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datapoint_error_kind() {
        let err = DatapointError::Format {
            value: "2021-07-05 10:04:04".to_string(),
        };
        assert_eq!(err.kind(), ValidationKind::Format);
        assert!(err.to_string().contains("2021-07-05 10:04:04"));

        let err = DatapointError::EmptyValue { field: "fields" };
        assert_eq!(err.kind(), ValidationKind::EmptyValue);
        assert_eq!(err.to_string(), "'fields' must not be empty");
    }

    #[test]
    fn test_write_error_display_names_call() {
        let err = WriteError::WriteFailed {
            call: WriteCall::Bulk,
            points: 3,
            cause: ClientError::Other("connection refused".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "write_bulk: unable to write 3 datapoint(s): connection refused"
        );
        assert_eq!(err.cause().kind(), "ClientError");
    }
}
