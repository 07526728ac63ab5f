//! # Response Envelope
//!
//! What the kit hands back to the host runtime for every invocation.
//! Success carries the serialized result; failure carries a message.

use serde::{Deserialize, Serialize};

/// Outcome status understood by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Handler succeeded.
    Ok,
    /// Handler, middleware or dispatch failed.
    Error,
}

impl Status {
    /// Numeric code used by the host protocol.
    pub const fn code(self) -> i32 {
        match self {
            Self::Ok => 200,
            Self::Error => 500,
        }
    }
}

/// Host response for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Outcome status.
    pub status: Status,
    /// Error message; empty on success.
    pub message: String,
    /// Serialized result; empty on failure or for a unit result.
    pub payload: Vec<u8>,
}

impl Response {
    /// Successful response carrying `payload`.
    pub fn success(payload: Vec<u8>) -> Self {
        Self {
            status: Status::Ok,
            message: String::new(),
            payload,
        }
    }

    /// Failed response carrying a human-readable message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: message.into(),
            payload: Vec::new(),
        }
    }

    /// Whether the invocation succeeded.
    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}
