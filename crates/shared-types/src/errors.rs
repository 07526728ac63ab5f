//! # Error Types
//!
//! Errors raised at the boundary with external collaborators: the ledger
//! stub, the codec capability and domain validation hooks.

use thiserror::Error;

/// Errors reported by a ledger stub implementation.
///
/// The core never interprets these; they are propagated unchanged to the
/// caller of the failing operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StubError {
    /// The host rejected a read.
    #[error("ledger read failed for key {key:?}: {reason}")]
    Read { key: String, reason: String },

    /// The host rejected a write or delete.
    #[error("ledger write failed for key {key:?}: {reason}")]
    Write { key: String, reason: String },

    /// The host rejected an event emission.
    #[error("event emission failed for {name:?}: {reason}")]
    Event { name: String, reason: String },

    /// Transaction metadata (timestamp, id) is unavailable.
    #[error("transaction metadata unavailable: {0}")]
    Metadata(String),

    /// Any other host failure.
    #[error("ledger stub error: {0}")]
    Other(String),
}

/// Conversion failure between raw bytes and a typed value, either direction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Value could not be serialized.
    #[error("cannot encode {type_name}: {reason}")]
    Encode {
        type_name: &'static str,
        reason: String,
    },

    /// Bytes could not be decoded into the target type.
    #[error("cannot decode {type_name}: {reason}")]
    Decode {
        type_name: &'static str,
        reason: String,
    },
}

impl CodecError {
    /// Build an encode error for `T`.
    pub fn encode<T: ?Sized>(reason: impl ToString) -> Self {
        Self::Encode {
            type_name: std::any::type_name::<T>(),
            reason: reason.to_string(),
        }
    }

    /// Build a decode error for `T`.
    pub fn decode<T: ?Sized>(reason: impl ToString) -> Self {
        Self::Decode {
            type_name: std::any::type_name::<T>(),
            reason: reason.to_string(),
        }
    }
}

/// A domain-supplied check failed.
///
/// Carries the original message so callers can surface it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {message}")]
pub struct ValidationError {
    /// Human-readable reason supplied by the domain type.
    pub message: String,
}

impl ValidationError {
    /// Create a validation error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
