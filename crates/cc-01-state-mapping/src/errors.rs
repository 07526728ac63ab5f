//! # Error Types
//!
//! All error types for entity mapping, state access and event emission.

use crate::domain::key::Key;
use shared_types::{CodecError, StubError, ValidationError};
use thiserror::Error;

// =============================================================================
// ERROR KIND
// =============================================================================

/// Coarse classification of a failure.
///
/// Lets callers branch on "bad input" versus "storage conflict" without
/// matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A primary or unique key is already taken.
    KeyAlreadyExists,
    /// No ledger entry at the requested key.
    NotFound,
    /// The entity type has no usable key schema.
    InvalidKeySchema,
    /// The identifying value cannot produce a key.
    InvalidIdentifyingValue,
    /// Codec failure in either direction.
    Conversion,
    /// Event payload type has no registered name.
    EventTypeNotRegistered,
    /// A domain check rejected the value.
    Validation,
    /// The ledger stub itself failed.
    Ledger,
}

impl ErrorKind {
    /// Whether the failure was caused by the caller's input rather than
    /// ledger contents or infrastructure.
    #[must_use]
    pub fn is_bad_input(self) -> bool {
        matches!(
            self,
            Self::InvalidIdentifyingValue | Self::Conversion | Self::Validation
        )
    }
}

// =============================================================================
// STATE ERRORS
// =============================================================================

/// Errors from the mapping engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// Insert found an existing entry, or a unique value belongs to another entity.
    #[error("key already exists: {key}")]
    KeyAlreadyExists { key: Key },

    /// Nothing stored at the composed key.
    #[error("state entry not found: {key}")]
    NotFound { key: Key },

    /// No schema registered for the entity type, or the schema is unusable.
    #[error("invalid key schema for {entity}: {reason}")]
    InvalidKeySchema {
        entity: &'static str,
        reason: String,
    },

    /// The identifying value does not fit the entity's key schema.
    #[error("invalid identifying value for {entity}: {reason}")]
    InvalidIdentifyingValue {
        entity: &'static str,
        reason: String,
    },

    /// Bytes could not be converted to or from a typed value.
    #[error(transparent)]
    Conversion(#[from] CodecError),

    /// The event payload type was never registered.
    #[error("event type not registered: {type_name}")]
    EventTypeNotRegistered { type_name: &'static str },

    /// The entity failed its own validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Error returned by the ledger stub, unchanged.
    #[error(transparent)]
    Stub(#[from] StubError),
}

impl StateError {
    /// Classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::KeyAlreadyExists { .. } => ErrorKind::KeyAlreadyExists,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidKeySchema { .. } => ErrorKind::InvalidKeySchema,
            Self::InvalidIdentifyingValue { .. } => ErrorKind::InvalidIdentifyingValue,
            Self::Conversion(_) => ErrorKind::Conversion,
            Self::EventTypeNotRegistered { .. } => ErrorKind::EventTypeNotRegistered,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Stub(_) => ErrorKind::Ledger,
        }
    }

    pub(crate) fn schema(entity: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidKeySchema {
            entity,
            reason: reason.into(),
        }
    }

    pub(crate) fn identifying(entity: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidIdentifyingValue {
            entity,
            reason: reason.into(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
