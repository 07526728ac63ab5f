//! # Error Types
//!
//! Everything that can fail between reading the invocation and producing
//! the response envelope.

use cc_01_state_mapping::errors::{ErrorKind as StateErrorKind, StateError};
use shared_types::{CodecError, StubError, ValidationError};
use thiserror::Error;

/// Coarse classification of a dispatch failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No handler registered for the function name.
    MethodNotFound,
    /// Declared parameters and supplied arguments disagree.
    ArgsMismatch,
    /// An argument or result could not be converted.
    Conversion,
    /// A domain check rejected the input.
    Validation,
    /// The mapping engine failed.
    State(StateErrorKind),
    /// The ledger stub failed outside the mapping engine.
    Ledger,
    /// Handler or middleware logic refused the request.
    Handler,
}

/// Errors surfaced by the router, middleware and handlers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// Nothing registered under the invoked function name.
    #[error("method not found: {function}")]
    MethodNotFound { function: String },

    /// Missing, surplus or mistyped argument.
    #[error("arguments mismatch: {reason}")]
    ArgsMismatch { reason: String },

    #[error(transparent)]
    Conversion(#[from] CodecError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Stub(#[from] StubError),

    /// Free-form failure raised by application code.
    #[error("{0}")]
    Handler(String),
}

impl RouterError {
    /// Failure raised by a handler or middleware.
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler(message.into())
    }

    pub(crate) fn args(reason: impl Into<String>) -> Self {
        Self::ArgsMismatch {
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MethodNotFound { .. } => ErrorKind::MethodNotFound,
            Self::ArgsMismatch { .. } => ErrorKind::ArgsMismatch,
            Self::Conversion(_) => ErrorKind::Conversion,
            Self::Validation(_) => ErrorKind::Validation,
            Self::State(err) => ErrorKind::State(err.kind()),
            Self::Stub(_) => ErrorKind::Ledger,
            Self::Handler(_) => ErrorKind::Handler,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
