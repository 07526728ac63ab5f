//! # Event Emitter
//!
//! Binds the [`EventRegistry`] to a transaction's stub.
//!
//! Emission is not write-once: a second `set` in the same invocation is
//! passed to the stub as well, and the host decides what survives.

use crate::domain::entity::short_type_name;
use crate::domain::events::EventRegistry;
use crate::errors::StateError;
use shared_types::{Byteable, LedgerStub};
use tracing::debug;

/// Event emitter bound to one transaction's stub.
#[derive(Clone, Copy)]
pub struct Events<'a> {
    stub: &'a dyn LedgerStub,
    registry: &'a EventRegistry,
}

impl<'a> Events<'a> {
    /// Bind `registry` to `stub`.
    pub fn new(stub: &'a dyn LedgerStub, registry: &'a EventRegistry) -> Self {
        Self { stub, registry }
    }

    /// Emit `payload` under the name registered for its type.
    pub fn set<T: Byteable + 'static>(&self, payload: &T) -> Result<(), StateError> {
        let name = self
            .registry
            .name_of::<T>()
            .ok_or(StateError::EventTypeNotRegistered {
                type_name: short_type_name::<T>(),
            })?;
        self.set_named(name, payload)
    }

    /// Emit `payload` under an explicit name, bypassing the registry.
    pub fn set_named<T: Byteable>(&self, name: &str, payload: &T) -> Result<(), StateError> {
        let bytes = payload.to_bytes()?;
        debug!(event = name, size = bytes.len(), "Emitting event");
        self.stub.set_event(name, bytes)?;
        Ok(())
    }
}
