//! # Event Registry
//!
//! Maps event payload types to the event names written to the ledger's
//! event channel. Built once, read-only afterwards.

use crate::domain::entity::short_type_name;
use std::any::TypeId;
use std::collections::HashMap;

/// Read-only mapping from payload type to event name.
#[derive(Debug, Default, Clone)]
pub struct EventRegistry {
    names: HashMap<TypeId, String>,
}

impl EventRegistry {
    /// Start building a registry.
    pub fn builder() -> EventRegistryBuilder {
        EventRegistryBuilder::default()
    }

    /// Event name registered for payload type `T`.
    pub fn name_of<T: 'static>(&self) -> Option<&str> {
        self.names.get(&TypeId::of::<T>()).map(String::as_str)
    }

    /// Number of registered payload types.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no payload type is registered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Builder for [`EventRegistry`].
#[derive(Debug, Default)]
pub struct EventRegistryBuilder {
    names: HashMap<TypeId, String>,
}

impl EventRegistryBuilder {
    /// Register `T` under its own type name.
    #[must_use]
    pub fn register<T: 'static>(self) -> Self {
        self.register_named::<T>(short_type_name::<T>())
    }

    /// Register `T` under an explicit event name. Re-registering replaces
    /// the previous name.
    #[must_use]
    pub fn register_named<T: 'static>(mut self, name: impl Into<String>) -> Self {
        self.names.insert(TypeId::of::<T>(), name.into());
        self
    }

    /// Finish building.
    pub fn build(self) -> EventRegistry {
        EventRegistry { names: self.names }
    }
}
