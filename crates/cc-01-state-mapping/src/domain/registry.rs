//! # Entity Registry
//!
//! Maps entity types to their [`EntityMapping`]. Built once at service
//! initialization and read-only afterwards; there is no way to add a
//! mapping to a built registry.
//!
//! ```ignore
//! let registry = EntityRegistry::builder()
//!     .register(paper_mapping())?
//!     .register(account_mapping())?
//!     .build();
//! ```

use crate::domain::entity::{short_type_name, Entity};
use crate::domain::key::KeyComposer;
use crate::domain::mapping::EntityMapping;
use crate::errors::StateError;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use tracing::debug;

/// Read-only registry of entity mappings.
#[derive(Default)]
pub struct EntityRegistry {
    /// `EntityMapping<E>` keyed by `TypeId::of::<E>()`.
    mappings: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    /// Namespace (primary and index) to owning entity name.
    namespaces: HashMap<String, &'static str>,
}

impl EntityRegistry {
    /// Start building a registry.
    pub fn builder() -> EntityRegistryBuilder {
        EntityRegistryBuilder {
            registry: Self::default(),
        }
    }

    /// Mapping for `E`, if registered.
    pub fn lookup<E: Entity>(&self) -> Option<&EntityMapping<E>> {
        self.mappings
            .get(&TypeId::of::<E>())
            .and_then(|mapping| mapping.downcast_ref::<EntityMapping<E>>())
    }

    /// Whether `E` is registered.
    pub fn contains<E: Entity>(&self) -> bool {
        self.mappings.contains_key(&TypeId::of::<E>())
    }

    /// Mapping for `E`, or `InvalidKeySchema`.
    pub(crate) fn mapping<E: Entity>(&self) -> Result<&EntityMapping<E>, StateError> {
        self.lookup::<E>()
            .ok_or_else(|| StateError::schema(short_type_name::<E>(), "entity type not registered"))
    }

    /// Key composer bound to this registry.
    pub fn keys(&self) -> KeyComposer<'_> {
        KeyComposer::new(self)
    }

    /// Number of registered entity types.
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Whether no entity type is registered.
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Entity owning `namespace`, including unique-key index namespaces.
    pub fn owner_of(&self, namespace: &str) -> Option<&'static str> {
        self.namespaces.get(namespace).copied()
    }
}

impl std::fmt::Debug for EntityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityRegistry")
            .field("namespaces", &self.namespaces)
            .finish_non_exhaustive()
    }
}

/// Builder for [`EntityRegistry`].
pub struct EntityRegistryBuilder {
    registry: EntityRegistry,
}

impl EntityRegistryBuilder {
    /// Register the mapping for `E`.
    ///
    /// Fails with `InvalidKeySchema` if the mapping is malformed, `E` is
    /// already registered, or any of its namespaces is taken.
    pub fn register<E: Entity>(mut self, mapping: EntityMapping<E>) -> Result<Self, StateError> {
        let entity = short_type_name::<E>();
        mapping.validate()?;

        if self.registry.contains::<E>() {
            return Err(StateError::schema(entity, "entity type already registered"));
        }

        let namespaces = mapping.namespaces();
        if let Some((ns, owner)) = namespaces
            .iter()
            .find_map(|ns| self.registry.owner_of(ns).map(|owner| (ns, owner)))
        {
            return Err(StateError::schema(
                entity,
                format!("namespace {ns:?} already used by {owner}"),
            ));
        }

        debug!(
            entity,
            namespace = mapping.namespace(),
            unique_keys = mapping.unique_keys().len(),
            "Registering entity mapping"
        );

        for ns in namespaces {
            self.registry.namespaces.insert(ns, entity);
        }
        self.registry
            .mappings
            .insert(TypeId::of::<E>(), Box::new(mapping));
        Ok(self)
    }

    /// Finish building.
    pub fn build(self) -> EntityRegistry {
        self.registry
    }
}

// =============================================================================
// TESTS
// =============================================================================
