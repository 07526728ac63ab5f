//! # State Accessor
//!
//! Typed CRUD over the ledger stub. Keys come from the entity registry,
//! bytes from each type's [`Byteable`] implementation.
//!
//! ## Write Path
//!
//! `insert` and `put` write the primary entry first, then one index entry
//! per declared unique key. If an index write fails the primary write is
//! left in place: the handler returns the error and the host discards the
//! whole transaction, including the primary write.
//!
//! ## Known Gap
//!
//! `put` does not remove the index entry of a unique value that the update
//! changed. The stale entry keeps resolving to the same primary key.

use crate::domain::entity::{short_type_name, Entity, ListContainer};
use crate::domain::key::Key;
use crate::domain::mapping::{EntityMapping, UniqueKey};
use crate::domain::registry::EntityRegistry;
use crate::errors::StateError;
use shared_types::{Byteable, CodecError, LedgerStub};
use tracing::{debug, trace};

/// State accessor bound to one transaction's stub.
#[derive(Clone, Copy)]
pub struct State<'a> {
    stub: &'a dyn LedgerStub,
    registry: &'a EntityRegistry,
}

impl<'a> State<'a> {
    /// Bind `registry` to `stub`.
    pub fn new(stub: &'a dyn LedgerStub, registry: &'a EntityRegistry) -> Self {
        Self { stub, registry }
    }

    /// Registry backing this accessor.
    pub fn registry(&self) -> &'a EntityRegistry {
        self.registry
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Entity stored under `id`.
    pub fn get<E: Entity>(&self, id: impl Into<Key>) -> Result<E, StateError> {
        let key = self.registry.mapping::<E>()?.key_for(&id.into())?;
        self.get_at(&key)
    }

    /// Entity stored under `id`, or `E::default()` when absent.
    pub fn get_or_default<E: Entity + Default>(&self, id: impl Into<Key>) -> Result<E, StateError> {
        let key = self.registry.mapping::<E>()?.key_for(&id.into())?;
        match self.get_raw(&key)? {
            Some(bytes) => Ok(E::from_bytes(&bytes)?),
            None => Ok(E::default()),
        }
    }

    /// Whether an entity is stored under `id`.
    pub fn exists<E: Entity>(&self, id: impl Into<Key>) -> Result<bool, StateError> {
        let key = self.registry.mapping::<E>()?.key_for(&id.into())?;
        Ok(self.get_raw(&key)?.is_some())
    }

    /// Every entity of type `E`, in ledger scan order.
    pub fn list<E: Entity>(&self) -> Result<E::List, StateError> {
        let prefix = self.registry.mapping::<E>()?.namespace_key();
        self.scan::<E>(&prefix)
    }

    /// Entities whose key starts with the `partial` identifying segments.
    pub fn list_with<E: Entity>(&self, partial: impl Into<Key>) -> Result<E::List, StateError> {
        let prefix = self.registry.mapping::<E>()?.prefix_for(&partial.into())?;
        self.scan::<E>(&prefix)
    }

    /// Entity whose unique key `name` equals `value`.
    pub fn get_by_unique_key<E: Entity>(
        &self,
        name: &str,
        value: impl Into<Key>,
    ) -> Result<E, StateError> {
        let primary = self.resolve_unique::<E>(name, &value.into())?;
        self.get_at(&primary)
    }

    /// Whether an index entry exists for unique key `name` and `value`.
    pub fn exists_by_unique_key<E: Entity>(
        &self,
        name: &str,
        value: impl Into<Key>,
    ) -> Result<bool, StateError> {
        let mapping = self.registry.mapping::<E>()?;
        let index = mapping.index_key(unique_key(mapping, name)?, &value.into())?;
        Ok(self.get_raw(&index)?.is_some())
    }

    // =========================================================================
    // WRITES
    // =========================================================================

    /// Store a new entity. Fails with `KeyAlreadyExists` if its primary key
    /// or any of its unique values is taken.
    pub fn insert<E: Entity>(&self, entity: &E) -> Result<(), StateError> {
        entity.validate()?;
        let mapping = self.registry.mapping::<E>()?;
        let key = mapping.primary_key(entity)?;

        if self.get_raw(&key)?.is_some() {
            return Err(StateError::KeyAlreadyExists { key });
        }

        let indexes = self.claim_unique_keys(mapping, entity, &key)?;
        self.write(entity, &key, indexes)?;
        debug!(entity = short_type_name::<E>(), %key, "Inserted entity");
        Ok(())
    }

    /// Store an entity, overwriting any existing entry with the same key.
    pub fn put<E: Entity>(&self, entity: &E) -> Result<(), StateError> {
        entity.validate()?;
        let mapping = self.registry.mapping::<E>()?;
        let key = mapping.primary_key(entity)?;

        let indexes = self.claim_unique_keys(mapping, entity, &key)?;
        self.write(entity, &key, indexes)?;
        debug!(entity = short_type_name::<E>(), %key, "Put entity");
        Ok(())
    }

    /// Remove the entity under `id` and its unique-key index entries.
    pub fn delete<E: Entity>(&self, id: impl Into<Key>) -> Result<(), StateError> {
        let mapping = self.registry.mapping::<E>()?;
        let key = mapping.key_for(&id.into())?;
        let stored: E = self.get_at(&key)?;

        self.stub.del_state(&key.to_composite())?;
        for unique in mapping.unique_keys() {
            let index = mapping.index_key(unique, &unique.value_of(&stored))?;
            self.stub.del_state(&index.to_composite())?;
        }
        debug!(entity = short_type_name::<E>(), %key, "Deleted entity");
        Ok(())
    }

    // =========================================================================
    // RAW ACCESS
    // =========================================================================

    /// Bytes stored under an explicit composite key.
    pub fn get_raw(&self, key: &Key) -> Result<Option<Vec<u8>>, StateError> {
        trace!(%key, "Reading ledger entry");
        Ok(self.stub.get_state(&key.to_composite())?)
    }

    /// Write a value under an explicit composite key, bypassing mappings.
    pub fn put_raw<T: Byteable>(&self, key: &Key, value: &T) -> Result<(), StateError> {
        self.stub.put_state(&key.to_composite(), value.to_bytes()?)?;
        Ok(())
    }

    /// Remove an explicit composite key, bypassing mappings.
    pub fn delete_raw(&self, key: &Key) -> Result<(), StateError> {
        self.stub.del_state(&key.to_composite())?;
        Ok(())
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn get_at<E: Entity>(&self, key: &Key) -> Result<E, StateError> {
        let bytes = self
            .get_raw(key)?
            .ok_or_else(|| StateError::NotFound { key: key.clone() })?;
        Ok(E::from_bytes(&bytes)?)
    }

    fn scan<E: Entity>(&self, prefix: &Key) -> Result<E::List, StateError> {
        let mut list = <E::List as Default>::default();
        for (_, bytes) in self.stub.range_scan(&prefix.to_composite())? {
            list.push(E::from_bytes(&bytes)?);
        }
        debug!(entity = short_type_name::<E>(), %prefix, count = list.len(), "Listed entities");
        Ok(list)
    }

    /// Index keys for `entity`, failing if any is held by another primary key.
    fn claim_unique_keys<E: Entity>(
        &self,
        mapping: &EntityMapping<E>,
        entity: &E,
        primary: &Key,
    ) -> Result<Vec<Key>, StateError> {
        let owner = primary.to_composite();
        let mut indexes = Vec::with_capacity(mapping.unique_keys().len());
        for unique in mapping.unique_keys() {
            let index = mapping.index_key(unique, &unique.value_of(entity))?;
            if let Some(existing) = self.get_raw(&index)? {
                if existing != owner.as_bytes() {
                    return Err(StateError::KeyAlreadyExists { key: index });
                }
            }
            indexes.push(index);
        }
        Ok(indexes)
    }

    fn write<E: Entity>(
        &self,
        entity: &E,
        primary: &Key,
        indexes: Vec<Key>,
    ) -> Result<(), StateError> {
        let owner = primary.to_composite();
        self.stub.put_state(&owner, entity.to_bytes()?)?;
        for index in indexes {
            self.stub
                .put_state(&index.to_composite(), owner.clone().into_bytes())?;
        }
        Ok(())
    }

    fn resolve_unique<E: Entity>(&self, name: &str, value: &Key) -> Result<Key, StateError> {
        let mapping = self.registry.mapping::<E>()?;
        let index = mapping.index_key(unique_key(mapping, name)?, value)?;
        let bytes = self
            .get_raw(&index)?
            .ok_or(StateError::NotFound { key: index })?;
        let encoded = String::from_utf8(bytes).map_err(CodecError::decode::<Key>)?;
        Ok(Key::from_composite(&encoded)?)
    }
}

fn unique_key<'m, E: Entity>(
    mapping: &'m EntityMapping<E>,
    name: &str,
) -> Result<&'m UniqueKey<E>, StateError> {
    mapping.unique_key(name).ok_or_else(|| {
        StateError::schema(
            short_type_name::<E>(),
            format!("unique key {name:?} is not declared"),
        )
    })
}

// =============================================================================
// TESTS
// =============================================================================
