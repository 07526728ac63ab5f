//! # Entities and List Containers
//!
//! An entity is any typed value stored in the ledger. Entities opt in by
//! implementing [`Entity`], which names the container returned by listing.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared_types::{Byteable, CodecError, Validatable};
use std::any::type_name;

/// A ledger-resident value with a registered key schema.
pub trait Entity: Byteable + Validatable + Send + Sync + 'static {
    /// Aggregate returned by namespace scans.
    type List: ListContainer<Self>;
}

/// Typed aggregate filled by a prefix scan, in scan order.
pub trait ListContainer<E>: Default {
    /// Append an item.
    fn push(&mut self, item: E);

    /// Number of items.
    fn len(&self) -> usize;

    /// Whether the container holds no items.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E> ListContainer<E> for Vec<E> {
    fn push(&mut self, item: E) {
        Vec::push(self, item);
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }
}

/// Default list container: `{ "items": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityList<E> {
    /// Entities in scan order.
    pub items: Vec<E>,
}

impl<E> Default for EntityList<E> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<E> ListContainer<E> for EntityList<E> {
    fn push(&mut self, item: E) {
        self.items.push(item);
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

impl<E> IntoIterator for EntityList<E> {
    type Item = E;
    type IntoIter = std::vec::IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<E: Serialize + DeserializeOwned> Byteable for EntityList<E> {
    fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        shared_types::codec::to_json_bytes(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        shared_types::codec::from_json_bytes(bytes)
    }
}

/// Unqualified name of a type: `my_cc::model::Paper` → `Paper`.
///
/// Generic arguments are dropped: `EntityList<Paper>` → `EntityList`.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
