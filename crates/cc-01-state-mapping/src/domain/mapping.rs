//! # Entity Mappings
//!
//! How one entity type maps onto ledger keys: its namespace, the fields
//! that identify it, and any secondary unique keys.
//!
//! ```ignore
//! let mapping = EntityMapping::new("Paper", &["issuer", "number"], |p: &Paper| {
//!     Key::from([p.issuer.as_str(), p.number.as_str()])
//! })
//! .with_unique_key("ExternalId", &["external_id"], |p: &Paper| Key::from(p.external_id.as_str()));
//! ```

use crate::domain::entity::{short_type_name, Entity};
use crate::domain::key::{Key, SEPARATOR};
use crate::errors::StateError;
use std::any::type_name;
use std::fmt;
use std::sync::Arc;

/// Extracts key segments from an entity.
pub type KeyFn<E> = Arc<dyn Fn(&E) -> Key + Send + Sync>;

// =============================================================================
// UNIQUE KEY
// =============================================================================

/// Secondary key that must resolve to at most one entity.
pub struct UniqueKey<E> {
    name: String,
    fields: Vec<String>,
    extract: KeyFn<E>,
}

impl<E> UniqueKey<E> {
    /// Declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entity fields the key is built from.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Unique value of `entity`.
    pub fn value_of(&self, entity: &E) -> Key {
        (self.extract)(entity)
    }
}

impl<E> fmt::Debug for UniqueKey<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniqueKey")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// ENTITY MAPPING
// =============================================================================

/// Key schema and unique keys for entity type `E`.
pub struct EntityMapping<E> {
    namespace: String,
    key_fields: Vec<String>,
    primary: KeyFn<E>,
    unique_keys: Vec<UniqueKey<E>>,
}

impl<E: Entity> EntityMapping<E> {
    /// Mapping with an explicit namespace.
    ///
    /// `primary` must return exactly one segment per entry in `key_fields`.
    pub fn new<F>(namespace: impl Into<String>, key_fields: &[&str], primary: F) -> Self
    where
        F: Fn(&E) -> Key + Send + Sync + 'static,
    {
        Self {
            namespace: namespace.into(),
            key_fields: key_fields.iter().map(|f| f.to_string()).collect(),
            primary: Arc::new(primary),
            unique_keys: Vec::new(),
        }
    }

    /// Mapping namespaced by the type's own name.
    pub fn for_type<F>(key_fields: &[&str], primary: F) -> Self
    where
        F: Fn(&E) -> Key + Send + Sync + 'static,
    {
        Self::new(short_type_name::<E>(), key_fields, primary)
    }

    /// Declare a unique key over one or more non-primary fields.
    #[must_use]
    pub fn with_unique_key<F>(
        mut self,
        name: impl Into<String>,
        fields: &[&str],
        extract: F,
    ) -> Self
    where
        F: Fn(&E) -> Key + Send + Sync + 'static,
    {
        self.unique_keys.push(UniqueKey {
            name: name.into(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            extract: Arc::new(extract),
        });
        self
    }

    /// First segment of every primary key.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Names of the identifying fields.
    pub fn key_fields(&self) -> &[String] {
        &self.key_fields
    }

    /// Type name of the container returned by listing.
    pub fn list_type(&self) -> &'static str {
        type_name::<E::List>()
    }

    /// Declared unique keys.
    pub fn unique_keys(&self) -> &[UniqueKey<E>] {
        &self.unique_keys
    }

    /// Unique key by name.
    pub fn unique_key(&self, name: &str) -> Option<&UniqueKey<E>> {
        self.unique_keys.iter().find(|u| u.name == name)
    }

    /// Namespace holding the index entries of `unique`.
    pub fn index_namespace(&self, unique: &UniqueKey<E>) -> String {
        format!("{}_{}", self.namespace, unique.name)
    }

    // -------------------------------------------------------------------------
    // Key composition
    // -------------------------------------------------------------------------

    /// Primary key of `entity`.
    pub(crate) fn primary_key(&self, entity: &E) -> Result<Key, StateError> {
        self.key_for(&(self.primary)(entity))
    }

    /// Primary key for an explicit identifying value.
    pub(crate) fn key_for(&self, id: &Key) -> Result<Key, StateError> {
        if id.len() != self.key_fields.len() {
            return Err(StateError::identifying(
                short_type_name::<E>(),
                format!(
                    "expected {} key segment(s) {:?}, got {}",
                    self.key_fields.len(),
                    self.key_fields,
                    id.len()
                ),
            ));
        }
        self.check_segments(id)?;
        Ok(id.prepend(&self.namespace))
    }

    /// Scan prefix for a non-empty leading subset of the identifying fields.
    pub(crate) fn prefix_for(&self, partial: &Key) -> Result<Key, StateError> {
        if partial.is_empty() || partial.len() > self.key_fields.len() {
            return Err(StateError::identifying(
                short_type_name::<E>(),
                format!(
                    "prefix must have 1..={} segment(s), got {}",
                    self.key_fields.len(),
                    partial.len()
                ),
            ));
        }
        self.check_segments(partial)?;
        Ok(partial.prepend(&self.namespace))
    }

    /// Prefix covering the whole namespace.
    pub(crate) fn namespace_key(&self) -> Key {
        Key::from(self.namespace.as_str())
    }

    /// Index entry key for `value` under `unique`.
    pub(crate) fn index_key(&self, unique: &UniqueKey<E>, value: &Key) -> Result<Key, StateError> {
        if value.len() != unique.fields.len() {
            return Err(StateError::identifying(
                short_type_name::<E>(),
                format!(
                    "unique key {} expects {} segment(s), got {}",
                    unique.name,
                    unique.fields.len(),
                    value.len()
                ),
            ));
        }
        self.check_segments(value)?;
        Ok(value.prepend(&self.index_namespace(unique)))
    }

    fn check_segments(&self, key: &Key) -> Result<(), StateError> {
        match key.invalid_segment() {
            Some(index) => Err(StateError::identifying(
                short_type_name::<E>(),
                format!("segment {index} contains the key separator"),
            )),
            None => Ok(()),
        }
    }

    /// Schema checks run once at registration.
    pub(crate) fn validate(&self) -> Result<(), StateError> {
        let entity = short_type_name::<E>();
        if self.namespace.is_empty() || self.namespace.contains(SEPARATOR) {
            return Err(StateError::schema(entity, "namespace must be non-empty text"));
        }
        if self.key_fields.is_empty() {
            return Err(StateError::schema(entity, "at least one key field is required"));
        }
        for (i, unique) in self.unique_keys.iter().enumerate() {
            if unique.name.is_empty() || unique.fields.is_empty() {
                return Err(StateError::schema(
                    entity,
                    "unique keys need a name and at least one field",
                ));
            }
            if unique.name.contains(SEPARATOR) {
                return Err(StateError::schema(
                    entity,
                    format!("unique key name {:?} contains the key separator", unique.name),
                ));
            }
            if self.unique_keys[..i].iter().any(|u| u.name == unique.name) {
                return Err(StateError::schema(
                    entity,
                    format!("duplicate unique key {}", unique.name),
                ));
            }
        }
        Ok(())
    }

    /// Every namespace this mapping writes under.
    pub(crate) fn namespaces(&self) -> Vec<String> {
        std::iter::once(self.namespace.clone())
            .chain(self.unique_keys.iter().map(|u| self.index_namespace(u)))
            .collect()
    }
}

impl<E> fmt::Debug for EntityMapping<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityMapping")
            .field("namespace", &self.namespace)
            .field("key_fields", &self.key_fields)
            .field("unique_keys", &self.unique_keys)
            .finish_non_exhaustive()
    }
}
