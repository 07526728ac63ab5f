//! # Composite Keys
//!
//! A [`Key`] is an ordered list of string segments. The first segment of a
//! stored key is always the entity namespace.
//!
//! ## Wire Format
//!
//! Keys are encoded the way the host ledger encodes composite keys:
//!
//! ```text
//! ["Paper", "A", "1"]  →  "\0Paper\0A\01\0"
//! ```
//!
//! Every segment is terminated by `U+0000`, so the encoding of a prefix of
//! segments is a string prefix of the full key, and a namespace prefix never
//! matches a longer namespace (`Paper` vs `Paper_ExternalId`).

use crate::domain::entity::Entity;
use crate::domain::registry::EntityRegistry;
use crate::errors::StateError;
use serde::{Deserialize, Serialize};
use shared_types::CodecError;
use std::fmt;

/// Separator between composite key segments.
pub const SEPARATOR: char = '\u{0}';

/// Ordered string segments identifying a ledger entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Key(Vec<String>);

impl Key {
    /// Create a key from segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// The segments in order.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the key has no segments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a segment.
    pub fn push(&mut self, segment: impl Into<String>) {
        self.0.push(segment.into());
    }

    /// A new key with `namespace` as its first segment.
    #[must_use]
    pub fn prepend(&self, namespace: &str) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.push(namespace.to_string());
        segments.extend(self.0.iter().cloned());
        Self(segments)
    }

    /// Whether `prefix`'s segments are the leading segments of this key.
    pub fn starts_with(&self, prefix: &Key) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Index of the first segment containing the separator, if any.
    pub(crate) fn invalid_segment(&self) -> Option<usize> {
        self.0.iter().position(|s| s.contains(SEPARATOR))
    }

    /// Encode as a ledger composite key string.
    pub fn to_composite(&self) -> String {
        let capacity = self.0.iter().map(|s| s.len() + 1).sum::<usize>() + 1;
        let mut out = String::with_capacity(capacity);
        out.push(SEPARATOR);
        for segment in &self.0 {
            out.push_str(segment);
            out.push(SEPARATOR);
        }
        out
    }

    /// Parse a ledger composite key string.
    pub fn from_composite(encoded: &str) -> Result<Self, CodecError> {
        let body = encoded
            .strip_prefix(SEPARATOR)
            .and_then(|rest| rest.strip_suffix(SEPARATOR))
            .ok_or_else(|| CodecError::decode::<Key>("missing composite key separators"))?;
        Ok(Self(body.split(SEPARATOR).map(str::to_string).collect()))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

impl From<&str> for Key {
    fn from(segment: &str) -> Self {
        Self(vec![segment.to_string()])
    }
}

impl From<String> for Key {
    fn from(segment: String) -> Self {
        Self(vec![segment])
    }
}

impl From<Vec<String>> for Key {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl From<Vec<&str>> for Key {
    fn from(segments: Vec<&str>) -> Self {
        Self::new(segments)
    }
}

impl From<&[&str]> for Key {
    fn from(segments: &[&str]) -> Self {
        Self::new(segments.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for Key {
    fn from(segments: [&str; N]) -> Self {
        Self::new(segments)
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

// =============================================================================
// KEY COMPOSER
// =============================================================================

/// Derives ledger keys for registered entity types.
///
/// Obtained from [`EntityRegistry::keys`].
#[derive(Clone, Copy)]
pub struct KeyComposer<'a> {
    registry: &'a EntityRegistry,
}

impl<'a> KeyComposer<'a> {
    pub(crate) fn new(registry: &'a EntityRegistry) -> Self {
        Self { registry }
    }

    /// Full primary key for an explicit identifying value.
    pub fn compose<E: Entity>(&self, id: impl Into<Key>) -> Result<Key, StateError> {
        self.registry.mapping::<E>()?.key_for(&id.into())
    }

    /// Full primary key derived from the entity itself.
    pub fn compose_entity<E: Entity>(&self, entity: &E) -> Result<Key, StateError> {
        self.registry.mapping::<E>()?.primary_key(entity)
    }

    /// Scan prefix over the leading identifying fields.
    pub fn compose_prefix<E: Entity>(&self, partial: impl Into<Key>) -> Result<Key, StateError> {
        self.registry.mapping::<E>()?.prefix_for(&partial.into())
    }

    /// Scan prefix covering every entity of the type.
    pub fn compose_namespace<E: Entity>(&self) -> Result<Key, StateError> {
        Ok(self.registry.mapping::<E>()?.namespace_key())
    }
}

// =============================================================================
// TESTS
// =============================================================================
