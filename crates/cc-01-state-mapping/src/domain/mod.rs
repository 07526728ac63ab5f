//! # Domain Layer
//!
//! Keys, entity mappings and the registries. Nothing in this layer talks
//! to the ledger.

pub mod entity;
pub mod events;
pub mod key;
pub mod mapping;
pub mod registry;

pub use entity::{short_type_name, Entity, EntityList, ListContainer};
pub use events::{EventRegistry, EventRegistryBuilder};
pub use key::{Key, KeyComposer, SEPARATOR};
pub use mapping::{EntityMapping, KeyFn, UniqueKey};
pub use registry::{EntityRegistry, EntityRegistryBuilder};
