//! # CC-01 State Mapping
//!
//! Maps typed entities onto the composite keys of a key-value ledger and
//! keeps unique-key indexes consistent with the primary entries.
//!
//! ## Layout
//!
//! | Layer | Module | Role |
//! |-------|--------|------|
//! | Domain | `domain::key` | `Key`, composite encoding, `KeyComposer` |
//! | Domain | `domain::mapping` | `EntityMapping`, `UniqueKey` |
//! | Domain | `domain::registry` | `EntityRegistry` (type → mapping) |
//! | Domain | `domain::events` | `EventRegistry` (type → event name) |
//! | Service | `service::state` | `State`, typed CRUD over the stub |
//! | Service | `service::batch` | `CommandBatch`, staged mutations plus one event |
//! | Service | `service::events` | `Events`, named event emission |
//!
//! ## Key Layout
//!
//! | Entry | Key | Value |
//! |-------|-----|-------|
//! | Primary | `[ns, id...]` | entity bytes |
//! | Unique index | `[ns_name, value...]` | primary composite key |
//!
//! ## Usage Example
//!
//! ```ignore
//! use cc_01_state_mapping::prelude::*;
//!
//! let registry = EntityRegistry::builder()
//!     .register(EntityMapping::<Paper>::new("Paper", &["issuer", "number"], |p| {
//!         Key::from([p.issuer.as_str(), p.number.as_str()])
//!     }))?
//!     .build();
//!
//! let state = State::new(&stub, &registry);
//! state.insert(&paper)?;
//! let same: Paper = state.get(["A", "1"])?;
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod domain;
pub mod errors;
pub mod service;


// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::domain::{
        Entity, EntityList, EntityMapping, EntityRegistry, EventRegistry, Key, KeyComposer,
        ListContainer, UniqueKey,
    };
    pub use crate::errors::{ErrorKind, StateError};
    pub use crate::service::{Command, CommandBatch, CommandKind, Events, State};
    pub use shared_types::{Byteable, LedgerStub, Validatable, ValidationError};
}

pub use domain::{
    Entity, EntityList, EntityMapping, EntityRegistry, EventRegistry, Key, KeyComposer,
    ListContainer, UniqueKey,
};
pub use errors::{ErrorKind, StateError};
pub use service::{CommandBatch, Events, State};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
