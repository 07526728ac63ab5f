//! # Service Layer
//!
//! Accessors bound to a single transaction's ledger stub.

pub mod batch;
pub mod events;
pub mod state;

pub use batch::{Command, CommandBatch, CommandKind};
pub use events::Events;
pub use state::State;
