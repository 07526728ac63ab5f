//! # Shared Types Crate
//!
//! Interfaces to the collaborators the chaincode kit consumes but does not
//! own, plus the envelope it produces.
//!
//! ## Contents
//!
//! | Module | Role |
//! |--------|------|
//! | `stub` | `LedgerStub` port to the host ledger |
//! | `codec` | `Byteable` / `Validatable` capabilities |
//! | `envelope` | `Response` returned to the host |
//! | `errors` | `StubError`, `CodecError`, `ValidationError` |
//! | `mock` | `MockStub`, an in-memory ledger for tests |
//!
//! ## Design Principles
//!
//! - **Capabilities over type switches**: values opt into byte conversion and
//!   validation by implementing a trait.
//! - **Synchronous boundary**: every stub call is a direct call whose error
//!   is returned unchanged.

pub mod codec;
pub mod envelope;
pub mod errors;
pub mod mock;
pub mod stub;

pub use codec::{Byteable, Validatable};
pub use envelope::{Response, Status};
pub use errors::{CodecError, StubError, ValidationError};
pub use mock::{EmittedEvent, MockStub};
pub use stub::{KeyValue, LedgerStub};
