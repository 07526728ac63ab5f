//! # Ledger Stub Port
//!
//! The narrow, synchronous, byte-oriented interface to the host ledger.
//! The host runtime owns the implementation; the kit only consumes it.
//!
//! All methods take `&self`: the host buffers writes in its own
//! transaction context, so a stub handle is a capability, not a container.

use crate::errors::StubError;
use chrono::{DateTime, Utc};

/// A `(key, value)` pair returned by a range scan.
pub type KeyValue = (String, Vec<u8>);

/// Interface to the external ledger for one transaction.
pub trait LedgerStub: Send + Sync {
    /// Read the value stored at `key`, `None` if absent.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StubError>;

    /// Write `value` at `key`.
    fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), StubError>;

    /// Remove `key`.
    fn del_state(&self, key: &str) -> Result<(), StubError>;

    /// Every entry whose key starts with `prefix`, in the ledger's scan order.
    fn range_scan(&self, prefix: &str) -> Result<Vec<KeyValue>, StubError>;

    /// Timestamp assigned to the current transaction by the client.
    fn tx_timestamp(&self) -> Result<DateTime<Utc>, StubError>;

    /// Identifier of the current transaction.
    fn tx_id(&self) -> String;

    /// Publish an event for the current transaction.
    fn set_event(&self, name: &str, payload: Vec<u8>) -> Result<(), StubError>;

    /// Function name and raw argument byte-strings of the invocation.
    fn function_and_args(&self) -> (String, Vec<Vec<u8>>);
}
