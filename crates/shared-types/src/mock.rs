//! # Mock Ledger Stub
//!
//! In-memory [`LedgerStub`] for tests and local development.
//! The production stub is provided by the host runtime.
//!
//! Keys are kept in a `BTreeMap`, so range scans return entries in
//! lexicographic key order like the host ledger does. Writes are visible
//! immediately to later reads in the same transaction.

use crate::errors::StubError;
use crate::stub::{KeyValue, LedgerStub};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Event captured by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedEvent {
    /// Event name.
    pub name: String,
    /// Serialized payload.
    pub payload: Vec<u8>,
}

#[derive(Debug)]
struct Invocation {
    function: String,
    args: Vec<Vec<u8>>,
    tx_id: String,
    timestamp: DateTime<Utc>,
}

impl Invocation {
    fn new(function: &str, args: Vec<Vec<u8>>) -> Self {
        Self {
            function: function.to_string(),
            args,
            tx_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// In-memory ledger stub.
#[derive(Debug)]
pub struct MockStub {
    /// Committed and pending key-value state.
    state: RwLock<BTreeMap<String, Vec<u8>>>,
    /// Events emitted during the current invocation.
    events: RwLock<Vec<EmittedEvent>>,
    /// Current invocation metadata.
    invocation: RwLock<Invocation>,
    /// Writes to keys with one of these prefixes fail.
    failing_prefixes: RwLock<Vec<String>>,
}

impl Default for MockStub {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStub {
    /// Create an empty stub with no pending invocation.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(BTreeMap::new()),
            events: RwLock::new(Vec::new()),
            invocation: RwLock::new(Invocation::new("", Vec::new())),
            failing_prefixes: RwLock::new(Vec::new()),
        }
    }

    /// Start a new transaction invoking `function` with raw `args`.
    ///
    /// Assigns a fresh transaction id and timestamp and clears emitted events.
    /// Ledger state carries over.
    pub fn begin(&self, function: &str, args: Vec<Vec<u8>>) -> &Self {
        *self.invocation.write() = Invocation::new(function, args);
        self.events.write().clear();
        self
    }

    /// [`begin`](Self::begin) with UTF-8 string arguments.
    pub fn begin_str(&self, function: &str, args: &[&str]) -> &Self {
        self.begin(function, args.iter().map(|a| a.as_bytes().to_vec()).collect())
    }

    /// Pin the transaction timestamp of the current invocation.
    pub fn set_timestamp(&self, timestamp: DateTime<Utc>) {
        self.invocation.write().timestamp = timestamp;
    }

    /// Make every write under `prefix` fail with [`StubError::Write`].
    pub fn fail_writes_with_prefix(&self, prefix: impl Into<String>) {
        self.failing_prefixes.write().push(prefix.into());
    }

    /// Remove all injected write failures.
    pub fn clear_failures(&self) {
        self.failing_prefixes.write().clear();
    }

    /// Raw value at `key`.
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.state.read().get(key).cloned()
    }

    /// All keys currently stored, in scan order.
    pub fn keys(&self) -> Vec<String> {
        self.state.read().keys().cloned().collect()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.state.read().len()
    }

    /// Whether the ledger holds no entries.
    pub fn is_empty(&self) -> bool {
        self.state.read().is_empty()
    }

    /// Events emitted since the last [`begin`](Self::begin).
    pub fn events(&self) -> Vec<EmittedEvent> {
        self.events.read().clone()
    }

    /// The most recently emitted event.
    pub fn last_event(&self) -> Option<EmittedEvent> {
        self.events.read().last().cloned()
    }

    fn check_writable(&self, key: &str) -> Result<(), StubError> {
        let failing = self.failing_prefixes.read();
        match failing.iter().find(|prefix| key.starts_with(prefix.as_str())) {
            Some(prefix) => Err(StubError::Write {
                key: key.to_string(),
                reason: format!("writes under {prefix:?} are disabled"),
            }),
            None => Ok(()),
        }
    }
}

impl LedgerStub for MockStub {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StubError> {
        Ok(self.state.read().get(key).cloned())
    }

    fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), StubError> {
        self.check_writable(key)?;
        self.state.write().insert(key.to_string(), value);
        Ok(())
    }

    fn del_state(&self, key: &str) -> Result<(), StubError> {
        self.check_writable(key)?;
        self.state.write().remove(key);
        Ok(())
    }

    fn range_scan(&self, prefix: &str) -> Result<Vec<KeyValue>, StubError> {
        let state = self.state.read();
        Ok(state
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    fn tx_timestamp(&self) -> Result<DateTime<Utc>, StubError> {
        Ok(self.invocation.read().timestamp)
    }

    fn tx_id(&self) -> String {
        self.invocation.read().tx_id.clone()
    }

    fn set_event(&self, name: &str, payload: Vec<u8>) -> Result<(), StubError> {
        self.events.write().push(EmittedEvent {
            name: name.to_string(),
            payload,
        });
        Ok(())
    }

    fn function_and_args(&self) -> (String, Vec<Vec<u8>>) {
        let invocation = self.invocation.read();
        (invocation.function.clone(), invocation.args.clone())
    }
}

// =============================================================================
// TESTS
// =============================================================================
