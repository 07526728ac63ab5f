//! # Invocation Context
//!
//! One [`Context`] per invocation, created by the router right before the
//! handler chain runs and dropped once the response is built. It is never
//! shared between invocations.
//!
//! | Store | Filled by | Read by |
//! |-------|-----------|---------|
//! | args | parameter bindings | handlers via `arg::<T>()` |
//! | scratch | any middleware or handler | any later link in the chain |

use crate::errors::RouterError;
use cc_01_state_mapping::{CommandBatch, EntityRegistry, EventRegistry, Events, State};
use chrono::{DateTime, Utc};
use shared_types::LedgerStub;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;

type Value = Box<dyn Any + Send + Sync>;

/// Per-invocation state handed to middleware and handlers.
pub struct Context<'a> {
    stub: &'a dyn LedgerStub,
    entities: &'a EntityRegistry,
    events: &'a EventRegistry,
    function: String,
    raw_args: Vec<Vec<u8>>,
    /// Bound arguments in binding order.
    args: Vec<(String, Value)>,
    scratch: HashMap<String, Value>,
}

impl<'a> Context<'a> {
    pub fn new(
        stub: &'a dyn LedgerStub,
        entities: &'a EntityRegistry,
        events: &'a EventRegistry,
        function: impl Into<String>,
        raw_args: Vec<Vec<u8>>,
    ) -> Self {
        Self {
            stub,
            entities,
            events,
            function: function.into(),
            raw_args,
            args: Vec::new(),
            scratch: HashMap::new(),
        }
    }

    /// Function name being invoked.
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Raw argument byte-strings, excluding the function name.
    pub fn raw_args(&self) -> &[Vec<u8>] {
        &self.raw_args
    }

    // =========================================================================
    // BOUND ARGUMENTS
    // =========================================================================

    /// Argument bound under `name`.
    ///
    /// Fails with `ArgsMismatch` if nothing is bound under `name` or the
    /// bound value is not a `T`.
    pub fn arg<T: Any>(&self, name: &str) -> Result<&T, RouterError> {
        let value = self
            .args
            .iter()
            .find(|(bound, _)| bound == name)
            .map(|(_, value)| value)
            .ok_or_else(|| RouterError::args(format!("argument {name:?} is not bound")))?;
        value.downcast_ref::<T>().ok_or_else(|| {
            RouterError::args(format!(
                "argument {name:?} is not a {}",
                std::any::type_name::<T>()
            ))
        })
    }

    /// Bind `value` under `name`, replacing an earlier binding of that name.
    pub fn set_arg<T: Any + Send + Sync>(&mut self, name: impl Into<String>, value: T) {
        let name = name.into();
        let value: Value = Box::new(value);
        match self.args.iter_mut().find(|(bound, _)| *bound == name) {
            Some(slot) => slot.1 = value,
            None => self.args.push((name, value)),
        }
    }

    /// Names of the bound arguments in binding order.
    pub fn args(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(|(name, _)| name.as_str())
    }

    // =========================================================================
    // SCRATCH STORE
    // =========================================================================

    pub fn set<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.scratch.insert(key.into(), Box::new(value));
    }

    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.scratch.get(key).and_then(|value| value.downcast_ref::<T>())
    }

    // =========================================================================
    // LEDGER ACCESS
    // =========================================================================

    /// The raw stub of the current transaction.
    pub fn stub(&self) -> &'a dyn LedgerStub {
        self.stub
    }

    /// Typed state accessor bound to this transaction.
    pub fn state(&self) -> State<'a> {
        State::new(self.stub, self.entities)
    }

    /// Event emitter bound to this transaction.
    pub fn event(&self) -> Events<'a> {
        Events::new(self.stub, self.events)
    }

    /// Apply a command batch against this transaction.
    pub fn apply(&self, batch: CommandBatch) -> Result<(), RouterError> {
        batch.apply(&self.state(), &self.event())?;
        Ok(())
    }

    /// Client-assigned timestamp of the transaction.
    pub fn time(&self) -> Result<DateTime<Utc>, RouterError> {
        Ok(self.stub.tx_timestamp()?)
    }

    pub fn tx_id(&self) -> String {
        self.stub.tx_id()
    }
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("function", &self.function)
            .field("raw_args", &self.raw_args.len())
            .field("args", &self.args().collect::<Vec<_>>())
            .field("scratch", &self.scratch.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// TESTS
// =============================================================================
