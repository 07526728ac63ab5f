//! # Command Batch
//!
//! Collects state mutations and at most one event during handler
//! execution, then applies them in one pass.
//!
//! Staging touches nothing. [`CommandBatch::apply`] runs the commands in
//! insertion order and stops at the first failure; commands already applied
//! stay applied and the event is not emitted. The host discards the
//! transaction when the handler reports the error.
//!
//! ```ignore
//! let mut batch = CommandBatch::new();
//! batch.insert(paper).delete::<Paper>(["A", "0"]);
//! batch.set_event(PaperIssued { .. });
//! batch.apply(&state, &events)?;
//! ```

use crate::domain::entity::{short_type_name, Entity};
use crate::domain::key::Key;
use crate::errors::StateError;
use crate::service::events::Events;
use crate::service::state::State;
use shared_types::Byteable;
use std::fmt;
use tracing::{debug, warn};

type Exec = Box<dyn FnOnce(&State<'_>) -> Result<(), StateError> + Send>;
type Emit = Box<dyn FnOnce(&Events<'_>) -> Result<(), StateError> + Send>;

/// Kind of a staged mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Insert,
    Put,
    Delete,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Insert => "insert",
            Self::Put => "put",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// A staged mutation.
pub struct Command {
    kind: CommandKind,
    entity: &'static str,
    exec: Exec,
}

impl Command {
    /// Stage an insert of `entity`.
    pub fn insert<E: Entity>(entity: E) -> Self {
        Self {
            kind: CommandKind::Insert,
            entity: short_type_name::<E>(),
            exec: Box::new(move |state: &State<'_>| state.insert(&entity)),
        }
    }

    /// Stage a put of `entity`.
    pub fn put<E: Entity>(entity: E) -> Self {
        Self {
            kind: CommandKind::Put,
            entity: short_type_name::<E>(),
            exec: Box::new(move |state: &State<'_>| state.put(&entity)),
        }
    }

    /// Stage a delete of the `E` stored under `id`.
    pub fn delete<E: Entity>(id: impl Into<Key>) -> Self {
        let id = id.into();
        Self {
            kind: CommandKind::Delete,
            entity: short_type_name::<E>(),
            exec: Box::new(move |state: &State<'_>| state.delete::<E>(id)),
        }
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// Short type name of the target entity.
    pub fn entity(&self) -> &'static str {
        self.entity
    }

    /// Run against `state`.
    pub fn execute(self, state: &State<'_>) -> Result<(), StateError> {
        (self.exec)(state)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("kind", &self.kind)
            .field("entity", &self.entity)
            .finish_non_exhaustive()
    }
}

struct StagedEvent {
    /// Explicit name, or the payload type name for registry lookup.
    label: String,
    emit: Emit,
}

/// Ordered mutations plus at most one event.
#[derive(Default)]
pub struct CommandBatch {
    commands: Vec<Command>,
    event: Option<StagedEvent>,
}

impl CommandBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an arbitrary command.
    pub fn push(&mut self, command: Command) -> &mut Self {
        self.commands.push(command);
        self
    }

    pub fn insert<E: Entity>(&mut self, entity: E) -> &mut Self {
        self.push(Command::insert(entity))
    }

    pub fn put<E: Entity>(&mut self, entity: E) -> &mut Self {
        self.push(Command::put(entity))
    }

    pub fn delete<E: Entity>(&mut self, id: impl Into<Key>) -> &mut Self {
        self.push(Command::delete::<E>(id))
    }

    /// Stage `payload` under its registered event name, replacing any
    /// previously staged event.
    pub fn set_event<T: Byteable + Send + 'static>(&mut self, payload: T) -> &mut Self {
        self.event = Some(StagedEvent {
            label: short_type_name::<T>().to_string(),
            emit: Box::new(move |events: &Events<'_>| events.set(&payload)),
        });
        self
    }

    /// Stage `payload` under an explicit event name, replacing any
    /// previously staged event.
    pub fn set_event_named<T: Byteable + Send + 'static>(
        &mut self,
        name: impl Into<String>,
        payload: T,
    ) -> &mut Self {
        let name = name.into();
        self.event = Some(StagedEvent {
            label: name.clone(),
            emit: Box::new(move |events: &Events<'_>| events.set_named(&name, &payload)),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn has_event(&self) -> bool {
        self.event.is_some()
    }

    /// Staged commands in application order.
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    /// Apply every command in order, then emit the staged event.
    ///
    /// Stops at the first failing command. The event is emitted only when
    /// every command succeeded.
    pub fn apply(self, state: &State<'_>, events: &Events<'_>) -> Result<(), StateError> {
        let total = self.commands.len();
        for (position, command) in self.commands.into_iter().enumerate() {
            let (kind, entity) = (command.kind, command.entity);
            debug!(position, total, %kind, entity, "Applying command");
            if let Err(err) = command.execute(state) {
                warn!(
                    position, total, %kind, entity, error = %err,
                    "Command failed, batch stopped"
                );
                return Err(err);
            }
        }

        if let Some(event) = self.event {
            debug!(event = %event.label, "Emitting batch event");
            (event.emit)(events)?;
        }
        Ok(())
    }
}

impl fmt::Debug for CommandBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandBatch")
            .field("commands", &self.commands)
            .field("event", &self.event.as_ref().map(|e| e.label.as_str()))
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
