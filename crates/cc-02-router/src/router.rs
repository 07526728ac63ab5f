//! # Router
//!
//! Maps function names to handler chains for the init and invoke phases
//! and turns each invocation into a [`Response`].
//!
//! ## Lookup
//!
//! Each phase keeps three tables, searched in this order:
//!
//! | Kind | Registered with | Receives |
//! |------|-----------------|----------|
//! | Stub | `stub_invoke` | raw stub, returns `Response` |
//! | Context | `context_invoke` | `&mut Context`, returns `()` |
//! | Result | `init`, `invoke`, `query` | `&mut Context`, returns `R: Byteable` |
//!
//! Stub handlers skip the middleware chain entirely.
//!
//! ## Middleware
//!
//! Chains are composed at registration. Router middleware added with
//! [`Router::use_middleware`] applies to handlers registered after it.

use crate::config::{ConfigError, RouterConfig};
use crate::context::Context;
use crate::errors::RouterError;
use crate::handler::{self, HandlerFn, StubHandlerFn};
use crate::middleware::{self, Middleware};
use cc_01_state_mapping::{EntityRegistry, EventRegistry};
use shared_types::{Byteable, LedgerStub, Response};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Invocation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Invoke,
}

#[derive(Default)]
struct HandlerTable {
    stub: HashMap<String, StubHandlerFn>,
    context: HashMap<String, HandlerFn>,
    result: HashMap<String, HandlerFn>,
}

enum Route<'t> {
    Stub(&'t StubHandlerFn),
    Chain(&'t HandlerFn),
}

impl HandlerTable {
    fn lookup(&self, function: &str) -> Option<Route<'_>> {
        self.stub
            .get(function)
            .map(Route::Stub)
            .or_else(|| self.context.get(function).map(Route::Chain))
            .or_else(|| self.result.get(function).map(Route::Chain))
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        self.stub
            .keys()
            .chain(self.context.keys())
            .chain(self.result.keys())
            .map(String::as_str)
    }
}

/// Function-name dispatcher owning the registries its handlers use.
pub struct Router {
    config: RouterConfig,
    entities: Arc<EntityRegistry>,
    events: Arc<EventRegistry>,
    middleware: Vec<Middleware>,
    init: HandlerTable,
    invoke: HandlerTable,
}

impl Router {
    /// Router with the default configuration.
    pub fn new(entities: EntityRegistry, events: EventRegistry) -> Self {
        Self::build(RouterConfig::default(), Arc::new(entities), Arc::new(events))
    }

    /// Router with a validated configuration.
    pub fn with_config(
        config: RouterConfig,
        entities: EntityRegistry,
        events: EventRegistry,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, Arc::new(entities), Arc::new(events)))
    }

    /// Router sharing registries with other routers.
    pub fn with_shared(
        config: RouterConfig,
        entities: Arc<EntityRegistry>,
        events: Arc<EventRegistry>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, entities, events))
    }

    fn build(
        config: RouterConfig,
        entities: Arc<EntityRegistry>,
        events: Arc<EventRegistry>,
    ) -> Self {
        Self {
            config,
            entities,
            events,
            middleware: Vec::new(),
            init: HandlerTable::default(),
            invoke: HandlerTable::default(),
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn entities(&self) -> &EntityRegistry {
        &self.entities
    }

    pub fn events(&self) -> &EventRegistry {
        &self.events
    }

    /// Registered function names for `phase`, sorted.
    pub fn functions(&self, phase: Phase) -> Vec<&str> {
        let mut names: Vec<&str> = self.table(phase).names().collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    // =========================================================================
    // REGISTRATION
    // =========================================================================

    /// Append router-level middleware.
    pub fn use_middleware(
        &mut self,
        middleware: impl IntoIterator<Item = Middleware>,
    ) -> &mut Self {
        self.middleware.extend(middleware);
        self
    }

    /// Register the init handler under the configured init function name.
    pub fn init<F, R>(
        &mut self,
        handler: F,
        middleware: impl IntoIterator<Item = Middleware>,
    ) -> &mut Self
    where
        F: Fn(&mut Context<'_>) -> Result<R, RouterError> + Send + Sync + 'static,
        R: Byteable,
    {
        let name = self.config.init_function.clone();
        self.init_named(&name, handler, middleware)
    }

    /// Register an init handler under an explicit function name.
    pub fn init_named<F, R>(
        &mut self,
        name: &str,
        handler: F,
        middleware: impl IntoIterator<Item = Middleware>,
    ) -> &mut Self
    where
        F: Fn(&mut Context<'_>) -> Result<R, RouterError> + Send + Sync + 'static,
        R: Byteable,
    {
        let chain = self.compose(handler::from_result(handler), middleware);
        self.add(Phase::Init, name, |table| &mut table.result, chain)
    }

    /// Register a result-returning handler for the invoke phase.
    pub fn invoke<F, R>(
        &mut self,
        name: &str,
        handler: F,
        middleware: impl IntoIterator<Item = Middleware>,
    ) -> &mut Self
    where
        F: Fn(&mut Context<'_>) -> Result<R, RouterError> + Send + Sync + 'static,
        R: Byteable,
    {
        let chain = self.compose(handler::from_result(handler), middleware);
        self.add(Phase::Invoke, name, |table| &mut table.result, chain)
    }

    /// Same as [`Router::invoke`]; marks read-only functions at the call site.
    pub fn query<F, R>(
        &mut self,
        name: &str,
        handler: F,
        middleware: impl IntoIterator<Item = Middleware>,
    ) -> &mut Self
    where
        F: Fn(&mut Context<'_>) -> Result<R, RouterError> + Send + Sync + 'static,
        R: Byteable,
    {
        self.invoke(name, handler, middleware)
    }

    /// Register a handler that returns no payload.
    pub fn context_invoke<F>(
        &mut self,
        name: &str,
        handler: F,
        middleware: impl IntoIterator<Item = Middleware>,
    ) -> &mut Self
    where
        F: Fn(&mut Context<'_>) -> Result<(), RouterError> + Send + Sync + 'static,
    {
        let chain = self.compose(handler::from_context(handler), middleware);
        self.add(Phase::Invoke, name, |table| &mut table.context, chain)
    }

    /// Register a handler working on the raw stub. No middleware applies.
    pub fn stub_invoke<F>(&mut self, name: &str, handler: F) -> &mut Self
    where
        F: Fn(&dyn LedgerStub) -> Response + Send + Sync + 'static,
    {
        let handler: StubHandlerFn = Arc::new(handler);
        self.add(Phase::Invoke, name, |table| &mut table.stub, handler)
    }

    /// Sub-router registering under `prefix`.
    pub fn group(&mut self, prefix: &str) -> Group<'_> {
        Group {
            router: self,
            prefix: prefix.to_string(),
        }
    }

    fn compose(&self, handler: HandlerFn, own: impl IntoIterator<Item = Middleware>) -> HandlerFn {
        let own: Vec<Middleware> = own.into_iter().collect();
        middleware::compose(handler, &self.middleware, &own, self.config.strict_args)
    }

    fn add<T>(
        &mut self,
        phase: Phase,
        name: &str,
        slot: impl FnOnce(&mut HandlerTable) -> &mut HashMap<String, T>,
        entry: T,
    ) -> &mut Self {
        let table = match phase {
            Phase::Init => &mut self.init,
            Phase::Invoke => &mut self.invoke,
        };
        if slot(table).insert(name.to_string(), entry).is_some() {
            warn!(router = %self.config.name, ?phase, function = name, "Handler replaced");
        } else {
            debug!(router = %self.config.name, ?phase, function = name, "Handler registered");
        }
        self
    }

    fn table(&self, phase: Phase) -> &HandlerTable {
        match phase {
            Phase::Init => &self.init,
            Phase::Invoke => &self.invoke,
        }
    }

    // =========================================================================
    // DISPATCH
    // =========================================================================

    /// Serve the init invocation carried by `stub`.
    pub fn handle_init(&self, stub: &dyn LedgerStub) -> Response {
        let (mut function, args) = stub.function_and_args();
        if function.is_empty() {
            function = self.config.init_function.clone();
        }
        self.respond(Phase::Init, stub, function, args)
    }

    /// Serve an ordinary invocation carried by `stub`.
    pub fn handle(&self, stub: &dyn LedgerStub) -> Response {
        let (function, args) = stub.function_and_args();
        self.respond(Phase::Invoke, stub, function, args)
    }

    fn respond(
        &self,
        phase: Phase,
        stub: &dyn LedgerStub,
        function: String,
        args: Vec<Vec<u8>>,
    ) -> Response {
        let router = self.config.name.as_str();
        if self.config.log_invocations {
            info!(router, ?phase, %function, args = args.len(), "Invocation");
        } else {
            debug!(router, ?phase, %function, args = args.len(), "Invocation");
        }
        match self.dispatch(phase, stub, function, args) {
            Ok(response) => response,
            Err(err) => {
                warn!(router, ?phase, kind = ?err.kind(), error = %err, "Invocation rejected");
                Response::error(err.to_string())
            }
        }
    }

    /// Route one invocation and return the handler's outcome.
    #[instrument(level = "debug", skip(self, stub, args), fields(router = %self.config.name))]
    pub fn dispatch(
        &self,
        phase: Phase,
        stub: &dyn LedgerStub,
        function: String,
        args: Vec<Vec<u8>>,
    ) -> Result<Response, RouterError> {
        let route = self
            .table(phase)
            .lookup(&function)
            .ok_or_else(|| RouterError::MethodNotFound {
                function: function.clone(),
            })?;

        match route {
            Route::Stub(handler) => Ok(handler(stub)),
            Route::Chain(chain) => {
                let mut ctx = Context::new(stub, &self.entities, &self.events, function, args);
                let payload = chain(&mut ctx)?;
                Ok(Response::success(payload))
            }
        }
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("config", &self.config)
            .field("middleware", &self.middleware)
            .field("init", &self.functions(Phase::Init))
            .field("invoke", &self.functions(Phase::Invoke))
            .finish_non_exhaustive()
    }
}

// =============================================================================
// GROUPS
// =============================================================================

/// Sub-router registering invoke handlers under a name prefix.
///
/// Shares the parent's tables and middleware list: middleware added through
/// a group is added to the router.
pub struct Group<'r> {
    router: &'r mut Router,
    prefix: String,
}

impl Group<'_> {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn name(&self, name: &str) -> String {
        format!("{}{name}", self.prefix)
    }

    pub fn use_middleware(
        &mut self,
        middleware: impl IntoIterator<Item = Middleware>,
    ) -> &mut Self {
        self.router.use_middleware(middleware);
        self
    }

    pub fn invoke<F, R>(
        &mut self,
        name: &str,
        handler: F,
        middleware: impl IntoIterator<Item = Middleware>,
    ) -> &mut Self
    where
        F: Fn(&mut Context<'_>) -> Result<R, RouterError> + Send + Sync + 'static,
        R: Byteable,
    {
        let full = self.name(name);
        self.router.invoke(&full, handler, middleware);
        self
    }

    pub fn query<F, R>(
        &mut self,
        name: &str,
        handler: F,
        middleware: impl IntoIterator<Item = Middleware>,
    ) -> &mut Self
    where
        F: Fn(&mut Context<'_>) -> Result<R, RouterError> + Send + Sync + 'static,
        R: Byteable,
    {
        self.invoke(name, handler, middleware)
    }

    pub fn context_invoke<F>(
        &mut self,
        name: &str,
        handler: F,
        middleware: impl IntoIterator<Item = Middleware>,
    ) -> &mut Self
    where
        F: Fn(&mut Context<'_>) -> Result<(), RouterError> + Send + Sync + 'static,
    {
        let full = self.name(name);
        self.router.context_invoke(&full, handler, middleware);
        self
    }

    pub fn stub_invoke<F>(&mut self, name: &str, handler: F) -> &mut Self
    where
        F: Fn(&dyn LedgerStub) -> Response + Send + Sync + 'static,
    {
        let full = self.name(name);
        self.router.stub_invoke(&full, handler);
        self
    }

    /// Nested group; prefixes concatenate.
    pub fn group(&mut self, prefix: &str) -> Group<'_> {
        let prefix = self.name(prefix);
        Group {
            router: &mut *self.router,
            prefix,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
