//! # CC-02 Router
//!
//! Routes an invocation's function name to a handler through a middleware
//! chain and hands the handler a [`Context`] bound to the transaction.
//!
//! ## Flow
//!
//! ```text
//! host → Router::handle(stub)
//!      → lookup (stub, context, result tables)
//!      → Context::new(stub, registries, function, args)
//!      → router middleware → param bindings → handler middleware → handler
//!      → Response
//! ```
//!
//! ## Usage Example
//!
//! ```ignore
//! use cc_02_router::prelude::*;
//!
//! let mut router = Router::new(entities, events);
//! router.use_middleware([logging()]);
//! router.invoke(
//!     "buy",
//!     |ctx: &mut Context<'_>| {
//!         let mut paper: Paper = ctx.state().get([ctx.arg::<String>("issuer")?.as_str(), "1"])?;
//!         paper.owner = ctx.arg::<String>("buyer")?.clone();
//!         ctx.state().put(&paper)?;
//!         Ok(paper)
//!     },
//!     [param::<String>("issuer"), param::<String>("buyer")],
//! );
//!
//! let response = router.handle(&stub);
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod config;
pub mod context;
pub mod errors;
pub mod handler;
pub mod middleware;
pub mod router;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::config::{ConfigError, RouterConfig};
    pub use crate::context::Context;
    pub use crate::errors::{ErrorKind, RouterError};
    pub use crate::handler::{HandlerFn, StubHandlerFn};
    pub use crate::middleware::{before, logging, param, Middleware};
    pub use crate::router::{Group, Phase, Router};
    pub use shared_types::{LedgerStub, Response, Status};
}

pub use config::{ConfigError, RouterConfig};
pub use context::Context;
pub use errors::{ErrorKind, RouterError};
pub use handler::{HandlerFn, StubHandlerFn};
pub use middleware::{before, logging, param, Middleware};
pub use router::{Group, Phase, Router};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
