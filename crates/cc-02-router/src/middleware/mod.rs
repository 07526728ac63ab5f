//! Middleware for the router.
//!
//! A middleware takes the next link of the chain and returns a new link.
//! Chains are composed once, when a handler is registered:
//!
//! ```text
//! router middleware (first registered outermost)
//!   → parameter bindings (declared order)
//!     → handler middleware (first listed outermost)
//!       → handler
//! ```
//!
//! Any link returning an error ends the invocation; nothing after it runs.

pub mod logging;
pub mod params;

pub use logging::logging;
pub use params::param;

use crate::context::Context;
use crate::errors::RouterError;
use crate::handler::HandlerFn;
use std::fmt;
use std::sync::Arc;

/// Wraps the next link of a chain.
pub type WrapFn = Arc<dyn Fn(HandlerFn) -> HandlerFn + Send + Sync>;

/// Decodes the raw argument at a position into the context.
pub(crate) type BindFn =
    Arc<dyn Fn(&mut Context<'_>, usize) -> Result<(), RouterError> + Send + Sync>;

#[derive(Clone)]
enum Layer {
    Wrap(WrapFn),
    Bind { name: String, bind: BindFn },
}

/// A chain link factory registered on a router or a single handler.
#[derive(Clone)]
pub struct Middleware {
    layer: Layer,
}

impl Middleware {
    /// Middleware from a wrapping function.
    ///
    /// ```ignore
    /// let audit = Middleware::new(|next: HandlerFn| -> HandlerFn {
    ///     Arc::new(move |ctx: &mut Context<'_>| {
    ///         ctx.set("audited", true);
    ///         next(ctx)
    ///     })
    /// });
    /// ```
    pub fn new<F>(wrap: F) -> Self
    where
        F: Fn(HandlerFn) -> HandlerFn + Send + Sync + 'static,
    {
        Self {
            layer: Layer::Wrap(Arc::new(wrap)),
        }
    }

    pub(crate) fn binding(name: String, bind: BindFn) -> Self {
        Self {
            layer: Layer::Bind { name, bind },
        }
    }

    /// Whether this middleware binds a positional parameter.
    pub fn is_param(&self) -> bool {
        matches!(self.layer, Layer::Bind { .. })
    }

    /// Name of the bound parameter, if any.
    pub fn param_name(&self) -> Option<&str> {
        match &self.layer {
            Layer::Bind { name, .. } => Some(name),
            Layer::Wrap(_) => None,
        }
    }

    /// Wrap `next`. `position` is the raw argument index used by bindings.
    fn wrap(&self, next: HandlerFn, position: usize) -> HandlerFn {
        match &self.layer {
            Layer::Wrap(wrap) => wrap(next),
            Layer::Bind { bind, .. } => {
                let bind = Arc::clone(bind);
                Arc::new(move |ctx: &mut Context<'_>| {
                    bind(ctx, position)?;
                    next(ctx)
                })
            }
        }
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.layer {
            Layer::Wrap(_) => f.write_str("Middleware::Wrap"),
            Layer::Bind { name, .. } => write!(f, "Middleware::Param({name})"),
        }
    }
}

/// Run `check` before the rest of the chain; an error short-circuits.
pub fn before<F>(check: F) -> Middleware
where
    F: Fn(&Context<'_>) -> Result<(), RouterError> + Send + Sync + 'static,
{
    let check = Arc::new(check);
    Middleware::new(move |next: HandlerFn| -> HandlerFn {
        let check = Arc::clone(&check);
        Arc::new(move |ctx: &mut Context<'_>| {
            check(ctx)?;
            next(ctx)
        })
    })
}

/// Compose `handler` with router-level and handler-level middleware.
///
/// Parameter bindings get consecutive raw argument positions: router-level
/// bindings first, then the handler's. With `strict_args` the chain also
/// rejects invocations carrying more arguments than were bound.
pub(crate) fn compose(
    handler: HandlerFn,
    router: &[Middleware],
    own: &[Middleware],
    strict_args: bool,
) -> HandlerFn {
    let (params, others): (Vec<&Middleware>, Vec<&Middleware>) =
        own.iter().partition(|mw| mw.is_param());
    let router_params = router.iter().filter(|mw| mw.is_param()).count();

    let mut chain = handler;
    for mw in others.iter().rev() {
        chain = mw.wrap(chain, 0);
    }

    if strict_args {
        chain = exact_arity(router_params + params.len(), chain);
    }

    for (offset, mw) in params.iter().enumerate().rev() {
        chain = mw.wrap(chain, router_params + offset);
    }

    let mut position = router_params;
    for mw in router.iter().rev() {
        if mw.is_param() {
            position -= 1;
        }
        chain = mw.wrap(chain, position);
    }
    chain
}

fn exact_arity(expected: usize, next: HandlerFn) -> HandlerFn {
    Arc::new(move |ctx: &mut Context<'_>| {
        let supplied = ctx.raw_args().len();
        if supplied > expected {
            return Err(RouterError::args(format!(
                "expected {expected} arguments, got {supplied}"
            )));
        }
        next(ctx)
    })
}

// =============================================================================
// TESTS
// =============================================================================
