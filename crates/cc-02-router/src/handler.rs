//! Handler shapes accepted by the router and their common chain form.

use crate::context::Context;
use crate::errors::RouterError;
use shared_types::{Byteable, LedgerStub, Response};
use std::sync::Arc;

/// A composed chain link: context in, serialized payload out.
pub type HandlerFn = Arc<dyn Fn(&mut Context<'_>) -> Result<Vec<u8>, RouterError> + Send + Sync>;

/// A handler that receives the raw stub and builds the response itself.
pub type StubHandlerFn = Arc<dyn Fn(&dyn LedgerStub) -> Response + Send + Sync>;

/// Lift a result-returning handler into chain form.
pub(crate) fn from_result<F, R>(handler: F) -> HandlerFn
where
    F: Fn(&mut Context<'_>) -> Result<R, RouterError> + Send + Sync + 'static,
    R: Byteable,
{
    Arc::new(move |ctx: &mut Context<'_>| Ok(handler(ctx)?.to_bytes()?))
}

/// Lift a context-only handler into chain form. Success carries no payload.
pub(crate) fn from_context<F>(handler: F) -> HandlerFn
where
    F: Fn(&mut Context<'_>) -> Result<(), RouterError> + Send + Sync + 'static,
{
    Arc::new(move |ctx: &mut Context<'_>| {
        handler(ctx)?;
        Ok(Vec::new())
    })
}
