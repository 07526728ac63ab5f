//! Positional parameter binding.
//!
//! `param::<T>("amount")` decodes one raw argument with `T`'s [`Byteable`]
//! implementation and binds it in the context under `"amount"`. The raw
//! argument index is fixed when the handler is registered.

use super::Middleware;
use crate::context::Context;
use crate::errors::RouterError;
use shared_types::Byteable;
use std::any::Any;
use std::sync::Arc;
use tracing::trace;

/// Bind the next positional argument as `T` under `name`.
///
/// Fails with `ArgsMismatch` when the argument is missing and with
/// `Conversion` when it does not decode.
pub fn param<T>(name: impl Into<String>) -> Middleware
where
    T: Byteable + Any + Send + Sync,
{
    let name = name.into();
    let bound = name.clone();
    Middleware::binding(
        name,
        Arc::new(move |ctx: &mut Context<'_>, position: usize| {
            let raw = ctx.raw_args().get(position).ok_or_else(|| {
                RouterError::args(format!(
                    "parameter {bound:?} expects argument {position}, got {} arguments",
                    ctx.raw_args().len()
                ))
            })?;
            let value = T::from_bytes(raw)?;
            trace!(param = %bound, position, "Bound parameter");
            ctx.set_arg(bound.clone(), value);
            Ok(())
        }),
    )
}
