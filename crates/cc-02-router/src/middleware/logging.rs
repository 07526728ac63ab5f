//! Invocation logging middleware.
//!
//! Opens an `invocation` span around the rest of the chain and records the
//! outcome with its duration.

use super::Middleware;
use crate::context::Context;
use crate::handler::HandlerFn;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info_span, warn};

/// Span per invocation, logging duration and outcome.
pub fn logging() -> Middleware {
    Middleware::new(|next: HandlerFn| -> HandlerFn {
        Arc::new(move |ctx: &mut Context<'_>| {
            let span = info_span!(
                "invocation",
                function = %ctx.function(),
                tx_id = %ctx.tx_id(),
                args = ctx.raw_args().len(),
            );
            let _entered = span.enter();
            let started = Instant::now();

            let result = next(ctx);
            let elapsed_us = started.elapsed().as_micros() as u64;
            match &result {
                Ok(payload) => debug!(elapsed_us, payload = payload.len(), "Invocation succeeded"),
                Err(err) => warn!(elapsed_us, error = %err, "Invocation failed"),
            }
            result
        })
    })
}
