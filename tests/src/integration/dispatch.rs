//! # Dispatch Flows
//!
//! Router behaviour seen from the host: argument binding, unknown
//! functions, middleware order across groups, scratch values handed from
//! middleware to handlers, and stub handlers.

#[cfg(test)]
mod tests {
    use cc_01_state_mapping::{EntityRegistry, EventRegistry};
    use cc_02_router::{
        before, logging, param, Context, HandlerFn, Middleware, Phase, Router, RouterConfig,
        RouterError,
    };
    use parking_lot::Mutex;
    use shared_types::{LedgerStub, MockStub, Response, Status};
    use std::sync::Arc;

    const NONE: [Middleware; 0] = [];

    fn empty_router() -> Router {
        Router::new(
            EntityRegistry::builder().build(),
            EventRegistry::builder().build(),
        )
    }

    fn recorder(trail: &Arc<Mutex<Vec<&'static str>>>, label: &'static str) -> Middleware {
        let trail = Arc::clone(trail);
        Middleware::new(move |next: HandlerFn| -> HandlerFn {
            let trail = Arc::clone(&trail);
            Arc::new(move |ctx: &mut Context<'_>| {
                trail.lock().push(label);
                next(ctx)
            })
        })
    }

    #[test]
    fn test_transfer_receives_decoded_args() {
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);

        let mut router = empty_router();
        router.invoke(
            "transfer",
            move |ctx: &mut Context<'_>| {
                let a = ctx.arg::<String>("A")?.clone();
                let b = *ctx.arg::<i64>("B")?;
                *sink.lock() = Some((a, b));
                Ok(())
            },
            [param::<String>("A"), param::<i64>("B")],
        );

        let stub = MockStub::new();
        stub.begin_str("transfer", &["alice", "-25"]);
        let resp = router.handle(&stub);

        assert_eq!(resp.status, Status::Ok);
        assert!(resp.payload.is_empty());
        assert_eq!(*seen.lock(), Some(("alice".to_string(), -25)));
    }

    #[test]
    fn test_bogus_function_yields_method_not_found() {
        let mut router = empty_router();
        router.invoke("transfer", |_: &mut Context<'_>| Ok(()), NONE);

        let stub = MockStub::new();
        stub.begin_str("bogus", &["x"]);
        let resp = router.handle(&stub);

        assert_eq!(resp.status, Status::Error);
        assert_eq!(resp.status.code(), 500);
        assert_eq!(resp.message, "method not found: bogus");
        assert!(resp.payload.is_empty());
    }

    #[test]
    fn test_middleware_order_across_groups() {
        let trail = Arc::new(Mutex::new(Vec::new()));
        let mut router = empty_router();
        router.use_middleware([recorder(&trail, "router-1"), logging()]);
        {
            let mut admin = router.group("admin.");
            admin.use_middleware([recorder(&trail, "router-2")]);
            let handler_trail = Arc::clone(&trail);
            admin.invoke(
                "reset",
                move |_: &mut Context<'_>| {
                    handler_trail.lock().push("handler");
                    Ok(())
                },
                [recorder(&trail, "own-1"), recorder(&trail, "own-2")],
            );
        }

        let stub = MockStub::new();
        stub.begin_str("admin.reset", &[]);
        assert!(router.handle(&stub).is_ok());
        assert_eq!(
            *trail.lock(),
            vec!["router-1", "router-2", "own-1", "own-2", "handler"]
        );
    }

    #[test]
    fn test_middleware_passes_values_through_scratch() {
        let mut router = empty_router();
        let authenticate = Middleware::new(|next: HandlerFn| -> HandlerFn {
            Arc::new(move |ctx: &mut Context<'_>| {
                let caller = ctx.tx_id();
                ctx.set("caller", caller);
                next(ctx)
            })
        });
        router.use_middleware([authenticate]);
        router.query(
            "whoami",
            |ctx: &mut Context<'_>| {
                ctx.get::<String>("caller")
                    .cloned()
                    .ok_or_else(|| RouterError::handler("no caller"))
            },
            NONE,
        );

        let stub = MockStub::new();
        stub.begin_str("whoami", &[]);
        let resp = router.handle(&stub);
        assert_eq!(resp.payload, stub.tx_id().into_bytes());
    }

    #[test]
    fn test_access_check_short_circuits_before_binding() {
        let mut router = empty_router();
        router.use_middleware([before(|ctx: &Context<'_>| {
            if ctx.function().starts_with("admin.") {
                Err(RouterError::handler("admin functions are disabled"))
            } else {
                Ok(())
            }
        })]);
        router
            .group("admin.")
            .invoke("wipe", |_: &mut Context<'_>| Ok(()), [param::<u64>("n")]);

        let stub = MockStub::new();
        // Not even a decodable argument: the check runs first.
        stub.begin_str("admin.wipe", &["many"]);
        assert_eq!(router.handle(&stub).message, "admin functions are disabled");
    }

    #[test]
    fn test_stub_handler_sees_raw_invocation() {
        let mut router = empty_router();
        router.stub_invoke("echo", |stub: &dyn LedgerStub| {
            let (function, args) = stub.function_and_args();
            let mut out = function.into_bytes();
            for arg in args {
                out.push(b'|');
                out.extend(arg);
            }
            Response::success(out)
        });

        let stub = MockStub::new();
        stub.begin_str("echo", &["a", "b"]);
        assert_eq!(router.handle(&stub).payload, b"echo|a|b".to_vec());
    }

    #[test]
    fn test_strict_router_rejects_surplus_args() {
        let config = RouterConfig {
            name: "strict".into(),
            strict_args: true,
            log_invocations: true,
            ..Default::default()
        };
        let mut router = Router::with_config(
            config,
            EntityRegistry::builder().build(),
            EventRegistry::builder().build(),
        )
        .unwrap();
        router.invoke("noop", |_: &mut Context<'_>| Ok(()), NONE);

        let stub = MockStub::new();
        stub.begin_str("noop", &[]);
        assert!(router.handle(&stub).is_ok());
        stub.begin_str("noop", &["extra"]);
        assert_eq!(
            router.handle(&stub).message,
            "arguments mismatch: expected 0 arguments, got 1"
        );
        assert_eq!(router.functions(Phase::Invoke), vec!["noop"]);
    }
}
