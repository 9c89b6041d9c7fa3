//! Handler trait and the method-name-to-handler registry.

use std::collections::HashMap;

use futures::future::BoxFuture;
use postrpc_common::{BoxError, Reply};

use crate::context::RequestContext;

/// What a handler invocation produces. The `Err` arm is converted by the
/// dispatch pipeline into a 500 reply carrying the error's message; it
/// never reaches the transport layer.
pub type HandlerResult = std::result::Result<Reply, BoxError>;

/// A registered method implementation.
///
/// Blanket-implemented for any `Fn(RequestContext) -> Future`, so plain
/// `async fn`s and async closures register directly:
///
/// ```
/// use postrpc_server::{HandlerResult, RequestContext};
/// use serde_json::json;
///
/// async fn ping(ctx: RequestContext) -> HandlerResult {
///     Ok(ctx.reply(json!("pong")))
/// }
/// ```
pub trait Handler: Send + Sync + 'static {
    fn call(&self, ctx: RequestContext) -> BoxFuture<'static, HandlerResult>;
}

impl<F, Fut> Handler for F
where
    F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, ctx: RequestContext) -> BoxFuture<'static, HandlerResult> {
        Box::pin(self(ctx))
    }
}

/// Method-name-to-handler mapping owned by one server instance.
///
/// Populated during setup, read-only while serving; concurrent requests
/// share it behind an `Arc` without locking.
#[derive(Default)]
pub(crate) struct HandlerRegistry {
    handlers: HashMap<String, Box<dyn Handler>>,
}

impl HandlerRegistry {
    /// Insert a handler under `name`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered. A duplicate registration is
    /// a setup-time programming error, not a request-time condition.
    pub(crate) fn insert(&mut self, name: String, handler: Box<dyn Handler>) {
        if self.handlers.contains_key(&name) {
            panic!("handler {name} already registered");
        }
        self.handlers.insert(name, handler);
    }

    pub(crate) fn get(&self, name: &str) -> Option<&dyn Handler> {
        self.handlers.get(name).map(|h| h.as_ref())
    }
}
