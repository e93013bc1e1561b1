//! # Cart Event Dispatch
//!
//! Typed publish/subscribe for cart events. Each event kind owns a list of
//! handlers ordered by priority: higher priority runs first, equal priorities
//! run in subscription order. Host default handlers sit at
//! [`DEFAULT_PRIORITY`]; anything that needs to observe their result
//! subscribes below it.

use crate::engine::error::{CouponError, Result};
use crate::engine::event::{CartEvent, CartEventKind};
use log::{debug, error};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Priority of the host's default handlers
pub const DEFAULT_PRIORITY: i32 = 128;

/// Interface for anything reacting to cart events
pub trait CartEventHandler: Send + Sync {
    /// Name used in logs and handler errors
    fn name(&self) -> &str;

    /// Handle the event. The event is mutable so a handler can hand its
    /// result to the handlers that follow.
    fn handle(&self, event: &mut CartEvent) -> Result<()>;
}

struct Subscription {
    priority: i32,
    handler: Arc<dyn CartEventHandler>,
}

/// Ordered handler lists per event kind
#[derive(Default)]
pub struct EventDispatcher {
    handlers: RwLock<HashMap<CartEventKind, Vec<Subscription>>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &self,
        kind: CartEventKind,
        priority: i32,
        handler: Arc<dyn CartEventHandler>,
    ) {
        debug!(
            "Subscribing handler {} to {:?} with priority {}",
            handler.name(),
            kind,
            priority
        );
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        let list = handlers.entry(kind).or_default();
        // Insert after every handler of equal or higher priority
        let position = list
            .iter()
            .position(|s| s.priority < priority)
            .unwrap_or(list.len());
        list.insert(position, Subscription { priority, handler });
    }

    /// Number of handlers subscribed to `kind`
    pub fn handler_count(&self, kind: CartEventKind) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Run every handler of `kind` in priority order.
    ///
    /// The handler list is snapshotted before the first call so a handler
    /// may dispatch again without holding the lock. The first failing
    /// handler stops the dispatch.
    pub fn dispatch(&self, kind: CartEventKind, event: &mut CartEvent) -> Result<()> {
        let handlers: Vec<Arc<dyn CartEventHandler>> = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .map(|list| list.iter().map(|s| Arc::clone(&s.handler)).collect())
            .unwrap_or_default();

        debug!(
            "Dispatching {:?} for variant {} in cart {} to {} handler(s)",
            kind,
            event.variant_id,
            event.cart_id,
            handlers.len()
        );

        for handler in handlers {
            if let Err(e) = handler.handle(event) {
                error!(
                    "Handler {} failed on {:?} [{}]: {}",
                    handler.name(),
                    kind,
                    e.code(),
                    e
                );
                return Err(CouponError::handler(handler.name(), e));
            }
        }
        Ok(())
    }
}
