use std::any::Any;
use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use super::method;
use crate::channel::{Messenger, Notification};
use crate::registry::{InstanceRegistry, ReferenceKind};

/// Remote-facing API for HTTP authentication handlers.
///
/// Handlers are held strongly: the remote side decides whether to proceed
/// or cancel the challenge, and the handler must stay alive until that
/// decision comes back and the embedder releases it.
#[derive(Clone)]
pub struct HttpAuthHandlerApi {
    messenger: Arc<dyn Messenger>,
    registry: Arc<InstanceRegistry>,
}

impl HttpAuthHandlerApi {
    pub fn new(messenger: Arc<dyn Messenger>, registry: Arc<InstanceRegistry>) -> Self {
        Self {
            messenger,
            registry,
        }
    }

    /// Register `handler` strongly and announce it to the remote side.
    /// Calls for an already-registered handler do nothing.
    pub fn create<H>(&self, handler: &Arc<H>)
    where
        H: Any + Send + Sync,
    {
        if self.registry.contains(handler) {
            return;
        }
        let id = self
            .registry
            .register_if_absent(handler, ReferenceKind::Strong);
        debug!(target = "bridge", id = id.0, "registered http auth handler");
        self.messenger.notify(Notification::new(
            method::HTTP_AUTH_HANDLER_CREATE,
            vec![json!(id.0)],
        ));
    }
}
