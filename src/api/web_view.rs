use std::any::Any;
use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use super::method;
use crate::channel::{Messenger, Notification};
use crate::registry::{InstanceRegistry, ReferenceKind};

/// Remote-facing API for browser-view instances.
#[derive(Clone)]
pub struct WebViewApi {
    messenger: Arc<dyn Messenger>,
    registry: Arc<InstanceRegistry>,
}

impl WebViewApi {
    pub fn new(messenger: Arc<dyn Messenger>, registry: Arc<InstanceRegistry>) -> Self {
        Self {
            messenger,
            registry,
        }
    }

    /// Make `web_view` known on both sides of the bridge.
    ///
    /// On first sight the view is registered strongly and a creation
    /// notification is sent, so the remote side learns the identifier
    /// before any event references it. Calls for an already-registered
    /// view do nothing.
    pub fn create<V>(&self, web_view: &Arc<V>)
    where
        V: Any + Send + Sync,
    {
        if self.registry.contains(web_view) {
            return;
        }
        let id = self
            .registry
            .register_if_absent(web_view, ReferenceKind::Strong);
        debug!(target = "bridge", id = id.0, "registered web view");
        self.messenger
            .notify(Notification::new(method::WEB_VIEW_CREATE, vec![json!(id.0)]));
    }
}
