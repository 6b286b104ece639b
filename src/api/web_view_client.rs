use std::any::Any;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use super::method;
use super::{HttpAuthHandlerApi, WebViewApi};
use crate::channel::{Messenger, Notification};
use crate::registry::{InstanceId, InstanceRegistry};
use crate::resource::{
    WebResourceError, WebResourceErrorCompat, WebResourceErrorData, WebResourceRequest,
    WebResourceRequestData, WebResourceResponse, WebResourceResponseData,
};

/// Forwards native browser-view client callbacks to the remote runtime.
///
/// Every operation follows the same shape: make sure the emitting view is
/// registered, resolve the identifiers the outgoing message needs, build a
/// flat payload from the native arguments, and emit one fire-and-forget
/// notification. When a required identifier is unresolved the event is
/// dropped without an error: the remote side simply has not heard of that
/// instance yet, and the next callback will retry against fresher registry
/// state.
pub struct WebViewClientApi {
    messenger: Arc<dyn Messenger>,
    registry: Arc<InstanceRegistry>,
    web_view_api: WebViewApi,
    auth_handler_api: HttpAuthHandlerApi,
}

impl WebViewClientApi {
    pub fn new(messenger: Arc<dyn Messenger>, registry: Arc<InstanceRegistry>) -> Self {
        let web_view_api = WebViewApi::new(Arc::clone(&messenger), Arc::clone(&registry));
        let auth_handler_api = HttpAuthHandlerApi::new(Arc::clone(&messenger), Arc::clone(&registry));
        Self {
            messenger,
            registry,
            web_view_api,
            auth_handler_api,
        }
    }

    /// Page navigation has started in `web_view`.
    pub fn on_page_started<C, V>(&self, client: &Arc<C>, web_view: &Arc<V>, url: &str)
    where
        C: Any + Send + Sync,
        V: Any + Send + Sync,
    {
        let Some((client_id, view_id)) = self.resolve(client, web_view) else {
            return;
        };
        self.notify(
            method::ON_PAGE_STARTED,
            vec![json!(client_id.0), json!(view_id.0), json!(url)],
        );
    }

    /// Page navigation has finished in `web_view`.
    pub fn on_page_finished<C, V>(&self, client: &Arc<C>, web_view: &Arc<V>, url: &str)
    where
        C: Any + Send + Sync,
        V: Any + Send + Sync,
    {
        let Some((client_id, view_id)) = self.resolve(client, web_view) else {
            return;
        };
        self.notify(
            method::ON_PAGE_FINISHED,
            vec![json!(client_id.0), json!(view_id.0), json!(url)],
        );
    }

    /// A resource load completed with an HTTP error status (non-fatal).
    pub fn on_received_http_error<C, V>(
        &self,
        client: &Arc<C>,
        web_view: &Arc<V>,
        request: &WebResourceRequest,
        response: &WebResourceResponse,
    ) where
        C: Any + Send + Sync,
        V: Any + Send + Sync,
    {
        let Some((client_id, view_id)) = self.resolve(client, web_view) else {
            return;
        };
        self.notify(
            method::ON_RECEIVED_HTTP_ERROR,
            vec![
                json!(client_id.0),
                json!(view_id.0),
                json!(WebResourceRequestData::from(request)),
                json!(WebResourceResponseData::from(response)),
            ],
        );
    }

    /// A resource load failed, reported through the current error API.
    pub fn on_received_request_error<C, V>(
        &self,
        client: &Arc<C>,
        web_view: &Arc<V>,
        request: &WebResourceRequest,
        error: &WebResourceError,
    ) where
        C: Any + Send + Sync,
        V: Any + Send + Sync,
    {
        self.forward_request_error(client, web_view, request, WebResourceErrorData::from(error));
    }

    /// A resource load failed, reported through the legacy compatibility
    /// shim. Converges on the same wire method as
    /// [`on_received_request_error`](Self::on_received_request_error).
    pub fn on_received_request_error_compat<C, V>(
        &self,
        client: &Arc<C>,
        web_view: &Arc<V>,
        request: &WebResourceRequest,
        error: &WebResourceErrorCompat,
    ) where
        C: Any + Send + Sync,
        V: Any + Send + Sync,
    {
        self.forward_request_error(client, web_view, request, WebResourceErrorData::from(error));
    }

    /// A navigation failed with a bare numeric error code.
    pub fn on_received_error<C, V>(
        &self,
        client: &Arc<C>,
        web_view: &Arc<V>,
        error_code: i64,
        description: &str,
        failing_url: &str,
    ) where
        C: Any + Send + Sync,
        V: Any + Send + Sync,
    {
        let Some((client_id, view_id)) = self.resolve(client, web_view) else {
            return;
        };
        self.notify(
            method::ON_RECEIVED_ERROR,
            vec![
                json!(client_id.0),
                json!(view_id.0),
                json!(error_code),
                json!(description),
                json!(failing_url),
            ],
        );
    }

    /// The remote side should decide whether to intercept this navigation
    /// (request-object form).
    pub fn request_loading<C, V>(
        &self,
        client: &Arc<C>,
        web_view: &Arc<V>,
        request: &WebResourceRequest,
    ) where
        C: Any + Send + Sync,
        V: Any + Send + Sync,
    {
        let Some((client_id, view_id)) = self.resolve(client, web_view) else {
            return;
        };
        self.notify(
            method::REQUEST_LOADING,
            vec![
                json!(client_id.0),
                json!(view_id.0),
                json!(WebResourceRequestData::from(request)),
            ],
        );
    }

    /// The remote side should decide whether to intercept this navigation
    /// (plain-URL form).
    pub fn url_loading<C, V>(&self, client: &Arc<C>, web_view: &Arc<V>, url: &str)
    where
        C: Any + Send + Sync,
        V: Any + Send + Sync,
    {
        let Some((client_id, view_id)) = self.resolve(client, web_view) else {
            return;
        };
        self.notify(
            method::URL_LOADING,
            vec![json!(client_id.0), json!(view_id.0), json!(url)],
        );
    }

    /// The visited-history list was updated.
    pub fn do_update_visited_history<C, V>(
        &self,
        client: &Arc<C>,
        web_view: &Arc<V>,
        url: &str,
        is_reload: bool,
    ) where
        C: Any + Send + Sync,
        V: Any + Send + Sync,
    {
        let Some((client_id, view_id)) = self.resolve(client, web_view) else {
            return;
        };
        self.notify(
            method::DO_UPDATE_VISITED_HISTORY,
            vec![
                json!(client_id.0),
                json!(view_id.0),
                json!(url),
                json!(is_reload),
            ],
        );
    }

    /// The engine received an HTTP authentication challenge. Registers the
    /// handler strongly and forwards three identifiers (client, view,
    /// handler) plus host and realm.
    pub fn on_received_http_auth_request<C, V, H>(
        &self,
        client: &Arc<C>,
        web_view: &Arc<V>,
        handler: &Arc<H>,
        host: &str,
        realm: &str,
    ) where
        C: Any + Send + Sync,
        V: Any + Send + Sync,
        H: Any + Send + Sync,
    {
        self.auth_handler_api.create(handler);
        let Some((client_id, view_id)) = self.resolve(client, web_view) else {
            return;
        };
        let Some(handler_id) = self.registry.lookup(handler) else {
            debug!(target = "bridge", "auth handler not registered, dropping event");
            return;
        };
        self.notify(
            method::ON_RECEIVED_HTTP_AUTH_REQUEST,
            vec![
                json!(client_id.0),
                json!(view_id.0),
                json!(handler_id.0),
                json!(host),
                json!(realm),
            ],
        );
    }

    fn forward_request_error<C, V>(
        &self,
        client: &Arc<C>,
        web_view: &Arc<V>,
        request: &WebResourceRequest,
        error: WebResourceErrorData,
    ) where
        C: Any + Send + Sync,
        V: Any + Send + Sync,
    {
        let Some((client_id, view_id)) = self.resolve(client, web_view) else {
            return;
        };
        self.notify(
            method::ON_RECEIVED_REQUEST_ERROR,
            vec![
                json!(client_id.0),
                json!(view_id.0),
                json!(WebResourceRequestData::from(request)),
                json!(error),
            ],
        );
    }

    /// Ensure the view is created remotely, then resolve the identifier
    /// pair every client notification leads with. `None` aborts the event:
    /// the client has not been announced to the remote side yet.
    fn resolve<C, V>(&self, client: &Arc<C>, web_view: &Arc<V>) -> Option<(InstanceId, InstanceId)>
    where
        C: Any + Send + Sync,
        V: Any + Send + Sync,
    {
        self.web_view_api.create(web_view);
        match (self.registry.lookup(client), self.registry.lookup(web_view)) {
            (Some(client_id), Some(view_id)) => Some((client_id, view_id)),
            _ => {
                debug!(target = "bridge", "client or view not registered, dropping event");
                None
            }
        }
    }

    fn notify(&self, method: &str, args: Vec<Value>) {
        self.messenger.notify(Notification::new(method, args));
    }
}
