mod auth_handler;
mod web_view;
mod web_view_client;

pub use auth_handler::HttpAuthHandlerApi;
pub use web_view::WebViewApi;
pub use web_view_client::WebViewClientApi;

/// Stable wire method names, one per outbound notification category. The
/// remote side dispatches on these strings, so they never change shape.
pub mod method {
    pub const WEB_VIEW_CREATE: &str = "WebViewApi.create";
    pub const HTTP_AUTH_HANDLER_CREATE: &str = "HttpAuthHandlerApi.create";

    pub const ON_PAGE_STARTED: &str = "WebViewClientApi.onPageStarted";
    pub const ON_PAGE_FINISHED: &str = "WebViewClientApi.onPageFinished";
    pub const ON_RECEIVED_HTTP_ERROR: &str = "WebViewClientApi.onReceivedHttpError";
    pub const ON_RECEIVED_REQUEST_ERROR: &str = "WebViewClientApi.onReceivedRequestError";
    pub const ON_RECEIVED_ERROR: &str = "WebViewClientApi.onReceivedError";
    pub const REQUEST_LOADING: &str = "WebViewClientApi.requestLoading";
    pub const URL_LOADING: &str = "WebViewClientApi.urlLoading";
    pub const DO_UPDATE_VISITED_HISTORY: &str = "WebViewClientApi.doUpdateVisitedHistory";
    pub const ON_RECEIVED_HTTP_AUTH_REQUEST: &str = "WebViewClientApi.onReceivedHttpAuthRequest";
}
