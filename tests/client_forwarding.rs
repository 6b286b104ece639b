use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc::UnboundedReceiver;
use webview_bridge::api::method;
use webview_bridge::resource::{
    WebResourceError, WebResourceErrorCompat, WebResourceRequest, WebResourceResponse,
};
use webview_bridge::{
    ChannelMessenger, InstanceRegistry, Notification, ReferenceKind, WebViewClientApi,
};

struct WebView(#[allow(dead_code)] &'static str);
struct WebViewClient(#[allow(dead_code)] &'static str);
struct AuthHandler(#[allow(dead_code)] &'static str);

fn bridge() -> (
    WebViewClientApi,
    Arc<InstanceRegistry>,
    UnboundedReceiver<Notification>,
) {
    let _ = tracing_subscriber::fmt::try_init();
    let registry = Arc::new(InstanceRegistry::new());
    let (messenger, receiver) = ChannelMessenger::new();
    let api = WebViewClientApi::new(Arc::new(messenger), Arc::clone(&registry));
    (api, registry, receiver)
}

fn drain(receiver: &mut UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut notifications = Vec::new();
    while let Ok(notification) = receiver.try_recv() {
        notifications.push(notification);
    }
    notifications
}

fn sample_request() -> WebResourceRequest {
    WebResourceRequest::new(
        "https://example.com/resource",
        true,
        false,
        "GET",
        None,
        None,
    )
    .expect("valid request")
}

#[test]
fn page_started_forwards_client_and_view_identifiers_with_url() {
    let (api, registry, mut receiver) = bridge();
    let view = Arc::new(WebView("v"));
    let client = Arc::new(WebViewClient("c"));
    registry.register_if_absent(&view, ReferenceKind::Strong);
    registry.register_if_absent(&client, ReferenceKind::Strong);

    api.on_page_started(&client, &view, "https://example.com");

    assert_eq!(
        drain(&mut receiver),
        vec![Notification::new(
            method::ON_PAGE_STARTED,
            vec![json!(2), json!(1), json!("https://example.com")],
        )]
    );
}

#[test]
fn unregistered_client_produces_no_notifications() {
    let (api, registry, mut receiver) = bridge();
    let view = Arc::new(WebView("v"));
    let client = Arc::new(WebViewClient("never registered"));
    registry.register_if_absent(&view, ReferenceKind::Strong);

    api.on_page_started(&client, &view, "https://example.com");

    assert!(drain(&mut receiver).is_empty());
}

#[test]
fn fresh_view_is_announced_before_its_first_event() {
    let (api, registry, mut receiver) = bridge();
    let client = Arc::new(WebViewClient("c"));
    registry.register_if_absent(&client, ReferenceKind::Strong);
    let view = Arc::new(WebView("fresh"));

    api.on_page_finished(&client, &view, "https://example.com/done");

    assert_eq!(
        drain(&mut receiver),
        vec![
            Notification::new(method::WEB_VIEW_CREATE, vec![json!(2)]),
            Notification::new(
                method::ON_PAGE_FINISHED,
                vec![json!(1), json!(2), json!("https://example.com/done")],
            ),
        ]
    );
}

#[test]
fn auth_request_registers_handler_and_forwards_three_identifiers() {
    let (api, registry, mut receiver) = bridge();
    let view = Arc::new(WebView("v"));
    let client = Arc::new(WebViewClient("c"));
    registry.register_if_absent(&view, ReferenceKind::Strong);
    registry.register_if_absent(&client, ReferenceKind::Strong);
    let handler = Arc::new(AuthHandler("h"));

    api.on_received_http_auth_request(&client, &view, &handler, "example.com", "realm1");

    let notifications = drain(&mut receiver);
    assert_eq!(
        notifications,
        vec![
            Notification::new(method::HTTP_AUTH_HANDLER_CREATE, vec![json!(3)]),
            Notification::new(
                method::ON_RECEIVED_HTTP_AUTH_REQUEST,
                vec![
                    json!(2),
                    json!(1),
                    json!(3),
                    json!("example.com"),
                    json!("realm1"),
                ],
            ),
        ]
    );

    // The handler stays alive under the registry's strong holder until the
    // remote side resolves the challenge.
    drop(handler);
    assert_eq!(registry.len(), 3);
}

#[test]
fn http_error_carries_request_and_response_payloads() {
    let (api, registry, mut receiver) = bridge();
    let view = Arc::new(WebView("v"));
    let client = Arc::new(WebViewClient("c"));
    registry.register_if_absent(&view, ReferenceKind::Strong);
    registry.register_if_absent(&client, ReferenceKind::Strong);

    api.on_received_http_error(
        &client,
        &view,
        &sample_request(),
        &WebResourceResponse { status_code: 404 },
    );

    let notifications = drain(&mut receiver);
    assert_eq!(notifications.len(), 1);
    let args = &notifications[0].args;
    assert_eq!(notifications[0].method, method::ON_RECEIVED_HTTP_ERROR);
    assert_eq!(args[2]["url"], json!("https://example.com/resource"));
    assert_eq!(args[2]["requestHeaders"], json!({}));
    assert!(args[2].get("isRedirect").is_none());
    assert_eq!(args[3], json!({ "statusCode": 404 }));
}

#[test]
fn current_and_compat_error_representations_produce_identical_messages() {
    let (api, registry, mut receiver) = bridge();
    let view = Arc::new(WebView("v"));
    let client = Arc::new(WebViewClient("c"));
    registry.register_if_absent(&view, ReferenceKind::Strong);
    registry.register_if_absent(&client, ReferenceKind::Strong);
    let request = sample_request();

    api.on_received_request_error(
        &client,
        &view,
        &request,
        &WebResourceError {
            error_code: -6,
            description: "net::ERR_CONNECTION_REFUSED".to_string(),
        },
    );
    api.on_received_request_error_compat(
        &client,
        &view,
        &request,
        &WebResourceErrorCompat {
            error_code: -6,
            description: "net::ERR_CONNECTION_REFUSED".to_string(),
        },
    );

    let notifications = drain(&mut receiver);
    assert_eq!(notifications.len(), 2);
    assert_eq!(notifications[0], notifications[1]);
    assert_eq!(notifications[0].method, method::ON_RECEIVED_REQUEST_ERROR);
    assert_eq!(
        notifications[0].args[3],
        json!({ "errorCode": -6, "description": "net::ERR_CONNECTION_REFUSED" })
    );
}

#[test]
fn numeric_coded_error_forwards_all_fields_positionally() {
    let (api, registry, mut receiver) = bridge();
    let view = Arc::new(WebView("v"));
    let client = Arc::new(WebViewClient("c"));
    registry.register_if_absent(&view, ReferenceKind::Strong);
    registry.register_if_absent(&client, ReferenceKind::Strong);

    api.on_received_error(&client, &view, -2, "name not resolved", "https://bad.example");

    assert_eq!(
        drain(&mut receiver),
        vec![Notification::new(
            method::ON_RECEIVED_ERROR,
            vec![
                json!(2),
                json!(1),
                json!(-2),
                json!("name not resolved"),
                json!("https://bad.example"),
            ],
        )]
    );
}

#[test]
fn both_interception_forms_forward_to_distinct_methods() {
    let (api, registry, mut receiver) = bridge();
    let view = Arc::new(WebView("v"));
    let client = Arc::new(WebViewClient("c"));
    registry.register_if_absent(&view, ReferenceKind::Strong);
    registry.register_if_absent(&client, ReferenceKind::Strong);

    let mut headers = HashMap::new();
    headers.insert("Accept".to_string(), "text/html".to_string());
    let request = WebResourceRequest::new(
        "https://example.com/next",
        true,
        true,
        "POST",
        Some(headers),
        Some(true),
    )
    .expect("valid request");

    api.request_loading(&client, &view, &request);
    api.url_loading(&client, &view, "https://example.com/next");

    let notifications = drain(&mut receiver);
    assert_eq!(notifications.len(), 2);
    assert_eq!(notifications[0].method, method::REQUEST_LOADING);
    assert_eq!(
        notifications[0].args[2],
        json!({
            "url": "https://example.com/next",
            "isForMainFrame": true,
            "hasGesture": true,
            "method": "POST",
            "requestHeaders": { "Accept": "text/html" },
            "isRedirect": true,
        })
    );
    assert_eq!(notifications[1].method, method::URL_LOADING);
    assert_eq!(
        notifications[1].args,
        vec![json!(2), json!(1), json!("https://example.com/next")]
    );
}

#[test]
fn visited_history_update_includes_reload_flag() {
    let (api, registry, mut receiver) = bridge();
    let view = Arc::new(WebView("v"));
    let client = Arc::new(WebViewClient("c"));
    registry.register_if_absent(&view, ReferenceKind::Strong);
    registry.register_if_absent(&client, ReferenceKind::Strong);

    api.do_update_visited_history(&client, &view, "https://example.com/history", true);

    assert_eq!(
        drain(&mut receiver),
        vec![Notification::new(
            method::DO_UPDATE_VISITED_HISTORY,
            vec![
                json!(2),
                json!(1),
                json!("https://example.com/history"),
                json!(true),
            ],
        )]
    );
}

#[test]
fn released_client_stops_forwarding_without_errors() {
    let (api, registry, mut receiver) = bridge();
    let view = Arc::new(WebView("v"));
    let client = Arc::new(WebViewClient("c"));
    registry.register_if_absent(&view, ReferenceKind::Strong);
    let client_id = registry.register_if_absent(&client, ReferenceKind::Strong);

    api.on_page_started(&client, &view, "https://example.com");
    assert_eq!(drain(&mut receiver).len(), 1);

    registry.release(client_id);
    api.on_page_started(&client, &view, "https://example.com");
    assert!(drain(&mut receiver).is_empty());
}
