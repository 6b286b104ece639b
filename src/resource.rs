use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;
use url::Url;

/// Rejection of malformed native callback arguments.
///
/// Translation fails fast: a request that cannot be represented faithfully
/// is never forwarded with defaults substituted for the broken fields.
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("request URL could not be parsed: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("request method is empty")]
    EmptyMethod,
}

/// A resource request as surfaced by the native engine.
///
/// `headers` is `None` when the engine exposes no header set at all, and
/// `is_redirect` is `None` on platforms that cannot report redirect status;
/// both distinctions survive into the serialized payload rules below.
#[derive(Debug, Clone)]
pub struct WebResourceRequest {
    pub url: Url,
    pub is_for_main_frame: bool,
    pub has_gesture: bool,
    pub method: String,
    pub headers: Option<HashMap<String, String>>,
    pub is_redirect: Option<bool>,
}

impl WebResourceRequest {
    pub fn new(
        url: &str,
        is_for_main_frame: bool,
        has_gesture: bool,
        method: &str,
        headers: Option<HashMap<String, String>>,
        is_redirect: Option<bool>,
    ) -> Result<Self, TranslationError> {
        let url = Url::parse(url)?;
        if method.trim().is_empty() {
            return Err(TranslationError::EmptyMethod);
        }
        Ok(Self {
            url,
            is_for_main_frame,
            has_gesture,
            method: method.to_string(),
            headers,
            is_redirect,
        })
    }
}

/// A resource response as surfaced by the native engine.
#[derive(Debug, Clone)]
pub struct WebResourceResponse {
    pub status_code: u16,
}

/// A resource-load failure from the current native error API.
#[derive(Debug, Clone)]
pub struct WebResourceError {
    pub error_code: i64,
    pub description: String,
}

/// A resource-load failure from the legacy compatibility shim. Distinct
/// native type, same payload shape as [`WebResourceError`] on the wire.
#[derive(Debug, Clone)]
pub struct WebResourceErrorCompat {
    pub error_code: i64,
    pub description: String,
}

/// Serializable record describing a resource-load failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebResourceErrorData {
    pub error_code: i64,
    pub description: String,
}

impl WebResourceErrorData {
    fn new(error_code: i64, description: &str) -> Self {
        Self {
            error_code,
            description: description.to_string(),
        }
    }
}

impl From<&WebResourceError> for WebResourceErrorData {
    fn from(error: &WebResourceError) -> Self {
        Self::new(error.error_code, &error.description)
    }
}

impl From<&WebResourceErrorCompat> for WebResourceErrorData {
    fn from(error: &WebResourceErrorCompat) -> Self {
        Self::new(error.error_code, &error.description)
    }
}

/// Serializable record describing a resource request.
///
/// `request_headers` is an empty map when the native side provided none;
/// `is_redirect` is omitted from serialization entirely when unknown, so
/// the remote side can tell "unknown" from "known false".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebResourceRequestData {
    pub url: String,
    pub is_for_main_frame: bool,
    pub has_gesture: bool,
    pub method: String,
    pub request_headers: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_redirect: Option<bool>,
}

impl From<&WebResourceRequest> for WebResourceRequestData {
    fn from(request: &WebResourceRequest) -> Self {
        Self {
            url: request.url.to_string(),
            is_for_main_frame: request.is_for_main_frame,
            has_gesture: request.has_gesture,
            method: request.method.clone(),
            request_headers: request.headers.clone().unwrap_or_default(),
            is_redirect: request.is_redirect,
        }
    }
}

/// Serializable record describing a resource response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebResourceResponseData {
    pub status_code: i64,
}

impl From<&WebResourceResponse> for WebResourceResponseData {
    fn from(response: &WebResourceResponse) -> Self {
        Self {
            status_code: i64::from(response.status_code),
        }
    }
}
