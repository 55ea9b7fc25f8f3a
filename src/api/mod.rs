//! Backend Platform Access
//!
//! Endpoint configuration and HTTP clients for the managed Relay
//! platform. The platform owns users, profiles, messages and realtime
//! fan-out; this module only knows how to reach it.

pub mod auth;
pub mod client;

use thiserror::Error;

/// Default platform base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8090/api/v1";

/// Default public (anonymous) API key, sent with every request
pub const DEFAULT_API_KEY: &str = "relay-dev-anon-key";

/// Errors from the platform's REST surface
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response
    #[error("network error: {0}")]
    Network(String),

    /// The response body did not match the expected shape
    #[error("invalid response: {0}")]
    Decode(String),

    /// The platform answered with a non-success status
    #[error("{message}")]
    Backend { status: u16, message: String },
}

/// Error body returned by the platform on non-success statuses
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    #[allow(dead_code)]
    code: Option<String>,
}

/// Turn a non-success response into an [`ApiError`], preferring the
/// platform's own error message when the body carries one.
pub(crate) async fn response_error(response: gloo_net::http::Response) -> ApiError {
    let status = response.status();
    let message = response
        .json::<ErrorBody>()
        .await
        .map(|body| body.error)
        .unwrap_or_else(|_| "unknown error".to_string());

    ApiError::Backend { status, message }
}

/// Browser local storage; absent in non-browser contexts.
#[cfg(target_arch = "wasm32")]
pub(crate) fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// Native test runs have no browser storage.
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn local_storage() -> Option<web_sys::Storage> {
    None
}

/// Get the API base URL from local storage or use the default
pub fn get_api_base() -> String {
    let url = local_storage()
        .and_then(|storage| storage.get_item("relay_api_url").ok().flatten())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

/// Get the public API key from local storage or use the default
pub fn get_api_key() -> String {
    local_storage()
        .and_then(|storage| storage.get_item("relay_api_key").ok().flatten())
        .unwrap_or_else(|| DEFAULT_API_KEY.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_base_falls_back_to_default() {
        assert_eq!(get_api_base(), DEFAULT_API_BASE);
    }

    #[test]
    fn backend_error_displays_its_message() {
        let err = ApiError::Backend {
            status: 401,
            message: "invalid credentials".to_string(),
        };
        assert_eq!(err.to_string(), "invalid credentials");
    }
}
