//! Data Capability Client
//!
//! REST calls against the platform's row store: profiles and messages.
//! Every call is a one-shot request; nothing here retries.

use gloo_net::http::{Request, RequestBuilder};

use super::{get_api_base, get_api_key, response_error, ApiError};
use crate::api::auth::Session;
use crate::state::chat::{Message, Profile};

/// Attach the public key and the session's bearer token
fn authorized(request: RequestBuilder, session: &Session) -> RequestBuilder {
    request
        .header("apikey", &get_api_key())
        .header("Authorization", &format!("Bearer {}", session.access_token))
}

#[derive(Debug, serde::Deserialize)]
struct MessageListResponse {
    messages: Vec<Message>,
}

/// Fetch the display profile for one user id.
///
/// The platform keeps exactly one profile row per user; anything else
/// comes back as an error and the caller's profile stays unset.
pub async fn fetch_profile(session: &Session, user_id: &str) -> Result<Profile, ApiError> {
    let response = authorized(
        Request::get(&format!("{}/profiles/{}", get_api_base(), user_id)),
        session,
    )
    .send()
    .await
    .map_err(|e| ApiError::Network(e.to_string()))?;

    if !response.ok() {
        return Err(response_error(response).await);
    }

    response
        .json()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// Fetch the full message history, oldest first, with each row's author
/// profile joined in by the platform.
pub async fn fetch_messages(session: &Session) -> Result<Vec<Message>, ApiError> {
    let response = authorized(
        Request::get(&format!(
            "{}/messages?order=created_at.asc",
            get_api_base()
        )),
        session,
    )
    .send()
    .await
    .map_err(|e| ApiError::Network(e.to_string()))?;

    if !response.ok() {
        return Err(response_error(response).await);
    }

    let result: MessageListResponse = response
        .json()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))?;

    Ok(result.messages)
}

/// Insert a new message row authored by the current user.
///
/// The created row is not returned; it reaches the UI through the live
/// subscription echo.
pub async fn send_message(session: &Session, content: &str) -> Result<(), ApiError> {
    #[derive(serde::Serialize)]
    struct NewMessage<'a> {
        content: &'a str,
        user_id: &'a str,
    }

    let response = authorized(
        Request::post(&format!("{}/messages", get_api_base())),
        session,
    )
    .json(&NewMessage {
        content,
        user_id: &session.user.id,
    })
    .map_err(|e| ApiError::Network(e.to_string()))?
    .send()
    .await
    .map_err(|e| ApiError::Network(e.to_string()))?;

    if !response.ok() {
        return Err(response_error(response).await);
    }

    Ok(())
}
