//! Auth Capability Client
//!
//! Sessions for the Relay platform: credential sign-in and sign-up,
//! sign-out, persistence across page reloads, and session-change
//! listeners with explicit unsubscribe handles.

use gloo_net::http::Request;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::{get_api_base, get_api_key, response_error, ApiError};

/// Local storage key for the persisted session
pub const SESSION_STORAGE_KEY: &str = "relay_session";

/// Authenticated platform user
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct User {
    pub id: String,
    pub email: String,
}

/// Access token plus the user it belongs to. Lifecycle is owned by the
/// platform; this is the local mirror.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Session {
    pub access_token: String,
    pub user: User,
}

type Listener = Rc<dyn Fn(Option<&Session>)>;
type ListenerRegistry = Rc<RefCell<Vec<(u64, Listener)>>>;

/// Client for the platform's auth capability.
///
/// Holds the current session and a registry of session-change listeners.
/// Clones are cheap and share the same session and registry.
#[derive(Clone)]
pub struct AuthClient {
    session: Rc<RefCell<Option<Session>>>,
    listeners: ListenerRegistry,
    next_listener_id: Rc<Cell<u64>>,
}

/// Registration handle for a session-change listener.
///
/// The listener stays registered until [`unsubscribe`] is called;
/// dropping the handle alone does not remove it.
///
/// [`unsubscribe`]: SessionListenerHandle::unsubscribe
pub struct SessionListenerHandle {
    id: u64,
    listeners: Weak<RefCell<Vec<(u64, Listener)>>>,
}

impl SessionListenerHandle {
    /// Remove the listener from the registry.
    pub fn unsubscribe(self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

/// Credential payload for the token endpoints
#[derive(serde::Serialize)]
struct CredentialRequest<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
}

impl AuthClient {
    /// Create a client with no session
    pub fn new() -> Self {
        Self {
            session: Rc::new(RefCell::new(None)),
            listeners: Rc::new(RefCell::new(Vec::new())),
            next_listener_id: Rc::new(Cell::new(0)),
        }
    }

    /// Current session, if any
    pub fn current_session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    /// Register a session-change listener. The listener fires on sign-in,
    /// sign-out and session restore, with the new session (or `None`).
    pub fn on_session_change(
        &self,
        listener: impl Fn(Option<&Session>) + 'static,
    ) -> SessionListenerHandle {
        let id = self.next_listener_id.get();
        self.next_listener_id.set(id + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));

        SessionListenerHandle {
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    /// Pick up a session persisted by an earlier page load, notifying
    /// listeners when one is found.
    pub fn restore(&self) -> Option<Session> {
        let stored: Option<Session> = super::local_storage()
            .and_then(|storage| storage.get_item(SESSION_STORAGE_KEY).ok().flatten())
            .and_then(|json| serde_json::from_str(&json).ok());

        if let Some(session) = stored {
            self.set_session(Some(session));
        }
        self.current_session()
    }

    /// Sign in with email and password
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        self.token_request(
            "sign-in",
            &CredentialRequest {
                email,
                password,
                username: None,
            },
        )
        .await
    }

    /// Create an account. The platform also creates the profile row for
    /// the chosen username.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<Session, ApiError> {
        self.token_request(
            "sign-up",
            &CredentialRequest {
                email,
                password,
                username: Some(username),
            },
        )
        .await
    }

    /// Ask the platform to terminate the session, then drop it locally.
    ///
    /// The local session is cleared and listeners are notified even when
    /// the network call fails; the server-side token then just expires on
    /// its own.
    pub async fn sign_out(&self) {
        if let Some(session) = self.current_session() {
            let request = Request::post(&format!("{}/auth/sign-out", get_api_base()))
                .header("apikey", &get_api_key())
                .header("Authorization", &format!("Bearer {}", session.access_token));

            if let Err(e) = request.send().await {
                web_sys::console::error_1(&format!("Sign-out request failed: {}", e).into());
            }
        }
        self.set_session(None);
    }

    async fn token_request(
        &self,
        endpoint: &str,
        credentials: &CredentialRequest<'_>,
    ) -> Result<Session, ApiError> {
        let response = Request::post(&format!("{}/auth/{}", get_api_base(), endpoint))
            .header("apikey", &get_api_key())
            .json(credentials)
            .map_err(|e| ApiError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(response_error(response).await);
        }

        let session: Session = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        self.set_session(Some(session.clone()));
        Ok(session)
    }

    /// Install a session (or clear it), persist the change, and notify
    /// every registered listener.
    fn set_session(&self, session: Option<Session>) {
        if let Some(storage) = super::local_storage() {
            match &session {
                Some(s) => {
                    if let Ok(json) = serde_json::to_string(s) {
                        let _ = storage.set_item(SESSION_STORAGE_KEY, &json);
                    }
                }
                None => {
                    let _ = storage.remove_item(SESSION_STORAGE_KEY);
                }
            }
        }

        *self.session.borrow_mut() = session;
        self.notify();
    }

    fn notify(&self) {
        let session = self.session.borrow().clone();
        // Snapshot the registry so a listener may unsubscribe itself
        // mid-notification.
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in listeners {
            listener(session.as_ref());
        }
    }
}

impl Default for AuthClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_for(user_id: &str) -> Session {
        Session {
            access_token: "token".to_string(),
            user: User {
                id: user_id.to_string(),
                email: "user@example.com".to_string(),
            },
        }
    }

    #[test]
    fn listener_sees_sign_in_and_sign_out() {
        let auth = AuthClient::new();
        let seen: Rc<RefCell<Vec<Option<String>>>> = Rc::new(RefCell::new(Vec::new()));

        let seen_by_listener = Rc::clone(&seen);
        let _handle = auth.on_session_change(move |session| {
            seen_by_listener
                .borrow_mut()
                .push(session.map(|s| s.user.id.clone()));
        });

        auth.set_session(Some(session_for("u1")));
        auth.set_session(None);

        assert_eq!(*seen.borrow(), vec![Some("u1".to_string()), None]);
        assert_eq!(auth.current_session(), None);
    }

    #[test]
    fn unsubscribed_listener_stops_receiving() {
        let auth = AuthClient::new();
        let count = Rc::new(Cell::new(0));

        let count_for_listener = Rc::clone(&count);
        let handle = auth.on_session_change(move |_| {
            count_for_listener.set(count_for_listener.get() + 1);
        });

        auth.set_session(Some(session_for("u1")));
        handle.unsubscribe();
        auth.set_session(None);

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn unsubscribe_leaves_other_listeners_registered() {
        let auth = AuthClient::new();
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));

        let first_count = Rc::clone(&first);
        let first_handle = auth.on_session_change(move |_| {
            first_count.set(first_count.get() + 1);
        });
        let second_count = Rc::clone(&second);
        let _second_handle = auth.on_session_change(move |_| {
            second_count.set(second_count.get() + 1);
        });

        first_handle.unsubscribe();
        auth.set_session(Some(session_for("u1")));

        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn session_round_trips_through_serde() {
        let session = session_for("u1");
        let json = serde_json::to_string(&session).unwrap();
        let restored: Session = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, session);
    }

    #[test]
    fn restore_without_persisted_session_is_none() {
        // No browser storage in native test runs, so nothing to restore.
        let auth = AuthClient::new();
        assert_eq!(auth.restore(), None);
    }
}
