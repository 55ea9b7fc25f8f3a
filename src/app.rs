//! App Root Component
//!
//! Root controller and session gate: owns the auth client and the chat
//! state, reacts to session changes, and switches between the credential
//! form and the chat screen.

use leptos::*;

use crate::api;
use crate::api::auth::AuthClient;
use crate::pages::{ChatPage, SignInPage};
use crate::state::chat::{provide_chat_state, ChatState};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    // Provide chat state and the auth client to all components
    provide_chat_state();
    let state = use_context::<ChatState>().expect("ChatState not found");

    let auth = AuthClient::new();
    provide_context(auth.clone());

    // The single session-change listener for the app's lifetime: it feeds
    // the session signal, loads the profile on sign-in, and clears
    // user-scoped state on sign-out.
    let state_for_listener = state.clone();
    let listener = auth.on_session_change(move |session| {
        state_for_listener.session.set(session.cloned());

        match session {
            Some(session) => {
                let state = state_for_listener.clone();
                let session = session.clone();
                spawn_local(async move {
                    match api::client::fetch_profile(&session, &session.user.id).await {
                        Ok(profile) => state.profile.set(Some(profile)),
                        Err(e) => {
                            // Profile stays unset; the chat still renders.
                            web_sys::console::error_1(
                                &format!("Failed to fetch profile: {}", e).into(),
                            );
                        }
                    }
                });
            }
            None => state_for_listener.clear_user_data(),
        }
    });
    on_cleanup(move || listener.unsubscribe());

    // Pick up a session persisted by an earlier page load.
    auth.restore();

    // Session gate: credential form without a session, chat with one.
    let state_for_gate = state.clone();
    view! {
        {move || {
            if state_for_gate.session.get().is_some() {
                view! { <ChatPage /> }.into_view()
            } else {
                view! { <SignInPage /> }.into_view()
            }
        }}
    }
}
