//! Chat Application State
//!
//! Reactive state owned by the root controller and shared with every
//! component via context. Children only read; all mutation goes through
//! the methods here.

use leptos::*;

use crate::api::auth::Session;

/// Display profile associated 1:1 with a user id
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Profile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Immutable chat record.
///
/// `profile` is filled by the history fetch (the platform joins it in)
/// and absent on realtime-delivered rows.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub user_id: String,
    /// Creation time in milliseconds since the epoch
    pub created_at: i64,
    #[serde(default)]
    pub profile: Option<Profile>,
}

/// Global application state provided to all components
#[derive(Clone)]
pub struct ChatState {
    /// Current authenticated session, if any
    pub session: RwSignal<Option<Session>>,
    /// Display profile for the signed-in user
    pub profile: RwSignal<Option<Profile>>,
    /// Message history plus live-delivered rows, oldest first
    pub messages: RwSignal<Vec<Message>>,
    /// Realtime connection status
    pub ws_connected: RwSignal<bool>,
}

/// Provide chat state to the component tree
pub fn provide_chat_state() {
    provide_context(ChatState::new());
}

impl ChatState {
    pub fn new() -> Self {
        Self {
            session: create_rw_signal(None),
            profile: create_rw_signal(None),
            messages: create_rw_signal(Vec::new()),
            ws_connected: create_rw_signal(false),
        }
    }

    /// Replace the history with a freshly fetched batch, in the order the
    /// backend returned it. The client never re-sorts.
    pub fn set_messages(&self, messages: Vec<Message>) {
        self.messages.set(messages);
    }

    /// Append one live-delivered message at the tail, regardless of its
    /// timestamp. No dedup: arrival order is trusted as-is.
    pub fn append_message(&self, message: Message) {
        self.messages.update(|messages| messages.push(message));
    }

    /// Whether a message was authored by the signed-in user
    pub fn is_own_message(&self, message: &Message) -> bool {
        self.session
            .get()
            .map(|session| session.user.id == message.user_id)
            .unwrap_or(false)
    }

    /// Drop everything tied to the signed-out user. The session signal
    /// itself is driven by the session gate.
    pub fn clear_user_data(&self) {
        self.profile.set(None);
        self.messages.set(Vec::new());
    }
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::User;

    fn with_runtime(f: impl FnOnce()) {
        let runtime = create_runtime();
        f();
        runtime.dispose();
    }

    fn message(id: &str, user_id: &str, created_at: i64) -> Message {
        Message {
            id: id.to_string(),
            content: format!("message {}", id),
            user_id: user_id.to_string(),
            created_at,
            profile: None,
        }
    }

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
    fn fetched_order_is_preserved() {
        with_runtime(|| {
            let state = ChatState::new();

            // Ascending input stays ascending, including equal timestamps.
            state.set_messages(vec![
                message("1", "u1", 100),
                message("2", "u2", 100),
                message("3", "u1", 250),
            ]);
            let ids: Vec<String> = state.messages.get().into_iter().map(|m| m.id).collect();
            assert_eq!(ids, vec!["1", "2", "3"]);

            // The backend's order is trusted even when it is not sorted.
            state.set_messages(vec![
                message("a", "u1", 300),
                message("b", "u1", 100),
                message("c", "u1", 200),
            ]);
            let ids: Vec<String> = state.messages.get().into_iter().map(|m| m.id).collect();
            assert_eq!(ids, vec!["a", "b", "c"]);
        });
    }

    #[test]
    fn live_insert_appends_at_tail() {
        with_runtime(|| {
            let state = ChatState::new();
            state.set_messages(vec![message("1", "u1", 500)]);

            // An older timestamp still lands at the tail.
            state.append_message(message("2", "u2", 100));

            let messages = state.messages.get();
            assert_eq!(messages.len(), 2);
            assert_eq!(messages[1].id, "2");
        });
    }

    #[test]
    fn each_delivery_grows_the_list_by_one() {
        with_runtime(|| {
            let state = ChatState::new();
            state.set_messages(vec![message("1", "u1", 100), message("2", "u1", 200)]);

            for i in 0..3 {
                let before = state.messages.get().len();
                state.append_message(message(&format!("live-{}", i), "u2", 50));
                assert_eq!(state.messages.get().len(), before + 1);
            }
        });
    }

    #[test]
    fn duplicate_delivery_is_kept() {
        with_runtime(|| {
            let state = ChatState::new();

            state.append_message(message("1", "u1", 100));
            state.append_message(message("1", "u1", 100));

            assert_eq!(state.messages.get().len(), 2);
        });
    }

    #[test]
    fn own_message_classification_is_total() {
        with_runtime(|| {
            let state = ChatState::new();

            // No session: nothing is "own".
            assert!(!state.is_own_message(&message("1", "u1", 100)));

            state.session.set(Some(session_for("u1")));
            assert!(state.is_own_message(&message("1", "u1", 100)));
            assert!(!state.is_own_message(&message("2", "u2", 100)));

            // Degenerate ids still classify deterministically.
            state.session.set(Some(session_for("")));
            assert!(state.is_own_message(&message("3", "", 100)));
            assert!(!state.is_own_message(&message("4", "u1", 100)));
        });
    }

    #[test]
    fn clear_user_data_resets_profile_and_messages() {
        with_runtime(|| {
            let state = ChatState::new();
            state.profile.set(Some(Profile {
                id: "u1".to_string(),
                username: "alice".to_string(),
                avatar_url: None,
            }));
            state.set_messages(vec![message("1", "u1", 100)]);

            state.clear_user_data();

            assert_eq!(state.profile.get(), None);
            assert!(state.messages.get().is_empty());
        });
    }
}
