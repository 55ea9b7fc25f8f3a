//! Realtime Subscription Client
//!
//! Live connection to the platform's push channel, delivering newly
//! inserted message rows into the chat state. There is deliberately no
//! reconnect: a dropped connection stops updates until the chat screen
//! mounts again.

use leptos::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, MessageEvent, WebSocket};

use super::chat::{ChatState, Message};

/// Table the chat subscribes to
pub const MESSAGES_TABLE: &str = "messages";

/// Row event the chat subscribes to
pub const INSERT_EVENT: &str = "insert";

/// Messages sent to the platform's realtime endpoint
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ask for row events on one table
    Subscribe { table: String, event: String },
    /// Stop row events on one table
    Unsubscribe { table: String, event: String },
}

/// Messages pushed by the platform
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Channel established
    Connected { connection_id: String },
    /// Subscription confirmed
    Subscribed { table: String, event: String },
    /// A row matching an active subscription was inserted
    Insert {
        table: String,
        record: serde_json::Value,
    },
    /// Server-side failure on this channel
    Error { message: String },
}

/// Liveness guard shared between a subscription and its delivery
/// callbacks. Cancelled before the socket closes, so a delivery already
/// queued behind the teardown cannot mutate state.
#[derive(Clone)]
pub struct SubscriptionGuard {
    live: Rc<Cell<bool>>,
}

impl SubscriptionGuard {
    pub fn new() -> Self {
        Self {
            live: Rc::new(Cell::new(true)),
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.get()
    }

    pub fn cancel(&self) {
        self.live.set(false);
    }
}

impl Default for SubscriptionGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive the realtime endpoint from the HTTP base URL
pub fn realtime_url(api_base: &str, api_key: &str) -> String {
    let ws_base = api_base
        .replace("http://", "ws://")
        .replace("https://", "wss://");
    format!("{}/realtime?apikey={}", ws_base, api_key)
}

/// Realtime client scoped to the message table.
///
/// Lives for exactly one mount of the chat screen; `close` must run on
/// unmount or sign-out.
pub struct RealtimeClient {
    ws: Rc<RefCell<Option<WebSocket>>>,
    guard: SubscriptionGuard,
    state: ChatState,
}

impl RealtimeClient {
    /// Open the push channel and subscribe to message inserts
    pub fn connect(state: ChatState) -> Self {
        let client = Self {
            ws: Rc::new(RefCell::new(None)),
            guard: SubscriptionGuard::new(),
            state: state.clone(),
        };

        let url = realtime_url(&crate::api::get_api_base(), &crate::api::get_api_key());
        match WebSocket::new(&url) {
            Ok(ws) => {
                client.setup_handlers(&ws, state);
                *client.ws.borrow_mut() = Some(ws);
            }
            Err(e) => {
                web_sys::console::error_1(
                    &format!("Realtime connection failed: {:?}", e).into(),
                );
            }
        }

        client
    }

    /// Cancel the subscription, then close the socket. Ordering matters:
    /// the guard flips first so no queued delivery lands after this call.
    pub fn close(&self) {
        self.guard.cancel();
        self.state.ws_connected.set(false);

        if let Some(ws) = self.ws.borrow().as_ref() {
            // Best-effort unsubscribe; the close right after is what the
            // teardown actually relies on.
            let unsubscribe = ClientMessage::Unsubscribe {
                table: MESSAGES_TABLE.to_string(),
                event: INSERT_EVENT.to_string(),
            };
            if let Ok(json) = serde_json::to_string(&unsubscribe) {
                let _ = ws.send_with_str(&json);
            }
            let _ = ws.close();
        }
    }

    /// Set up WebSocket event handlers
    fn setup_handlers(&self, ws: &WebSocket, state: ChatState) {
        let guard = self.guard.clone();

        // On open: mark connected and subscribe to message inserts
        let state_open = state.clone();
        let ws_open = ws.clone();
        let on_open = Closure::wrap(Box::new(move |_: JsValue| {
            state_open.ws_connected.set(true);

            let subscribe = ClientMessage::Subscribe {
                table: MESSAGES_TABLE.to_string(),
                event: INSERT_EVENT.to_string(),
            };
            if let Ok(json) = serde_json::to_string(&subscribe) {
                if let Err(e) = ws_open.send_with_str(&json) {
                    web_sys::console::error_1(&format!("Subscribe failed: {:?}", e).into());
                }
            }
        }) as Box<dyn FnMut(JsValue)>);
        ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));
        on_open.forget();

        // On message
        let state_message = state.clone();
        let on_message = Closure::wrap(Box::new(move |event: MessageEvent| {
            if let Ok(text) = event.data().dyn_into::<js_sys::JsString>() {
                let text: String = text.into();
                handle_server_message(&text, &state_message, &guard);
            }
        }) as Box<dyn FnMut(MessageEvent)>);
        ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        on_message.forget();

        // On close: no reconnect; updates stop until the screen remounts
        let state_close = state.clone();
        let on_close = Closure::wrap(Box::new(move |event: CloseEvent| {
            web_sys::console::log_1(
                &format!("Realtime channel closed: code={}", event.code()).into(),
            );
            state_close.ws_connected.set(false);
        }) as Box<dyn FnMut(CloseEvent)>);
        ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));
        on_close.forget();

        // On error
        let on_error = Closure::wrap(Box::new(move |e: JsValue| {
            web_sys::console::error_1(&format!("Realtime error: {:?}", e).into());
        }) as Box<dyn FnMut(JsValue)>);
        ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        on_error.forget();
    }
}

/// Handle one frame from the push channel.
///
/// The guard check comes first: a frame queued behind a teardown must not
/// touch state.
fn handle_server_message(text: &str, state: &ChatState, guard: &SubscriptionGuard) {
    if !guard.is_live() {
        return;
    }

    match serde_json::from_str::<ServerMessage>(text) {
        Ok(ServerMessage::Insert { table, record }) if table == MESSAGES_TABLE => {
            match serde_json::from_value::<Message>(record) {
                Ok(message) => state.append_message(message),
                Err(e) => {
                    web_sys::console::error_1(&format!("Bad insert payload: {}", e).into());
                }
            }
        }
        Ok(ServerMessage::Error { message }) => {
            web_sys::console::error_1(&format!("Realtime error frame: {}", message).into());
        }
        Ok(_) => {
            // Connected / Subscribed / inserts for other tables carry no
            // state changes for this client.
        }
        Err(e) => {
            web_sys::console::error_1(&format!("Unparseable realtime frame: {}", e).into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_runtime(f: impl FnOnce()) {
        let runtime = create_runtime();
        f();
        runtime.dispose();
    }

    fn insert_frame(id: &str, user_id: &str, created_at: i64) -> String {
        format!(
            r#"{{"type":"insert","table":"messages","record":{{"id":"{}","content":"yo","user_id":"{}","created_at":{}}}}}"#,
            id, user_id, created_at
        )
    }

    fn loaded_state() -> ChatState {
        let state = ChatState::new();
        state.set_messages(vec![Message {
            id: "1".to_string(),
            content: "hi".to_string(),
            user_id: "u1".to_string(),
            created_at: 100,
            profile: None,
        }]);
        state
    }

    #[test]
    fn insert_frame_appends_at_tail() {
        with_runtime(|| {
            let state = loaded_state();
            let guard = SubscriptionGuard::new();

            handle_server_message(&insert_frame("2", "u1", 200), &state, &guard);

            let messages = state.messages.get();
            assert_eq!(messages.len(), 2);
            assert_eq!(messages[1].id, "2");
            assert_eq!(messages[1].profile, None);
        });
    }

    #[test]
    fn cancelled_guard_drops_queued_deliveries() {
        with_runtime(|| {
            let state = loaded_state();
            let guard = SubscriptionGuard::new();

            guard.cancel();
            handle_server_message(&insert_frame("2", "u1", 200), &state, &guard);

            assert_eq!(state.messages.get().len(), 1);
        });
    }

    #[test]
    fn insert_for_another_table_is_ignored() {
        with_runtime(|| {
            let state = loaded_state();
            let guard = SubscriptionGuard::new();

            let frame = r#"{"type":"insert","table":"profiles","record":{"id":"u9"}}"#;
            handle_server_message(frame, &state, &guard);

            assert_eq!(state.messages.get().len(), 1);
        });
    }

    #[test]
    fn status_frames_leave_state_untouched() {
        with_runtime(|| {
            let state = loaded_state();
            let guard = SubscriptionGuard::new();

            handle_server_message(
                r#"{"type":"connected","connection_id":"c1"}"#,
                &state,
                &guard,
            );
            handle_server_message(
                r#"{"type":"subscribed","table":"messages","event":"insert"}"#,
                &state,
                &guard,
            );

            assert_eq!(state.messages.get().len(), 1);
        });
    }

    #[test]
    fn subscribe_wire_shape() {
        let subscribe = ClientMessage::Subscribe {
            table: MESSAGES_TABLE.to_string(),
            event: INSERT_EVENT.to_string(),
        };
        assert_eq!(
            serde_json::to_string(&subscribe).unwrap(),
            r#"{"type":"subscribe","table":"messages","event":"insert"}"#
        );
    }

    #[test]
    fn realtime_url_swaps_scheme() {
        assert_eq!(
            realtime_url("http://localhost:8090/api/v1", "key"),
            "ws://localhost:8090/api/v1/realtime?apikey=key"
        );
        assert_eq!(
            realtime_url("https://relay.example.com/api/v1", "key"),
            "wss://relay.example.com/api/v1/realtime?apikey=key"
        );
    }
}
