//! Chat Page
//!
//! The signed-in screen: message history, live updates, composer.

use leptos::*;

use crate::api;
use crate::components::{Header, MessageBubble, MessageComposer};
use crate::state::chat::ChatState;
use crate::state::realtime::RealtimeClient;

/// Message list and composer, mounted only while a session is present
#[component]
pub fn ChatPage() -> impl IntoView {
    let state = use_context::<ChatState>().expect("ChatState not found");

    // Fetch history on mount. Failure falls back to an empty list.
    let state_for_fetch = state.clone();
    create_effect(move |_| {
        let state = state_for_fetch.clone();
        if let Some(session) = state.session.get_untracked() {
            spawn_local(async move {
                match api::client::fetch_messages(&session).await {
                    Ok(messages) => state.set_messages(messages),
                    Err(e) => {
                        web_sys::console::error_1(
                            &format!("Failed to fetch messages: {}", e).into(),
                        );
                    }
                }
            });
        }
    });

    // Live subscription for the lifetime of this screen. Closing on
    // cleanup covers both unmount and sign-out.
    let realtime = RealtimeClient::connect(state.clone());
    on_cleanup(move || realtime.close());

    let state_for_send = state.clone();
    let on_send = move |content: String| {
        if let Some(session) = state_for_send.session.get_untracked() {
            spawn_local(async move {
                // No optimistic append: the message shows up when the
                // subscription echoes it back.
                if let Err(e) = api::client::send_message(&session, &content).await {
                    web_sys::console::error_1(
                        &format!("Failed to send message: {}", e).into(),
                    );
                }
            });
        }
    };

    let state_for_list = state.clone();
    view! {
        <div class="min-h-screen bg-gray-900 text-white flex flex-col">
            <Header />

            <main class="flex-1 overflow-y-auto px-4 py-6">
                <div class="max-w-3xl mx-auto space-y-4">
                    {move || {
                        let state = state_for_list.clone();
                        state
                            .messages
                            .get()
                            .into_iter()
                            .map(|message| {
                                let is_own = state.is_own_message(&message);
                                view! { <MessageBubble message=message is_own=is_own /> }
                            })
                            .collect_view()
                    }}
                </div>
            </main>

            <div class="max-w-3xl mx-auto w-full">
                <MessageComposer on_send=on_send />
            </div>

            <ConnectionStatus />
        </div>
    }
}

/// Footer strip showing the realtime connection state
#[component]
fn ConnectionStatus() -> impl IntoView {
    let state = use_context::<ChatState>().expect("ChatState not found");

    view! {
        <footer class="bg-gray-800 border-t border-gray-700 py-2 px-4 text-sm">
            <div class="max-w-3xl mx-auto">
                {move || {
                    if state.ws_connected.get() {
                        view! {
                            <span class="flex items-center space-x-2 text-green-400">
                                <span class="w-2 h-2 bg-green-400 rounded-full" />
                                <span>"Live"</span>
                            </span>
                        }.into_view()
                    } else {
                        view! {
                            <span class="flex items-center space-x-2 text-gray-500">
                                <span class="w-2 h-2 bg-gray-500 rounded-full" />
                                <span>"Offline"</span>
                            </span>
                        }.into_view()
                    }
                }}
            </div>
        </footer>
    }
}
