//! Header Component
//!
//! Top bar with the product name and the sign-out control.

use leptos::*;

use crate::api::auth::AuthClient;

/// Application header with sign-out
#[component]
pub fn Header() -> impl IntoView {
    let auth = use_context::<AuthClient>().expect("AuthClient not found");

    let on_sign_out = move |_| {
        let auth = auth.clone();
        spawn_local(async move {
            // The session listener clears UI state once the session is gone.
            auth.sign_out().await;
        });
    };

    view! {
        <header class="bg-gray-800 border-b border-gray-700">
            <div class="max-w-3xl mx-auto px-4 h-16 flex items-center justify-between">
                <div class="flex items-center space-x-3">
                    <span class="text-2xl">"💬"</span>
                    <span class="text-xl font-bold text-white">"Relay Chat"</span>
                </div>
                <button
                    on:click=on_sign_out
                    class="px-4 py-2 bg-primary-600 hover:bg-primary-700 rounded-lg
                           text-sm font-medium transition-colors"
                >
                    "Sign out"
                </button>
            </div>
        </header>
    }
}
