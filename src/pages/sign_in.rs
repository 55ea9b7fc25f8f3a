//! Sign-In Page
//!
//! Credential form shown whenever no session is present. Auth failures
//! are the one error class surfaced to the user, inline on the form.

use leptos::*;

use crate::api::auth::AuthClient;

#[derive(Clone, Copy, PartialEq)]
enum AuthMode {
    SignIn,
    SignUp,
}

/// Credential entry form with sign-in and sign-up modes
#[component]
pub fn SignInPage() -> impl IntoView {
    let auth = use_context::<AuthClient>().expect("AuthClient not found");

    let (mode, set_mode) = create_signal(AuthMode::SignIn);
    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (username, set_username) = create_signal(String::new());
    let (error, set_error) = create_signal(Option::<String>::None);
    let (submitting, set_submitting) = create_signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let auth = auth.clone();
        let mode = mode.get();
        let email_value = email.get();
        let password_value = password.get();
        let username_value = username.get();

        set_error.set(None);
        set_submitting.set(true);

        spawn_local(async move {
            let result = match mode {
                AuthMode::SignIn => auth.sign_in(&email_value, &password_value).await,
                AuthMode::SignUp => {
                    auth.sign_up(&email_value, &password_value, &username_value)
                        .await
                }
            };

            // On success the session listener swaps this page out; only
            // the failure needs handling here.
            if let Err(e) = result {
                set_error.set(Some(e.to_string()));
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-gray-900 text-white flex items-center justify-center px-4">
            <div class="w-full max-w-md bg-gray-800 rounded-xl p-8 space-y-6">
                <div class="text-center">
                    <div class="text-4xl mb-2">"💬"</div>
                    <h1 class="text-2xl font-bold">"Relay Chat"</h1>
                    <p class="text-gray-400 mt-1">"Sign in to join the conversation"</p>
                </div>

                // Mode toggle
                <div class="flex space-x-2">
                    <ModeButton
                        label="Sign in"
                        current=mode
                        target=AuthMode::SignIn
                        on_click=move |_| set_mode.set(AuthMode::SignIn)
                    />
                    <ModeButton
                        label="Sign up"
                        current=mode
                        target=AuthMode::SignUp
                        on_click=move |_| set_mode.set(AuthMode::SignUp)
                    />
                </div>

                <form on:submit=on_submit class="space-y-4">
                    // Username (sign-up only; the platform creates the profile)
                    {move || {
                        if mode.get() == AuthMode::SignUp {
                            view! {
                                <div>
                                    <label class="block text-sm text-gray-400 mb-2">"Username"</label>
                                    <input
                                        type="text"
                                        placeholder="alice"
                                        prop:value=move || username.get()
                                        on:input=move |ev| set_username.set(event_target_value(&ev))
                                        class="w-full bg-gray-700 rounded-lg px-4 py-3 text-white
                                               border border-gray-600 focus:border-primary-500 focus:outline-none"
                                    />
                                </div>
                            }.into_view()
                        } else {
                            view! {}.into_view()
                        }
                    }}

                    <div>
                        <label class="block text-sm text-gray-400 mb-2">"Email"</label>
                        <input
                            type="email"
                            placeholder="you@example.com"
                            prop:value=move || email.get()
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                            class="w-full bg-gray-700 rounded-lg px-4 py-3 text-white
                                   border border-gray-600 focus:border-primary-500 focus:outline-none"
                        />
                    </div>

                    <div>
                        <label class="block text-sm text-gray-400 mb-2">"Password"</label>
                        <input
                            type="password"
                            placeholder="••••••••"
                            prop:value=move || password.get()
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                            class="w-full bg-gray-700 rounded-lg px-4 py-3 text-white
                                   border border-gray-600 focus:border-primary-500 focus:outline-none"
                        />
                    </div>

                    // Auth failures surface here, inline on the form
                    {move || {
                        error.get().map(|message| view! {
                            <div class="bg-red-900 border border-red-700 text-red-200 rounded-lg px-4 py-2 text-sm">
                                {message}
                            </div>
                        })
                    }}

                    <button
                        type="submit"
                        disabled=move || submitting.get()
                        class="w-full bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600
                               disabled:cursor-not-allowed rounded-lg py-3 font-semibold
                               transition-colors"
                    >
                        {move || {
                            if submitting.get() {
                                "Working..."
                            } else if mode.get() == AuthMode::SignUp {
                                "Create account"
                            } else {
                                "Sign in"
                            }
                        }}
                    </button>
                </form>
            </div>
        </div>
    }
}

#[component]
fn ModeButton(
    label: &'static str,
    current: ReadSignal<AuthMode>,
    target: AuthMode,
    on_click: impl Fn(web_sys::MouseEvent) + 'static,
) -> impl IntoView {
    view! {
        <button
            type="button"
            on:click=on_click
            class=move || {
                let base = "flex-1 px-4 py-2 rounded-lg text-sm font-medium transition-colors";
                if current.get() == target {
                    format!("{} bg-gray-600 text-white", base)
                } else {
                    format!("{} bg-gray-700 text-gray-400 hover:text-white", base)
                }
            }
        >
            {label}
        </button>
    }
}
