//! Message Composer Component
//!
//! Single pending text buffer that emits a send intent on submit.

use leptos::*;

/// Trimmed submission content, or `None` when the buffer is blank.
fn submission(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Composer form with a text input and a send button.
///
/// Submitting a blank buffer is a no-op: nothing is emitted and the
/// buffer stays as typed. A non-blank buffer emits the trimmed content
/// exactly once and clears.
#[component]
pub fn MessageComposer(on_send: impl Fn(String) + 'static) -> impl IntoView {
    let (draft, set_draft) = create_signal(String::new());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        if let Some(content) = submission(&draft.get()) {
            on_send(content);
            set_draft.set(String::new());
        }
    };

    view! {
        <form on:submit=on_submit class="flex items-center gap-2 p-4 border-t border-gray-700">
            <input
                type="text"
                placeholder="Type a message..."
                prop:value=move || draft.get()
                on:input=move |ev| set_draft.set(event_target_value(&ev))
                class="flex-1 bg-gray-700 rounded-full px-4 py-2 text-white
                       border border-gray-600 focus:border-primary-500 focus:outline-none"
            />
            <button
                type="submit"
                class="px-4 py-2 bg-primary-600 hover:bg-primary-700 rounded-full
                       font-medium transition-colors"
            >
                "Send"
            </button>
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_buffers_produce_no_send_intent() {
        assert_eq!(submission(""), None);
        assert_eq!(submission("   "), None);
        assert_eq!(submission("\n\t "), None);
    }

    #[test]
    fn content_is_trimmed_before_emitting() {
        assert_eq!(submission(" hello "), Some("hello".to_string()));
    }

    #[test]
    fn interior_whitespace_is_preserved() {
        assert_eq!(submission("  a  b  "), Some("a  b".to_string()));
    }
}
