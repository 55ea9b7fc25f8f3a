//! Message Bubble Component
//!
//! One chat message with author, avatar, timestamp and body, aligned by
//! ownership.

use leptos::*;

use crate::state::chat::Message;

/// Shown when a live-delivered row arrives without its joined profile
const UNKNOWN_AUTHOR: &str = "unknown";

/// Row alignment: own messages sit on the right
fn row_class(is_own: bool) -> &'static str {
    if is_own {
        "flex justify-end"
    } else {
        "flex justify-start"
    }
}

/// Avatar-and-text ordering inside the row
fn inner_row_class(is_own: bool) -> &'static str {
    if is_own {
        "flex flex-row-reverse items-start max-w-[80%]"
    } else {
        "flex flex-row items-start max-w-[80%]"
    }
}

/// Bubble colors: own messages use the accent color
fn bubble_class(is_own: bool) -> &'static str {
    if is_own {
        "rounded-lg px-4 py-2 bg-primary-600 text-white"
    } else {
        "rounded-lg px-4 py-2 bg-gray-700 text-gray-100"
    }
}

/// Author name for display, tolerating rows with no joined profile
fn author_name(message: &Message) -> String {
    message
        .profile
        .as_ref()
        .map(|profile| profile.username.clone())
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
}

/// Clock-time label for a millisecond timestamp
fn time_label(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_default()
}

/// Single chat message bubble
#[component]
pub fn MessageBubble(message: Message, is_own: bool) -> impl IntoView {
    let username = author_name(&message);
    let time = time_label(message.created_at);
    let avatar_url = message
        .profile
        .as_ref()
        .and_then(|profile| profile.avatar_url.clone());

    view! {
        <div class=row_class(is_own)>
            <div class=inner_row_class(is_own)>
                // Avatar or placeholder
                <div class="flex-shrink-0">
                    {match avatar_url {
                        Some(url) => view! {
                            <img src=url alt=username.clone() class="w-8 h-8 rounded-full" />
                        }.into_view(),
                        None => view! {
                            <div class="w-8 h-8 bg-gray-600 rounded-full flex items-center justify-center text-sm">
                                "👤"
                            </div>
                        }.into_view(),
                    }}
                </div>

                <div class="mx-2">
                    <div class="flex items-center mb-1 space-x-2">
                        <span class="text-sm font-medium text-white">{username}</span>
                        <span class="text-xs text-gray-500">{time}</span>
                    </div>
                    <div class=bubble_class(is_own)>{message.content}</div>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::chat::Profile;

    fn message_with_profile(profile: Option<Profile>) -> Message {
        Message {
            id: "1".to_string(),
            content: "hi".to_string(),
            user_id: "u1".to_string(),
            created_at: 0,
            profile,
        }
    }

    #[test]
    fn own_messages_align_right() {
        assert_eq!(row_class(true), "flex justify-end");
        assert_eq!(row_class(false), "flex justify-start");
    }

    #[test]
    fn bubble_style_follows_ownership() {
        assert!(bubble_class(true).contains("bg-primary-600"));
        assert!(bubble_class(false).contains("bg-gray-700"));
        assert!(inner_row_class(true).contains("flex-row-reverse"));
        assert!(!inner_row_class(false).contains("flex-row-reverse"));
    }

    #[test]
    fn author_name_falls_back_without_profile() {
        assert_eq!(author_name(&message_with_profile(None)), UNKNOWN_AUTHOR);

        let profile = Profile {
            id: "u1".to_string(),
            username: "alice".to_string(),
            avatar_url: None,
        };
        assert_eq!(author_name(&message_with_profile(Some(profile))), "alice");
    }

    #[test]
    fn time_label_formats_clock_time() {
        assert_eq!(time_label(0), "00:00");
        assert_eq!(time_label(90_000), "00:01");
        // Out-of-range timestamps render as nothing rather than panic.
        assert_eq!(time_label(i64::MAX), "");
    }
}
