//! UI Components
//!
//! Reusable Leptos components for the chat screens.

pub mod header;
pub mod message;
pub mod message_input;

pub use header::Header;
pub use message::MessageBubble;
pub use message_input::MessageComposer;
