//! State Management
//!
//! Reactive application state and the realtime subscription client.

pub mod chat;
pub mod realtime;

pub use chat::{provide_chat_state, ChatState, Message, Profile};
pub use realtime::RealtimeClient;
