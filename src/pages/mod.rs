//! Pages
//!
//! Top-level screens on either side of the session gate.

pub mod chat;
pub mod sign_in;

pub use chat::ChatPage;
pub use sign_in::SignInPage;
