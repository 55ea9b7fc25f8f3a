//! Relay Chat
//!
//! Single-page realtime chat client built with Leptos (WASM).
//!
//! # Features
//!
//! - Email/password sign-in against the Relay platform's auth endpoint
//! - Message history with author profiles joined server-side
//! - Live message delivery over a WebSocket subscription
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles
//! to WebAssembly. All durable state, authentication and realtime fan-out
//! live in the managed backend platform; this crate talks to it via HTTP
//! and WebSocket and renders whatever comes back.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}
