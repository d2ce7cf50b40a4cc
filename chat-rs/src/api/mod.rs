//! HTTP front end for chat-rs
//!
//! Renders the feed and quota counter, and maps post outcomes to htmx
//! responses. Holds no state of its own.

pub mod server;
pub mod session;
pub mod web;

pub use server::ChatServer;
