//! chat-rs: Anonymous ephemeral group chat
//!
//! Visitors get an opaque identity cookie on first contact, read a shared
//! feed, and may post a fixed number of messages before being asked to
//! create an account.
//!
//! # Features
//!
//! - In-memory session store with atomic per-identity quota admission
//! - Append-only feed with prefix-consistent snapshots
//! - htmx front end rendered with askama templates
//!
//! # Example Configuration
//!
//! ```toml
//! [server]
//! listen_addr = "0.0.0.0:8080"
//!
//! [session]
//! cookie_name = "user_id"
//! cookie_max_age_days = 30
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//! ```
//!
//! # Modules
//!
//! - [`chat`]: identity registry, quota gate, message feed, session store
//! - [`api`]: HTTP routes, templates, and session cookies
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod chat;
pub mod config;
pub mod error;

pub use api::ChatServer;
pub use chat::SessionStore;
pub use config::ChatConfig;
pub use error::{ChatError, PostRejection, Result};
