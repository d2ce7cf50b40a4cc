//! Anonymous chat core
//!
//! The session-scoped, rate-limited message store:
//! - [`registry`]: anonymous identity minting and lookup
//! - [`quota`]: per-identity post admission
//! - [`feed`]: the shared append-only message log
//! - [`store`]: the coordinator the web layer talks to

pub mod feed;
pub mod quota;
pub mod registry;
pub mod store;
pub mod types;

pub use feed::MessageFeed;
pub use quota::QuotaGate;
pub use registry::IdentityRegistry;
pub use store::{PostReceipt, Posted, SessionStore, StoreStats, View, WELCOME_MESSAGE};
pub use types::{Admission, Identity, Message, Resolved, SessionRecord, MESSAGE_QUOTA};
