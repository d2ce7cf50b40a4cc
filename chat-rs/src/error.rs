//! Error types for chat-rs

use thiserror::Error;

/// Result type alias for chat-rs infrastructure operations
pub type Result<T> = std::result::Result<T, ChatError>;

/// Infrastructure errors (configuration, I/O)
#[derive(Error, Debug)]
pub enum ChatError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a post was not added to the feed.
///
/// All outcomes are expected and recoverable; the web layer maps each to
/// its own response.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostRejection {
    /// The identity has used up its anonymous allowance
    #[error("Anonymous message quota exceeded")]
    QuotaExceeded,

    /// Content was empty or whitespace-only
    #[error("Message cannot be empty")]
    EmptyContent,

    /// The identity was not minted by this store
    #[error("Unknown session")]
    UnknownIdentity,
}
