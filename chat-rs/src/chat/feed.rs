//! Message feed
//!
//! The shared, append-only log of accepted messages. Order is acceptance
//! order; entries are never edited or removed.

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::types::{Identity, Message};
use crate::error::PostRejection;

/// Append-only ordered message log
pub struct MessageFeed {
    messages: RwLock<Vec<Message>>,
}

impl MessageFeed {
    /// Create an empty feed
    pub fn new() -> Self {
        Self {
            messages: RwLock::new(Vec::new()),
        }
    }

    /// Append a message.
    ///
    /// Content that is empty after trimming is rejected with
    /// [`PostRejection::EmptyContent`]. Surrounding whitespace is stripped
    /// from stored content.
    pub async fn append(
        &self,
        content: &str,
        author: &Identity,
    ) -> Result<Message, PostRejection> {
        let content = content.trim();
        if content.is_empty() {
            return Err(PostRejection::EmptyContent);
        }

        let mut messages = self.messages.write().await;
        // Timestamp is taken under the lock so feed order is also time order
        let message = Message {
            id: Uuid::new_v4(),
            content: content.to_string(),
            timestamp: Utc::now(),
            author: author.clone(),
        };
        messages.push(message.clone());

        Ok(message)
    }

    /// Point-in-time copy of the whole feed, oldest first
    pub async fn snapshot(&self) -> Vec<Message> {
        let messages = self.messages.read().await;
        messages.clone()
    }

    /// Number of messages in the feed
    pub async fn len(&self) -> usize {
        let messages = self.messages.read().await;
        messages.len()
    }

    /// Check if the feed has no messages
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MessageFeed {
    fn default() -> Self {
        Self::new()
    }
}
