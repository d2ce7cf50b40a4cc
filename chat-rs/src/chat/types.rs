use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Number of posts an anonymous identity may make before it must register
pub const MESSAGE_QUOTA: u32 = 5;

/// Reserved author of the seeded welcome message
pub const SYSTEM_IDENTITY: &str = "system";

/// Opaque token naming one anonymous client across requests.
///
/// Only the registry mints identities; callers can read the token but not
/// forge one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Identity(String);

impl Identity {
    pub(crate) fn mint() -> Self {
        Identity(Uuid::new_v4().to_string())
    }

    pub(crate) fn system() -> Self {
        Identity(SYSTEM_IDENTITY.to_string())
    }

    pub(crate) fn from_known(token: &str) -> Self {
        Identity(token.to_string())
    }

    /// Token value, as persisted in the client's cookie
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the reserved system author
    pub fn is_system(&self) -> bool {
        self.0 == SYSTEM_IDENTITY
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Quota bookkeeping for one identity
#[derive(Debug, Clone, Serialize)]
pub struct SessionRecord {
    pub identity: Identity,
    /// Admitted posts so far; never decreases
    pub messages_posted: u32,
    pub last_active: DateTime<Utc>,
}

impl SessionRecord {
    /// Fresh record with no posts
    pub fn new(identity: Identity) -> Self {
        SessionRecord {
            identity,
            messages_posted: 0,
            last_active: Utc::now(),
        }
    }

    /// Posts left before the quota is reached
    pub fn remaining(&self) -> u32 {
        MESSAGE_QUOTA.saturating_sub(self.messages_posted)
    }

    /// Check if the quota is used up
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }
}

/// A message accepted into the feed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub id: Uuid,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub author: Identity,
}

/// Result of resolving a client token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub identity: Identity,
    /// True when the identity was minted by this call and the client must
    /// be handed the new token
    pub is_new: bool,
}

/// Quota decision for one post attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    pub admitted: bool,
    pub remaining_after: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minted_identities_are_unique() {
        let a = Identity::mint();
        let b = Identity::mint();
        assert_ne!(a, b);
        assert!(!a.is_system());
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn test_system_identity() {
        let system = Identity::system();
        assert!(system.is_system());
        assert_eq!(system.to_string(), "system");
    }

    #[test]
    fn test_session_record_remaining() {
        let mut record = SessionRecord::new(Identity::mint());
        assert_eq!(record.remaining(), MESSAGE_QUOTA);
        assert!(!record.is_exhausted());

        record.messages_posted = 3;
        assert_eq!(record.remaining(), 2);

        record.messages_posted = MESSAGE_QUOTA;
        assert_eq!(record.remaining(), 0);
        assert!(record.is_exhausted());

        record.messages_posted = MESSAGE_QUOTA + 2;
        assert_eq!(record.remaining(), 0); // Saturating
    }
}
