use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A conversation record as held by the remote store. The client keeps a
/// read-only cached copy, refreshed after any mutation of its message set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub last_message_at: Option<DateTime<Utc>>,
    pub message_count: u64,
    pub credits_used: f64,
}

impl Conversation {
    pub fn new(title: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            last_message_at: None,
            message_count: 0,
            credits_used: 0.0,
        }
    }
}
