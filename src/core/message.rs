use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Wire prefix marking a client-generated provisional identifier.
pub const PLACEHOLDER_PREFIX: &str = "temp-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Message identifier. `Remote` ids are assigned by the store; `Local` ids
/// are synthesized client-side for optimistic placeholders and never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageId {
    Remote(String),
    Local(String),
}

impl MessageId {
    pub fn local() -> Self {
        Self::Local(format!("{PLACEHOLDER_PREFIX}{}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Remote(id) | Self::Local(id) => id,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MessageId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MessageId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.starts_with(PLACEHOLDER_PREFIX) {
            Ok(Self::Local(raw))
        } else {
            Ok(Self::Remote(raw))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: String,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub tokens_used: u64,
    #[serde(default)]
    pub response_time: f64,
    #[serde(default)]
    pub credit_cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Message {
    pub fn new_user(conversation_id: String, content: String) -> Self {
        Self {
            id: MessageId::Remote(uuid::Uuid::new_v4().to_string()),
            conversation_id,
            role: MessageRole::User,
            content,
            created_at: Utc::now(),
            tokens_used: 0,
            response_time: 0.0,
            credit_cost: 0.0,
            error: None,
        }
    }

    pub fn new_assistant(conversation_id: String, content: String) -> Self {
        Self {
            id: MessageId::Remote(uuid::Uuid::new_v4().to_string()),
            conversation_id,
            role: MessageRole::Assistant,
            content,
            created_at: Utc::now(),
            tokens_used: 0,
            response_time: 0.0,
            credit_cost: 0.0,
            error: None,
        }
    }

    /// Optimistic stand-in for a user message that has not yet round-tripped.
    pub fn placeholder(conversation_id: String, content: String) -> Self {
        Self {
            id: MessageId::local(),
            conversation_id,
            role: MessageRole::User,
            content,
            created_at: Utc::now(),
            tokens_used: 0,
            response_time: 0.0,
            credit_cost: 0.0,
            error: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id.is_local()
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }
}
