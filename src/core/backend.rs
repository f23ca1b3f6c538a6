use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::conversation::Conversation;
use crate::core::credit::CreditBalance;
use crate::core::error::RpcError;
use crate::core::message::Message;

/// Result envelope of a send round-trip. Domain rejections (insufficient
/// credits, AI-side error) travel here as data, not as `Err` — only call
/// failures surface as `RpcError`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_message: Option<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_message: Option<Message>,
    #[serde(default)]
    pub insufficient_credits: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_credits: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits_used: Option<f64>,
    #[serde(default)]
    pub error: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Ok,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiServiceConfig {
    pub api_status: ApiStatus,
}

/// The remote store / AI service boundary. Persistence, transport and the
/// model invocation all live behind this seam.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn list_conversations(&self, owner_id: &str) -> Result<Vec<Conversation>, RpcError>;

    async fn read_conversation(&self, id: &str) -> Result<Conversation, RpcError>;

    async fn create_conversation(&self) -> Result<Conversation, RpcError>;

    async fn archive_conversation(&self, id: &str) -> Result<(), RpcError>;

    /// Messages ordered by creation time ascending.
    async fn list_messages(&self, conversation_id: &str) -> Result<Vec<Message>, RpcError>;

    async fn send_message_to_ai(
        &self,
        conversation_id: &str,
        text: &str,
    ) -> Result<SendOutcome, RpcError>;

    async fn get_or_create_user_credit(&self) -> Result<CreditBalance, RpcError>;

    async fn get_active_ai_config(&self) -> Result<AiServiceConfig, RpcError>;
}
