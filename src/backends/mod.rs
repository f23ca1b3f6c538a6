use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::core::backend::{AiServiceConfig, ApiStatus, ChatBackend, SendOutcome};
use crate::core::conversation::Conversation;
use crate::core::credit::CreditBalance;
use crate::core::error::RpcError;
use crate::core::message::Message;

/// Minimum cost a send must be able to cover.
const MIN_SEND_COST: f64 = 0.1;

const DEFAULT_TITLE: &str = "New Conversation";

struct Store {
    conversations: Vec<Conversation>,
    messages: HashMap<String, Vec<Message>>,
    credit: CreditBalance,
    api_status: ApiStatus,
}

/// In-process `ChatBackend` with canned assistant replies. Backs the demo
/// binary and gives tests a complete round-trip without a server.
pub struct InMemoryBackend {
    state: Mutex<Store>,
}

impl InMemoryBackend {
    pub fn new(starting_credits: f64) -> Self {
        Self {
            state: Mutex::new(Store {
                conversations: Vec::new(),
                messages: HashMap::new(),
                credit: CreditBalance {
                    remaining_credits: starting_credits,
                    subscription_active: false,
                },
                api_status: ApiStatus::Ok,
            }),
        }
    }

    pub async fn set_subscription_active(&self, active: bool) {
        self.state.lock().await.credit.subscription_active = active;
    }

    pub async fn set_api_status(&self, status: ApiStatus) {
        self.state.lock().await.api_status = status;
    }
}

/// Title a fresh conversation from its first message: first six words,
/// capped at 50 characters.
fn title_from(text: &str) -> String {
    let title: String = text.split_whitespace().take(6).collect::<Vec<_>>().join(" ");
    if title.len() > 50 {
        let mut cut = 47;
        while !title.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...", &title[..cut])
    } else {
        title
    }
}

#[async_trait]
impl ChatBackend for InMemoryBackend {
    async fn list_conversations(&self, _owner_id: &str) -> Result<Vec<Conversation>, RpcError> {
        let store = self.state.lock().await;
        let mut conversations = store.conversations.clone();
        conversations.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));
        Ok(conversations)
    }

    async fn read_conversation(&self, id: &str) -> Result<Conversation, RpcError> {
        let store = self.state.lock().await;
        store
            .conversations
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| RpcError::NotFound(format!("conversation {id}")))
    }

    async fn create_conversation(&self) -> Result<Conversation, RpcError> {
        let mut store = self.state.lock().await;
        let conversation = Conversation::new(DEFAULT_TITLE.to_string());
        store.conversations.push(conversation.clone());
        store.messages.insert(conversation.id.clone(), Vec::new());
        Ok(conversation)
    }

    async fn archive_conversation(&self, id: &str) -> Result<(), RpcError> {
        let mut store = self.state.lock().await;
        let before = store.conversations.len();
        store.conversations.retain(|c| c.id != id);
        if store.conversations.len() == before {
            return Err(RpcError::NotFound(format!("conversation {id}")));
        }
        store.messages.remove(id);
        Ok(())
    }

    async fn list_messages(&self, conversation_id: &str) -> Result<Vec<Message>, RpcError> {
        let store = self.state.lock().await;
        let mut messages = store
            .messages
            .get(conversation_id)
            .cloned()
            .ok_or_else(|| RpcError::NotFound(format!("conversation {conversation_id}")))?;
        messages.sort_by_key(|m| m.created_at);
        Ok(messages)
    }

    async fn send_message_to_ai(
        &self,
        conversation_id: &str,
        text: &str,
    ) -> Result<SendOutcome, RpcError> {
        let mut store = self.state.lock().await;

        if !store.credit.subscription_active && store.credit.remaining_credits < MIN_SEND_COST {
            return Ok(SendOutcome {
                insufficient_credits: true,
                message: Some(format!(
                    "Insufficient credits. You have {:.2} credits remaining. \
                     Please purchase more credits to continue.",
                    store.credit.remaining_credits
                )),
                ..Default::default()
            });
        }

        if !store.conversations.iter().any(|c| c.id == conversation_id) {
            return Err(RpcError::NotFound(format!("conversation {conversation_id}")));
        }

        let user_message = Message::new_user(conversation_id.to_string(), text.to_string());

        let reply = format!("You said: \"{text}\". This demo backend simply echoes.");
        let estimated_tokens = reply.split_whitespace().count() as f64 * 1.3;
        let credit_cost = (estimated_tokens / 1000.0 * 0.1).max(0.01);

        let mut ai_message = Message::new_assistant(conversation_id.to_string(), reply);
        ai_message.tokens_used = estimated_tokens as u64;
        ai_message.credit_cost = credit_cost;

        if !store.credit.subscription_active {
            store.credit.remaining_credits -= credit_cost;
        }
        let remaining = store.credit.remaining_credits;

        if let Some(conversation) = store
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
        {
            conversation.message_count += 2;
            conversation.credits_used += credit_cost;
            conversation.last_message_at = Some(Utc::now());
            if conversation.message_count <= 2 && conversation.title == DEFAULT_TITLE {
                conversation.title = title_from(text);
            }
        }

        let log = store
            .messages
            .entry(conversation_id.to_string())
            .or_default();
        log.push(user_message.clone());
        log.push(ai_message.clone());

        Ok(SendOutcome {
            user_message: Some(user_message),
            ai_message: Some(ai_message),
            remaining_credits: Some(remaining),
            credits_used: Some(credit_cost),
            ..Default::default()
        })
    }

    async fn get_or_create_user_credit(&self) -> Result<CreditBalance, RpcError> {
        Ok(self.state.lock().await.credit.clone())
    }

    async fn get_active_ai_config(&self) -> Result<AiServiceConfig, RpcError> {
        let store = self.state.lock().await;
        Ok(AiServiceConfig {
            api_status: store.api_status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_deducts_credits_and_titles_conversation() {
        let backend = InMemoryBackend::new(10.0);
        let conversation = backend.create_conversation().await.unwrap();

        let outcome = backend
            .send_message_to_ai(&conversation.id, "How do I reset my password please")
            .await
            .unwrap();

        assert!(outcome.user_message.is_some());
        assert!(outcome.ai_message.is_some());
        let used = outcome.credits_used.unwrap();
        assert!(used >= 0.01);
        assert!((outcome.remaining_credits.unwrap() - (10.0 - used)).abs() < 1e-9);

        let refreshed = backend.read_conversation(&conversation.id).await.unwrap();
        assert_eq!(refreshed.title, "How do I reset my password");
        assert_eq!(refreshed.message_count, 2);
    }

    #[tokio::test]
    async fn send_rejects_when_balance_below_minimum() {
        let backend = InMemoryBackend::new(0.05);
        let conversation = backend.create_conversation().await.unwrap();

        let outcome = backend
            .send_message_to_ai(&conversation.id, "hello")
            .await
            .unwrap();

        assert!(outcome.insufficient_credits);
        assert!(outcome.user_message.is_none());
        assert!(outcome.ai_message.is_none());
    }

    #[tokio::test]
    async fn subscription_bypasses_deduction() {
        let backend = InMemoryBackend::new(0.0);
        backend.set_subscription_active(true).await;
        let conversation = backend.create_conversation().await.unwrap();

        let outcome = backend
            .send_message_to_ai(&conversation.id, "hello")
            .await
            .unwrap();

        assert!(!outcome.insufficient_credits);
        assert_eq!(outcome.remaining_credits, Some(0.0));
    }

    #[tokio::test]
    async fn archive_removes_from_listing() {
        let backend = InMemoryBackend::new(10.0);
        let conversation = backend.create_conversation().await.unwrap();
        backend.archive_conversation(&conversation.id).await.unwrap();

        let listed = backend.list_conversations("user-1").await.unwrap();
        assert!(listed.is_empty());
        assert!(backend.read_conversation(&conversation.id).await.is_err());
    }
}
