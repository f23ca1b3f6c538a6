use std::sync::Arc;

use tracing::{debug, warn};

use crate::core::backend::ChatBackend;
use crate::core::conversation::Conversation;
use crate::core::ui::{Notice, Notifier};

/// Cached list of the user's conversations. Reloads are full replacements;
/// a failed reload keeps the prior cache intact.
pub struct ConversationListManager {
    backend: Arc<dyn ChatBackend>,
    notifier: Arc<dyn Notifier>,
    owner_id: String,
    conversations: Vec<Conversation>,
}

impl ConversationListManager {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        notifier: Arc<dyn Notifier>,
        owner_id: String,
    ) -> Self {
        Self {
            backend,
            notifier,
            owner_id,
            conversations: Vec::new(),
        }
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub async fn reload(&mut self) -> bool {
        match self.backend.list_conversations(&self.owner_id).await {
            Ok(conversations) => {
                debug!(count = conversations.len(), "conversation list reloaded");
                self.conversations = conversations;
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to load conversations");
                self.notifier
                    .notify(Notice::danger("Failed to load conversations"));
                false
            }
        }
    }

    /// Create a fresh conversation and reload the list. Returns the new id
    /// for selection.
    pub async fn create(&mut self) -> Option<String> {
        match self.backend.create_conversation().await {
            Ok(conversation) => {
                let id = conversation.id.clone();
                self.reload().await;
                Some(id)
            }
            Err(e) => {
                warn!(error = %e, "failed to create conversation");
                self.notifier
                    .notify(Notice::danger("Failed to create conversation"));
                None
            }
        }
    }

    pub async fn archive(&mut self, id: &str) -> bool {
        match self.backend.archive_conversation(id).await {
            Ok(()) => {
                self.reload().await;
                true
            }
            Err(e) => {
                warn!(error = %e, conversation_id = id, "failed to archive conversation");
                self.notifier
                    .notify(Notice::danger("Failed to archive conversation"));
                false
            }
        }
    }
}
