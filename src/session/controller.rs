use std::sync::Arc;

use tracing::{debug, warn};

use crate::core::backend::ChatBackend;
use crate::core::conversation::Conversation;
use crate::core::credit::CreditStatus;
use crate::core::error::RpcError;
use crate::core::message::{Message, MessageId};
use crate::core::ui::{Frontend, Notice, Notifier};

use crate::session::connectivity::{ConnectionStatus, ConnectivityMonitor};
use crate::session::conversations::ConversationListManager;
use crate::session::credits::CreditGate;
use crate::session::stream::MessageStream;

/// The conversation session controller: composes the conversation list,
/// message stream, credit gate and connectivity monitor, and runs the
/// optimistic send/receive cycle against the backend port.
///
/// All methods take `&mut self`; callers drive it from a single event loop,
/// so operations are serialized and every suspension point observes
/// consistent state.
pub struct SessionController {
    backend: Arc<dyn ChatBackend>,
    notifier: Arc<dyn Notifier>,
    frontend: Arc<dyn Frontend>,
    owner_id: String,
    conversations: ConversationListManager,
    credits: CreditGate,
    connectivity: ConnectivityMonitor,
    stream: MessageStream,
    sending: bool,
}

impl SessionController {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        notifier: Arc<dyn Notifier>,
        frontend: Arc<dyn Frontend>,
        owner_id: impl Into<String>,
    ) -> Self {
        let owner_id = owner_id.into();
        Self {
            conversations: ConversationListManager::new(
                Arc::clone(&backend),
                Arc::clone(&notifier),
                owner_id.clone(),
            ),
            credits: CreditGate::new(Arc::clone(&backend)),
            connectivity: ConnectivityMonitor::new(Arc::clone(&backend), Arc::clone(&notifier)),
            stream: MessageStream::new(),
            sending: false,
            backend,
            notifier,
            frontend,
            owner_id,
        }
    }

    /// Initial load: connectivity probe, credit refresh and conversation
    /// list fetch run concurrently; a deep-linked conversation is selected
    /// afterwards.
    pub async fn activate(&mut self, deep_link: Option<&str>) {
        let Self {
            connectivity,
            credits,
            conversations,
            ..
        } = self;
        tokio::join!(connectivity.probe(), credits.refresh(), conversations.reload());

        if let Some(id) = deep_link {
            self.select_conversation(id).await;
        }
    }

    pub async fn select_conversation(&mut self, id: &str) {
        debug!(conversation_id = id, "selecting conversation");
        self.stream.set_loading(true);
        let epoch = self.stream.epoch();

        let loaded = async {
            let conversation = self.backend.read_conversation(id).await?;
            let messages = self.backend.list_messages(id).await?;
            Ok::<_, RpcError>((conversation, messages))
        }
        .await;

        match loaded {
            Ok((conversation, messages)) => {
                if self.stream.epoch() == epoch {
                    self.stream.set_active(conversation, messages);
                    self.frontend.scroll_to_latest();
                } else {
                    debug!(conversation_id = id, "dropping stale conversation load");
                }
            }
            Err(e) => {
                warn!(error = %e, conversation_id = id, "failed to load conversation");
                self.notifier
                    .notify(Notice::danger("Failed to load conversation"));
            }
        }
        self.stream.set_loading(false);
    }

    pub async fn create_conversation(&mut self) {
        if let Some(id) = self.conversations.create().await {
            self.select_conversation(&id).await;
        }
    }

    pub async fn archive_conversation(&mut self, id: &str) {
        if !self.conversations.archive(id).await {
            return;
        }
        if self.stream.current_id() == Some(id) {
            self.stream.clear_active();
        }
        self.notifier.notify(Notice::success("Conversation archived"));
    }

    /// Send the current draft through the optimistic cycle: placeholder in,
    /// round-trip, placeholder out (always), then reconcile whatever the
    /// server returned.
    pub async fn send_message(&mut self) {
        let text = self.stream.draft().trim().to_string();
        if text.is_empty() {
            return;
        }

        if !self.connectivity.is_connected() {
            self.notifier
                .notify(Notice::danger("AI service is currently unavailable"));
            return;
        }

        if !self.credits.is_send_allowed() {
            self.notifier.notify(
                Notice::warning("Insufficient credits. Please purchase more credits to continue.")
                    .titled("Insufficient Credits"),
            );
            self.credits.mark_warning();
            self.frontend.open_credit_purchase(&self.owner_id);
            return;
        }

        if self.stream.current().is_none() {
            self.create_conversation().await;
            if self.stream.current().is_none() {
                // Creation failed and was already reported; draft stays put.
                return;
            }
        }
        let conversation_id = match self.stream.current_id() {
            Some(id) => id.to_string(),
            None => return,
        };

        self.stream.clear_draft();
        let placeholder = Message::placeholder(conversation_id.clone(), text.clone());
        let local_id = self.stream.push_placeholder(placeholder);
        self.frontend.scroll_to_latest();
        let epoch = self.stream.epoch();

        self.sending = true;
        let result = self.backend.send_message_to_ai(&conversation_id, &text).await;
        self.sending = false;

        // The placeholder goes first, whatever the outcome.
        self.stream.remove_placeholder(&local_id);

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, conversation_id = %conversation_id, "send failed");
                self.notifier
                    .notify(Notice::danger("Failed to send message. Please try again."));
                return;
            }
        };

        if outcome.insufficient_credits {
            let reason = outcome
                .message
                .unwrap_or_else(|| "Insufficient credits".to_string());
            self.notifier
                .notify(Notice::warning(reason).titled("Insufficient Credits"));
            self.credits.mark_warning();
            self.frontend.open_credit_purchase(&self.owner_id);
            return;
        }

        if self.stream.epoch() == epoch {
            if let Some(user_message) = outcome.user_message {
                self.stream.push(user_message);
            }
            if let Some(ai_message) = outcome.ai_message {
                self.stream.push(ai_message);
            }
            self.frontend.scroll_to_latest();
        } else {
            debug!(conversation_id = %conversation_id, "dropping send result for a stale view");
        }

        if let Some(remaining) = outcome.remaining_credits {
            self.credits.apply_remaining(remaining);
        }
        if let (Some(used), Some(remaining)) = (outcome.credits_used, outcome.remaining_credits) {
            self.notifier.notify(
                Notice::info(format!("Used {used:.3} credits. {remaining:.2} remaining."))
                    .titled("Message Sent"),
            );
        }
        if outcome.error {
            self.notifier
                .notify(Notice::warning("AI response had an error"));
        }

        // Message counts changed server-side.
        self.conversations.reload().await;
    }

    /// Re-ask the question that produced the message at `id`: drop it (and
    /// everything after it), restore the preceding user message as the
    /// draft, and resend. A no-op unless the predecessor is user-authored.
    pub async fn regenerate(&mut self, id: &MessageId) {
        let Some(content) = self.stream.prepare_regenerate(id) else {
            return;
        };
        self.stream.set_draft(content);
        self.send_message().await;
    }

    /// Re-check AI service health. Send-dependent flows stay disabled until
    /// a probe succeeds again.
    pub async fn probe_connectivity(&mut self) {
        self.connectivity.probe().await;
    }

    pub async fn refresh_credits(&mut self) {
        self.credits.refresh().await;
        self.credits.dismiss_warning();
        self.notifier.notify(Notice::success("Credits refreshed"));
    }

    pub fn dismiss_credit_warning(&mut self) {
        self.credits.dismiss_warning();
    }

    // Read-only view accessors.

    pub fn conversations(&self) -> &[Conversation] {
        self.conversations.conversations()
    }

    pub fn current_conversation(&self) -> Option<&Conversation> {
        self.stream.current()
    }

    pub fn messages(&self) -> &[Message] {
        self.stream.messages()
    }

    pub fn draft(&self) -> &str {
        self.stream.draft()
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.stream.set_draft(draft);
    }

    pub fn is_loading(&self) -> bool {
        self.stream.is_loading()
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.connectivity.status()
    }

    pub fn credit_status(&self) -> Option<CreditStatus> {
        self.credits.status()
    }

    pub fn credit_gate(&self) -> &CreditGate {
        &self.credits
    }
}
