use tracing::debug;

use crate::core::conversation::Conversation;
use crate::core::message::{Message, MessageId};

/// Ephemeral per-activation view state: the active conversation, its ordered
/// message list (holding at most one placeholder), the input draft, and an
/// epoch counter bumped whenever the active conversation changes. Async
/// operations capture the epoch before suspending and must re-check it
/// before applying their result, so a late response for a since-changed view
/// is dropped instead of applied.
#[derive(Default)]
pub struct MessageStream {
    current: Option<Conversation>,
    messages: Vec<Message>,
    loading: bool,
    draft: String,
    epoch: u64,
}

impl MessageStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Conversation> {
        self.current.as_ref()
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.id.as_str())
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    pub fn clear_draft(&mut self) {
        self.draft.clear();
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Replace the active conversation and its message list.
    pub fn set_active(&mut self, conversation: Conversation, messages: Vec<Message>) {
        self.epoch += 1;
        debug!(conversation_id = %conversation.id, epoch = self.epoch, "conversation activated");
        self.current = Some(conversation);
        self.messages = messages;
    }

    pub fn clear_active(&mut self) {
        self.epoch += 1;
        self.current = None;
        self.messages.clear();
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Append an optimistic placeholder, enforcing the single-slot
    /// invariant: any placeholder still present is dropped first.
    pub fn push_placeholder(&mut self, message: Message) -> MessageId {
        self.messages.retain(|m| !m.is_placeholder());
        let id = message.id.clone();
        self.messages.push(message);
        id
    }

    /// Remove a placeholder by exact local id. No-op when it is already
    /// gone (e.g. the view was replaced while the send was in flight).
    pub fn remove_placeholder(&mut self, id: &MessageId) {
        self.messages.retain(|m| &m.id != id);
    }

    pub fn has_placeholder(&self) -> bool {
        self.messages.iter().any(|m| m.is_placeholder())
    }

    /// Set up a regenerate cycle for the message at `id`: if and only if its
    /// immediate predecessor is user-authored, truncate the list from `id`
    /// onward and return the predecessor's content for resending. Anything
    /// else is a no-op.
    pub fn prepare_regenerate(&mut self, id: &MessageId) -> Option<String> {
        let index = self.messages.iter().position(|m| &m.id == id)?;
        if index == 0 {
            return None;
        }
        let previous = &self.messages[index - 1];
        if !previous.is_user() {
            return None;
        }
        let content = previous.content.clone();
        self.messages.truncate(index);
        Some(content)
    }
}
