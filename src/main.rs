use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use credence::backends::InMemoryBackend;
use credence::core::backend::{ApiStatus, ChatBackend};
use credence::core::ui::{Frontend, Notice, Notifier};
use credence::session::SessionController;

struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match &notice.title {
            Some(title) => println!("[{:?}] {title}: {}", notice.severity, notice.message),
            None => println!("[{:?}] {}", notice.severity, notice.message),
        }
    }
}

struct ConsoleFrontend;

impl Frontend for ConsoleFrontend {
    fn scroll_to_latest(&self) {}

    fn open_credit_purchase(&self, owner_id: &str) {
        println!("(would open the credit purchase view for {owner_id})");
    }
}

/// Scripted exchange against the in-memory backend, so the controller can be
/// watched end to end without a server.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let backend = Arc::new(InMemoryBackend::new(1.0));
    let mut controller = SessionController::new(
        Arc::clone(&backend) as Arc<dyn ChatBackend>,
        Arc::new(ConsoleNotifier),
        Arc::new(ConsoleFrontend),
        "demo-user",
    );

    controller.activate(None).await;

    for prompt in [
        "What can you help me with?",
        "Summarize my open invoices",
        "Thanks!",
    ] {
        controller.set_draft(prompt);
        controller.send_message().await;
    }

    if let Some(conversation) = controller.current_conversation() {
        println!("\n# {}", conversation.title);
    }
    for message in controller.messages() {
        let who = if message.is_user() { "you" } else { "assistant" };
        println!("{who}: {}", message.content);
    }

    if let Some(balance) = controller.credit_gate().balance() {
        print!("\nCredits remaining: {:.2}", balance.remaining_credits);
        match balance.estimated_messages_left() {
            Some(n) => println!(" (~{n} messages, estimated)"),
            None => println!(" (subscription active)"),
        }
    }

    // Degrade the service and show that sends are gated off.
    backend.set_api_status(ApiStatus::Error).await;
    controller.probe_connectivity().await;
    controller.set_draft("Anyone there?");
    controller.send_message().await;

    Ok(())
}
