use std::sync::Arc;

use tracing::warn;

use crate::core::backend::{ApiStatus, ChatBackend};
use crate::core::ui::{Notice, Notifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Connected,
    Error,
}

/// Probes the AI service configuration and caches a binary health status.
/// Send paths consult the cached value synchronously; it only changes on the
/// next probe, never on a failed send.
pub struct ConnectivityMonitor {
    backend: Arc<dyn ChatBackend>,
    notifier: Arc<dyn Notifier>,
    status: ConnectionStatus,
}

impl ConnectivityMonitor {
    pub fn new(backend: Arc<dyn ChatBackend>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            backend,
            notifier,
            status: ConnectionStatus::Connected,
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }

    pub async fn probe(&mut self) {
        match self.backend.get_active_ai_config().await {
            Ok(config) if config.api_status == ApiStatus::Error => {
                self.status = ConnectionStatus::Error;
                self.notifier.notify(
                    Notice::warning(
                        "AI service is currently unavailable. Please contact your administrator.",
                    )
                    .sticky(),
                );
            }
            Ok(_) => {
                self.status = ConnectionStatus::Connected;
            }
            Err(e) => {
                warn!(error = %e, "AI service config probe failed");
                self.status = ConnectionStatus::Error;
                self.notifier.notify(
                    Notice::danger(
                        "AI service is not configured. Please contact your administrator.",
                    )
                    .sticky(),
                );
            }
        }
    }
}
