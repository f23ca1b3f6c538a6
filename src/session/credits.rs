use std::sync::Arc;

use tracing::{debug, warn};

use crate::core::backend::ChatBackend;
use crate::core::credit::{CreditBalance, CreditStatus, LOW_BALANCE_THRESHOLD};

/// Tracks the user's credit balance and decides whether sends are worth
/// attempting. The check is advisory: the server enforces the real limit,
/// this only avoids obviously-futile round-trips.
pub struct CreditGate {
    backend: Arc<dyn ChatBackend>,
    balance: Option<CreditBalance>,
    show_warning: bool,
}

impl CreditGate {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            balance: None,
            show_warning: false,
        }
    }

    pub fn balance(&self) -> Option<&CreditBalance> {
        self.balance.as_ref()
    }

    pub fn status(&self) -> Option<CreditStatus> {
        self.balance.as_ref().map(CreditBalance::status)
    }

    pub fn show_warning(&self) -> bool {
        self.show_warning
    }

    pub fn mark_warning(&mut self) {
        self.show_warning = true;
    }

    pub fn dismiss_warning(&mut self) {
        self.show_warning = false;
    }

    /// Fetch (or lazily create) the credit record. Failure is non-fatal and
    /// only logged; the gate then stays advisory-open.
    pub async fn refresh(&mut self) {
        match self.backend.get_or_create_user_credit().await {
            Ok(balance) => {
                self.show_warning = !balance.subscription_active
                    && balance.remaining_credits < LOW_BALANCE_THRESHOLD;
                debug!(
                    remaining = balance.remaining_credits,
                    subscription = balance.subscription_active,
                    "credit balance refreshed"
                );
                self.balance = Some(balance);
            }
            Err(e) => {
                warn!(error = %e, "failed to load user credits");
            }
        }
    }

    pub fn is_send_allowed(&self) -> bool {
        match &self.balance {
            Some(balance) => balance.subscription_active || balance.remaining_credits > 0.0,
            None => true,
        }
    }

    /// Apply a server-reported remaining balance in place, without a reload.
    pub fn apply_remaining(&mut self, remaining: f64) {
        if let Some(balance) = &mut self.balance {
            balance.remaining_credits = remaining;
        }
    }
}
