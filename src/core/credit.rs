use serde::{Deserialize, Serialize};

/// Below this remaining balance the low-credit warning flag is raised
/// (unless a subscription is active).
pub const LOW_BALANCE_THRESHOLD: f64 = 2.0;

/// Assumed average credit cost of one exchange, used only for the
/// estimated-messages-left display figure.
pub const AVG_CREDITS_PER_MESSAGE: f64 = 0.1;

/// Remaining balance below which the status classifies as `Low`.
const LOW_STATUS_BAND: f64 = 5.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditBalance {
    pub remaining_credits: f64,
    pub subscription_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditStatus {
    Subscribed,
    Healthy,
    Low,
    Depleted,
}

impl CreditBalance {
    pub fn status(&self) -> CreditStatus {
        if self.subscription_active {
            CreditStatus::Subscribed
        } else if self.remaining_credits <= 0.0 {
            CreditStatus::Depleted
        } else if self.remaining_credits < LOW_STATUS_BAND {
            CreditStatus::Low
        } else {
            CreditStatus::Healthy
        }
    }

    /// Rough number of exchanges the balance still covers. `None` means
    /// unlimited (active subscription). An estimate, not a guarantee.
    pub fn estimated_messages_left(&self) -> Option<u64> {
        if self.subscription_active {
            return None;
        }
        let remaining = self.remaining_credits.max(0.0);
        Some((remaining / AVG_CREDITS_PER_MESSAGE).floor() as u64)
    }
}
