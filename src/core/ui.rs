/// Notice severity, mirroring the host UI's notification types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Danger,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
    pub sticky: bool,
    pub title: Option<String>,
}

impl Notice {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            sticky: false,
            title: None,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Success)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Info)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Warning)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Danger)
    }

    /// Persist until dismissed instead of auto-expiring.
    pub fn sticky(mut self) -> Self {
        self.sticky = true;
        self
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Fire-and-forget notification sink.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Fire-and-forget view collaborator: scroll hints and navigation into the
/// credit purchase flow.
pub trait Frontend: Send + Sync {
    fn scroll_to_latest(&self);

    fn open_credit_purchase(&self, owner_id: &str);
}
