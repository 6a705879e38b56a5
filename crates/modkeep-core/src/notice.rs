use crate::error::PlatformError;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A modal, blocking message with a single dismissal action.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Notice {
    pub title: String,
    pub body: String,
    pub severity: Severity,
    /// Replacement label for the dismissal button, if the surface supports it.
    pub confirm_label: Option<String>,
}

impl Notice {
    pub fn new(title: impl Into<String>, body: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            severity,
            confirm_label: None,
        }
    }

    #[must_use]
    pub fn with_confirm_label(mut self, label: impl Into<String>) -> Self {
        self.confirm_label = Some(label.into());
        self
    }
}

/// User-facing notice surface. Blocks until the user dismisses the notice.
pub trait Notifier {
    fn notify(&self, notice: &Notice) -> Result<(), PlatformError>;
}

/// Shows `notice` and logs instead of propagating a failure to show it.
pub fn notify_best_effort(notifier: &dyn Notifier, notice: &Notice) {
    if let Err(e) = notifier.notify(notice) {
        tracing::warn!(error = %e, title = %notice.title, "failed to show notice");
    }
}
