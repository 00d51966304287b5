use std::fmt;
use std::time::Duration;

use uuid::Uuid;

/// Auto-dismiss delay when none is given.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(5000);

/// Callback run exactly once when a toast leaves the store.
pub type OnClose = Box<dyn FnOnce(ToastId) + Send + 'static>;

/// Generated toast identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastId(Uuid);

impl ToastId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Severity styling of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastVariant {
    #[default]
    Default,
    Destructive,
    Success,
    Warning,
    Info,
}

/// Lifecycle of a toast.
///
/// A [`Toast`] value that has not been shown is `Pending`; the store only ever
/// reports `Visible` or `Dismissed` for ids it handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Pending,
    Visible,
    Dismissed,
}

/// A toast not yet shown.
pub struct Toast {
    pub title: String,
    pub description: Option<String>,
    pub variant: ToastVariant,
    pub duration: Duration,
    pub(crate) on_close: Option<OnClose>,
}

impl Toast {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            variant: ToastVariant::Default,
            duration: DEFAULT_TOAST_DURATION,
            on_close: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn variant(mut self, variant: ToastVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Run `callback` when the toast is dismissed, by timer, by hand, or by eviction.
    pub fn on_close(mut self, callback: impl FnOnce(ToastId) + Send + 'static) -> Self {
        self.on_close = Some(Box::new(callback));
        self
    }

    pub fn phase(&self) -> ToastPhase {
        ToastPhase::Pending
    }
}

impl fmt::Debug for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toast")
            .field("title", &self.title)
            .field("description", &self.description)
            .field("variant", &self.variant)
            .field("duration", &self.duration)
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}

/// Read-only view of a visible toast, as handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastView {
    pub id: ToastId,
    pub title: String,
    pub description: Option<String>,
    pub variant: ToastVariant,
    pub duration: Duration,
}
