//! Schema-wide configuration.

use crate::core::issue::IssueContent;
use crate::core::message::Message;

/// Default vendor name reported by the standard-schema adapter.
pub const DEFAULT_VENDOR: &str = "validant";

/// Options shared by every step of a schema and its derived schemas.
///
/// Options are fixed when the root schema is created and are inherited by
/// every schema built from it.
#[derive(Debug, Clone)]
pub struct SchemaOptions {
    /// Vendor name exposed through the standard-schema descriptor.
    pub vendor: String,
    /// Schema-wide message, used when neither the builder call nor the step
    /// default produces one.
    pub global_message: Option<Message>,
    /// Whether panics inside steps are caught and reported as
    /// `core:unknown_exception` issues.
    pub capture_panics: bool,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            vendor: DEFAULT_VENDOR.to_string(),
            global_message: None,
            capture_panics: true,
        }
    }
}

impl SchemaOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the vendor name.
    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = vendor.into();
        self
    }

    /// Set the global message.
    pub fn with_global_message(mut self, message: impl Into<Message>) -> Self {
        self.global_message = Some(message.into());
        self
    }

    /// Set the global message from a function of the issue content.
    pub fn with_global_message_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&IssueContent) -> Option<String> + Send + Sync + 'static,
    {
        self.global_message = Some(Message::func(f));
        self
    }

    /// Enable or disable panic capture.
    pub fn with_capture_panics(mut self, capture: bool) -> Self {
        self.capture_panics = capture;
        self
    }
}
