//! Message resolution for issues.
//!
//! A message can come from three places, tried in order: the message passed
//! to the builder call, the step's own default, and the schema-wide global
//! message from [`SchemaOptions`](crate::schema::SchemaOptions).

use crate::core::issue::IssueContent;
use std::fmt;
use std::sync::Arc;

/// Message used when no source produces one.
pub const FALLBACK_MESSAGE: &str = "Invalid value.";

/// Function building a message from issue content. Returning `None` defers
/// to the next source.
pub type MessageFn = Arc<dyn Fn(&IssueContent) -> Option<String> + Send + Sync>;

/// A message source.
#[derive(Clone)]
pub enum Message {
    /// Literal message, used as-is.
    Text(String),
    /// Message computed from the issue content.
    Func(MessageFn),
}

impl Message {
    /// Create a message from a function of the issue content.
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&IssueContent) -> Option<String> + Send + Sync + 'static,
    {
        Message::Func(Arc::new(f))
    }

    /// Produce a message for `content`, or `None` to fall through.
    pub fn render(&self, content: &IssueContent) -> Option<String> {
        match self {
            Message::Text(text) => Some(text.clone()),
            Message::Func(f) => f(content),
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Message::Func(_) => f.debug_tuple("Func").field(&"<fn>").finish(),
        }
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Text(text.to_string())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::Text(text)
    }
}

/// Resolve the message for an issue.
///
/// Sources are tried as custom, then default, then global. Absent sources
/// are skipped and function sources returning `None` fall through. When
/// nothing produces a message, [`FALLBACK_MESSAGE`] is returned.
pub fn resolve_message(
    content: &IssueContent,
    custom: Option<&Message>,
    default: Option<&Message>,
    global: Option<&Message>,
) -> String {
    [custom, default, global]
        .into_iter()
        .flatten()
        .find_map(|source| source.render(content))
        .unwrap_or_else(|| FALLBACK_MESSAGE.to_string())
}
