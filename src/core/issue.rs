//! Issue records describing a single validation failure.

use crate::core::types::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// One segment of an issue path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Array index
    Index(usize),
    /// Object key
    Key(String),
    /// Opaque unique token, for keys that are not plain strings.
    ///
    /// Serialized as `{"token": "<uuid>"}` so it never reads back as a key.
    #[serde(with = "token_repr")]
    Token(Uuid),
}

mod token_repr {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use uuid::Uuid;

    #[derive(Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Tagged {
        token: Uuid,
    }

    pub fn serialize<S: Serializer>(token: &Uuid, serializer: S) -> Result<S::Ok, S::Error> {
        Tagged { token: *token }.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Uuid, D::Error> {
        Tagged::deserialize(deserializer).map(|tagged| tagged.token)
    }
}

impl PathSegment {
    /// Create a fresh unique token segment.
    pub fn token() -> Self {
        PathSegment::Token(Uuid::new_v4())
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(i) => write!(f, "[{}]", i),
            PathSegment::Key(k) => write!(f, ".{}", k),
            PathSegment::Token(t) => write!(f, "[@{}]", &t.to_string()[..8]),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

impl From<&PathSegment> for Value {
    fn from(segment: &PathSegment) -> Self {
        match segment {
            PathSegment::Index(i) => Value::from(*i),
            PathSegment::Key(k) => Value::from(k.as_str()),
            PathSegment::Token(t) => Value::from(t.to_string()),
        }
    }
}

/// The code and payload of an issue, before a message is attached.
///
/// Message functions receive this to build a human-readable string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueContent {
    /// Stable machine-readable code, e.g. `string:type`.
    pub code: String,
    /// Structured data describing the failure.
    pub payload: Value,
}

impl IssueContent {
    /// Create issue content.
    pub fn new(code: impl Into<String>, payload: Value) -> Self {
        Self {
            code: code.into(),
            payload,
        }
    }
}

/// A structured description of one validation failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Stable machine-readable code.
    pub code: String,
    /// Structured data with enough detail to rebuild the message.
    pub payload: Value,
    /// Resolved human-readable message.
    pub message: String,
    /// Location of the failure inside the input. Empty means the root.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<PathSegment>,
    /// Raw error behind an unknown exception, if any.
    #[serde(skip)]
    pub cause: Option<Arc<anyhow::Error>>,
}

impl Issue {
    /// Create an issue at the root path.
    pub fn new(content: IssueContent, message: impl Into<String>) -> Self {
        Self {
            code: content.code,
            payload: content.payload,
            message: message.into(),
            path: Vec::new(),
            cause: None,
        }
    }

    /// Attach the raw error that caused this issue.
    pub fn with_cause(mut self, cause: anyhow::Error) -> Self {
        self.cause = Some(Arc::new(cause));
        self
    }

    /// Set the full path of this issue.
    pub fn with_path(mut self, path: impl IntoIterator<Item = PathSegment>) -> Self {
        self.path = path.into_iter().collect();
        self
    }

    /// Code and payload of this issue.
    pub fn content(&self) -> IssueContent {
        IssueContent::new(self.code.clone(), self.payload.clone())
    }

    /// Whether the issue is located at the root of the input.
    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Render the path as a dotted string, e.g. `.users[2].name`.
    pub fn path_string(&self) -> String {
        self.path.iter().map(|s| s.to_string()).collect()
    }
}

impl PartialEq for Issue {
    fn eq(&self, other: &Self) -> bool {
        // The cause is an opaque error object and does not take part.
        self.code == other.code
            && self.payload == other.payload
            && self.message == other.message
            && self.path == other.path
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{} ({})", self.message, self.code)
        } else {
            write!(f, "{}: {} ({})", self.path_string(), self.message, self.code)
        }
    }
}

/// Prepend `prefix` to the path of `issue`.
///
/// The issue is taken by value, so an issue shared elsewhere is never
/// mutated in place. An empty prefix returns the issue unchanged.
pub fn prepend_issue_path(mut issue: Issue, prefix: &[PathSegment]) -> Issue {
    if prefix.is_empty() {
        return issue;
    }
    if issue.path.is_empty() {
        issue.path = prefix.to_vec();
    } else {
        let mut path = Vec::with_capacity(prefix.len() + issue.path.len());
        path.extend_from_slice(prefix);
        path.append(&mut issue.path);
        issue.path = path;
    }
    issue
}
