//! Core data model shared by every schema.
//!
//! This module contains the foundational types:
//! - The dynamically typed [`Value`]
//! - Issues, paths and results
//! - Message resolution
//! - Error types

pub mod types;
pub mod issue;
pub mod result;
pub mod message;
pub mod error;

// Re-export commonly used types
pub use types::{Object, Value};
pub use issue::{prepend_issue_path, Issue, IssueContent, PathSegment};
pub use result::{is_failure, is_success, ExecutionResult};
pub use message::{resolve_message, Message, MessageFn, FALLBACK_MESSAGE};
pub use error::{SchemaError, SchemaResult, UNKNOWN_EXCEPTION};
