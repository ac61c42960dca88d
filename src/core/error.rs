//! Error types for Validant.
//!
//! Validation failures are never errors: they are issues inside an
//! [`ExecutionResult`](crate::core::result::ExecutionResult). The errors here
//! cover schema construction, i.e. misuse of the builder API, which is caught
//! when the schema is built rather than when it runs.

use thiserror::Error;

/// Issue code for an error raised or panic thrown by a step.
pub const UNKNOWN_EXCEPTION: &str = "core:unknown_exception";

/// Errors raised while building a schema.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Step '{name}' is not registered")]
    UnknownStep { name: String },

    #[error("Step '{step}' expects an argument at position {index}")]
    MissingArgument { step: String, index: usize },

    #[error("Step '{step}' argument {index}: expected {expected}, got {got}")]
    InvalidArgument {
        step: String,
        index: usize,
        expected: &'static str,
        got: &'static str,
    },

    #[error("Union needs at least one branch")]
    EmptyUnion,

    #[error("{0}")]
    Other(String),
}

impl SchemaError {
    /// Name of the step the error relates to, if any.
    pub fn step(&self) -> Option<&str> {
        match self {
            SchemaError::UnknownStep { name } => Some(name),
            SchemaError::MissingArgument { step, .. }
            | SchemaError::InvalidArgument { step, .. } => Some(step),
            SchemaError::EmptyUnion => Some("union"),
            SchemaError::Other(_) => None,
        }
    }

    /// Get suggestion for fixing this error.
    pub fn suggested_fix(&self) -> Option<String> {
        match self {
            SchemaError::UnknownStep { name } => Some(format!(
                "Register an implementation named '{}' or build the registry with builtins",
                name
            )),
            SchemaError::EmptyUnion => Some("Pass at least one schema to union".to_string()),
            _ => None,
        }
    }
}

/// Result type alias for schema construction.
pub type SchemaResult<T> = Result<T, SchemaError>;
