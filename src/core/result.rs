//! The success/failure result every step consumes and produces.

use crate::core::issue::Issue;
use crate::core::types::Value;
use serde::{Deserialize, Serialize};

/// Outcome of running a schema (or a single step) over a value.
///
/// A `Failure` with an empty issue list is still a failure. Serializes as
/// `{"value": ...}` or `{"issues": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExecutionResult {
    /// The value passed validation (possibly transformed).
    Success {
        /// Validated output value.
        value: Value,
    },
    /// The value failed validation.
    Failure {
        /// Every collected issue.
        issues: Vec<Issue>,
    },
}

impl ExecutionResult {
    /// Create a success result.
    pub fn success(value: impl Into<Value>) -> Self {
        ExecutionResult::Success {
            value: value.into(),
        }
    }

    /// Create a failure result from a list of issues.
    pub fn failure(issues: Vec<Issue>) -> Self {
        ExecutionResult::Failure { issues }
    }

    /// Create a failure result with a single issue.
    pub fn failure_one(issue: Issue) -> Self {
        ExecutionResult::Failure {
            issues: vec![issue],
        }
    }

    /// Whether this is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionResult::Success { .. })
    }

    /// Whether this is a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, ExecutionResult::Failure { .. })
    }

    /// The output value, if successful.
    pub fn value(&self) -> Option<&Value> {
        match self {
            ExecutionResult::Success { value } => Some(value),
            ExecutionResult::Failure { .. } => None,
        }
    }

    /// The issues, if failed.
    pub fn issues(&self) -> Option<&[Issue]> {
        match self {
            ExecutionResult::Success { .. } => None,
            ExecutionResult::Failure { issues } => Some(issues),
        }
    }

    /// Consume into the output value, if successful.
    pub fn into_value(self) -> Option<Value> {
        match self {
            ExecutionResult::Success { value } => Some(value),
            ExecutionResult::Failure { .. } => None,
        }
    }

    /// Consume into the issues, if failed.
    pub fn into_issues(self) -> Option<Vec<Issue>> {
        match self {
            ExecutionResult::Success { .. } => None,
            ExecutionResult::Failure { issues } => Some(issues),
        }
    }

    /// Convert into a standard `Result`.
    pub fn into_result(self) -> Result<Value, Vec<Issue>> {
        match self {
            ExecutionResult::Success { value } => Ok(value),
            ExecutionResult::Failure { issues } => Err(issues),
        }
    }

    /// Snapshot of this result as a plain value, for issue payloads.
    pub fn to_value(&self) -> Value {
        match self {
            ExecutionResult::Success { value } => {
                Value::object([("success", Value::Boolean(true)), ("value", value.clone())])
            }
            ExecutionResult::Failure { issues } => Value::object([
                ("success", Value::Boolean(false)),
                (
                    "issues",
                    Value::array(issues.iter().map(|issue| {
                        Value::object([
                            ("code", Value::from(issue.code.as_str())),
                            ("payload", issue.payload.clone()),
                            ("message", Value::from(issue.message.as_str())),
                            ("path", Value::array(issue.path.iter().map(Value::from))),
                        ])
                    })),
                ),
            ]),
        }
    }
}

/// Whether `result` is a success.
pub fn is_success(result: &ExecutionResult) -> bool {
    result.is_success()
}

/// Whether `result` is a failure.
pub fn is_failure(result: &ExecutionResult) -> bool {
    result.is_failure()
}
