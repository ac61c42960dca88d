//! Standard-schema style descriptor for interop with third-party consumers.
//!
//! Consumers following the convention look for `version`, `vendor` and a
//! `validate` function producing either `{ value }` or `{ issues }` where
//! every issue has a `message` and an optional `path`.

use crate::core::issue::{Issue, PathSegment};
use crate::core::result::ExecutionResult;
use crate::core::types::Value;
use crate::execution::outcome::Execution;
use crate::schema::builder::Schema;
use serde::Serialize;

/// Version of the standard-schema convention implemented.
pub const STANDARD_VERSION: u32 = 1;

/// Issue in the reduced standard-schema shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardIssue {
    /// Human-readable message.
    pub message: String,
    /// Location of the failure; omitted at the root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathSegment>>,
}

impl From<&Issue> for StandardIssue {
    fn from(issue: &Issue) -> Self {
        Self {
            message: issue.message.clone(),
            path: (!issue.path.is_empty()).then(|| issue.path.clone()),
        }
    }
}

/// Result in the reduced standard-schema shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StandardResult {
    /// Validated output.
    Value {
        /// Output value.
        value: Value,
    },
    /// Failure issues.
    Issues {
        /// Reduced issues.
        issues: Vec<StandardIssue>,
    },
}

impl From<&ExecutionResult> for StandardResult {
    fn from(result: &ExecutionResult) -> Self {
        match result {
            ExecutionResult::Success { value } => StandardResult::Value {
                value: value.clone(),
            },
            ExecutionResult::Failure { issues } => StandardResult::Issues {
                issues: issues.iter().map(StandardIssue::from).collect(),
            },
        }
    }
}

/// Descriptor wrapping a schema.
#[derive(Debug, Clone)]
pub struct StandardSchema {
    schema: Schema,
}

impl StandardSchema {
    /// Convention version, always 1.
    pub fn version(&self) -> u32 {
        STANDARD_VERSION
    }

    /// Vendor name from the schema options.
    pub fn vendor(&self) -> &str {
        &self.schema.options().vendor
    }

    /// Validate `value`; identical to [`Schema::execute`].
    pub fn validate(&self, value: impl Into<Value>) -> Execution {
        self.schema.execute(value)
    }
}

impl Schema {
    /// Standard-schema descriptor for this schema.
    pub fn standard(&self) -> StandardSchema {
        StandardSchema {
            schema: self.clone(),
        }
    }
}
