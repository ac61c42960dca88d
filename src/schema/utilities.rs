//! Utilities handed to step implementations during a builder call.

use crate::core::issue::{prepend_issue_path, Issue, IssueContent, PathSegment};
use crate::core::message::{resolve_message, Message};
use crate::core::result::ExecutionResult;
use crate::core::types::Value;
use crate::execution::step::{Step, StepOutput};
use crate::schema::options::SchemaOptions;
use crate::steps::registry::StepRegistry;
use std::sync::Arc;

/// Creates issues with a fixed set of message sources.
///
/// Steps build one of these at construction time and move it into their
/// step function, so issues created at run time still see the builder
/// call's custom message and the schema's global message.
#[derive(Debug, Clone)]
pub struct IssueFactory {
    custom: Option<Message>,
    default: Option<Message>,
    global: Option<Message>,
}

impl IssueFactory {
    /// Create a factory from the three message sources.
    pub fn new(custom: Option<Message>, default: Option<Message>, global: Option<Message>) -> Self {
        Self {
            custom,
            default,
            global,
        }
    }

    /// Create an issue at the root path with a resolved message.
    pub fn create(&self, code: impl Into<String>, payload: Value) -> Issue {
        let content = IssueContent::new(code, payload);
        let message = resolve_message(
            &content,
            self.custom.as_ref(),
            self.default.as_ref(),
            self.global.as_ref(),
        );
        Issue::new(content, message)
    }

    /// Create a single-issue failure.
    pub fn fail(&self, code: impl Into<String>, payload: Value) -> ExecutionResult {
        ExecutionResult::failure_one(self.create(code, payload))
    }
}

/// Utilities bound to the step list of the schema being built.
///
/// Every step added here lands in the new schema; the parent schema's steps
/// are never touched.
pub struct StepUtilities<'a> {
    name: &'a str,
    steps: &'a mut Vec<Step>,
    options: &'a Arc<SchemaOptions>,
    registry: &'a Arc<StepRegistry>,
}

impl<'a> StepUtilities<'a> {
    pub(crate) fn new(
        name: &'a str,
        steps: &'a mut Vec<Step>,
        options: &'a Arc<SchemaOptions>,
        registry: &'a Arc<StepRegistry>,
    ) -> Self {
        Self {
            name,
            steps,
            options,
            registry,
        }
    }

    /// Name of the step implementation being invoked.
    pub fn step_name(&self) -> &str {
        self.name
    }

    /// Options of the schema being built.
    pub fn options(&self) -> &Arc<SchemaOptions> {
        self.options
    }

    /// Registry of the schema being built.
    pub fn registry(&self) -> &Arc<StepRegistry> {
        self.registry
    }

    // ========================================================================
    // Adding Steps
    // ========================================================================

    /// Append a step that receives every result.
    pub fn add_step<F>(&mut self, run: F)
    where
        F: Fn(ExecutionResult) -> StepOutput + Send + Sync + 'static,
    {
        self.steps.push(Step::new(self.name, run));
    }

    /// Append a step that only runs on success and passes failures through.
    pub fn add_success_step<F>(&mut self, run: F)
    where
        F: Fn(Value) -> StepOutput + Send + Sync + 'static,
    {
        self.add_step(move |result| match result {
            ExecutionResult::Success { value } => run(value),
            failure => StepOutput::ready(failure),
        });
    }

    /// Append a step that only runs on failure and passes successes through.
    pub fn add_failure_step<F>(&mut self, run: F)
    where
        F: Fn(Vec<Issue>) -> StepOutput + Send + Sync + 'static,
    {
        self.add_step(move |result| match result {
            ExecutionResult::Failure { issues } => run(issues),
            success => StepOutput::ready(success),
        });
    }

    // ========================================================================
    // Results and Issues
    // ========================================================================

    /// Create a success result.
    pub fn success(&self, value: impl Into<Value>) -> ExecutionResult {
        ExecutionResult::success(value)
    }

    /// Create a failure result.
    pub fn failure(&self, issues: impl IntoIterator<Item = Issue>) -> ExecutionResult {
        ExecutionResult::failure(issues.into_iter().collect())
    }

    /// Create a failure result with a single issue.
    pub fn failure_one(&self, issue: Issue) -> ExecutionResult {
        ExecutionResult::failure_one(issue)
    }

    /// Create an issue using the schema's global message as last resort.
    pub fn create_issue(
        &self,
        code: impl Into<String>,
        payload: Value,
        custom: Option<&Message>,
        default: Option<&Message>,
    ) -> Issue {
        self.issue_factory(custom, default).create(code, payload)
    }

    /// Create an issue factory to move into a step function.
    pub fn issue_factory(&self, custom: Option<&Message>, default: Option<&Message>) -> IssueFactory {
        IssueFactory::new(
            custom.cloned(),
            default.cloned(),
            self.options.global_message.clone(),
        )
    }

    /// Resolve a message using the schema's global message as last resort.
    pub fn resolve_message(
        &self,
        content: &IssueContent,
        custom: Option<&Message>,
        default: Option<&Message>,
    ) -> String {
        resolve_message(content, custom, default, self.options.global_message.as_ref())
    }

    /// See [`prepend_issue_path`].
    pub fn prepend_issue_path(&self, issue: Issue, prefix: &[PathSegment]) -> Issue {
        prepend_issue_path(issue, prefix)
    }

    /// Whether `result` is a success.
    pub fn is_success(&self, result: &ExecutionResult) -> bool {
        result.is_success()
    }

    /// Whether `result` is a failure.
    pub fn is_failure(&self, result: &ExecutionResult) -> bool {
        result.is_failure()
    }
}
