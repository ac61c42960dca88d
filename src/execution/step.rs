//! Steps: the unit of work in a schema pipeline.

use crate::core::result::ExecutionResult;
use crate::execution::outcome::Execution;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Eventual result of an asynchronous step.
pub type StepFuture = BoxFuture<'static, anyhow::Result<ExecutionResult>>;

/// What a step returns: a result that is available now, or one that will
/// be available later.
///
/// An `Err` in either form is treated like a thrown exception and turned
/// into a `core:unknown_exception` issue by the executor.
pub enum StepOutput {
    /// Result available immediately.
    Ready(anyhow::Result<ExecutionResult>),
    /// Result available once the future resolves.
    Pending(StepFuture),
}

impl StepOutput {
    /// Wrap an immediately available result.
    pub fn ready(result: ExecutionResult) -> Self {
        StepOutput::Ready(Ok(result))
    }

    /// Wrap a future result.
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = anyhow::Result<ExecutionResult>> + Send + 'static,
    {
        StepOutput::Pending(future.boxed())
    }

    /// Report an error raised by the step.
    pub fn error(error: impl Into<anyhow::Error>) -> Self {
        StepOutput::Ready(Err(error.into()))
    }

    /// Whether the result is available now.
    pub fn is_ready(&self) -> bool {
        matches!(self, StepOutput::Ready(_))
    }
}

impl From<ExecutionResult> for StepOutput {
    fn from(result: ExecutionResult) -> Self {
        StepOutput::ready(result)
    }
}

impl From<Execution> for StepOutput {
    fn from(execution: Execution) -> Self {
        match execution {
            Execution::Ready(result) => StepOutput::Ready(Ok(result)),
            Execution::Pending(future) => StepOutput::Pending(future.map(Ok).boxed()),
        }
    }
}

impl fmt::Debug for StepOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutput::Ready(result) => f.debug_tuple("Ready").field(result).finish(),
            StepOutput::Pending(_) => f.debug_tuple("Pending").field(&"<future>").finish(),
        }
    }
}

/// Step function signature.
pub type StepFn = Arc<dyn Fn(ExecutionResult) -> StepOutput + Send + Sync>;

/// A named step in a schema pipeline.
///
/// Steps receive the previous result and decide for themselves whether to
/// act on a failure; most only act on success and pass failures through.
#[derive(Clone)]
pub struct Step {
    name: Arc<str>,
    run: StepFn,
}

impl Step {
    /// Create a step.
    pub fn new<F>(name: impl Into<Arc<str>>, run: F) -> Self
    where
        F: Fn(ExecutionResult) -> StepOutput + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            run: Arc::new(run),
        }
    }

    /// Name of the step implementation that added this step.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    /// Run the step on `input`, without any error containment.
    pub fn run(&self, input: ExecutionResult) -> StepOutput {
        (self.run)(input)
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Value;

    #[test]
    fn test_step_runs_function() {
        let step = Step::new("double", |result: ExecutionResult| match result {
            ExecutionResult::Success { value } => {
                let n = value.as_number().unwrap_or_default();
                StepOutput::ready(ExecutionResult::success(n * 2.0))
            }
            failure => failure.into(),
        });

        assert_eq!(step.name(), "double");
        match step.run(ExecutionResult::success(21)) {
            StepOutput::Ready(Ok(result)) => assert_eq!(result.value(), Some(&Value::from(42))),
            other => panic!("unexpected output: {:?}", other),
        }
    }

    #[test]
    fn test_execution_converts_to_step_output() {
        let output: StepOutput = Execution::Ready(ExecutionResult::success(1)).into();
        assert!(output.is_ready());

        let pending = Execution::Pending(async { ExecutionResult::success(1) }.boxed());
        let output: StepOutput = pending.into();
        assert!(!output.is_ready());
    }
}
