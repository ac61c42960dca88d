//! Step pipeline executor.
//!
//! Steps run strictly in order. While every step completes synchronously
//! the executor threads results through a plain loop. The first step that
//! returns a pending result switches the remainder of the pipeline into a
//! single future that awaits it and then runs the rest of the steps in
//! order. A schema therefore only pays for futures on inputs that actually
//! reach an asynchronous step.
//!
//! Each step keeps a clone of its input for exception payloads. Arrays and
//! objects are shared behind an `Arc`, so that clone never copies a tree.

use crate::core::error::UNKNOWN_EXCEPTION;
use crate::core::issue::{Issue, IssueContent};
use crate::core::message::{resolve_message, Message};
use crate::core::result::ExecutionResult;
use crate::core::types::Value;
use crate::execution::outcome::Execution;
use crate::execution::step::{Step, StepOutput};
use crate::schema::options::SchemaOptions;
use futures::FutureExt;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Run `steps` over `value`, starting from a success result.
pub fn execute_steps(steps: &Arc<[Step]>, value: Value, options: &Arc<SchemaOptions>) -> Execution {
    let mut result = ExecutionResult::success(value);

    for (index, step) in steps.iter().enumerate() {
        match run_step(step, result, options) {
            Execution::Ready(next) => result = next,
            Execution::Pending(pending) => {
                log::trace!(
                    "step {} ('{}') returned a pending result, escalating {} remaining step(s)",
                    index,
                    step.name(),
                    steps.len() - index - 1
                );
                let steps = Arc::clone(steps);
                let options = Arc::clone(options);
                return Execution::Pending(
                    async move {
                        let mut result = pending.await;
                        for step in &steps[index + 1..] {
                            result = match run_step(step, result, &options) {
                                Execution::Ready(next) => next,
                                Execution::Pending(pending) => pending.await,
                            };
                        }
                        result
                    }
                    .boxed(),
                );
            }
        }
    }

    Execution::Ready(result)
}

/// Run a single step, converting errors and panics into an
/// unknown-exception failure.
pub fn run_step(step: &Step, input: ExecutionResult, options: &Arc<SchemaOptions>) -> Execution {
    let snapshot = input.clone();

    let output = if options.capture_panics {
        panic::catch_unwind(AssertUnwindSafe(|| step.run(input)))
            .unwrap_or_else(|payload| StepOutput::Ready(Err(panic_error(payload))))
    } else {
        step.run(input)
    };

    match output {
        StepOutput::Ready(Ok(result)) => Execution::Ready(result),
        StepOutput::Ready(Err(error)) => {
            Execution::Ready(unknown_exception(step.name(), &snapshot, error, options))
        }
        StepOutput::Pending(pending) => {
            let name = step.shared_name();
            let options = Arc::clone(options);
            let pending = if options.capture_panics {
                AssertUnwindSafe(pending)
                    .catch_unwind()
                    .map(|outcome| outcome.unwrap_or_else(|payload| Err(panic_error(payload))))
                    .boxed()
            } else {
                pending
            };
            Execution::Pending(
                async move {
                    match pending.await {
                        Ok(result) => result,
                        Err(error) => unknown_exception(&name, &snapshot, error, &options),
                    }
                }
                .boxed(),
            )
        }
    }
}

fn panic_error(payload: Box<dyn Any + Send>) -> anyhow::Error {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    anyhow::anyhow!("step panicked: {}", message)
}

/// Build the failure reported for an error raised by a step.
fn unknown_exception(
    step: &str,
    input: &ExecutionResult,
    error: anyhow::Error,
    options: &SchemaOptions,
) -> ExecutionResult {
    log::debug!("step '{}' raised an exception: {:#}", step, error);

    let content = IssueContent::new(
        UNKNOWN_EXCEPTION,
        Value::object([
            ("step", Value::from(step)),
            ("input", input.to_value()),
            ("error", Value::from(format!("{:#}", error))),
        ]),
    );
    let default = Message::Text(format!("Step '{}' raised an exception: {}", step, error));
    let message = resolve_message(&content, None, Some(&default), options.global_message.as_ref());

    ExecutionResult::failure_one(Issue::new(content, message).with_cause(error))
}
