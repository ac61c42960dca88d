//! Structural combinators: steps that run other schemas.
//!
//! Every combinator runs its children one after another through
//! [`run_sequence`], which keeps the executor's escalation rule at the
//! nested level: children are executed synchronously until one of them
//! returns a pending result, and only then does the combinator become a
//! future that awaits the remaining children in order.

pub mod array;
pub mod intersection;
pub mod lazy;
pub mod object;
pub mod union;

use crate::core::error::SchemaResult;
use crate::core::result::ExecutionResult;
use crate::core::types::Value;
use crate::execution::outcome::Execution;
use crate::schema::builder::Schema;
use crate::steps::args::{Arg, CallArgs};
use crate::steps::registry::StepRegistry;
use futures::FutureExt;
use std::ops::ControlFlow;
use std::sync::Arc;

pub use object::{Field, Shape};

/// Accumulates child results into the combinator's result.
pub(crate) trait Fold: Send + 'static {
    /// Absorb the result of child `index`. `Break` skips the remaining
    /// children.
    fn absorb(&mut self, index: usize, result: ExecutionResult) -> ControlFlow<()>;

    /// Produce the combinator's result.
    fn finish(self) -> ExecutionResult;
}

/// Execute `(schema, value)` jobs in order and fold their results.
pub(crate) fn run_sequence<F, I>(mut fold: F, jobs: I) -> Execution
where
    F: Fold,
    I: Iterator<Item = (Schema, Value)> + Send + 'static,
{
    let mut jobs = jobs.enumerate();

    while let Some((index, (schema, value))) = jobs.next() {
        match schema.execute(value) {
            Execution::Ready(result) => {
                if fold.absorb(index, result).is_break() {
                    return Execution::Ready(fold.finish());
                }
            }
            Execution::Pending(pending) => {
                log::trace!("child {} returned a pending result, escalating combinator", index);
                return Execution::Pending(
                    async move {
                        let mut flow = fold.absorb(index, pending.await);
                        while flow.is_continue() {
                            let Some((index, (schema, value))) = jobs.next() else {
                                break;
                            };
                            let result = schema.execute(value).await;
                            flow = fold.absorb(index, result);
                        }
                        fold.finish()
                    }
                    .boxed(),
                );
            }
        }
    }

    Execution::Ready(fold.finish())
}

/// Register all structural combinators.
pub fn register(registry: &mut StepRegistry) {
    object::register(registry);
    array::register(registry);
    union::register(registry);
    intersection::register(registry);
    lazy::register(registry);
}

/// Builder methods for the structural combinators.
pub trait StructuralSteps {
    /// Object with declared keys only in the output.
    fn object(&self, shape: Shape) -> SchemaResult<Schema>;

    /// Object that rejects undeclared keys.
    fn strict_object(&self, shape: Shape) -> SchemaResult<Schema>;

    /// Object that passes undeclared keys through.
    fn loose_object(&self, shape: Shape) -> SchemaResult<Schema>;

    /// Array whose items all match `item`.
    fn array(&self, item: Schema) -> SchemaResult<Schema>;

    /// First matching branch wins.
    fn union(&self, branches: Vec<Schema>) -> SchemaResult<Schema>;

    /// Every branch must match; the output is the input.
    fn intersection(&self, branches: Vec<Schema>) -> SchemaResult<Schema>;

    /// Schema resolved at execution time, for recursive definitions.
    fn lazy<F>(&self, getter: F) -> SchemaResult<Schema>
    where
        F: Fn() -> Schema + Send + Sync + 'static;
}

impl StructuralSteps for Schema {
    fn object(&self, shape: Shape) -> SchemaResult<Schema> {
        self.call("object", CallArgs::new().arg(Arg::Shape(shape)))
    }

    fn strict_object(&self, shape: Shape) -> SchemaResult<Schema> {
        self.call("strict_object", CallArgs::new().arg(Arg::Shape(shape)))
    }

    fn loose_object(&self, shape: Shape) -> SchemaResult<Schema> {
        self.call("loose_object", CallArgs::new().arg(Arg::Shape(shape)))
    }

    fn array(&self, item: Schema) -> SchemaResult<Schema> {
        self.call("array", CallArgs::new().arg(Arg::Schema(item)))
    }

    fn union(&self, branches: Vec<Schema>) -> SchemaResult<Schema> {
        self.call("union", CallArgs::new().arg(Arg::Schemas(branches)))
    }

    fn intersection(&self, branches: Vec<Schema>) -> SchemaResult<Schema> {
        self.call("intersection", CallArgs::new().arg(Arg::Schemas(branches)))
    }

    fn lazy<F>(&self, getter: F) -> SchemaResult<Schema>
    where
        F: Fn() -> Schema + Send + Sync + 'static,
    {
        self.call("lazy", CallArgs::new().arg(Arg::Getter(Arc::new(getter))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::issue::{Issue, IssueContent};
    use crate::execution::step::StepOutput;
    use crate::steps::builtin::RefineSteps;
    use crate::steps::registry::RegistryBuilder;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Collects successes and stops at the first failure.
    struct Collect {
        values: Vec<Value>,
        failed: bool,
    }

    impl Fold for Collect {
        fn absorb(&mut self, _index: usize, result: ExecutionResult) -> ControlFlow<()> {
            match result {
                ExecutionResult::Success { value } => {
                    self.values.push(value);
                    ControlFlow::Continue(())
                }
                ExecutionResult::Failure { .. } => {
                    self.failed = true;
                    ControlFlow::Break(())
                }
            }
        }

        fn finish(self) -> ExecutionResult {
            if self.failed {
                ExecutionResult::failure(Vec::new())
            } else {
                ExecutionResult::success(Value::from(self.values))
            }
        }
    }

    fn collect() -> Collect {
        Collect {
            values: Vec::new(),
            failed: false,
        }
    }

    #[test]
    fn test_all_ready_children_stay_ready() {
        let s = Schema::new();
        let jobs = vec![(s.clone(), Value::from(1)), (s.clone(), Value::from(2))];
        let execution = run_sequence(collect(), jobs.into_iter());
        assert!(execution.is_ready());
        assert_eq!(execution.wait().into_value(), Some(Value::array([1, 2])));
    }

    #[test]
    fn test_pending_child_escalates() {
        let s = Schema::new();
        let slow = s
            .transform_async(|v| async move { Ok::<_, anyhow::Error>(v) })
            .unwrap();
        let jobs = vec![
            (s.clone(), Value::from(1)),
            (slow, Value::from(2)),
            (s.clone(), Value::from(3)),
        ];
        let execution = run_sequence(collect(), jobs.into_iter());
        assert!(execution.is_pending());
        assert_eq!(execution.wait().into_value(), Some(Value::array([1, 2, 3])));
    }

    #[test]
    fn test_break_skips_remaining_children() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&runs);
        let registry = RegistryBuilder::new()
            .register("fail", |u, _| {
                u.add_step(|_| {
                    StepOutput::ready(ExecutionResult::failure_one(Issue::new(
                        IssueContent::new("test:fail", Value::Null),
                        "fail",
                    )))
                });
                Ok(())
            })
            .register("count", move |u, _| {
                let counted = Arc::clone(&counted);
                u.add_step(move |result| {
                    counted.fetch_add(1, Ordering::SeqCst);
                    StepOutput::ready(result)
                });
                Ok(())
            })
            .build();
        let s = Schema::with_registry(registry);
        let fail = s.call("fail", CallArgs::new()).unwrap();
        let count = s.call("count", CallArgs::new()).unwrap();

        let jobs = vec![
            (count.clone(), Value::from(1)),
            (fail, Value::Null),
            (count, Value::Null),
        ];
        let result = run_sequence(collect(), jobs.into_iter()).wait();
        assert!(result.is_failure());
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }
}
