//! Refinement and transform steps.

use crate::core::error::SchemaResult;
use crate::core::message::Message;
use crate::core::result::ExecutionResult;
use crate::core::types::Value;
use crate::execution::step::StepOutput;
use crate::schema::builder::Schema;
use crate::schema::utilities::StepUtilities;
use crate::steps::args::{Arg, AsyncPredicateFn, AsyncTransformFn, CallArgs};
use crate::steps::registry::StepRegistry;
use futures::FutureExt;
use std::future::Future;
use std::sync::Arc;

/// Issue code of a failed check.
pub const CHECK_FAILED: &str = "check:failed";

fn add_transform(u: &mut StepUtilities<'_>, args: &CallArgs) -> SchemaResult<()> {
    let f = Arc::clone(args.get_transform(u.step_name(), 0)?);
    u.add_success_step(move |value| match f(value) {
        Ok(value) => ExecutionResult::success(value).into(),
        Err(error) => StepOutput::error(error),
    });
    Ok(())
}

fn add_transform_async(u: &mut StepUtilities<'_>, args: &CallArgs) -> SchemaResult<()> {
    let f = Arc::clone(args.get_async_transform(u.step_name(), 0)?);
    u.add_success_step(move |value| {
        StepOutput::pending(f(value).map(|result| result.map(ExecutionResult::success)))
    });
    Ok(())
}

fn check_payload(value: &Value) -> Value {
    Value::object([("received", value.clone())])
}

fn add_check(u: &mut StepUtilities<'_>, args: &CallArgs) -> SchemaResult<()> {
    let name = u.step_name().to_string();
    let predicate = Arc::clone(args.get_predicate(&name, 0)?);
    let issues = u.issue_factory(args.get_message(&name, 1)?, None);

    u.add_success_step(move |value| {
        if predicate(&value) {
            ExecutionResult::success(value).into()
        } else {
            issues.fail(CHECK_FAILED, check_payload(&value)).into()
        }
    });
    Ok(())
}

fn add_check_async(u: &mut StepUtilities<'_>, args: &CallArgs) -> SchemaResult<()> {
    let name = u.step_name().to_string();
    let predicate = Arc::clone(args.get_async_predicate(&name, 0)?);
    let issues = u.issue_factory(args.get_message(&name, 1)?, None);

    u.add_success_step(move |value| {
        let verdict = predicate(value.clone());
        let issues = issues.clone();
        StepOutput::pending(async move {
            Ok(if verdict.await {
                ExecutionResult::success(value)
            } else {
                issues.fail(CHECK_FAILED, check_payload(&value))
            })
        })
    });
    Ok(())
}

fn add_fallback(u: &mut StepUtilities<'_>, args: &CallArgs) -> SchemaResult<()> {
    let fallback = args.get_value(u.step_name(), 0)?.clone();
    u.add_failure_step(move |issues| {
        log::trace!("replacing {} issue(s) with fallback value", issues.len());
        ExecutionResult::success(fallback.clone()).into()
    });
    Ok(())
}

fn add_pipe(u: &mut StepUtilities<'_>, args: &CallArgs) -> SchemaResult<()> {
    let schema = args.get_schema(u.step_name(), 0)?.clone();
    u.add_success_step(move |value| schema.execute(value).into());
    Ok(())
}

/// Register the refinement and transform steps.
pub fn register(registry: &mut StepRegistry) {
    registry.register_with_description("transform", "Map the value", add_transform);
    registry.register_with_description(
        "transform_async",
        "Map the value asynchronously",
        add_transform_async,
    );
    registry.register_with_description("check", "Reject values failing a predicate", add_check);
    registry.register_with_description(
        "check_async",
        "Reject values failing an async predicate",
        add_check_async,
    );
    registry.register_with_description("fallback", "Replace any failure by a value", add_fallback);
    registry.register_with_description("pipe", "Run another schema on the value", add_pipe);
}

/// Builder methods for refinements and transforms.
pub trait RefineSteps {
    /// Map successful values. An `Err` becomes an unknown-exception issue.
    fn transform<F>(&self, f: F) -> SchemaResult<Schema>
    where
        F: Fn(Value) -> anyhow::Result<Value> + Send + Sync + 'static;

    /// Map successful values asynchronously. Makes the schema asynchronous.
    fn transform_async<F, Fut>(&self, f: F) -> SchemaResult<Schema>
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static;

    /// Reject successful values for which `predicate` is false.
    fn check<F>(&self, predicate: F, message: impl Into<Message>) -> SchemaResult<Schema>
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static;

    /// Asynchronous [`RefineSteps::check`].
    fn check_async<F, Fut>(&self, predicate: F, message: impl Into<Message>) -> SchemaResult<Schema>
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static;

    /// Replace any failure by `Success { value }`.
    fn fallback(&self, value: impl Into<Value>) -> SchemaResult<Schema>;

    /// Run `schema` on successful values.
    fn pipe(&self, schema: Schema) -> SchemaResult<Schema>;
}

impl RefineSteps for Schema {
    fn transform<F>(&self, f: F) -> SchemaResult<Schema>
    where
        F: Fn(Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.call("transform", CallArgs::new().arg(Arg::Transform(Arc::new(f))))
    }

    fn transform_async<F, Fut>(&self, f: F) -> SchemaResult<Schema>
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        let f: AsyncTransformFn = Arc::new(move |value: Value| f(value).boxed());
        self.call("transform_async", CallArgs::new().arg(Arg::AsyncTransform(f)))
    }

    fn check<F>(&self, predicate: F, message: impl Into<Message>) -> SchemaResult<Schema>
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let args = CallArgs::new()
            .arg(Arg::Predicate(Arc::new(predicate)))
            .message(Some(message.into()));
        self.call("check", args)
    }

    fn check_async<F, Fut>(&self, predicate: F, message: impl Into<Message>) -> SchemaResult<Schema>
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        let predicate: AsyncPredicateFn = Arc::new(move |value: Value| predicate(value).boxed());
        let args = CallArgs::new()
            .arg(Arg::AsyncPredicate(predicate))
            .message(Some(message.into()));
        self.call("check_async", args)
    }

    fn fallback(&self, value: impl Into<Value>) -> SchemaResult<Schema> {
        self.call("fallback", CallArgs::new().value(value))
    }

    fn pipe(&self, schema: Schema) -> SchemaResult<Schema> {
        self.call("pipe", CallArgs::new().arg(Arg::Schema(schema)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::UNKNOWN_EXCEPTION;
    use crate::schema::options::SchemaOptions;
    use crate::steps::builtin::PrimitiveSteps;

    #[test]
    fn test_transform() {
        let s = Schema::new();
        let schema = s
            .number()
            .unwrap()
            .transform(|v| Ok(Value::from(v.as_number().unwrap_or_default() * 2.0)))
            .unwrap();
        assert_eq!(schema.execute(4).wait().into_value(), Some(Value::from(8)));
        assert!(schema.execute("4").wait().is_failure());
    }

    #[test]
    fn test_transform_error_is_unknown_exception() {
        let schema = Schema::new()
            .transform(|_| Err(anyhow::anyhow!("boom")))
            .unwrap();
        let issues = schema.execute(1).wait().into_issues().unwrap();
        assert_eq!(issues[0].code, UNKNOWN_EXCEPTION);
        assert!(issues[0].cause.is_some());
    }

    #[test]
    fn test_transform_async_makes_schema_pending() {
        let schema = Schema::new()
            .transform_async(|v| async move {
                Ok::<_, anyhow::Error>(Value::from(format!("{}!", v.as_str().unwrap_or(""))))
            })
            .unwrap();
        let execution = schema.execute("hi");
        assert!(execution.is_pending());
        assert_eq!(execution.wait().into_value(), Some(Value::from("hi!")));
    }

    #[test]
    fn test_check() {
        let s = Schema::new();
        let positive = s
            .number()
            .unwrap()
            .check(|v| v.as_number().map_or(false, |n| n > 0.0), "Must be positive.")
            .unwrap();

        assert!(positive.execute(3).wait().is_success());
        let issues = positive.execute(-1).wait().into_issues().unwrap();
        assert_eq!(issues[0].code, CHECK_FAILED);
        assert_eq!(issues[0].message, "Must be positive.");
        assert_eq!(issues[0].payload.get("received"), &Value::from(-1));
    }

    #[test]
    fn test_check_without_message_uses_global() {
        let s = Schema::with_options(SchemaOptions::new().with_global_message("Global."));
        let schema = s
            .call(
                "check",
                CallArgs::new().arg(Arg::Predicate(Arc::new(|_: &Value| false))),
            )
            .unwrap();
        assert_eq!(
            schema.execute(1).wait().into_issues().unwrap()[0].message,
            "Global."
        );
    }

    #[test]
    fn test_check_async() {
        let schema = Schema::new()
            .check_async(|v| async move { v.as_str() == Some("ok") }, "Not ok.")
            .unwrap();
        assert!(schema.execute("ok").wait().is_success());
        assert_eq!(
            schema.execute("no").wait().into_issues().unwrap()[0].message,
            "Not ok."
        );
    }

    #[test]
    fn test_fallback_replaces_failures_only() {
        let s = Schema::new();
        let schema = s.string().unwrap().fallback("default").unwrap();
        assert_eq!(schema.execute("x").wait().into_value(), Some(Value::from("x")));
        assert_eq!(schema.execute(1).wait().into_value(), Some(Value::from("default")));
    }

    #[test]
    fn test_pipe() {
        let s = Schema::new();
        let inner = s.literal("a").unwrap();
        let schema = s.string().unwrap().pipe(inner).unwrap();
        assert!(schema.execute("a").wait().is_success());
        assert_eq!(
            schema.execute("b").wait().into_issues().unwrap()[0].code,
            "literal:mismatch"
        );
    }

    #[test]
    fn test_missing_argument_is_a_construction_error() {
        let error = Schema::new().call("pipe", CallArgs::new()).unwrap_err();
        assert_eq!(error.step(), Some("pipe"));
    }
}
