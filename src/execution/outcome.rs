//! Return type of schema execution: ready now, or pending.

use crate::core::result::ExecutionResult;
use futures::future::{self, BoxFuture};
use futures::FutureExt;
use std::fmt;
use std::future::IntoFuture;

/// Result of executing a schema.
///
/// A schema whose steps all complete synchronously returns `Ready` without
/// allocating a future. As soon as one step is asynchronous for a given
/// input, the whole execution is `Pending`.
pub enum Execution {
    /// The result is available now.
    Ready(ExecutionResult),
    /// The result will be available once the future resolves.
    Pending(BoxFuture<'static, ExecutionResult>),
}

impl Execution {
    /// Whether the result is available now.
    pub fn is_ready(&self) -> bool {
        matches!(self, Execution::Ready(_))
    }

    /// Whether the result is still pending.
    pub fn is_pending(&self) -> bool {
        matches!(self, Execution::Pending(_))
    }

    /// The result, if it is available now.
    pub fn ready(self) -> Option<ExecutionResult> {
        match self {
            Execution::Ready(result) => Some(result),
            Execution::Pending(_) => None,
        }
    }

    /// Block the current thread until the result is available.
    pub fn wait(self) -> ExecutionResult {
        match self {
            Execution::Ready(result) => result,
            Execution::Pending(pending) => futures::executor::block_on(pending),
        }
    }

    /// Transform the result, keeping the ready/pending state.
    pub fn map<F>(self, f: F) -> Execution
    where
        F: FnOnce(ExecutionResult) -> ExecutionResult + Send + 'static,
    {
        match self {
            Execution::Ready(result) => Execution::Ready(f(result)),
            Execution::Pending(pending) => Execution::Pending(pending.map(f).boxed()),
        }
    }
}

impl IntoFuture for Execution {
    type Output = ExecutionResult;
    type IntoFuture = BoxFuture<'static, ExecutionResult>;

    fn into_future(self) -> Self::IntoFuture {
        match self {
            Execution::Ready(result) => future::ready(result).boxed(),
            Execution::Pending(pending) => pending,
        }
    }
}

impl From<ExecutionResult> for Execution {
    fn from(result: ExecutionResult) -> Self {
        Execution::Ready(result)
    }
}

impl fmt::Debug for Execution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Execution::Ready(result) => f.debug_tuple("Ready").field(result).finish(),
            Execution::Pending(_) => f.debug_tuple("Pending").field(&"<future>").finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Value;

    #[test]
    fn test_ready_state() {
        let execution = Execution::from(ExecutionResult::success(1));
        assert!(execution.is_ready());
        assert_eq!(
            execution.ready().and_then(|r| r.into_value()),
            Some(Value::from(1))
        );
    }

    #[test]
    fn test_pending_wait_and_map() {
        let execution = Execution::Pending(async { ExecutionResult::success("a") }.boxed());
        assert!(execution.is_pending());

        let mapped = execution.map(|r| match r {
            ExecutionResult::Success { .. } => ExecutionResult::success("b"),
            failure => failure,
        });
        assert!(mapped.is_pending());
        assert_eq!(mapped.wait().value(), Some(&Value::from("b")));
    }

    #[test]
    fn test_await_ready_value() {
        let result = futures::executor::block_on(async {
            Execution::Ready(ExecutionResult::success(true)).await
        });
        assert!(result.is_success());
    }
}
