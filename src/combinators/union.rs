//! Union combinator: the first matching branch wins.

use crate::combinators::{run_sequence, Fold};
use crate::core::error::{SchemaError, SchemaResult};
use crate::core::issue::Issue;
use crate::core::result::ExecutionResult;
use crate::core::types::Value;
use crate::schema::builder::Schema;
use crate::schema::utilities::StepUtilities;
use crate::steps::args::CallArgs;
use crate::steps::registry::StepRegistry;
use std::ops::ControlFlow;
use std::sync::Arc;

#[derive(Default)]
struct UnionFold {
    matched: Option<Value>,
    issues: Vec<Issue>,
}

impl Fold for UnionFold {
    fn absorb(&mut self, _index: usize, result: ExecutionResult) -> ControlFlow<()> {
        match result {
            ExecutionResult::Success { value } => {
                self.matched = Some(value);
                ControlFlow::Break(())
            }
            ExecutionResult::Failure { issues } => {
                self.issues.extend(issues);
                ControlFlow::Continue(())
            }
        }
    }

    fn finish(self) -> ExecutionResult {
        match self.matched {
            Some(value) => ExecutionResult::success(value),
            None => ExecutionResult::failure(self.issues),
        }
    }
}

fn add_union_step(u: &mut StepUtilities<'_>, args: &CallArgs) -> SchemaResult<()> {
    let branches: Arc<[Schema]> = args.get_schemas(u.step_name(), 0)?.into();
    if branches.is_empty() {
        return Err(SchemaError::EmptyUnion);
    }

    u.add_success_step(move |value| {
        let branches = Arc::clone(&branches);
        let jobs = (0..branches.len()).map(move |i| (branches[i].clone(), value.clone()));
        run_sequence(UnionFold::default(), jobs).into()
    });
    Ok(())
}

/// Register the union combinator.
pub fn register(registry: &mut StepRegistry) {
    registry.register_with_description("union", "Accept the first matching branch", add_union_step);
}
