//! Intersection combinator: every branch must accept the input.

use crate::combinators::{run_sequence, Fold};
use crate::core::error::SchemaResult;
use crate::core::issue::Issue;
use crate::core::result::ExecutionResult;
use crate::core::types::Value;
use crate::schema::builder::Schema;
use crate::schema::utilities::StepUtilities;
use crate::steps::args::CallArgs;
use crate::steps::registry::StepRegistry;
use std::ops::ControlFlow;
use std::sync::Arc;

/// Stops at the first failing branch. Branch outputs are discarded and the
/// original input is the result.
struct IntersectionFold {
    input: Value,
    issues: Vec<Issue>,
}

impl Fold for IntersectionFold {
    fn absorb(&mut self, _index: usize, result: ExecutionResult) -> ControlFlow<()> {
        match result {
            ExecutionResult::Success { .. } => ControlFlow::Continue(()),
            ExecutionResult::Failure { issues } => {
                self.issues.extend(issues);
                ControlFlow::Break(())
            }
        }
    }

    fn finish(self) -> ExecutionResult {
        if self.issues.is_empty() {
            ExecutionResult::success(self.input)
        } else {
            ExecutionResult::failure(self.issues)
        }
    }
}

fn add_intersection_step(u: &mut StepUtilities<'_>, args: &CallArgs) -> SchemaResult<()> {
    let branches: Arc<[Schema]> = args.get_schemas(u.step_name(), 0)?.into();
    if branches.is_empty() {
        log::debug!("intersection without branches accepts every value");
    }

    u.add_success_step(move |value| {
        let branches = Arc::clone(&branches);
        let input = value.clone();
        let jobs = (0..branches.len()).map(move |i| (branches[i].clone(), value.clone()));
        let fold = IntersectionFold {
            input,
            issues: Vec::new(),
        };
        run_sequence(fold, jobs).into()
    });
    Ok(())
}

/// Register the intersection combinator.
pub fn register(registry: &mut StepRegistry) {
    registry.register_with_description(
        "intersection",
        "Require every branch to match",
        add_intersection_step,
    );
}
