//! Array combinator.

use crate::combinators::{run_sequence, Fold};
use crate::core::error::SchemaResult;
use crate::core::issue::{prepend_issue_path, Issue, PathSegment};
use crate::core::result::ExecutionResult;
use crate::core::types::Value;
use crate::execution::step::StepOutput;
use crate::schema::utilities::StepUtilities;
use crate::steps::args::CallArgs;
use crate::steps::builtin::primitive::{type_message, type_payload};
use crate::steps::registry::StepRegistry;
use std::iter;
use std::ops::ControlFlow;

struct ArrayFold {
    output: Vec<Value>,
    issues: Vec<Issue>,
}

impl Fold for ArrayFold {
    fn absorb(&mut self, index: usize, result: ExecutionResult) -> ControlFlow<()> {
        match result {
            ExecutionResult::Success { value } => {
                if self.issues.is_empty() {
                    self.output.push(value);
                }
            }
            ExecutionResult::Failure { issues } => {
                let prefix = [PathSegment::Index(index)];
                self.issues
                    .extend(issues.into_iter().map(|issue| prepend_issue_path(issue, &prefix)));
            }
        }
        ControlFlow::Continue(())
    }

    fn finish(self) -> ExecutionResult {
        if self.issues.is_empty() {
            ExecutionResult::success(Value::from(self.output))
        } else {
            ExecutionResult::failure(self.issues)
        }
    }
}

fn add_array_step(u: &mut StepUtilities<'_>, args: &CallArgs) -> SchemaResult<()> {
    let name = u.step_name().to_string();
    let item = args.get_schema(&name, 0)?.clone();
    let issues = u.issue_factory(args.get_message(&name, 1)?, Some(&type_message()));

    u.add_success_step(move |value| match value.into_array() {
        Ok(items) => {
            let fold = ArrayFold {
                output: Vec::with_capacity(items.len()),
                issues: Vec::new(),
            };
            let jobs = iter::repeat(item.clone()).zip(items);
            run_sequence(fold, jobs).into()
        }
        Err(other) => StepOutput::ready(issues.fail("array:type", type_payload("array", &other))),
    });
    Ok(())
}

/// Register the array combinator.
pub fn register(registry: &mut StepRegistry) {
    registry.register_with_description("array", "Validate every item", add_array_step);
}

#[cfg(test)]
mod tests {
    use crate::combinators::StructuralSteps;
    use crate::core::issue::PathSegment;
    use crate::core::types::Value;
    use crate::schema::builder::Schema;
    use crate::steps::builtin::{PrimitiveSteps, RefineSteps};

    #[test]
    fn test_item_issues_get_index_paths() {
        let s = Schema::new();
        let schema = s.array(s.string().unwrap()).unwrap();

        let input = Value::array([Value::from("a"), Value::from(1), Value::from(2)]);
        let issues = schema.execute(input).wait().into_issues().unwrap();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].path, vec![PathSegment::Index(1)]);
        assert_eq!(issues[1].path, vec![PathSegment::Index(2)]);
    }

    #[test]
    fn test_outputs_replace_items() {
        let s = Schema::new();
        let double = s
            .number()
            .unwrap()
            .transform(|v| Ok(Value::from(v.as_number().unwrap_or_default() * 2.0)))
            .unwrap();
        let schema = s.array(double).unwrap();
        assert_eq!(
            schema.execute(Value::array([1, 2, 3])).wait().into_value(),
            Some(Value::array([2, 4, 6]))
        );
    }

    #[test]
    fn test_empty_array_succeeds() {
        let s = Schema::new();
        let schema = s.array(s.string().unwrap()).unwrap();
        let empty = Value::array(Vec::<Value>::new());
        assert_eq!(schema.execute(empty.clone()).wait().into_value(), Some(empty));
    }

    #[test]
    fn test_non_array_input() {
        let s = Schema::new();
        let schema = s.array(s.string().unwrap()).unwrap();
        let issues = schema.execute("abc").wait().into_issues().unwrap();
        assert_eq!(issues[0].code, "array:type");
        assert!(issues[0].is_root());
    }

    #[test]
    fn test_nested_paths_compose() {
        let s = Schema::new();
        let schema = s.array(s.array(s.number().unwrap()).unwrap()).unwrap();
        let input = Value::array([Value::array([1]), Value::array([Value::from(2), Value::Null])]);
        let issues = schema.execute(input).wait().into_issues().unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path_string(), "[1][1]");
    }
}
