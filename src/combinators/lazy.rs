//! Lazily resolved schemas, for recursive definitions.

use crate::core::error::SchemaResult;
use crate::schema::utilities::StepUtilities;
use crate::steps::args::CallArgs;
use crate::steps::registry::StepRegistry;
use std::sync::Arc;

fn add_lazy_step(u: &mut StepUtilities<'_>, args: &CallArgs) -> SchemaResult<()> {
    let getter = Arc::clone(args.get_getter(u.step_name(), 0)?);
    u.add_success_step(move |value| getter().execute(value).into());
    Ok(())
}

/// Register the lazy combinator.
pub fn register(registry: &mut StepRegistry) {
    registry.register_with_description(
        "lazy",
        "Resolve the schema when the value is validated",
        add_lazy_step,
    );
}

#[cfg(test)]
mod tests {
    use crate::combinators::{Shape, StructuralSteps};
    use crate::core::types::Value;
    use crate::schema::builder::Schema;
    use crate::steps::builtin::PrimitiveSteps;

    /// `{ name: string, children?: Node[] }`
    fn node() -> Schema {
        let s = Schema::new();
        s.object(
            Shape::new()
                .required("name", s.string().unwrap())
                .optional("children", s.array(s.lazy(node).unwrap()).unwrap()),
        )
        .unwrap()
    }

    #[test]
    fn test_recursive_schema() {
        let leaf = Value::object([("name", "leaf")]);
        let tree = Value::object([
            ("name", Value::from("root")),
            ("children", Value::array([leaf.clone(), leaf])),
        ]);
        assert!(node().execute(tree).wait().is_success());

        let bad = Value::object([
            ("name", Value::from("root")),
            (
                "children",
                Value::array([Value::object([("name", 1)])]),
            ),
        ]);
        let issues = node().execute(bad).wait().into_issues().unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path_string(), ".children[0].name");
    }
}
