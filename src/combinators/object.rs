//! Object combinators: `object`, `strict_object` and `loose_object`.

use crate::combinators::{run_sequence, Fold};
use crate::core::error::SchemaResult;
use crate::core::issue::{prepend_issue_path, Issue, PathSegment};
use crate::core::message::Message;
use crate::core::result::ExecutionResult;
use crate::core::types::{Object, Value};
use crate::execution::outcome::Execution;
use crate::schema::builder::Schema;
use crate::schema::utilities::{IssueFactory, StepUtilities};
use crate::steps::args::CallArgs;
use crate::steps::builtin::primitive::{type_message, type_payload};
use crate::steps::registry::StepRegistry;
use indexmap::IndexMap;
use std::fmt;
use std::ops::ControlFlow;
use std::sync::Arc;

/// Issue code for undeclared keys in a strict object.
pub const UNEXPECTED_KEYS: &str = "object:unexpected_keys";

/// A declared object property.
#[derive(Clone)]
pub enum Field {
    /// Always validated; a missing key is validated as `Undefined`.
    Required(Schema),
    /// Skipped when the value is absent.
    Optional(Schema),
}

impl Field {
    /// The property schema.
    pub fn schema(&self) -> &Schema {
        match self {
            Field::Required(schema) | Field::Optional(schema) => schema,
        }
    }

    /// Whether the property may be absent.
    pub fn is_optional(&self) -> bool {
        matches!(self, Field::Optional(_))
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_optional() { "Optional" } else { "Required" };
        f.debug_tuple(kind).field(self.schema()).finish()
    }
}

/// Ordered property descriptors of an object schema.
#[derive(Debug, Clone, Default)]
pub struct Shape {
    fields: IndexMap<String, Field>,
}

impl Shape {
    /// Create an empty shape.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a required property.
    pub fn required(self, key: impl Into<String>, schema: Schema) -> Self {
        self.field(key, Field::Required(schema))
    }

    /// Declare an optional property.
    pub fn optional(self, key: impl Into<String>, schema: Schema) -> Self {
        self.field(key, Field::Optional(schema))
    }

    /// Declare a property. Redeclaring a key replaces it in place.
    pub fn field(mut self, key: impl Into<String>, field: Field) -> Self {
        self.fields.insert(key.into(), field);
        self
    }

    /// Look up a property.
    pub fn get(&self, key: &str) -> Option<&Field> {
        self.fields.get(key)
    }

    /// Whether `key` is declared.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Declared keys, in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|k| k.as_str())
    }

    /// Properties, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(k, f)| (k.as_str(), f))
    }

    /// Number of declared properties.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no property is declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// How undeclared input keys are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectMode {
    /// Dropped from the output.
    Strip,
    /// Rejected with one `object:unexpected_keys` issue.
    Strict,
    /// Copied to the output.
    Loose,
}

struct ObjectFold {
    keys: Vec<String>,
    output: Object,
    issues: Vec<Issue>,
}

impl Fold for ObjectFold {
    fn absorb(&mut self, index: usize, result: ExecutionResult) -> ControlFlow<()> {
        let key = &self.keys[index];
        match result {
            ExecutionResult::Success { value } => {
                if self.issues.is_empty() {
                    self.output.insert(key.clone(), value);
                }
            }
            ExecutionResult::Failure { issues } => {
                let prefix = [PathSegment::Key(key.clone())];
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

fn unexpected_keys_message() -> Message {
    Message::func(|content| {
        let keys = content.payload.get("keys").as_array()?;
        let names: Vec<&str> = keys.iter().filter_map(Value::as_str).collect();
        Some(format!("Unexpected keys: {}.", names.join(", ")))
    })
}

/// Validates object values against a shape.
struct ObjectValidator {
    shape: Shape,
    mode: ObjectMode,
    type_issues: IssueFactory,
    key_issues: IssueFactory,
}

impl ObjectValidator {
    fn validate(&self, value: Value) -> Execution {
        let mut input = match value.into_object() {
            Ok(map) => map,
            Err(other) => {
                return Execution::Ready(
                    self.type_issues.fail("object:type", type_payload("object", &other)),
                )
            }
        };

        if self.mode == ObjectMode::Strict {
            let unexpected: Vec<Value> = input
                .keys()
                .filter(|key| !self.shape.contains_key(key))
                .map(|key| Value::from(key.as_str()))
                .collect();
            if !unexpected.is_empty() {
                let payload = Value::object([("keys", unexpected)]);
                return Execution::Ready(self.key_issues.fail(UNEXPECTED_KEYS, payload));
            }
        }

        let mut keys = Vec::with_capacity(self.shape.len());
        let mut jobs = Vec::with_capacity(self.shape.len());
        for (key, field) in self.shape.iter() {
            let property = input.get_mut(key).map(std::mem::take).unwrap_or_default();
            if field.is_optional() && property.is_undefined() {
                continue;
            }
            keys.push(key.to_string());
            jobs.push((field.schema().clone(), property));
        }

        let output = match self.mode {
            ObjectMode::Loose => input,
            ObjectMode::Strip | ObjectMode::Strict => Object::with_capacity(keys.len()),
        };
        let fold = ObjectFold {
            keys,
            output,
            issues: Vec::new(),
        };
        run_sequence(fold, jobs.into_iter())
    }
}

fn add_object_step(
    u: &mut StepUtilities<'_>,
    args: &CallArgs,
    mode: ObjectMode,
) -> SchemaResult<()> {
    let name = u.step_name().to_string();
    let shape = args.get_shape(&name, 0)?.clone();
    let custom = args.get_message(&name, 1)?;

    let validator = Arc::new(ObjectValidator {
        shape,
        mode,
        type_issues: u.issue_factory(custom, Some(&type_message())),
        key_issues: u.issue_factory(custom, Some(&unexpected_keys_message())),
    });
    u.add_success_step(move |value| validator.validate(value).into());
    Ok(())
}

/// Register the object combinators.
pub fn register(registry: &mut StepRegistry) {
    registry.register_with_description(
        "object",
        "Validate declared properties and drop the rest",
        |u, args| add_object_step(u, args, ObjectMode::Strip),
    );
    registry.register_with_description(
        "strict_object",
        "Validate declared properties and reject the rest",
        |u, args| add_object_step(u, args, ObjectMode::Strict),
    );
    registry.register_with_description(
        "loose_object",
        "Validate declared properties and keep the rest",
        |u, args| add_object_step(u, args, ObjectMode::Loose),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinators::StructuralSteps;
    use crate::steps::builtin::{PrimitiveSteps, RefineSteps};

    fn person(s: &Schema) -> Shape {
        Shape::new()
            .required("name", s.string().unwrap())
            .optional("age", s.number().unwrap())
    }

    #[test]
    fn test_valid_object_keeps_declared_keys() {
        let s = Schema::new();
        let schema = s.object(person(&s)).unwrap();

        let input = Value::object([
            ("name", Value::from("John")),
            ("age", Value::from(30)),
            ("extra", Value::from(true)),
        ]);
        let output = schema.execute(input).wait().into_value().unwrap();
        assert_eq!(
            output,
            Value::object([("name", Value::from("John")), ("age", Value::from(30))])
        );
    }

    #[test]
    fn test_property_issue_gets_key_path() {
        let s = Schema::new();
        let schema = s.object(person(&s)).unwrap();

        let input = Value::object([("name", Value::from("John")), ("age", Value::from("30"))]);
        let issues = schema.execute(input).wait().into_issues().unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "number:type");
        assert_eq!(issues[0].path, vec![PathSegment::from("age")]);
    }

    #[test]
    fn test_missing_required_and_absent_optional() {
        let s = Schema::new();
        let schema = s.object(person(&s)).unwrap();

        let issues = schema.execute(Value::object(Vec::<(&str, Value)>::new())).wait();
        let issues = issues.into_issues().unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, vec![PathSegment::from("name")]);
        assert_eq!(issues[0].payload.get("received"), &Value::from("undefined"));

        let explicit = Value::object([("name", Value::from("a")), ("age", Value::Undefined)]);
        let output = schema.execute(explicit).wait().into_value().unwrap();
        assert!(!output.as_object().unwrap().contains_key("age"));
    }

    #[test]
    fn test_issues_follow_declaration_order() {
        let s = Schema::new();
        let schema = s
            .object(
                Shape::new()
                    .required("b", s.string().unwrap())
                    .required("a", s.string().unwrap()),
            )
            .unwrap();
        let issues = schema
            .execute(Value::object([("a", 1), ("b", 2)]))
            .wait()
            .into_issues()
            .unwrap();
        let paths: Vec<String> = issues.iter().map(|i| i.path_string()).collect();
        assert_eq!(paths, vec![".b", ".a"]);
    }

    #[test]
    fn test_non_object_input() {
        let s = Schema::new();
        let schema = s.object(person(&s)).unwrap();
        let issues = schema.execute(Value::array([1])).wait().into_issues().unwrap();
        assert_eq!(issues[0].code, "object:type");
        assert_eq!(issues[0].message, "Expected object, received array.");
        assert!(issues[0].is_root());
    }

    #[test]
    fn test_strict_object_rejects_unknown_keys_first() {
        let s = Schema::new();
        let schema = s.strict_object(person(&s)).unwrap();

        let input = Value::object([
            ("name", Value::from(1)),
            ("x", Value::Null),
            ("y", Value::Null),
        ]);
        let issues = schema.execute(input).wait().into_issues().unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, UNEXPECTED_KEYS);
        assert_eq!(issues[0].message, "Unexpected keys: x, y.");

        let ok = schema.execute(Value::object([("name", "a")])).wait();
        assert!(ok.is_success());
    }

    #[test]
    fn test_loose_object_keeps_input_keys_in_place() {
        let s = Schema::new();
        let upper = s
            .string()
            .unwrap()
            .transform(|v| Ok(Value::from(v.as_str().unwrap_or_default().to_uppercase())))
            .unwrap();
        let schema = s.loose_object(Shape::new().required("name", upper)).unwrap();

        let input = Value::object([("id", Value::from(1)), ("name", Value::from("ann"))]);
        let output = schema.execute(input).wait().into_value().unwrap();
        assert_eq!(
            output,
            Value::object([("id", Value::from(1)), ("name", Value::from("ANN"))])
        );
    }

    #[test]
    fn test_async_property_escalates_object() {
        let s = Schema::new();
        let slow = s
            .transform_async(|v| async move { Ok::<_, anyhow::Error>(v) })
            .unwrap();
        let schema = s
            .object(Shape::new().required("a", slow).required("b", s.number().unwrap()))
            .unwrap();

        let execution = schema.execute(Value::object([("a", 1), ("b", 2)]));
        assert!(execution.is_pending());
        assert_eq!(
            execution.wait().into_value(),
            Some(Value::object([("a", 1), ("b", 2)]))
        );
    }

    #[test]
    fn test_incoming_failure_passes_through() {
        let s = Schema::new();
        let schema = s.string().unwrap().object(person(&s)).unwrap();
        let issues = schema.execute(1).wait().into_issues().unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "string:type");
    }
}
