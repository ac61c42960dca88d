//! Type-check leaf steps: string, number, boolean, null, any, literal.

use crate::core::error::SchemaResult;
use crate::core::message::Message;
use crate::core::result::ExecutionResult;
use crate::core::types::Value;
use crate::schema::builder::Schema;
use crate::schema::utilities::StepUtilities;
use crate::steps::args::CallArgs;
use crate::steps::registry::StepRegistry;

/// Payload of a `<kind>:type` issue.
pub(crate) fn type_payload(expected: &str, value: &Value) -> Value {
    Value::object([
        ("expected", Value::from(expected)),
        ("received", Value::from(value.kind())),
    ])
}

/// Default message of a `<kind>:type` issue.
pub(crate) fn type_message() -> Message {
    Message::func(|content| {
        let expected = content.payload.get("expected").as_str()?;
        let received = content.payload.get("received").as_str()?;
        Some(format!("Expected {}, received {}.", expected, received))
    })
}

fn add_type_check(
    u: &mut StepUtilities<'_>,
    args: &CallArgs,
    kind: &'static str,
    accepts: fn(&Value) -> bool,
) -> SchemaResult<()> {
    let custom = args.get_message(u.step_name(), 0)?.cloned();
    let issues = u.issue_factory(custom.as_ref(), Some(&type_message()));
    let code = format!("{}:type", kind);

    u.add_success_step(move |value| {
        if accepts(&value) {
            ExecutionResult::success(value).into()
        } else {
            issues.fail(code.as_str(), type_payload(kind, &value)).into()
        }
    });
    Ok(())
}

fn add_literal(u: &mut StepUtilities<'_>, args: &CallArgs) -> SchemaResult<()> {
    let name = u.step_name().to_string();
    let expected = args.get_value(&name, 0)?.clone();
    let custom = args.get_message(&name, 1)?.cloned();
    let default = Message::func(|content| {
        let expected = content.payload.get("expected");
        Some(format!("Expected literal {}.", expected))
    });
    let issues = u.issue_factory(custom.as_ref(), Some(&default));

    u.add_success_step(move |value| {
        if value == expected {
            ExecutionResult::success(value).into()
        } else {
            let payload = Value::object([("expected", expected.clone()), ("received", value)]);
            issues.fail("literal:mismatch", payload).into()
        }
    });
    Ok(())
}

/// Register the type-check steps.
pub fn register(registry: &mut StepRegistry) {
    registry.register_with_description("string", "Accept string values", |u, args| {
        add_type_check(u, args, "string", |v| matches!(v, Value::String(_)))
    });
    registry.register_with_description("number", "Accept numbers other than NaN", |u, args| {
        add_type_check(u, args, "number", |v| matches!(v, Value::Number(n) if !n.is_nan()))
    });
    registry.register_with_description("boolean", "Accept booleans", |u, args| {
        add_type_check(u, args, "boolean", |v| matches!(v, Value::Boolean(_)))
    });
    registry.register_with_description("null", "Accept null", |u, args| {
        add_type_check(u, args, "null", |v| matches!(v, Value::Null))
    });
    registry.register_with_description("any", "Accept every value", |u, _| {
        u.add_step(|result| result.into());
        Ok(())
    });
    registry.register_with_description("literal", "Accept one exact value", add_literal);
}

/// Builder methods for the type-check steps.
pub trait PrimitiveSteps {
    /// Accept strings.
    fn string(&self) -> SchemaResult<Schema>;
    /// Accept strings, with a custom message.
    fn string_with(&self, message: impl Into<Message>) -> SchemaResult<Schema>;
    /// Accept numbers.
    fn number(&self) -> SchemaResult<Schema>;
    /// Accept numbers, with a custom message.
    fn number_with(&self, message: impl Into<Message>) -> SchemaResult<Schema>;
    /// Accept booleans.
    fn boolean(&self) -> SchemaResult<Schema>;
    /// Accept booleans, with a custom message.
    fn boolean_with(&self, message: impl Into<Message>) -> SchemaResult<Schema>;
    /// Accept null.
    fn null(&self) -> SchemaResult<Schema>;
    /// Accept anything.
    fn any(&self) -> SchemaResult<Schema>;
    /// Accept values equal to `value`.
    fn literal(&self, value: impl Into<Value>) -> SchemaResult<Schema>;
    /// Accept values equal to `value`, with a custom message.
    fn literal_with(
        &self,
        value: impl Into<Value>,
        message: impl Into<Message>,
    ) -> SchemaResult<Schema>;
}

impl PrimitiveSteps for Schema {
    fn string(&self) -> SchemaResult<Schema> {
        self.call("string", CallArgs::new())
    }

    fn string_with(&self, message: impl Into<Message>) -> SchemaResult<Schema> {
        self.call("string", CallArgs::new().message(Some(message.into())))
    }

    fn number(&self) -> SchemaResult<Schema> {
        self.call("number", CallArgs::new())
    }

    fn number_with(&self, message: impl Into<Message>) -> SchemaResult<Schema> {
        self.call("number", CallArgs::new().message(Some(message.into())))
    }

    fn boolean(&self) -> SchemaResult<Schema> {
        self.call("boolean", CallArgs::new())
    }

    fn boolean_with(&self, message: impl Into<Message>) -> SchemaResult<Schema> {
        self.call("boolean", CallArgs::new().message(Some(message.into())))
    }

    fn null(&self) -> SchemaResult<Schema> {
        self.call("null", CallArgs::new())
    }

    fn any(&self) -> SchemaResult<Schema> {
        self.call("any", CallArgs::new())
    }

    fn literal(&self, value: impl Into<Value>) -> SchemaResult<Schema> {
        self.call("literal", CallArgs::new().value(value))
    }

    fn literal_with(
        &self,
        value: impl Into<Value>,
        message: impl Into<Message>,
    ) -> SchemaResult<Schema> {
        self.call(
            "literal",
            CallArgs::new().value(value).message(Some(message.into())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::options::SchemaOptions;

    #[test]
    fn test_type_checks() {
        let s = Schema::new();
        assert!(s.string().unwrap().execute("a").wait().is_success());
        assert!(s.number().unwrap().execute(1.5).wait().is_success());
        assert!(s.boolean().unwrap().execute(true).wait().is_success());
        assert!(s.null().unwrap().execute(Value::Null).wait().is_success());
        assert!(s.any().unwrap().execute(Value::Undefined).wait().is_success());

        assert!(s.string().unwrap().execute(1).wait().is_failure());
        assert!(s.number().unwrap().execute(f64::NAN).wait().is_failure());
        assert!(s.null().unwrap().execute(Value::Undefined).wait().is_failure());
    }

    #[test]
    fn test_type_issue_shape() {
        let s = Schema::new();
        let issues = s.string().unwrap().execute(42).wait().into_issues().unwrap();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "string:type");
        assert_eq!(issues[0].payload.get("expected"), &Value::from("string"));
        assert_eq!(issues[0].payload.get("received"), &Value::from("number"));
        assert_eq!(issues[0].message, "Expected string, received number.");
        assert!(issues[0].is_root());
    }

    #[test]
    fn test_custom_message_beats_default_and_global() {
        let s = Schema::with_options(SchemaOptions::new().with_global_message("Global."));
        let issues = s
            .number_with("Need a number.")
            .unwrap()
            .execute("x")
            .wait()
            .into_issues()
            .unwrap();
        assert_eq!(issues[0].message, "Need a number.");
    }

    #[test]
    fn test_literal() {
        let s = Schema::new();
        let schema = s.literal(42).unwrap();
        assert_eq!(schema.execute(42).wait().into_value(), Some(Value::from(42)));

        let issues = schema.execute(41).wait().into_issues().unwrap();
        assert_eq!(issues[0].code, "literal:mismatch");
        assert_eq!(issues[0].message, "Expected literal 42.");

        let custom = s.literal_with("a", "Only 'a'.").unwrap();
        assert_eq!(
            custom.execute("b").wait().into_issues().unwrap()[0].message,
            "Only 'a'."
        );
    }

    #[test]
    fn test_failures_pass_through() {
        let s = Schema::new();
        let schema = s.number().unwrap().string().unwrap();
        let issues = schema.execute(Value::Null).wait().into_issues().unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "number:type");
    }
}
