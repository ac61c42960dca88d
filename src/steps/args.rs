//! Arguments passed from a builder call to a step implementation.

use crate::combinators::object::Shape;
use crate::core::error::{SchemaError, SchemaResult};
use crate::core::message::Message;
use crate::core::types::Value;
use crate::schema::builder::Schema;
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

/// Synchronous value transform. An `Err` is reported as an unknown exception.
pub type TransformFn = Arc<dyn Fn(Value) -> anyhow::Result<Value> + Send + Sync>;

/// Asynchronous value transform.
pub type AsyncTransformFn =
    Arc<dyn Fn(Value) -> BoxFuture<'static, anyhow::Result<Value>> + Send + Sync>;

/// Synchronous predicate.
pub type PredicateFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Asynchronous predicate. Receives its own copy of the value.
pub type AsyncPredicateFn = Arc<dyn Fn(Value) -> BoxFuture<'static, bool> + Send + Sync>;

/// Deferred schema lookup, used for recursive schemas.
pub type GetterFn = Arc<dyn Fn() -> Schema + Send + Sync>;

/// A single positional argument.
#[derive(Clone)]
pub enum Arg {
    /// Plain value (literals, fallbacks)
    Value(Value),
    /// A sub-schema
    Schema(Schema),
    /// A list of sub-schemas (union/intersection branches)
    Schemas(Vec<Schema>),
    /// An object descriptor
    Shape(Shape),
    /// A custom message
    Message(Message),
    /// Synchronous transform
    Transform(TransformFn),
    /// Asynchronous transform
    AsyncTransform(AsyncTransformFn),
    /// Synchronous predicate
    Predicate(PredicateFn),
    /// Asynchronous predicate
    AsyncPredicate(AsyncPredicateFn),
    /// Deferred schema lookup
    Getter(GetterFn),
}

impl Arg {
    /// Name of the argument kind, for error reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            Arg::Value(_) => "value",
            Arg::Schema(_) => "schema",
            Arg::Schemas(_) => "schemas",
            Arg::Shape(_) => "shape",
            Arg::Message(_) => "message",
            Arg::Transform(_) => "transform",
            Arg::AsyncTransform(_) => "async transform",
            Arg::Predicate(_) => "predicate",
            Arg::AsyncPredicate(_) => "async predicate",
            Arg::Getter(_) => "getter",
        }
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Arg::Message(message) => f.debug_tuple("Message").field(message).finish(),
            other => write!(f, "<{}>", other.kind()),
        }
    }
}

/// Positional arguments of one builder call.
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    args: Vec<Arg>,
}

impl CallArgs {
    /// Create an empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an argument.
    pub fn arg(mut self, arg: Arg) -> Self {
        self.args.push(arg);
        self
    }

    /// Append a value argument.
    pub fn value(self, value: impl Into<Value>) -> Self {
        self.arg(Arg::Value(value.into()))
    }

    /// Append a message argument, if one is given.
    pub fn message(self, message: Option<Message>) -> Self {
        match message {
            Some(message) => self.arg(Arg::Message(message)),
            None => self,
        }
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Whether there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Raw argument at `index`.
    pub fn get(&self, index: usize) -> Option<&Arg> {
        self.args.get(index)
    }

    // ========================================================================
    // Typed Getters
    // ========================================================================

    fn required<'a, T>(
        &'a self,
        step: &str,
        index: usize,
        expected: &'static str,
        pick: impl Fn(&'a Arg) -> Option<T>,
    ) -> SchemaResult<T> {
        let arg = self.args.get(index).ok_or_else(|| SchemaError::MissingArgument {
            step: step.to_string(),
            index,
        })?;
        pick(arg).ok_or_else(|| SchemaError::InvalidArgument {
            step: step.to_string(),
            index,
            expected,
            got: arg.kind(),
        })
    }

    /// Value argument at `index`.
    pub fn get_value(&self, step: &str, index: usize) -> SchemaResult<&Value> {
        self.required(step, index, "value", |arg| match arg {
            Arg::Value(value) => Some(value),
            _ => None,
        })
    }

    /// Schema argument at `index`.
    pub fn get_schema(&self, step: &str, index: usize) -> SchemaResult<&Schema> {
        self.required(step, index, "schema", |arg| match arg {
            Arg::Schema(schema) => Some(schema),
            _ => None,
        })
    }

    /// Schema list argument at `index`.
    pub fn get_schemas(&self, step: &str, index: usize) -> SchemaResult<&[Schema]> {
        self.required(step, index, "schemas", |arg| match arg {
            Arg::Schemas(schemas) => Some(schemas.as_slice()),
            _ => None,
        })
    }

    /// Object descriptor argument at `index`.
    pub fn get_shape(&self, step: &str, index: usize) -> SchemaResult<&Shape> {
        self.required(step, index, "shape", |arg| match arg {
            Arg::Shape(shape) => Some(shape),
            _ => None,
        })
    }

    /// Transform argument at `index`.
    pub fn get_transform(&self, step: &str, index: usize) -> SchemaResult<&TransformFn> {
        self.required(step, index, "transform", |arg| match arg {
            Arg::Transform(f) => Some(f),
            _ => None,
        })
    }

    /// Async transform argument at `index`.
    pub fn get_async_transform(&self, step: &str, index: usize) -> SchemaResult<&AsyncTransformFn> {
        self.required(step, index, "async transform", |arg| match arg {
            Arg::AsyncTransform(f) => Some(f),
            _ => None,
        })
    }

    /// Predicate argument at `index`.
    pub fn get_predicate(&self, step: &str, index: usize) -> SchemaResult<&PredicateFn> {
        self.required(step, index, "predicate", |arg| match arg {
            Arg::Predicate(f) => Some(f),
            _ => None,
        })
    }

    /// Async predicate argument at `index`.
    pub fn get_async_predicate(&self, step: &str, index: usize) -> SchemaResult<&AsyncPredicateFn> {
        self.required(step, index, "async predicate", |arg| match arg {
            Arg::AsyncPredicate(f) => Some(f),
            _ => None,
        })
    }

    /// Getter argument at `index`.
    pub fn get_getter(&self, step: &str, index: usize) -> SchemaResult<&GetterFn> {
        self.required(step, index, "getter", |arg| match arg {
            Arg::Getter(f) => Some(f),
            _ => None,
        })
    }

    /// Optional message argument at `index`. A missing argument is `None`;
    /// an argument of another kind is an error.
    pub fn get_message(&self, step: &str, index: usize) -> SchemaResult<Option<&Message>> {
        match self.args.get(index) {
            None => Ok(None),
            Some(Arg::Message(message)) => Ok(Some(message)),
            Some(other) => Err(SchemaError::InvalidArgument {
                step: step.to_string(),
                index,
                expected: "message",
                got: other.kind(),
            }),
        }
    }
}

impl From<Vec<Arg>> for CallArgs {
    fn from(args: Vec<Arg>) -> Self {
        Self { args }
    }
}
