//! Immutable schemas built by appending steps.

use crate::core::error::{SchemaError, SchemaResult};
use crate::core::types::Value;
use crate::execution::engine::execute_steps;
use crate::execution::outcome::Execution;
use crate::execution::step::Step;
use crate::schema::options::SchemaOptions;
use crate::schema::utilities::StepUtilities;
use crate::steps::args::CallArgs;
use crate::steps::registry::StepRegistry;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Registry with the built-in steps, shared by schemas created with
/// [`Schema::new`].
fn builtin_registry() -> Arc<StepRegistry> {
    static BUILTINS: OnceLock<Arc<StepRegistry>> = OnceLock::new();
    Arc::clone(BUILTINS.get_or_init(|| Arc::new(StepRegistry::with_builtins())))
}

/// An immutable, ordered list of steps plus the registry used to extend it.
///
/// Builder calls never modify a schema: each returns a new schema whose
/// steps are the parent's followed by the appended ones. Cloning is cheap
/// and a schema can be executed any number of times, from any thread, and
/// embedded in any number of parent schemas.
///
/// # Example
///
/// ```rust,ignore
/// use validant::prelude::*;
///
/// let s = Schema::new();
/// let user = s.object(
///     Shape::new()
///         .required("name", s.string()?)
///         .optional("age", s.number()?),
/// )?;
///
/// let result = user.execute(Value::object([("name", "John")])).wait();
/// assert!(result.is_success());
/// ```
#[derive(Clone)]
pub struct Schema {
    steps: Arc<[Step]>,
    registry: Arc<StepRegistry>,
    options: Arc<SchemaOptions>,
}

impl Schema {
    /// Create an empty schema using the built-in registry and default options.
    pub fn new() -> Self {
        Self::from_parts(builtin_registry(), Arc::new(SchemaOptions::default()))
    }

    /// Create an empty schema with a custom registry.
    pub fn with_registry(registry: StepRegistry) -> Self {
        Self::from_parts(Arc::new(registry), Arc::new(SchemaOptions::default()))
    }

    /// Create an empty schema with custom options and the built-in registry.
    pub fn with_options(options: SchemaOptions) -> Self {
        Self::from_parts(builtin_registry(), Arc::new(options))
    }

    /// Create an empty schema from a shared registry and options.
    pub fn from_parts(registry: Arc<StepRegistry>, options: Arc<SchemaOptions>) -> Self {
        Self {
            steps: Arc::from(Vec::new()),
            registry,
            options,
        }
    }

    /// An empty schema sharing this schema's registry and options.
    ///
    /// Handy for building sub-schemas in the same configuration.
    pub fn empty(&self) -> Schema {
        Self::from_parts(Arc::clone(&self.registry), Arc::clone(&self.options))
    }

    /// Invoke the step implementation registered as `name`.
    ///
    /// The implementation works on a copy of this schema's step list and the
    /// result is returned as a new schema.
    pub fn call(&self, name: &str, args: CallArgs) -> SchemaResult<Schema> {
        let implementation = self
            .registry
            .get(name)
            .ok_or_else(|| SchemaError::UnknownStep {
                name: name.to_string(),
            })?;

        let mut steps = self.steps.to_vec();
        {
            let mut utilities =
                StepUtilities::new(name, &mut steps, &self.options, &self.registry);
            implementation(&mut utilities, &args)?;
        }

        Ok(Schema {
            steps: steps.into(),
            registry: Arc::clone(&self.registry),
            options: Arc::clone(&self.options),
        })
    }

    /// Run the schema on `value`.
    ///
    /// Returns [`Execution::Ready`] when every step completed synchronously
    /// and [`Execution::Pending`] as soon as one step was asynchronous.
    pub fn execute(&self, value: impl Into<Value>) -> Execution {
        execute_steps(&self.steps, value.into(), &self.options)
    }

    /// The steps of this schema, in execution order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Names of the steps of this schema, in execution order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the schema has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Registry used by builder calls.
    pub fn registry(&self) -> &Arc<StepRegistry> {
        &self.registry
    }

    /// Options shared by this schema's steps.
    pub fn options(&self) -> &Arc<SchemaOptions> {
        &self.options
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("steps", &self.step_names())
            .field("vendor", &self.options.vendor)
            .finish()
    }
}
