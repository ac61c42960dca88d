//! # Validant - Composable Runtime Validation
//!
//! Validant validates and transforms untyped values with reusable schemas
//! built from small steps. A schema is an immutable list of steps; executing
//! it threads a result through every step and returns either the validated
//! value or a list of structured issues.
//!
//! ## Features
//!
//! - **Step Pipelines**: Schemas are ordered lists of steps appended by builder calls
//! - **Sync Until Async**: Schemas run synchronously until a step returns a future
//! - **Structured Issues**: Every failure carries a code, payload, message and path
//! - **Combinators**: Objects, arrays, unions, intersections and recursive schemas
//! - **Extensible**: Register custom steps in a [`StepRegistry`](steps::StepRegistry)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use validant::prelude::*;
//!
//! let s = Schema::new();
//! let user = s.object(
//!     Shape::new()
//!         .required("name", s.string()?)
//!         .optional("age", s.number()?),
//! )?;
//!
//! let result = user
//!     .execute(Value::object([("name", Value::from("John")), ("age", Value::from("30"))]))
//!     .wait();
//!
//! let issues = result.into_issues().unwrap();
//! assert_eq!(issues[0].path, vec![PathSegment::from("age")]);
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`core`]: Values, issues, results, messages and errors
//! - [`execution`]: Steps and the pipeline executor
//! - [`schema`]: Immutable schemas, options and the standard-schema adapter
//! - [`steps`]: Step registry, builder arguments and built-in steps
//! - [`combinators`]: Object, array, union, intersection and lazy schemas
//!
//! ## Creating Custom Steps
//!
//! Register a step implementation and invoke it by name:
//!
//! ```rust,ignore
//! use validant::prelude::*;
//!
//! let registry = RegistryBuilder::new()
//!     .register("even", |u, args| {
//!         let issues = u.issue_factory(args.get_message("even", 0)?, None);
//!         u.add_success_step(move |value| {
//!             match value.as_number() {
//!                 Some(n) if n % 2.0 == 0.0 => ExecutionResult::success(value).into(),
//!                 _ => issues.fail("even:failed", value).into(),
//!             }
//!         });
//!         Ok(())
//!     })
//!     .build();
//!
//! let even = Schema::with_registry(registry).call("even", CallArgs::new())?;
//! assert!(even.execute(4).wait().is_success());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod combinators;
pub mod core;
pub mod execution;
pub mod schema;
pub mod steps;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use validant::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::types::{Object, Value};
    pub use crate::core::issue::{prepend_issue_path, Issue, IssueContent, PathSegment};
    pub use crate::core::result::{is_failure, is_success, ExecutionResult};
    pub use crate::core::message::{resolve_message, Message};

    // Errors
    pub use crate::core::error::{SchemaError, SchemaResult, UNKNOWN_EXCEPTION};

    // Execution
    pub use crate::execution::outcome::Execution;
    pub use crate::execution::step::{Step, StepOutput};

    // Schema
    pub use crate::schema::builder::Schema;
    pub use crate::schema::options::SchemaOptions;
    pub use crate::schema::standard::{StandardResult, StandardSchema};
    pub use crate::schema::utilities::{IssueFactory, StepUtilities};

    // Steps
    pub use crate::steps::args::{Arg, CallArgs};
    pub use crate::steps::registry::{RegistryBuilder, StepRegistry};
    pub use crate::steps::builtin::{PrimitiveSteps, RefineSteps};

    // Combinators
    pub use crate::combinators::{Field, Shape, StructuralSteps};
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
        assert_eq!(super::NAME, "validant");
    }

    #[test]
    fn test_custom_step_through_prelude() {
        let registry = RegistryBuilder::new()
            .register("even", |u, args| {
                let issues = u.issue_factory(args.get_message("even", 0)?, None);
                u.add_success_step(move |value| match value.as_number() {
                    Some(n) if n % 2.0 == 0.0 => ExecutionResult::success(value).into(),
                    _ => issues.fail("even:failed", value).into(),
                });
                Ok(())
            })
            .build();

        let even = Schema::with_registry(registry)
            .call("even", CallArgs::new())
            .unwrap();
        assert!(even.execute(4).wait().is_success());

        let issues = even.execute(3).wait().into_issues().unwrap();
        assert_eq!(issues[0].code, "even:failed");
        assert_eq!(issues[0].message, "Invalid value.");
    }

    #[test]
    fn test_registry_with_builtins() {
        let registry = StepRegistry::with_builtins();

        // Check some built-in steps exist
        assert!(registry.contains("string"));
        assert!(registry.contains("literal"));
        assert!(registry.contains("transform_async"));
        assert!(registry.contains("strict_object"));
        assert!(registry.contains("union"));
        assert!(registry.contains("lazy"));
    }
}
