//! Step module.
//!
//! Contains the step registry, builder-call arguments and built-in steps.

pub mod args;
pub mod registry;
pub mod builtin;

pub use args::{Arg, CallArgs};
pub use registry::{RegistryBuilder, RegistryEntry, StepImpl, StepRegistry};
