//! Execution engine module.
//!
//! This module runs a schema's steps over a value, switching from direct
//! to future-based chaining at the first asynchronous step.

pub mod step;
pub mod outcome;
pub mod engine;

pub use step::{Step, StepFn, StepFuture, StepOutput};
pub use outcome::Execution;
pub use engine::{execute_steps, run_step};
