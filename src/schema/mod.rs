//! Schema construction.
//!
//! Contains the immutable [`Schema`], its options, the utilities handed to
//! step implementations and the standard-schema adapter.

pub mod builder;
pub mod options;
pub mod utilities;
pub mod standard;

pub use builder::Schema;
pub use options::SchemaOptions;
pub use utilities::{IssueFactory, StepUtilities};
pub use standard::{StandardIssue, StandardResult, StandardSchema};
