//! Built-in steps registered by [`StepRegistry::with_builtins`].

pub mod primitive;
pub mod refine;

use crate::steps::registry::StepRegistry;

pub use primitive::PrimitiveSteps;
pub use refine::RefineSteps;

/// Register every built-in step, combinators included.
pub fn register_all(registry: &mut StepRegistry) {
    primitive::register(registry);
    refine::register(registry);
    crate::combinators::register(registry);
    log::trace!("registered {} built-in steps", registry.len());
}
