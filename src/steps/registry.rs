//! Step registry: named step implementations available to builder calls.

use crate::core::error::SchemaResult;
use crate::schema::utilities::StepUtilities;
use crate::steps::args::CallArgs;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// A step implementation.
///
/// Receives utilities bound to the new schema's step list and the builder
/// call's arguments, and appends one or more steps through the utilities.
pub type StepImpl =
    Arc<dyn Fn(&mut StepUtilities<'_>, &CallArgs) -> SchemaResult<()> + Send + Sync>;

/// Registry entry containing an implementation and its description.
#[derive(Clone)]
pub struct RegistryEntry {
    /// The implementation invoked by builder calls.
    pub implementation: StepImpl,
    /// Short human-readable description.
    pub description: String,
}

/// Lookup table of step implementations by name.
///
/// Registering a name that already exists replaces the earlier
/// implementation. The registry is built once and then shared, immutably,
/// by every schema created from it.
#[derive(Clone, Default)]
pub struct StepRegistry {
    steps: IndexMap<String, RegistryEntry>,
}

impl StepRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            steps: IndexMap::new(),
        }
    }

    /// Create a registry pre-populated with the built-in steps.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::steps::builtin::register_all(&mut registry);
        registry
    }

    /// Register a step implementation, replacing any existing one.
    pub fn register<F>(&mut self, name: impl Into<String>, implementation: F)
    where
        F: Fn(&mut StepUtilities<'_>, &CallArgs) -> SchemaResult<()> + Send + Sync + 'static,
    {
        self.register_with_description(name, String::new(), implementation);
    }

    /// Register a step implementation with a description.
    pub fn register_with_description<F>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        implementation: F,
    ) where
        F: Fn(&mut StepUtilities<'_>, &CallArgs) -> SchemaResult<()> + Send + Sync + 'static,
    {
        self.insert(
            name.into(),
            RegistryEntry {
                implementation: Arc::new(implementation),
                description: description.into(),
            },
        );
    }

    fn insert(&mut self, name: String, entry: RegistryEntry) {
        if self.steps.contains_key(&name) {
            log::debug!("step '{}' re-registered, replacing previous implementation", name);
        }
        self.steps.insert(name, entry);
    }

    /// Merge another registry into this one. Entries from `other` win.
    pub fn merge(&mut self, other: &StepRegistry) {
        for (name, entry) in &other.steps {
            self.insert(name.clone(), entry.clone());
        }
    }

    /// Get the implementation registered under `name`.
    pub fn get(&self, name: &str) -> Option<&StepImpl> {
        self.steps.get(name).map(|e| &e.implementation)
    }

    /// Get a registry entry.
    pub fn get_entry(&self, name: &str) -> Option<&RegistryEntry> {
        self.steps.get(name)
    }

    /// Check if a step is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.steps.contains_key(name)
    }

    /// All registered step names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.steps.keys().map(|s| s.as_str())
    }

    /// Unregister a step.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.steps.shift_remove(name).is_some()
    }

    /// Get the total number of registered steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Debug for StepRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepRegistry")
            .field("steps", &self.steps.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for creating a customized registry.
pub struct RegistryBuilder {
    registry: StepRegistry,
    include_builtins: bool,
}

impl RegistryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            registry: StepRegistry::new(),
            include_builtins: true,
        }
    }

    /// Include or exclude built-in steps.
    pub fn with_builtins(mut self, include: bool) -> Self {
        self.include_builtins = include;
        self
    }

    /// Register a custom step.
    pub fn register<F>(mut self, name: impl Into<String>, implementation: F) -> Self
    where
        F: Fn(&mut StepUtilities<'_>, &CallArgs) -> SchemaResult<()> + Send + Sync + 'static,
    {
        self.registry.register(name, implementation);
        self
    }

    /// Merge every step of another registry.
    pub fn merge(mut self, other: &StepRegistry) -> Self {
        self.registry.merge(other);
        self
    }

    /// Build the registry. Custom steps override built-ins of the same name.
    pub fn build(self) -> StepRegistry {
        if !self.include_builtins {
            return self.registry;
        }
        let mut registry = StepRegistry::with_builtins();
        registry.merge(&self.registry);
        registry
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
