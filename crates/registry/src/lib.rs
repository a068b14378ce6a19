//! Comparer registration and exact-type lookup.

pub mod builder;
pub mod registry;

pub use builder::RegistryBuilder;
pub use registry::{Candidates, ComparerRegistry, RegisteredComparer};

use equate_core::{ArgumentEqualityComparer, ErasedComparer, TypedComparer};
use std::any::Any;
use std::sync::Arc;

/// Explicit discovery hook: a plugin registers a related set of comparers
/// during initialization.
pub trait ComparerPlugin: Send + Sync {
    fn name(&self) -> &str;

    fn register(&self, registrar: &mut PluginRegistrar);
}

/// Batch handed to [`ComparerPlugin::register`].
///
/// Nothing reaches the registry until the plugin returns; the whole batch is
/// then inserted under one write lock.
#[derive(Default)]
pub struct PluginRegistrar {
    comparers: Vec<Arc<dyn ErasedComparer>>,
}

impl PluginRegistrar {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub fn register<T, C>(&mut self, comparer: C) -> &mut Self
    where
        T: Any,
        C: ArgumentEqualityComparer<T>,
    {
        self.comparers
            .push(Arc::new(TypedComparer::<T, C>::new(comparer)));
        self
    }

    pub fn register_erased(&mut self, comparer: Arc<dyn ErasedComparer>) -> &mut Self {
        self.comparers.push(comparer);
        self
    }

    pub fn len(&self) -> usize {
        self.comparers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comparers.is_empty()
    }

    pub(crate) fn into_comparers(self) -> Vec<Arc<dyn ErasedComparer>> {
        self.comparers
    }
}
