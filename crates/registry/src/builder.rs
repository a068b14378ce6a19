//! Initialization-phase builder for a [`ComparerRegistry`].

use crate::{ComparerPlugin, ComparerRegistry};
use equate_core::ArgumentEqualityComparer;
use std::any::Any;
use std::sync::Arc;

/// Collects comparers and plugins before any matching starts.
///
/// Registration order is call order, which is what the tie-break sees.
///
/// ```ignore
/// let registry = ComparerRegistry::builder()
///     .comparer::<Widget, _>(ByValue)
///     .plugin(&GeometryComparers)
///     .build_shared();
/// ```
#[derive(Default)]
pub struct RegistryBuilder {
    registry: ComparerRegistry,
    plugins: usize,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn comparer<T, C>(self, comparer: C) -> Self
    where
        T: Any,
        C: ArgumentEqualityComparer<T>,
    {
        self.registry.register::<T, C>(comparer);
        self
    }

    pub fn plugin(mut self, plugin: &dyn ComparerPlugin) -> Self {
        self.registry.install(plugin);
        self.plugins += 1;
        self
    }

    pub fn build(self) -> ComparerRegistry {
        tracing::info!(
            comparers = self.registry.len(),
            plugins = self.plugins,
            "comparer registry built"
        );
        self.registry
    }

    pub fn build_shared(self) -> Arc<ComparerRegistry> {
        Arc::new(self.build())
    }
}
