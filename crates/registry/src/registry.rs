//! Append-only catalog of comparers, keyed by exact argument type.
//!
//! Registration takes the write lock and assigns the ordinal under it, so a
//! reader sees either all of a registration or none of it. Lookups clone the
//! `Arc`s out of the lock: no lock is held while a comparer runs.
//!
//! A comparer's priority and name are read once, at registration, and never
//! again: resolution does not call into user code.

use crate::builder::RegistryBuilder;
use crate::{ComparerPlugin, PluginRegistrar};
use equate_core::{ArgumentEqualityComparer, ComparerId, ErasedComparer, Priority, TypedComparer};
use smallvec::SmallVec;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A comparer together with its registration ordinal and the priority it
/// reported when registered.
#[derive(Clone)]
pub struct RegisteredComparer {
    id: ComparerId,
    priority: Priority,
    name: &'static str,
    comparer: Arc<dyn ErasedComparer>,
}

impl RegisteredComparer {
    pub fn id(&self) -> ComparerId {
        self.id
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn target_type(&self) -> TypeId {
        self.comparer.target_type()
    }

    pub fn target_type_name(&self) -> &'static str {
        self.comparer.target_type_name()
    }

    pub fn comparer(&self) -> &dyn ErasedComparer {
        &*self.comparer
    }
}

impl fmt::Debug for RegisteredComparer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredComparer")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("target", &self.target_type_name())
            .field("priority", &self.priority())
            .finish()
    }
}

/// Comparers eligible for one type, in registration order.
///
/// Most types have one or two comparers; `SmallVec` keeps them inline.
pub type Candidates = SmallVec<[RegisteredComparer; 4]>;

#[derive(Default)]
struct Catalog {
    by_type: HashMap<TypeId, Candidates>,
    next_id: u32,
    len: usize,
}

/// A comparer whose metadata has been read, waiting for the write lock.
struct Pending {
    priority: Priority,
    name: &'static str,
    comparer: Arc<dyn ErasedComparer>,
}

impl Pending {
    fn new(comparer: Arc<dyn ErasedComparer>) -> Self {
        Self {
            priority: comparer.priority(),
            name: comparer.name(),
            comparer,
        }
    }

    fn insert(self, catalog: &mut Catalog) -> ComparerId {
        let id = ComparerId(catalog.next_id);
        catalog.next_id += 1;

        tracing::debug!(
            id = %id,
            comparer = self.name,
            target = self.comparer.target_type_name(),
            priority = %self.priority,
            "registered comparer"
        );

        catalog
            .by_type
            .entry(self.comparer.target_type())
            .or_default()
            .push(RegisteredComparer {
                id,
                priority: self.priority,
                name: self.name,
                comparer: self.comparer,
            });
        catalog.len += 1;

        id
    }
}

/// Set of registered comparers, shared by every matcher built on it.
///
/// ```ignore
/// let registry = ComparerRegistry::new();
/// registry.register::<Widget, _>(ByValue);
/// let candidates = registry.lookup_for::<Widget>();
/// ```
#[derive(Default)]
pub struct ComparerRegistry {
    catalog: RwLock<Catalog>,
}

impl ComparerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Registers `comparer` for arguments of exactly type `T`.
    ///
    /// Any number of comparers may target the same type.
    pub fn register<T, C>(&self, comparer: C) -> ComparerId
    where
        T: Any,
        C: ArgumentEqualityComparer<T>,
    {
        self.register_erased(Arc::new(TypedComparer::<T, C>::new(comparer)))
    }

    pub fn register_erased(&self, comparer: Arc<dyn ErasedComparer>) -> ComparerId {
        // User code runs before the lock is taken.
        let entry = Pending::new(comparer);
        entry.insert(&mut self.write())
    }

    /// Collects `plugin`'s comparers, then registers all of them under a
    /// single write lock so they receive consecutive ordinals.
    ///
    /// Returns the ids the plugin's comparers were given, in order.
    pub fn install(&self, plugin: &dyn ComparerPlugin) -> Vec<ComparerId> {
        let mut registrar = PluginRegistrar::new();
        plugin.register(&mut registrar);

        let pending: Vec<Pending> = registrar
            .into_comparers()
            .into_iter()
            .map(Pending::new)
            .collect();
        let ids: Vec<ComparerId> = {
            let mut catalog = self.write();
            pending.into_iter().map(|p| p.insert(&mut catalog)).collect()
        };

        tracing::info!(
            plugin = plugin.name(),
            added = ids.len(),
            "installed comparer plugin"
        );
        ids
    }

    /// Every comparer whose target type is exactly `target`.
    ///
    /// Empty when none is registered; callers fall back to default equality.
    pub fn lookup(&self, target: TypeId) -> Candidates {
        self.read()
            .by_type
            .get(&target)
            .cloned()
            .unwrap_or_default()
    }

    pub fn lookup_for<T: Any>(&self) -> Candidates {
        self.lookup(TypeId::of::<T>())
    }

    pub fn contains<T: Any>(&self) -> bool {
        self.read().by_type.contains_key(&TypeId::of::<T>())
    }

    /// Total number of registered comparers across all types.
    pub fn len(&self) -> usize {
        self.read().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every registration. Ordinals keep increasing afterwards.
    pub fn clear(&self) {
        let mut catalog = self.write();
        let removed = catalog.len;
        catalog.by_type.clear();
        catalog.len = 0;

        tracing::info!(removed, "comparer registry cleared");
    }

    /// All candidates grouped per type, groups ordered by first registration.
    pub fn snapshot(&self) -> Vec<Candidates> {
        let mut groups: Vec<Candidates> = self.read().by_type.values().cloned().collect();
        groups.sort_by_key(|group| group.first().map(RegisteredComparer::id));
        groups
    }

    // Registration is append-only, so data behind a poisoned lock is still
    // consistent.
    fn read(&self) -> RwLockReadGuard<'_, Catalog> {
        self.catalog.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Catalog> {
        self.catalog.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ComparerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let catalog = self.read();
        f.debug_struct("ComparerRegistry")
            .field("types", &catalog.by_type.len())
            .field("comparers", &catalog.len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use equate_core::{BoxError, FnComparer};
    use std::sync::atomic::{AtomicI16, Ordering};

    #[derive(Debug, PartialEq)]
    struct Base {
        value: i32,
    }

    #[derive(Debug, PartialEq)]
    struct Derived {
        base: Base,
    }

    fn always(result: bool) -> impl Fn(Option<&Base>, Option<&Base>) -> Result<bool, BoxError> {
        move |_, _| Ok(result)
    }

    #[test]
    fn empty_lookup_is_not_an_error() {
        let registry = ComparerRegistry::new();
        assert!(registry.lookup_for::<Base>().is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn lookup_returns_all_in_registration_order() {
        let registry = ComparerRegistry::new();
        let a = registry.register::<Base, _>(FnComparer::new("a", always(true)));
        let b = registry
            .register::<Base, _>(FnComparer::new("b", always(false)).with_priority(4i16));

        let found = registry.lookup_for::<Base>();
        let ids: Vec<_> = found.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec![a, b]);
        assert_eq!(found[1].priority(), Priority(4));
        assert_eq!(found[0].name(), "a");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn lookup_matches_exact_type_only() {
        let registry = ComparerRegistry::new();
        registry.register::<Base, _>(FnComparer::new("base", always(true)));

        assert!(registry.contains::<Base>());
        assert!(registry.lookup_for::<Derived>().is_empty());
        assert!(registry.lookup_for::<Option<Base>>().is_empty());
        assert!(registry.lookup_for::<Box<Base>>().is_empty());
    }

    #[test]
    fn clear_empties_but_keeps_ordinals_increasing() {
        let registry = ComparerRegistry::new();
        let first = registry.register::<Base, _>(FnComparer::new("a", always(true)));
        registry.clear();
        assert!(registry.lookup_for::<Base>().is_empty());
        assert_eq!(registry.len(), 0);

        let second = registry.register::<Base, _>(FnComparer::new("b", always(true)));
        assert!(second > first);
    }

    #[test]
    fn snapshot_groups_by_type_in_first_registration_order() {
        let registry = ComparerRegistry::new();
        registry.register::<Derived, _>(FnComparer::new(
            "d",
            |_: Option<&Derived>, _: Option<&Derived>| Ok::<_, BoxError>(true),
        ));
        registry.register::<Base, _>(FnComparer::new("b1", always(true)));
        registry.register::<Base, _>(FnComparer::new("b2", always(true)));

        let groups = registry.snapshot();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0][0].name(), "d");
        assert_eq!(groups[1].len(), 2);
    }

    struct BasePlugin;

    impl ComparerPlugin for BasePlugin {
        fn name(&self) -> &str {
            "base-plugin"
        }

        fn register(&self, registrar: &mut PluginRegistrar) {
            registrar
                .register::<Base, _>(FnComparer::new("p1", always(true)))
                .register::<Base, _>(FnComparer::new("p2", always(true)));
        }
    }

    #[test]
    fn install_counts_plugin_registrations() {
        let registry = ComparerRegistry::new();
        assert_eq!(registry.install(&BasePlugin).len(), 2);
        assert_eq!(registry.lookup_for::<Base>().len(), 2);
    }

    #[test]
    fn install_reports_only_its_own_comparers_under_concurrent_registration() {
        use rayon::prelude::*;

        let registry = ComparerRegistry::new();
        let installs: Vec<Vec<ComparerId>> = (0..64)
            .into_par_iter()
            .filter_map(|i| {
                if i % 4 == 0 {
                    Some(registry.install(&BasePlugin))
                } else {
                    registry.register::<Base, _>(FnComparer::new("other", always(true)));
                    None
                }
            })
            .collect();

        assert_eq!(installs.len(), 16);
        for ids in &installs {
            assert_eq!(ids.len(), 2);
            assert_eq!(ids[1].0, ids[0].0 + 1, "plugin ids interleaved: {ids:?}");
        }
        assert_eq!(registry.len(), 16 * 2 + 48);
    }

    struct Drifting {
        reads: AtomicI16,
    }

    impl ArgumentEqualityComparer<Base> for Drifting {
        fn priority(&self) -> Priority {
            Priority(self.reads.fetch_add(2, Ordering::SeqCst))
        }

        fn name(&self) -> &'static str {
            "drifting"
        }

        fn are_equal(&self, _: Option<&Base>, _: Option<&Base>) -> Result<bool, BoxError> {
            Ok(true)
        }
    }

    #[test]
    fn priority_is_captured_once_at_registration() {
        let registry = ComparerRegistry::new();
        registry.register::<Base, _>(Drifting {
            reads: AtomicI16::new(0),
        });
        registry.register::<Base, _>(
            FnComparer::new("fixed", always(false)).with_priority(Priority(5)),
        );

        for _ in 0..10 {
            let candidates = registry.lookup_for::<Base>();
            let drifting = &candidates[0];
            assert_eq!(drifting.name(), "drifting");
            assert_eq!(drifting.priority(), Priority(0));
            assert!(candidates[1].priority() > drifting.priority());
        }
    }

    #[test]
    fn concurrent_lookups_see_complete_registrations() {
        use rayon::prelude::*;

        let registry = ComparerRegistry::new();
        for _ in 0..3 {
            registry.register::<Base, _>(FnComparer::new("c", always(true)));
        }

        let sizes: Vec<usize> = (0..256)
            .into_par_iter()
            .map(|_| registry.lookup_for::<Base>().len())
            .collect();
        assert!(sizes.iter().all(|&n| n == 3));
    }

    #[test]
    fn late_registration_is_serialized_with_reads() {
        use rayon::prelude::*;

        let registry = ComparerRegistry::new();
        (0..64).into_par_iter().for_each(|i| {
            if i % 2 == 0 {
                registry.register::<Base, _>(FnComparer::new("late", always(true)));
            } else {
                let seen = registry.lookup_for::<Base>();
                let ids: Vec<_> = seen.iter().map(|c| c.id()).collect();
                assert!(ids.windows(2).all(|w| w[0] < w[1]));
            }
        });
        assert_eq!(registry.len(), 32);
    }
}
