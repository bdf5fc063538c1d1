//! Binding types.

use std::any::Any;
use std::sync::Arc;

use crate::container::ResolverContext;
use crate::error::DiResult;
use crate::internal::{Map, Mutex};
use crate::key::Key;
use crate::lifetime::Lifetime;

// Type-erased Arc for storage
pub type AnyArc = Arc<dyn Any + Send + Sync>;

/// Factory callable: resolution context and caller parameters in, instance out.
pub type FactoryFn =
    Arc<dyn for<'a> Fn(&ResolverContext<'a>, &[AnyArc]) -> DiResult<AnyArc> + Send + Sync>;

/// What a binding produces, decided once at bind time.
#[derive(Clone)]
pub(crate) enum Concrete {
    /// Invoke the factory; its result is final
    Factory(FactoryFn),
    /// Resolve another identifier as a nested call
    Alias(Key),
    /// Construct the type named by the binding id
    SelfType,
}

impl Concrete {
    /// `None`, or a concrete equal to the id, means self-construction.
    pub(crate) fn from_target(id: &Key, concrete: Option<&str>) -> Self {
        match concrete {
            Some(target) if target != id.as_str() => Concrete::Alias(Key::from(target)),
            _ => Concrete::SelfType,
        }
    }
}

/// Binding with lifetime and concrete
#[derive(Clone)]
pub(crate) struct Binding {
    pub(crate) lifetime: Lifetime,
    pub(crate) concrete: Concrete,
}

/// Cache cell for one singleton id.
///
/// The slot lock is held while the instance is built, so concurrent first
/// resolutions of the same id construct it at most once.
pub(crate) type SingletonSlot = Arc<Mutex<Option<AnyArc>>>;

/// Binding table
#[derive(Default)]
pub(crate) struct Registry {
    pub(crate) bindings: Map<Key, Binding>,
}

impl Registry {
    pub(crate) fn insert(&mut self, key: Key, binding: Binding) {
        self.bindings.insert(key, binding);
    }

    pub(crate) fn get(&self, key: &str) -> Option<&Binding> {
        self.bindings.get(key)
    }

    pub(crate) fn remove(&mut self, key: &str) -> bool {
        self.bindings.remove(key).is_some()
    }

    pub(crate) fn contains_key(&self, key: &str) -> bool {
        self.bindings.contains_key(key)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&Key, &Binding)> {
        self.bindings.iter()
    }
}

/// Singleton cache: id -> slot
#[derive(Default)]
pub(crate) struct SingletonCache {
    slots: Map<Key, SingletonSlot>,
}

impl SingletonCache {
    pub(crate) fn slot(&self, key: &str) -> Option<SingletonSlot> {
        self.slots.get(key).cloned()
    }

    pub(crate) fn slot_or_insert(&mut self, key: &Key) -> SingletonSlot {
        self.slots.entry(key.clone()).or_default().clone()
    }

    pub(crate) fn remove(&mut self, key: &str) -> bool {
        self.slots.remove(key).is_some()
    }

    /// Removes the slot for `key` and hands it back.
    pub(crate) fn take(&mut self, key: &str) -> Option<SingletonSlot> {
        self.slots.remove(key)
    }
}
