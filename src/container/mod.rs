//! Container module: binding registry and resolution engine.
//!
//! The [`Container`] owns the binding table, the singleton cache, the
//! resolving callbacks and a handle to the type introspector. All operations
//! take `&self`; a `Container` can be cloned cheaply and shared across threads.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, trace};

use crate::callbacks::{Callbacks, ResolvingFn};
use crate::config::ContainerConfig;
use crate::descriptors::{BindingDescriptor, BindingKind};
use crate::error::{DiError, DiResult};
use crate::internal::RwLock;
use crate::introspection::{Argument, Arguments, ParameterDescriptor, TypeIntrospector, TypeRegistry};
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::observer::{DiObserver, Observers};
use crate::registration::{AnyArc, Binding, Concrete, FactoryFn, Registry, SingletonCache};

pub mod builder;
pub mod context;

pub use builder::ContainerBuilder;
pub use context::{Buildable, ResolverContext};

/// String-keyed inversion of control container.
///
/// Identifiers map to factories, aliases of other identifiers, or types the
/// configured [`TypeIntrospector`] knows how to construct. Unbound identifiers
/// fall back to construction by type name.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{Container, ParameterDescriptor, TypeDescriptor, TypeRegistry};
/// use std::sync::Arc;
///
/// struct Transport;
/// struct Mailer { transport: Arc<Transport> }
///
/// let mut types = TypeRegistry::new();
/// types.register(TypeDescriptor::new("Transport", |_| Ok(Transport)));
/// types.register(
///     TypeDescriptor::new("Mailer", |args| Ok(Mailer { transport: args.get::<Transport>(0)? }))
///         .param(ParameterDescriptor::typed("transport", "Transport")),
/// );
///
/// let container = Container::with_types(types);
/// container.singleton("Transport", None);
/// container.bind("mailer", Some("Mailer"), false);
///
/// let a = container.get::<Mailer>("mailer").unwrap();
/// let b = container.get::<Mailer>("mailer").unwrap();
/// assert!(!Arc::ptr_eq(&a, &b));
/// assert!(Arc::ptr_eq(&a.transport, &b.transport));
/// ```
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

pub(crate) struct ContainerInner {
    registry: RwLock<Registry>,
    singletons: RwLock<SingletonCache>,
    callbacks: Callbacks,
    observers: Observers,
    types: Arc<dyn TypeIntrospector>,
    config: ContainerConfig,
}

/// Where a resolved value came from.
pub(crate) enum Outcome {
    /// Taken from the singleton cache; callbacks never fire for these
    Cached(AnyArc),
    /// Built during this call
    Produced(AnyArc),
}

impl Outcome {
    pub(crate) fn into_value(self) -> AnyArc {
        match self {
            Outcome::Cached(value) | Outcome::Produced(value) => value,
        }
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    /// Creates a container with an empty type registry and default config.
    pub fn new() -> Self {
        Self::from_parts(Arc::new(TypeRegistry::new()), ContainerConfig::default(), Vec::new())
    }

    /// Creates a container with the given configuration.
    ///
    /// Fails with [`DiError::Config`] if `config` does not validate.
    pub fn with_config(config: ContainerConfig) -> DiResult<Self> {
        ContainerBuilder::new().config(config).build()
    }

    /// Creates a container that constructs types known to `types`.
    pub fn with_types(types: impl TypeIntrospector + 'static) -> Self {
        Self::from_parts(Arc::new(types), ContainerConfig::default(), Vec::new())
    }

    /// Starts a [`ContainerBuilder`].
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    pub(crate) fn from_parts(
        types: Arc<dyn TypeIntrospector>,
        config: ContainerConfig,
        observers: Vec<Arc<dyn DiObserver>>,
    ) -> Self {
        let container = Self {
            inner: Arc::new(ContainerInner {
                registry: RwLock::new(Registry::default()),
                singletons: RwLock::new(SingletonCache::default()),
                callbacks: Callbacks::default(),
                observers: Observers::default(),
                types,
                config,
            }),
        };
        for observer in observers {
            container.inner.observers.add(observer);
        }
        container
    }

    /// The configuration this container was built with.
    pub fn config(&self) -> &ContainerConfig {
        &self.inner.config
    }

    /// Identity of the shared state, used to tag resolution path entries.
    pub(crate) fn id(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }

    /// Returns true if both handles share the same container state.
    pub fn ptr_eq(&self, other: &Container) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // ----- Binding Registry -----

    /// Registers a binding to a type name or another identifier.
    ///
    /// With `concrete` absent, or equal to `id`, resolving `id` constructs the
    /// type named `id`. Any other `concrete` makes `id` an alias: resolving it
    /// resolves `concrete` instead, following alias chains of any length.
    /// Re-binding an id replaces the previous binding.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_ioc::Container;
    ///
    /// let container = Container::new();
    /// container.bind("foo", Some("bar"), false);
    /// container.bind_factory("bar", |_, _| Ok("baz"), false);
    ///
    /// assert_eq!(*container.get::<&str>("foo").unwrap(), "baz");
    /// ```
    pub fn bind(&self, id: impl Into<Key>, concrete: Option<&str>, singleton: bool) -> &Self {
        let key = id.into();
        let concrete = Concrete::from_target(&key, concrete);
        self.insert_binding(key, concrete, Lifetime::from_flag(singleton));
        self
    }

    /// Registers a singleton binding to a type name or another identifier.
    pub fn singleton(&self, id: impl Into<Key>, concrete: Option<&str>) -> &Self {
        self.bind(id, concrete, true)
    }

    /// Registers a factory whose result is wrapped in an `Arc`.
    ///
    /// The factory receives the resolution context and the parameters passed to
    /// `resolve`. Its result is final: no further injection happens.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_ioc::Container;
    /// use std::sync::Arc;
    ///
    /// let container = Container::new();
    /// container.bind_factory("echo", |_, params| Ok(params.len()), false);
    ///
    /// let params = [Arc::new("a") as ferrous_ioc::AnyArc, Arc::new("b") as ferrous_ioc::AnyArc];
    /// let count = container.resolve("echo", &params).unwrap();
    /// assert_eq!(*count.downcast::<usize>().unwrap(), 2);
    /// ```
    pub fn bind_factory<T, F>(&self, id: impl Into<Key>, factory: F, singleton: bool) -> &Self
    where
        T: Send + Sync + 'static,
        F: Fn(&ResolverContext<'_>, &[AnyArc]) -> DiResult<T> + Send + Sync + 'static,
    {
        let factory: FactoryFn =
            Arc::new(move |ctx: &ResolverContext<'_>, params: &[AnyArc]| -> DiResult<AnyArc> {
                let value = factory(ctx, params)?;
                Ok(Arc::new(value) as AnyArc)
            });
        self.insert_binding(id.into(), Concrete::Factory(factory), Lifetime::from_flag(singleton));
        self
    }

    /// Registers a factory that returns an already shared instance.
    ///
    /// Use this when the factory hands out an existing `Arc` that must keep its
    /// identity.
    pub fn bind_shared<F>(&self, id: impl Into<Key>, factory: F, singleton: bool) -> &Self
    where
        F: Fn(&ResolverContext<'_>, &[AnyArc]) -> DiResult<AnyArc> + Send + Sync + 'static,
    {
        let factory: FactoryFn = Arc::new(factory);
        self.insert_binding(id.into(), Concrete::Factory(factory), Lifetime::from_flag(singleton));
        self
    }

    /// Registers a singleton factory; it runs at most once.
    pub fn singleton_factory<T, F>(&self, id: impl Into<Key>, factory: F) -> &Self
    where
        T: Send + Sync + 'static,
        F: Fn(&ResolverContext<'_>, &[AnyArc]) -> DiResult<T> + Send + Sync + 'static,
    {
        self.bind_factory(id, factory, true)
    }

    fn insert_binding(&self, key: Key, concrete: Concrete, lifetime: Lifetime) {
        debug!(id = %key, kind = ?BindingKind::from(&concrete), ?lifetime, "binding registered");
        self.inner.registry.write().insert(key, Binding { lifetime, concrete });
    }

    /// Seeds the singleton cache directly.
    ///
    /// Later resolutions of `id` return `instance` without running any factory
    /// and without firing resolving callbacks.
    pub fn instance(&self, id: impl Into<Key>, instance: AnyArc) -> &Self {
        let key = id.into();
        debug!(id = %key, "instance registered");
        let slot = self.inner.singletons.write().slot_or_insert(&key);
        *slot.lock() = Some(instance);
        self
    }

    /// Wraps `value` in an `Arc` and seeds the singleton cache with it.
    pub fn instance_value<T: Send + Sync + 'static>(&self, id: impl Into<Key>, value: T) -> &Self {
        self.instance(id, Arc::new(value))
    }

    /// Binds `id` to a fixed value.
    ///
    /// Unlike [`instance`](Self::instance) this is an ordinary transient
    /// binding: every outermost resolution hands out the same `Arc` and fires
    /// the resolving callbacks on it, and `remove(id)` unbinds it.
    ///
    /// ```
    /// use ferrous_ioc::Container;
    /// use std::sync::Arc;
    ///
    /// let container = Container::new();
    /// container.bind_value("port", 8080u16);
    ///
    /// let a = container.get::<u16>("port").unwrap();
    /// let b = container.get::<u16>("port").unwrap();
    /// assert!(Arc::ptr_eq(&a, &b));
    /// assert!(!container.has_instance("port"));
    /// ```
    pub fn bind_value<T: Send + Sync + 'static>(&self, id: impl Into<Key>, value: T) -> &Self {
        let value: AnyArc = Arc::new(value);
        self.bind_shared(id, move |_, _| Ok(Arc::clone(&value)), false)
    }

    /// Deletes the binding for `id`. Returns whether one existed.
    ///
    /// The cached singleton for `id` survives unless
    /// [`ContainerConfig::evict_singleton_on_remove`] is set.
    pub fn remove(&self, id: &str) -> bool {
        let removed = self.inner.registry.write().remove(id);
        if self.inner.config.evict_singleton_on_remove {
            self.inner.singletons.write().remove(id);
        }
        debug!(id, removed, "binding removed");
        removed
    }

    /// Drops the cached singleton for `id`. Returns whether one was cached.
    pub fn forget_instance(&self, id: &str) -> bool {
        let slot = self.inner.singletons.write().take(id);
        slot.map(|slot| slot.lock().is_some()).unwrap_or(false)
    }

    /// Whether `id` has a binding. Cached instances are not considered.
    pub fn is_bound(&self, id: &str) -> bool {
        self.inner.registry.read().contains_key(id)
    }

    /// Whether a singleton instance is cached for `id`.
    ///
    /// Waits while another thread is still building that singleton.
    pub fn has_instance(&self, id: &str) -> bool {
        let slot = self.inner.singletons.read().slot(id);
        slot.map(|slot| slot.lock().is_some()).unwrap_or(false)
    }

    // ----- Resolution -----

    /// Resolves `id`, passing `params` to the factory that produces it.
    ///
    /// This is an outermost resolution: once the object graph is complete the
    /// resolving callbacks run against the result, unless the result came
    /// straight from the singleton cache.
    pub fn resolve(&self, id: &str, params: &[AnyArc]) -> DiResult<AnyArc> {
        let key = Key::from(id);
        let ctx = ResolverContext::new(self);
        match self.resolve_in(&ctx, &key, params)? {
            Outcome::Cached(value) => Ok(value),
            Outcome::Produced(value) => self.inner.callbacks.fire(value, &ctx),
        }
    }

    /// Resolves `id` and downcasts the result to `T`.
    pub fn get<T: Send + Sync + 'static>(&self, id: &str) -> DiResult<Arc<T>> {
        downcast(id, self.resolve(id, &[])?)
    }

    /// Constructs `concrete` directly, bypassing bindings and the singleton
    /// cache. Resolving callbacks do not fire.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_ioc::{Container, DiError, TypeDescriptor, TypeRegistry};
    ///
    /// let mut types = TypeRegistry::new();
    /// types.register(TypeDescriptor::abstract_type("PrivateConcreteStub"));
    /// let container = Container::with_types(types);
    ///
    /// assert!(matches!(container.build("PrivateConcreteStub", &[]), Err(DiError::NotInstantiable(_))));
    /// assert!(matches!(container.build("foo", &[]), Err(DiError::NotFound(_))));
    /// ```
    pub fn build(&self, concrete: impl Into<Buildable>, params: &[AnyArc]) -> DiResult<AnyArc> {
        ResolverContext::new(self).build(concrete, params)
    }

    /// Constructs the type named `type_name` and downcasts it to `T`.
    pub fn build_as<T: Send + Sync + 'static>(&self, type_name: &str) -> DiResult<Arc<T>> {
        downcast(type_name, self.build(type_name, &[])?)
    }

    // ----- Resolving Callbacks -----

    /// Registers a callback run after every outermost resolution.
    ///
    /// Higher priorities run first; equal priorities run in registration
    /// order. Returning `Some` replaces the object seen by later callbacks and
    /// by the caller.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_ioc::{AnyArc, Container};
    /// use std::sync::{Arc, Mutex};
    ///
    /// let container = Container::new();
    /// container.bind_factory("foo", |_, _| Ok(Mutex::new(String::new())), false);
    /// container.on_resolving(|object: &AnyArc| {
    ///     if let Some(text) = object.downcast_ref::<Mutex<String>>() {
    ///         text.lock().unwrap().push_str("baz");
    ///     }
    ///     None
    /// }, 0);
    ///
    /// let foo = container.get::<Mutex<String>>("foo").unwrap();
    /// assert_eq!(*foo.lock().unwrap(), "baz");
    /// ```
    pub fn on_resolving<F>(&self, callback: F, priority: i32) -> &Self
    where
        F: Fn(&AnyArc) -> Option<AnyArc> + Send + Sync + 'static,
    {
        let callback: ResolvingFn = Arc::new(
            move |object: &AnyArc, _ctx: &ResolverContext<'_>| -> DiResult<Option<AnyArc>> {
                Ok(callback(object))
            },
        );
        self.inner.callbacks.register(priority, callback);
        self
    }

    /// Registers a fallible callback that can resolve further ids.
    ///
    /// Any resolution made through the context is nested, so it does not
    /// trigger callbacks again. An error aborts the outer resolution.
    pub fn on_resolving_with<F>(&self, callback: F, priority: i32) -> &Self
    where
        F: Fn(&AnyArc, &ResolverContext<'_>) -> DiResult<Option<AnyArc>> + Send + Sync + 'static,
    {
        self.inner.callbacks.register(priority, Arc::new(callback));
        self
    }

    /// Number of registered resolving callbacks.
    pub fn callback_count(&self) -> usize {
        self.inner.callbacks.len()
    }

    /// Adds an observer notified about every resolution step.
    pub fn add_observer(&self, observer: Arc<dyn DiObserver>) -> &Self {
        self.inner.observers.add(observer);
        self
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.inner.observers.len()
    }

    // ----- Introspection -----

    /// Lists every binding, sorted by identifier.
    pub fn bindings(&self) -> Vec<BindingDescriptor> {
        let entries: Vec<_> = {
            let registry = self.inner.registry.read();
            let singletons = self.inner.singletons.read();
            registry
                .iter()
                .map(|(key, binding)| {
                    let kind = BindingKind::from(&binding.concrete);
                    (key.clone(), kind, binding.lifetime, singletons.slot(key.as_str()))
                })
                .collect()
        };
        // Slots are locked only after both map guards are released.
        let mut descriptors: Vec<BindingDescriptor> = entries
            .into_iter()
            .map(|(key, kind, lifetime, slot)| BindingDescriptor {
                key,
                kind,
                lifetime,
                cached: slot.map(|slot| slot.lock().is_some()).unwrap_or(false),
            })
            .collect();
        descriptors.sort_by(|a, b| a.key.cmp(&b.key));
        descriptors
    }

    /// Human-readable dump of bindings, callbacks and observers.
    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut s = String::new();
        s.push_str("=== Container Debug ===\n");
        s.push_str("Bindings:\n");
        for d in self.bindings() {
            s.push_str(&format!(
                "  {}: {:?} {:?}{}\n",
                d.key,
                d.lifetime,
                d.kind,
                if d.cached { " (cached)" } else { "" }
            ));
        }
        s.push_str(&format!("Callbacks: {}\n", self.callback_count()));
        s.push_str(&format!("Observers: {}\n", self.observer_count()));
        s
    }

    // ----- Engine -----

    /// One resolution step for `id` on the context's path.
    pub(crate) fn resolve_in(
        &self,
        ctx: &ResolverContext<'_>,
        id: &Key,
        params: &[AnyArc],
    ) -> DiResult<Outcome> {
        let _guard = ctx.enter(id)?;

        let observers = self.inner.observers.snapshot();
        if !observers.has_observers() {
            return self.resolve_step(ctx, id, params);
        }

        let start = Instant::now();
        observers.resolving(id);
        let result = self.resolve_step(ctx, id, params);
        match &result {
            Ok(_) => observers.resolved(id, start.elapsed()),
            Err(err) => observers.failed(id, err),
        }
        result
    }

    fn resolve_step(&self, ctx: &ResolverContext<'_>, id: &Key, params: &[AnyArc]) -> DiResult<Outcome> {
        if let Some(hit) = self.cached(id.as_str()) {
            trace!(id = %id, "singleton cache hit");
            return Ok(Outcome::Cached(hit));
        }

        let binding = self.inner.registry.read().get(id.as_str()).cloned();
        let Some(binding) = binding else {
            trace!(id = %id, "no binding, constructing by type name");
            return self.build_type(ctx, id).map(Outcome::Produced);
        };

        match binding.lifetime {
            Lifetime::Transient => self.produce(ctx, id, &binding.concrete, params).map(Outcome::Produced),
            Lifetime::Singleton => {
                let slot = self.inner.singletons.write().slot_or_insert(id);
                let mut cell = slot.lock();
                // Another thread may have filled the slot while we waited.
                if let Some(existing) = cell.as_ref() {
                    return Ok(Outcome::Cached(existing.clone()));
                }
                let value = self.produce(ctx, id, &binding.concrete, params)?;
                *cell = Some(value.clone());
                debug!(id = %id, "singleton cached");
                Ok(Outcome::Produced(value))
            }
        }
    }

    fn cached(&self, id: &str) -> Option<AnyArc> {
        let slot = self.inner.singletons.read().slot(id)?;
        let value = slot.lock().clone();
        value
    }

    fn produce(
        &self,
        ctx: &ResolverContext<'_>,
        id: &Key,
        concrete: &Concrete,
        params: &[AnyArc],
    ) -> DiResult<AnyArc> {
        match concrete {
            Concrete::Factory(factory) => factory(ctx, params),
            Concrete::SelfType => self.build_type(ctx, id),
            Concrete::Alias(target) => {
                trace!(id = %id, to = %target, "following alias");
                self.resolve_in(ctx, target, params).map(Outcome::into_value)
            }
        }
    }

    /// Constructs the type named `name` through the introspector.
    pub(crate) fn build_type(&self, ctx: &ResolverContext<'_>, name: &Key) -> DiResult<AnyArc> {
        let descriptor = self
            .inner
            .types
            .describe(name.as_str())
            .ok_or_else(|| DiError::NotFound(name.clone()))?;

        if !descriptor.is_instantiable() {
            return Err(DiError::NotInstantiable(name.clone()));
        }

        let args = match descriptor.constructor() {
            None => Arguments::empty(),
            Some(parameters) => self.resolve_parameters(ctx, name, parameters)?,
        };
        descriptor.instantiate(&args)
    }

    /// Turns parameter descriptors into positional arguments.
    ///
    /// Typed parameters are resolved as nested calls and fall back to their
    /// default on a resolve error; value parameters can only use their default.
    pub(crate) fn resolve_parameters(
        &self,
        ctx: &ResolverContext<'_>,
        owner: &Key,
        parameters: &[ParameterDescriptor],
    ) -> DiResult<Arguments> {
        let mut values = Vec::with_capacity(parameters.len());

        for parameter in parameters {
            let value = match parameter.declared_type() {
                Some(dependency) => match self.resolve_in(ctx, dependency, &[]) {
                    Ok(outcome) => Argument::Value(outcome.into_value()),
                    Err(err) if err.is_resolve_error() => match parameter.default_value() {
                        Some(default) => {
                            debug!(
                                owner = %owner,
                                parameter = parameter.name(),
                                error = %err,
                                "dependency unresolvable, using default"
                            );
                            default.clone()
                        }
                        None => return Err(err),
                    },
                    Err(err) => return Err(err),
                },
                None => match parameter.default_value() {
                    Some(default) => default.clone(),
                    None => {
                        return Err(DiError::UnresolvableParameter {
                            target: owner.clone(),
                            parameter: parameter.name().to_string(),
                        })
                    }
                },
            };
            values.push(value);
        }

        Ok(Arguments::new(values))
    }
}

pub(crate) fn downcast<T: Send + Sync + 'static>(id: &str, value: AnyArc) -> DiResult<Arc<T>> {
    value.downcast::<T>().map_err(|_| DiError::TypeMismatch {
        key: Key::from(id),
        expected: std::any::type_name::<T>(),
    })
}
