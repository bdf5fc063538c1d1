//! Resolver context for dependency injection.
//!
//! This module contains the ResolverContext type which provides
//! the interface for factories and callbacks to resolve dependencies.

use std::sync::Arc;

use crate::container::{downcast, Container};
use crate::error::DiResult;
use crate::internal::circular::PathGuard;
use crate::internal::ResolutionPath;
use crate::introspection::{Arguments, ParameterDescriptor};
use crate::key::Key;
use crate::registration::{AnyArc, FactoryFn};

/// Context passed to factories and resolving callbacks.
///
/// Every resolution made through a context is *nested*: it shares the
/// circular-dependency path of the call that created the context and never
/// fires resolving callbacks. Calling back into [`Container::resolve`] instead
/// starts a new outermost resolution, which fires callbacks but still reports
/// an id already being resolved on this thread as a cycle.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::Container;
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let container = Container::new();
/// container.singleton_factory("db", |_, _| Ok(Database { url: "postgres://localhost".to_string() }));
/// container.bind_factory("users", |ctx, _| Ok(UserService { db: ctx.get::<Database>("db")? }), false);
///
/// let users = container.get::<UserService>("users").unwrap();
/// assert_eq!(users.db.url, "postgres://localhost");
/// ```
pub struct ResolverContext<'a> {
    container: &'a Container,
    path: ResolutionPath,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn new(container: &'a Container) -> Self {
        Self { container, path: ResolutionPath::new(container.id(), container.config().max_depth) }
    }

    /// The container this context resolves against.
    pub fn container(&self) -> &'a Container {
        self.container
    }

    /// Resolves `id` as a nested call.
    pub fn resolve(&self, id: &str, params: &[AnyArc]) -> DiResult<AnyArc> {
        self.container.resolve_in(self, &Key::from(id), params).map(|outcome| outcome.into_value())
    }

    /// Resolves `id` as a nested call and downcasts the result to `T`.
    pub fn get<T: Send + Sync + 'static>(&self, id: &str) -> DiResult<Arc<T>> {
        downcast(id, self.resolve(id, &[])?)
    }

    /// Builds `concrete` on this context's path.
    pub fn build(&self, concrete: impl Into<Buildable>, params: &[AnyArc]) -> DiResult<AnyArc> {
        match concrete.into() {
            Buildable::Factory(factory) => factory(self, params),
            Buildable::Type(name) => {
                let _guard = self.enter(&name)?;
                self.container.build_type(self, &name)
            }
        }
    }

    /// Resolves a parameter list the way constructor parameters are resolved.
    ///
    /// `owner` names the type or method the parameters belong to; it appears
    /// in [`DiError::UnresolvableParameter`](crate::DiError::UnresolvableParameter).
    pub fn resolve_parameters(
        &self,
        owner: &Key,
        parameters: &[ParameterDescriptor],
    ) -> DiResult<Arguments> {
        self.container.resolve_parameters(self, owner, parameters)
    }

    /// Number of ids this container is currently resolving on this thread.
    pub fn depth(&self) -> usize {
        self.path.depth()
    }

    /// Ids currently being resolved, outermost first.
    pub fn path(&self) -> Vec<Key> {
        self.path.snapshot()
    }

    pub(crate) fn enter(&self, key: &Key) -> DiResult<PathGuard> {
        self.path.enter(key)
    }
}

/// Something [`Container::build`] can construct.
#[derive(Clone)]
pub enum Buildable {
    /// A type known to the introspector
    Type(Key),
    /// A factory, invoked with the context and parameters
    Factory(FactoryFn),
}

impl Buildable {
    /// Wraps a closure as a buildable factory.
    pub fn factory<F>(factory: F) -> Self
    where
        F: Fn(&ResolverContext<'_>, &[AnyArc]) -> DiResult<AnyArc> + Send + Sync + 'static,
    {
        Buildable::Factory(Arc::new(factory))
    }
}

impl From<&str> for Buildable {
    fn from(name: &str) -> Self {
        Buildable::Type(Key::from(name))
    }
}

impl From<Key> for Buildable {
    fn from(name: Key) -> Self {
        Buildable::Type(name)
    }
}

impl From<FactoryFn> for Buildable {
    fn from(factory: FactoryFn) -> Self {
        Buildable::Factory(factory)
    }
}
