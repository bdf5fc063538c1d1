//! Opt-in setter injection.
//!
//! Setters are registered per concrete Rust type together with the parameters
//! they take. Once installed as a resolving callback, the injector looks up the
//! setters for every object an outermost resolution produces, resolves their
//! parameters the way constructor parameters are resolved and calls them.

use std::any::{Any, TypeId};
use std::sync::Arc;

use tracing::trace;

use crate::container::{Container, ResolverContext};
use crate::error::{DiError, DiResult};
use crate::internal::Map;
use crate::introspection::{Arguments, ParameterDescriptor};
use crate::key::Key;
use crate::registration::AnyArc;

type ApplyFn = Arc<dyn Fn(&dyn Any, &Arguments) -> DiResult<()> + Send + Sync>;

struct Setter {
    owner: Key,
    parameters: Vec<ParameterDescriptor>,
    apply: ApplyFn,
}

/// Calls registered setters on freshly resolved objects.
///
/// A setter whose parameters cannot be resolved because a value parameter has
/// no default is skipped. Every other failure, such as a typed parameter naming
/// an unknown type, aborts the resolution.
///
/// Objects are shared through `Arc`, so setters mutate through interior
/// mutability.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{Container, ParameterDescriptor, SetterInjector, TypeDescriptor, TypeRegistry};
/// use std::sync::{Arc, Mutex};
///
/// struct Logger;
///
/// #[derive(Default)]
/// struct Mailer {
///     logger: Mutex<Option<Arc<Logger>>>,
/// }
///
/// let mut types = TypeRegistry::new();
/// types.register(TypeDescriptor::new("Logger", |_| Ok(Logger)));
/// let container = Container::with_types(types);
/// container.bind_factory("mailer", |_, _| Ok(Mailer::default()), false);
///
/// SetterInjector::new()
///     .setter::<Mailer, _>(
///         "set_logger",
///         vec![ParameterDescriptor::typed("logger", "Logger")],
///         |mailer, args| {
///             *mailer.logger.lock().unwrap() = Some(args.get::<Logger>(0)?);
///             Ok(())
///         },
///     )
///     .install(&container, 0);
///
/// let mailer = container.get::<Mailer>("mailer").unwrap();
/// assert!(mailer.logger.lock().unwrap().is_some());
/// ```
#[derive(Default)]
pub struct SetterInjector {
    setters: Map<TypeId, Vec<Setter>>,
}

impl SetterInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a setter for objects of type `T`.
    ///
    /// Setters for the same type run in registration order.
    pub fn setter<T, F>(
        mut self,
        name: impl AsRef<str>,
        parameters: Vec<ParameterDescriptor>,
        setter: F,
    ) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&T, &Arguments) -> DiResult<()> + Send + Sync + 'static,
    {
        let owner = Key::new(format!("{}::{}", std::any::type_name::<T>(), name.as_ref()));
        let apply: ApplyFn = Arc::new(move |object: &dyn Any, args: &Arguments| {
            match object.downcast_ref::<T>() {
                Some(target) => setter(target, args),
                None => Err(DiError::TypeMismatch {
                    key: Key::from("setter"),
                    expected: std::any::type_name::<T>(),
                }),
            }
        });
        self.setters.entry(TypeId::of::<T>()).or_default().push(Setter {
            owner,
            parameters,
            apply,
        });
        self
    }

    /// Number of setters registered across all types.
    pub fn len(&self) -> usize {
        self.setters.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.setters.is_empty()
    }

    /// Runs the setters registered for the object's concrete type.
    ///
    /// Returns how many setters were invoked.
    pub fn inject(&self, object: &AnyArc, ctx: &ResolverContext<'_>) -> DiResult<usize> {
        let target: &(dyn Any + Send + Sync) = &**object;
        let Some(setters) = self.setters.get(&target.type_id()) else {
            return Ok(0);
        };

        let mut invoked = 0;
        for setter in setters {
            let args = match ctx.resolve_parameters(&setter.owner, &setter.parameters) {
                Ok(args) => args,
                Err(err) if err.is_parameter_error() => {
                    trace!(setter = %setter.owner, error = %err, "setter skipped");
                    continue;
                }
                Err(err) => return Err(err),
            };
            (setter.apply)(target, &args)?;
            invoked += 1;
        }
        Ok(invoked)
    }

    /// Registers the injector as a resolving callback on `container`.
    pub fn install(self, container: &Container, priority: i32) -> Arc<Self> {
        let injector = Arc::new(self);
        let hook = Arc::clone(&injector);
        container.on_resolving_with(
            move |object: &AnyArc, ctx: &ResolverContext<'_>| {
                hook.inject(object, ctx)?;
                Ok(None)
            },
            priority,
        );
        injector
    }
}
