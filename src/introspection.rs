//! Type introspection: explicit constructor descriptors.
//!
//! The container never inspects Rust types on its own. A type becomes
//! constructible by name once a [`TypeDescriptor`] for it is known to the
//! [`TypeIntrospector`] the container was built with. The descriptor lists the
//! constructor parameters in declaration order and carries the construction
//! primitive that turns a positional [`Arguments`] list into an instance.

use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::internal::Map;
use crate::key::Key;
use crate::registration::AnyArc;

/// Construction primitive: positional arguments in, instance out.
pub type ConstructFn = Arc<dyn Fn(&Arguments) -> DiResult<AnyArc> + Send + Sync>;

/// Answers "what does the constructor of `name` need?".
///
/// Implement this to plug a different type catalogue into the container; the
/// crate ships [`TypeRegistry`].
pub trait TypeIntrospector: Send + Sync {
    /// Describes the type registered under `name`, or `None` if there is none.
    fn describe(&self, name: &str) -> Option<Arc<TypeDescriptor>>;
}

/// One positional constructor argument.
#[derive(Clone)]
pub enum Argument {
    /// Explicit "no value" default (an optional dependency left empty)
    Null,
    /// A resolved dependency or a default value
    Value(AnyArc),
}

impl std::fmt::Debug for Argument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Argument::Null => f.write_str("Null"),
            Argument::Value(_) => f.write_str("Value(..)"),
        }
    }
}

/// Describes one constructor (or setter) parameter.
///
/// A parameter with a `declared_type` is resolved through the container by
/// that identifier. A parameter without one is a plain value that only its
/// default can supply.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::ParameterDescriptor;
///
/// let transport = ParameterDescriptor::typed("transport", "Transport");
/// assert_eq!(transport.declared_type().map(|k| k.as_str()), Some("Transport"));
/// assert!(!transport.has_default());
///
/// let retries = ParameterDescriptor::value("retries").with_default(3u32);
/// assert!(retries.declared_type().is_none());
/// assert!(retries.is_optional());
/// ```
#[derive(Clone, Debug)]
pub struct ParameterDescriptor {
    name: String,
    declared_type: Option<Key>,
    default: Option<Argument>,
}

impl ParameterDescriptor {
    /// A parameter whose value is resolved by identifier.
    pub fn typed(name: impl Into<String>, declared_type: impl Into<Key>) -> Self {
        Self { name: name.into(), declared_type: Some(declared_type.into()), default: None }
    }

    /// A plain value parameter the container cannot produce.
    pub fn value(name: impl Into<String>) -> Self {
        Self { name: name.into(), declared_type: None, default: None }
    }

    /// Declares a default value, making the parameter optional.
    pub fn with_default<T: Send + Sync + 'static>(mut self, value: T) -> Self {
        self.default = Some(Argument::Value(Arc::new(value)));
        self
    }

    /// Declares an already shared default value.
    pub fn with_default_shared(mut self, value: AnyArc) -> Self {
        self.default = Some(Argument::Value(value));
        self
    }

    /// Declares an empty default (`Argument::Null`).
    pub fn with_null_default(mut self) -> Self {
        self.default = Some(Argument::Null);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared_type(&self) -> Option<&Key> {
        self.declared_type.as_ref()
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub fn default_value(&self) -> Option<&Argument> {
        self.default.as_ref()
    }

    /// Parameters are optional exactly when they carry a default.
    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }
}

/// Positional argument list handed to a construction primitive.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Argument, Arguments};
/// use std::sync::Arc;
///
/// let args = Arguments::new(vec![Argument::Value(Arc::new(7u32)), Argument::Null]);
/// assert_eq!(*args.get::<u32>(0).unwrap(), 7);
/// assert!(args.optional::<String>(1).unwrap().is_none());
/// assert!(args.get::<String>(0).is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Arguments {
    values: Vec<Argument>,
}

impl Arguments {
    pub fn new(values: Vec<Argument>) -> Self {
        Self { values }
    }

    /// An empty list, used for types without a constructor.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn raw(&self, index: usize) -> Option<&Argument> {
        self.values.get(index)
    }

    /// The argument at `index`, which must be present and of type `T`.
    pub fn get<T: Send + Sync + 'static>(&self, index: usize) -> DiResult<Arc<T>> {
        match self.optional::<T>(index)? {
            Some(value) => Ok(value),
            None => Err(Self::mismatch::<T>(index)),
        }
    }

    /// The argument at `index`, or `None` when it is `Argument::Null`.
    pub fn optional<T: Send + Sync + 'static>(&self, index: usize) -> DiResult<Option<Arc<T>>> {
        match self.values.get(index) {
            Some(Argument::Null) => Ok(None),
            Some(Argument::Value(any)) => any
                .clone()
                .downcast::<T>()
                .map(Some)
                .map_err(|_| Self::mismatch::<T>(index)),
            None => Err(Self::mismatch::<T>(index)),
        }
    }

    /// Clones the argument at `index` out of its `Arc`.
    pub fn value<T: Clone + Send + Sync + 'static>(&self, index: usize) -> DiResult<T> {
        self.get::<T>(index).map(|v| (*v).clone())
    }

    fn mismatch<T>(index: usize) -> DiError {
        DiError::Argument { index, expected: std::any::type_name::<T>() }
    }
}

/// Constructor metadata and construction primitive for one named type.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{ParameterDescriptor, TypeDescriptor};
///
/// struct Transport;
/// struct Mailer { transport: std::sync::Arc<Transport>, retries: u32 }
///
/// let transport = TypeDescriptor::new("Transport", |_| Ok(Transport));
/// assert!(transport.constructor().is_none());
///
/// let mailer = TypeDescriptor::new("Mailer", |args| {
///     Ok(Mailer { transport: args.get::<Transport>(0)?, retries: args.value::<u32>(1)? })
/// })
/// .param(ParameterDescriptor::typed("transport", "Transport"))
/// .param(ParameterDescriptor::value("retries").with_default(3u32));
/// assert_eq!(mailer.constructor().map(|p| p.len()), Some(2));
///
/// let contract = TypeDescriptor::abstract_type("MailerInterface");
/// assert!(!contract.is_instantiable());
/// ```
pub struct TypeDescriptor {
    name: Key,
    constructor: Option<Vec<ParameterDescriptor>>,
    construct: Option<ConstructFn>,
}

impl TypeDescriptor {
    /// An instantiable type. Without any [`param`](Self::param) it behaves
    /// like a type that declares no constructor.
    pub fn new<T, F>(name: impl Into<Key>, construct: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Arguments) -> DiResult<T> + Send + Sync + 'static,
    {
        let construct: ConstructFn = Arc::new(move |args: &Arguments| {
            let value = construct(args)?;
            Ok(Arc::new(value) as AnyArc)
        });
        Self { name: name.into(), constructor: None, construct: Some(construct) }
    }

    /// An instantiable type built with `T::default()`.
    pub fn of_default<T>(name: impl Into<Key>) -> Self
    where
        T: Default + Send + Sync + 'static,
    {
        Self::new(name, |_| Ok(T::default()))
    }

    /// A known type that cannot be constructed (interface, abstract class,
    /// hidden constructor).
    pub fn abstract_type(name: impl Into<Key>) -> Self {
        Self { name: name.into(), constructor: None, construct: None }
    }

    /// Appends a constructor parameter.
    pub fn param(mut self, parameter: ParameterDescriptor) -> Self {
        self.constructor.get_or_insert_with(Vec::new).push(parameter);
        self
    }

    /// Declares an explicit constructor, possibly with no parameters.
    pub fn with_constructor(mut self) -> Self {
        self.constructor.get_or_insert_with(Vec::new);
        self
    }

    pub fn name(&self) -> &Key {
        &self.name
    }

    pub fn is_instantiable(&self) -> bool {
        self.construct.is_some()
    }

    /// Constructor parameters in declaration order, `None` if the type has no
    /// constructor.
    pub fn constructor(&self) -> Option<&[ParameterDescriptor]> {
        self.constructor.as_deref()
    }

    /// Runs the construction primitive.
    pub fn instantiate(&self, args: &Arguments) -> DiResult<AnyArc> {
        match &self.construct {
            Some(construct) => construct(args),
            None => Err(DiError::NotInstantiable(self.name.clone())),
        }
    }
}

impl std::fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("constructor", &self.constructor)
            .field("instantiable", &self.is_instantiable())
            .finish()
    }
}

/// In-memory [`TypeIntrospector`] fed with explicit descriptors.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{TypeDescriptor, TypeIntrospector, TypeRegistry};
///
/// #[derive(Default)]
/// struct ConcreteStub;
///
/// let mut types = TypeRegistry::new();
/// types.register(TypeDescriptor::of_default::<ConcreteStub>("ConcreteStub"));
///
/// assert!(types.contains("ConcreteStub"));
/// assert!(types.describe("Missing").is_none());
/// ```
#[derive(Default)]
pub struct TypeRegistry {
    types: Map<Key, Arc<TypeDescriptor>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a descriptor, replacing any previous one with the same name.
    pub fn register(&mut self, descriptor: TypeDescriptor) -> &mut Self {
        self.types.insert(descriptor.name.clone(), Arc::new(descriptor));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeIntrospector for TypeRegistry {
    fn describe(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        self.types.get(name).cloned()
    }
}
