//! Builder for containers that need more than the defaults.

use std::sync::Arc;

use crate::config::ContainerConfig;
use crate::container::Container;
use crate::error::DiResult;
use crate::introspection::{TypeIntrospector, TypeRegistry};
use crate::observer::DiObserver;

/// Assembles a [`Container`] from a type introspector, a configuration and
/// observers.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{Container, ContainerConfig, TracingObserver, TypeDescriptor, TypeRegistry};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct ConcreteStub;
///
/// let mut types = TypeRegistry::new();
/// types.register(TypeDescriptor::of_default::<ConcreteStub>("ConcreteStub"));
///
/// let container = Container::builder()
///     .types(types)
///     .config(ContainerConfig::default().max_depth(64))
///     .observer(Arc::new(TracingObserver::new()))
///     .build()
///     .unwrap();
///
/// assert!(container.get::<ConcreteStub>("ConcreteStub").is_ok());
/// ```
pub struct ContainerBuilder {
    types: Option<Arc<dyn TypeIntrospector>>,
    config: ContainerConfig,
    observers: Vec<Arc<dyn DiObserver>>,
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self { types: None, config: ContainerConfig::default(), observers: Vec::new() }
    }

    /// Uses `types` to construct unbound identifiers.
    pub fn types(mut self, types: impl TypeIntrospector + 'static) -> Self {
        self.types = Some(Arc::new(types));
        self
    }

    /// Uses a shared introspector, e.g. one type catalogue for many containers.
    pub fn introspector(mut self, types: Arc<dyn TypeIntrospector>) -> Self {
        self.types = Some(types);
        self
    }

    /// Replaces the default configuration; checked when the container is built.
    pub fn config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn observer(mut self, observer: Arc<dyn DiObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Builds the container, failing with [`DiError::Config`](crate::DiError::Config)
    /// if the configuration does not validate.
    pub fn build(self) -> DiResult<Container> {
        self.config.validate()?;
        let types = self.types.unwrap_or_else(|| Arc::new(TypeRegistry::new()));
        Ok(Container::from_parts(types, self.config, self.observers))
    }
}
