//! # ferrous-ioc
//!
//! A string-keyed inversion of control container with constructor injection.
//!
//! ## Features
//!
//! - **String identifiers**: bind ids to factories, to other ids, or to type names
//! - **Constructor injection**: unbound ids are built from explicit type descriptors,
//!   resolving typed parameters recursively and falling back to defaults
//! - **Singletons and instances**: at most one instance per id, even under contention
//! - **Resolving callbacks**: prioritized post-construction hooks, with opt-in setter injection
//! - **Circular dependency detection**: cycles are reported with the full path instead of overflowing the stack
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_ioc::{Container, ParameterDescriptor, TypeDescriptor, TypeRegistry};
//! use std::sync::Arc;
//!
//! struct Database {
//!     connection_string: String,
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! // Describe how types are constructed
//! let mut types = TypeRegistry::new();
//! types.register(
//!     TypeDescriptor::new("UserService", |args| Ok(UserService { db: args.get::<Database>(0)? }))
//!         .param(ParameterDescriptor::typed("db", "Database")),
//! );
//!
//! // Bind ids
//! let container = Container::with_types(types);
//! container.singleton_factory("Database", |_, _| {
//!     Ok(Database { connection_string: "postgres://localhost".to_string() })
//! });
//! container.bind("users", Some("UserService"), false);
//!
//! let users = container.get::<UserService>("users").unwrap();
//! assert_eq!(users.db.connection_string, "postgres://localhost");
//! ```
//!
//! ## Resolution Order
//!
//! 1. A cached singleton (or a value registered with `instance`) is returned as is.
//! 2. A bound id resolves through its factory, its alias target, or its own type name.
//! 3. An unbound id is constructed by type name through the [`TypeIntrospector`].
//!
//! Resolving callbacks run once per outermost [`Container::resolve`] on a freshly
//! produced value; nested resolutions made while building it never fire them.
//!
//! ## Errors
//!
//! ```rust
//! use ferrous_ioc::{Container, DiError};
//!
//! let container = Container::new();
//! container.bind("a", Some("b"), false);
//! container.bind("b", Some("a"), false);
//!
//! match container.resolve("a", &[]) {
//!     Err(DiError::Circular(path)) => assert_eq!(path.len(), 3),
//!     _ => unreachable!(),
//! }
//! assert!(container.resolve("nothing", &[]).unwrap_err().is_resolve_error());
//! ```

pub mod callbacks;
pub mod config;
pub mod container;
pub mod descriptors;
pub mod error;
pub mod injector;
pub mod introspection;
pub mod key;
pub mod lifetime;
pub mod observer;

mod internal;
mod registration;

pub use callbacks::ResolvingFn;
pub use config::ContainerConfig;
pub use container::{Buildable, Container, ContainerBuilder, ResolverContext};
pub use descriptors::{BindingDescriptor, BindingKind};
pub use error::{DiError, DiResult};
pub use injector::SetterInjector;
pub use introspection::{
    Argument, Arguments, ConstructFn, ParameterDescriptor, TypeDescriptor, TypeIntrospector,
    TypeRegistry,
};
pub use key::Key;
pub use lifetime::Lifetime;
pub use observer::{DiObserver, MetricsObserver, TracingObserver};
pub use registration::{AnyArc, FactoryFn};
