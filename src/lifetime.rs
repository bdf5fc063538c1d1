//! Binding lifetime definitions.

/// Binding lifetimes controlling instance caching behavior
///
/// Only two lifetimes exist: a singleton is built once and cached under its
/// identifier, a transient binding is built again on every resolution.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Container, Lifetime};
///
/// let container = Container::new();
/// container.singleton_factory("clock", |_, _| Ok(42u64));
/// container.bind_factory("request", |_, _| Ok(String::from("req")), false);
///
/// let bindings = container.bindings();
/// let clock = bindings.iter().find(|b| b.key.as_str() == "clock").unwrap();
/// assert_eq!(clock.lifetime, Lifetime::Singleton);
/// let request = bindings.iter().find(|b| b.key.as_str() == "request").unwrap();
/// assert_eq!(request.lifetime, Lifetime::Transient);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// Built on first resolution, cached until removed
    ///
    /// The cached value short-circuits every later lookup of the same id,
    /// including the resolving callbacks, which do not fire again.
    Singleton,
    /// New instance per resolution, never cached
    Transient,
}

impl Lifetime {
    pub(crate) fn from_flag(singleton: bool) -> Self {
        if singleton {
            Lifetime::Singleton
        } else {
            Lifetime::Transient
        }
    }
}
