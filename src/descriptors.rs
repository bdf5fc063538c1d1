//! Binding descriptors for introspection and diagnostics.

use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registration::Concrete;

/// Binding descriptor for introspection and diagnostics
///
/// A snapshot of one registered binding, as returned by
/// [`Container::bindings`](crate::Container::bindings).
///
/// # Use Cases
///
/// - **Debugging**: Inspect what ids are bound and how
/// - **Health checks**: Verify container configuration at startup
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{BindingKind, Container, Key, Lifetime};
///
/// let container = Container::new();
/// container.bind("mailer", Some("SmtpMailer"), false);
/// container.singleton("SmtpMailer", None);
/// container.singleton_factory("config_value", |_, _| Ok(42u32));
/// container.resolve("config_value", &[]).unwrap();
///
/// let descriptors = container.bindings();
/// assert_eq!(descriptors.len(), 3);
///
/// let mailer = descriptors.iter().find(|d| d.key == "mailer").unwrap();
/// assert_eq!(mailer.kind, BindingKind::Alias(Key::from("SmtpMailer")));
/// assert_eq!(mailer.lifetime, Lifetime::Transient);
///
/// let config = descriptors.iter().find(|d| d.key == "config_value").unwrap();
/// assert!(config.is_factory());
/// assert!(config.cached);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BindingDescriptor {
    /// The bound identifier
    pub key: Key,
    /// What the identifier resolves through
    pub kind: BindingKind,
    /// Binding lifetime
    pub lifetime: Lifetime,
    /// Whether a singleton instance is currently cached for the identifier
    pub cached: bool,
}

impl BindingDescriptor {
    pub fn is_factory(&self) -> bool {
        matches!(self.kind, BindingKind::Factory)
    }

    /// The identifier this binding forwards to, if it is an alias.
    pub fn alias_target(&self) -> Option<&Key> {
        match &self.kind {
            BindingKind::Alias(target) => Some(target),
            _ => None,
        }
    }
}

/// How a bound identifier produces its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingKind {
    /// A user-supplied factory
    Factory,
    /// Another identifier, resolved in its place
    Alias(Key),
    /// The type named by the identifier itself
    SelfType,
}

impl From<&Concrete> for BindingKind {
    fn from(concrete: &Concrete) -> Self {
        match concrete {
            Concrete::Factory(_) => BindingKind::Factory,
            Concrete::Alias(target) => BindingKind::Alias(target.clone()),
            Concrete::SelfType => BindingKind::SelfType,
        }
    }
}
