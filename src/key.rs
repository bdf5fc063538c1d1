//! Identifier type for bindings, instances and type names.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Key for binding storage and lookup.
///
/// A key is an opaque string naming a service, an interface or a
/// constructible type. Equality is exact string comparison. Keys are cheap to
/// clone, so they are stored by value in every map and in error paths.
///
/// Maps keyed by `Key` can be queried with a plain `&str` thanks to the
/// [`Borrow<str>`] impl.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::Key;
///
/// let a = Key::from("Mailer");
/// let b = Key::new(String::from("Mailer"));
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "Mailer");
/// assert_ne!(a, Key::from("mailer"));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(Arc<str>);

impl Key {
    /// Creates a key from anything string-like.
    pub fn new(id: impl AsRef<str>) -> Self {
        Key(Arc::from(id.as_ref()))
    }

    /// The identifier text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({:?})", &*self.0)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Key {
    fn from(id: &str) -> Self {
        Key(Arc::from(id))
    }
}

impl From<String> for Key {
    fn from(id: String) -> Self {
        Key(Arc::from(id))
    }
}

impl From<&String> for Key {
    fn from(id: &String) -> Self {
        Key(Arc::from(id.as_str()))
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

impl PartialEq<str> for Key {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Key {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}
