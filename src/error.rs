//! Error types for the dependency injection container.

use std::fmt;

use crate::key::Key;

/// Dependency injection errors
///
/// Represents the conditions that can occur while binding, resolving or
/// constructing services. The variants form a small hierarchy:
///
/// - **Resolve errors** ([`is_resolve_error`](DiError::is_resolve_error)):
///   `NotFound`, `NotInstantiable` and `UnresolvableParameter`. A class-typed
///   constructor parameter that carries a default swallows these and uses the
///   default instead.
/// - **Parameter-resolve errors** ([`is_parameter_error`](DiError::is_parameter_error)):
///   only `UnresolvableParameter`. The caller has to supply that value, it can
///   never be produced by the container.
/// - Everything else (`Circular`, `DepthExceeded`, ...) is never recovered.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Container, DiError};
///
/// let container = Container::new();
/// match container.resolve("mailer", &[]) {
///     Err(DiError::NotFound(id)) => assert_eq!(id.as_str(), "mailer"),
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use ferrous_ioc::{DiError, Key};
///
/// let circular = DiError::Circular(vec![Key::from("a"), Key::from("b"), Key::from("a")]);
/// assert_eq!(circular.to_string(), "Circular dependency: a -> b -> a");
/// assert!(!circular.is_resolve_error());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiError {
    /// Identifier has no binding and names no known type
    NotFound(Key),
    /// Type is known but cannot be constructed (abstract, hidden constructor)
    NotInstantiable(Key),
    /// A value-typed constructor parameter has no default
    UnresolvableParameter {
        /// Type (or setter) whose parameter failed
        target: Key,
        /// Declared parameter name
        parameter: String,
    },
    /// Circular dependency detected (includes path)
    Circular(Vec<Key>),
    /// Maximum recursion depth exceeded
    DepthExceeded(usize),
    /// Resolved value is not of the requested type
    TypeMismatch {
        /// Identifier that was resolved
        key: Key,
        /// Requested Rust type
        expected: &'static str,
    },
    /// Positional constructor argument missing or of the wrong type
    Argument {
        /// Zero-based position in the argument list
        index: usize,
        /// Requested Rust type
        expected: &'static str,
    },
    /// A factory or resolving callback reported a failure
    Factory {
        /// Identifier being produced
        key: Key,
        /// Failure reported by user code
        message: String,
    },
    /// Invalid container configuration
    Config(String),
}

impl DiError {
    /// Returns true for the "cannot be resolved" family, including
    /// parameter-resolve failures.
    pub fn is_resolve_error(&self) -> bool {
        matches!(
            self,
            DiError::NotFound(_) | DiError::NotInstantiable(_) | DiError::UnresolvableParameter { .. }
        )
    }

    /// Returns true when a value-typed parameter could not be supplied.
    pub fn is_parameter_error(&self) -> bool {
        matches!(self, DiError::UnresolvableParameter { .. })
    }

    /// Convenience constructor for factories that fail.
    pub fn factory(key: impl Into<Key>, message: impl Into<String>) -> Self {
        DiError::Factory { key: key.into(), message: message.into() }
    }
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::NotFound(key) => write!(f, "Unresolvable id: {}", key),
            DiError::NotInstantiable(key) => write!(f, "Target <{}> is not instantiable", key),
            DiError::UnresolvableParameter { target, parameter } => {
                write!(f, "Unresolvable parameter <{}> of {}", parameter, target)
            }
            DiError::Circular(path) => {
                let names: Vec<&str> = path.iter().map(Key::as_str).collect();
                write!(f, "Circular dependency: {}", names.join(" -> "))
            }
            DiError::DepthExceeded(depth) => write!(f, "Max depth {} exceeded", depth),
            DiError::TypeMismatch { key, expected } => {
                write!(f, "Type mismatch for {}: expected {}", key, expected)
            }
            DiError::Argument { index, expected } => {
                write!(f, "Argument {} is not a {}", index, expected)
            }
            DiError::Factory { key, message } => write!(f, "Factory for {} failed: {}", key, message),
            DiError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for DiError {}

/// Result type for DI operations
///
/// A convenience type alias for `Result<T, DiError>` used throughout the crate.
pub type DiResult<T> = Result<T, DiError>;
