//! Container configuration.
//!
//! With the `config` feature the configuration can be deserialized, e.g. from
//! a JSON section of an application config file.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::internal::MAX_DEPTH;

/// Tunables for a [`Container`](crate::Container).
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{Container, ContainerConfig};
///
/// let config = ContainerConfig::default()
///     .max_depth(16)
///     .evict_singleton_on_remove(true);
/// let container = Container::with_config(config).unwrap();
/// assert_eq!(container.config().max_depth, 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContainerConfig {
    /// Longest allowed chain of nested resolutions (aliases and constructor
    /// dependencies together)
    pub max_depth: usize,
    /// Whether `remove(id)` also drops the cached singleton for `id`.
    ///
    /// Off by default: a removed and re-bound singleton id keeps returning the
    /// instance cached before the removal until `forget_instance` is called.
    pub evict_singleton_on_remove: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self { max_depth: MAX_DEPTH, evict_singleton_on_remove: false }
    }
}

impl ContainerConfig {
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn evict_singleton_on_remove(mut self, evict: bool) -> Self {
        self.evict_singleton_on_remove = evict;
        self
    }

    /// Parses a JSON object; missing fields keep their defaults.
    ///
    /// ```
    /// # #[cfg(feature = "config")]
    /// # {
    /// use ferrous_ioc::ContainerConfig;
    ///
    /// let config = ContainerConfig::from_json_str(r#"{ "max_depth": 8 }"#).unwrap();
    /// assert_eq!(config.max_depth, 8);
    /// assert!(!config.evict_singleton_on_remove);
    /// # }
    /// ```
    #[cfg(feature = "config")]
    pub fn from_json_str(json: &str) -> crate::DiResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| crate::DiError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the container cannot work with.
    pub fn validate(&self) -> crate::DiResult<()> {
        if self.max_depth == 0 {
            return Err(crate::DiError::Config("max_depth must be greater than 0".to_string()));
        }
        Ok(())
    }
}
