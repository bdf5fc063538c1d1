//! Internal implementation details.

pub(crate) mod circular;
pub(crate) mod sync;

pub(crate) use circular::{ResolutionPath, MAX_DEPTH};
pub(crate) use sync::{Map, Mutex, RwLock};
