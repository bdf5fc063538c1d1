//! Resolving callbacks fired after every outermost resolution.

use std::sync::Arc;

use crate::container::ResolverContext;
use crate::error::DiResult;
use crate::internal::RwLock;
use crate::registration::AnyArc;

/// Callback invoked with a freshly resolved object.
///
/// Returning `Ok(Some(v))` replaces the object for the following callbacks and
/// for the caller, `Ok(None)` keeps it.
pub type ResolvingFn =
    Arc<dyn for<'a> Fn(&AnyArc, &ResolverContext<'a>) -> DiResult<Option<AnyArc>> + Send + Sync>;

struct CallbackEntry {
    priority: i32,
    callback: ResolvingFn,
}

/// Priority-ordered callback list.
///
/// Entries are kept sorted by descending priority; an entry registered later
/// goes after every existing entry of the same priority.
#[derive(Default)]
pub(crate) struct Callbacks {
    entries: RwLock<Vec<CallbackEntry>>,
}

impl Callbacks {
    pub(crate) fn register(&self, priority: i32, callback: ResolvingFn) {
        let mut entries = self.entries.write();
        let pos = entries.partition_point(|e| e.priority >= priority);
        entries.insert(pos, CallbackEntry { priority, callback });
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Threads `object` through every callback in order.
    ///
    /// The list is copied first so callbacks may register further callbacks or
    /// resolve other ids without deadlocking.
    pub(crate) fn fire(&self, object: AnyArc, ctx: &ResolverContext<'_>) -> DiResult<AnyArc> {
        let snapshot: Vec<ResolvingFn> = {
            let entries = self.entries.read();
            if entries.is_empty() {
                return Ok(object);
            }
            entries.iter().map(|e| e.callback.clone()).collect()
        };

        let mut current = object;
        for callback in snapshot {
            if let Some(replacement) = callback(&current, ctx)? {
                current = replacement;
            }
        }
        Ok(current)
    }
}
