//! Circular dependency detection infrastructure.

use std::cell::RefCell;

use crate::error::{DiError, DiResult};
use crate::key::Key;

pub(crate) const MAX_DEPTH: usize = 1024;

thread_local! {
    /// Ids being resolved on this thread, outermost first, tagged with the
    /// container that resolves them.
    static ACTIVE: RefCell<Vec<(usize, Key)>> = const { RefCell::new(Vec::new()) };
}

/// View of one container's entries on the current thread's resolution stack.
///
/// Nested calls through a context and re-entrant calls to
/// `Container::resolve` from inside a factory land on the same stack, so a
/// factory that resolves its own id is reported as a cycle either way.
/// Other containers and other threads never see each other's entries.
pub(crate) struct ResolutionPath {
    owner: usize,
    max_depth: usize,
}

impl ResolutionPath {
    pub(crate) fn new(owner: usize, max_depth: usize) -> Self {
        Self { owner, max_depth }
    }

    /// Pushes `key`, failing if it is already on the path or the path is full.
    pub(crate) fn enter(&self, key: &Key) -> DiResult<PathGuard> {
        ACTIVE.with(|active| {
            let mut active = active.borrow_mut();
            let mut path = self.collect(&active);

            // Circular detection BEFORE pushing the new key
            if path.iter().any(|k| k == key) {
                path.push(key.clone());
                return Err(DiError::Circular(path));
            }

            if path.len() >= self.max_depth {
                return Err(DiError::DepthExceeded(path.len()));
            }

            active.push((self.owner, key.clone()));
            Ok(PathGuard { _not_send: std::marker::PhantomData })
        })
    }

    pub(crate) fn depth(&self) -> usize {
        ACTIVE.with(|active| active.borrow().iter().filter(|(owner, _)| *owner == self.owner).count())
    }

    pub(crate) fn snapshot(&self) -> Vec<Key> {
        ACTIVE.with(|active| self.collect(&active.borrow()))
    }

    fn collect(&self, active: &[(usize, Key)]) -> Vec<Key> {
        active
            .iter()
            .filter(|(owner, _)| *owner == self.owner)
            .map(|(_, key)| key.clone())
            .collect()
    }
}

/// Pops its entry from the thread's resolution stack when dropped.
///
/// Guards are scoped to the resolution step that created them, so they drop
/// in stack order on the thread that pushed them.
pub(crate) struct PathGuard {
    _not_send: std::marker::PhantomData<*const ()>,
}

impl Drop for PathGuard {
    fn drop(&mut self) {
        let _ = ACTIVE.try_with(|active| active.borrow_mut().pop());
    }
}
