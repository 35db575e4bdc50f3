use alloc::collections::BTreeMap;
use parking_lot::{Condvar, Mutex};
use std::{
    collections::HashMap,
    thread::{self, ThreadId},
};
use tracing::debug;

use crate::{errors::ResolveErrorKind, key::Key};

#[derive(Default)]
struct State {
    // Thread running the factory of each in-flight key
    owners: BTreeMap<Key, ThreadId>,
    // Key each blocked thread waits for
    waiting: HashMap<ThreadId, Key>,
}

impl State {
    /// Follows the chain `owner -> key it waits for -> that key's owner -> ...` and checks whether it reaches `thread`
    fn leads_to(&self, mut owner: ThreadId, thread: ThreadId) -> bool {
        // Waits that would close a chain are refused, so a chain never revisits a thread
        for _ in 0..=self.waiting.len() {
            if owner == thread {
                return true;
            }
            let Some(next) = self.waiting.get(&owner).and_then(|key| self.owners.get(key)) else {
                return false;
            };
            owner = *next;
        }
        false
    }
}

/// Keys whose factory is running, with the thread running it.
///
/// A thread resolving a key that is in flight on another thread waits for it,
/// so concurrent first-time resolutions of a key invoke its factory once.
/// A thread that would end up waiting for itself, directly or through other waiting threads,
/// gets [`ResolveErrorKind::CircularDependency`] instead of blocking.
///
/// Entries only live while their factory runs.
#[derive(Default)]
pub(crate) struct InFlight {
    state: Mutex<State>,
    released: Condvar,
}

impl InFlight {
    pub(crate) fn acquire(&self, key: &Key) -> Result<InFlightGuard<'_>, ResolveErrorKind> {
        let current = thread::current().id();

        let mut state = self.state.lock();
        while let Some(&owner) = state.owners.get(key) {
            if state.leads_to(owner, current) {
                return Err(ResolveErrorKind::CircularDependency { key: key.clone() });
            }

            debug!(?owner, "Waiting for in-flight resolution");
            state.waiting.insert(current, key.clone());
            self.released.wait(&mut state);
            state.waiting.remove(&current);
        }
        state.owners.insert(key.clone(), current);

        Ok(InFlightGuard {
            in_flight: self,
            key: key.clone(),
        })
    }

    #[cfg(test)]
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.state.lock().owners.len()
    }

    #[cfg(test)]
    #[must_use]
    fn waiting_len(&self) -> usize {
        self.state.lock().waiting.len()
    }
}

/// Ownership of an in-flight key, released on drop on both success and error paths
pub(crate) struct InFlightGuard<'a> {
    in_flight: &'a InFlight,
    key: Key,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.state.lock().owners.remove(&self.key);
        self.in_flight.released.notify_all();
    }
}
