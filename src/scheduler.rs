//! One-shot "next refresh" registrations and the repeating tasks built on them.

use std::collections::BTreeMap;

/// Handle returned by [`RefreshScheduler::request`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefreshId(u64);

/// Stand-in for the host's next-refresh primitive.
///
/// Determinism rule: callbacks due in one refresh are drained in registration
/// order (ids increase monotonically).
#[derive(Debug)]
pub struct RefreshScheduler<T> {
    next_id: u64,
    refreshes: u64,
    pending: BTreeMap<RefreshId, T>,
}

impl<T> Default for RefreshScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RefreshScheduler<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            refreshes: 0,
            pending: BTreeMap::new(),
        }
    }

    /// Register `task` for the next refresh.
    pub fn request(&mut self, task: T) -> RefreshId {
        let id = RefreshId(self.next_id);
        self.next_id += 1;
        self.pending.insert(id, task);
        id
    }

    /// Drop a registration. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: RefreshId) -> bool {
        self.pending.remove(&id).is_some()
    }

    /// Start a refresh: take every registration made before this call.
    ///
    /// Requests made while the batch is processed land in the next refresh.
    pub fn begin_refresh(&mut self) -> Vec<(RefreshId, T)> {
        self.refreshes += 1;
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    /// Registrations waiting for the next refresh.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Number of refreshes begun so far.
    pub fn refresh_count(&self) -> u64 {
        self.refreshes
    }
}

/// A task that re-registers itself every time it fires, until stopped.
#[derive(Debug)]
pub struct RepeatingTask<T> {
    kind: T,
    armed: Option<RefreshId>,
}

impl<T: Copy> RepeatingTask<T> {
    pub fn new(kind: T) -> Self {
        Self { kind, armed: None }
    }

    pub fn kind(&self) -> T {
        self.kind
    }

    pub fn is_running(&self) -> bool {
        self.armed.is_some()
    }

    /// Arm for the next refresh. No-op when already running.
    pub fn start(&mut self, sched: &mut RefreshScheduler<T>) -> bool {
        if self.armed.is_some() {
            return false;
        }
        self.armed = Some(sched.request(self.kind));
        true
    }

    /// Cancel the outstanding registration. No-op when not running.
    pub fn stop(&mut self, sched: &mut RefreshScheduler<T>) -> bool {
        match self.armed.take() {
            Some(id) => {
                sched.cancel(id);
                true
            }
            None => false,
        }
    }

    /// Handle a drained registration. Returns `true` (and re-arms) when `id`
    /// is this task's live registration; stale ids are ignored.
    pub fn fire(&mut self, id: RefreshId, sched: &mut RefreshScheduler<T>) -> bool {
        if self.armed != Some(id) {
            return false;
        }
        self.armed = Some(sched.request(self.kind));
        true
    }
}

#[cfg(test)]
#[path = "../tests/unit/scheduler.rs"]
mod tests;
