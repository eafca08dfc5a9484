//! Client session state: one slot per job kind remembering the active job.
//!
//! The slot lets a cancel request find its target without the user supplying
//! an id, and enforces at most one job per kind. Slots are released by RAII
//! guards so every exit path of a start call or polling task frees them.
//!
//! A confirmed cancel clears the slot while the polling task keeps running
//! until the service reports `cancelled`. Abort tokens are therefore tracked
//! apart from the slots and live as long as the task's guard.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::client::JobError;
use crate::job::{JobId, JobKind};

#[derive(Debug)]
enum Slot {
    /// Start call in flight; no id known yet.
    Reserved,
    Active { id: JobId },
}

/// Abort token of a running polling task.
#[derive(Debug)]
struct Watcher {
    kind: JobKind,
    abort: Arc<AtomicBool>,
}

/// Per-kind slots shared by the job client, its polling tasks and cancel calls.
#[derive(Debug, Default)]
pub struct SessionSlots {
    slots: RwLock<HashMap<JobKind, Slot>>,
    watchers: Mutex<Vec<Watcher>>,
}

impl SessionSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the slot for `kind` before a start call. Fails when a job of
    /// that kind is starting or active.
    pub fn reserve(self: &Arc<Self>, kind: JobKind) -> Result<SlotReservation, JobError> {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        if slots.contains_key(&kind) {
            return Err(JobError::AlreadyActive(kind));
        }
        slots.insert(kind, Slot::Reserved);
        Ok(SlotReservation {
            slots: Arc::clone(self),
            kind,
            committed: false,
        })
    }

    /// Id of the active job of `kind`, if a start call has succeeded.
    pub fn active_id(&self, kind: JobKind) -> Option<JobId> {
        match self
            .slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
        {
            Some(Slot::Active { id }) => Some(id.clone()),
            _ => None,
        }
    }

    /// True when `kind` is reserved or active.
    pub fn is_occupied(&self, kind: JobKind) -> bool {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&kind)
    }

    /// Clears the slot only if it still holds `id`. Returns whether it did.
    pub fn clear_if(&self, kind: JobKind, id: &JobId) -> bool {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        match slots.get(&kind) {
            Some(Slot::Active { id: current }) if current == id => {
                slots.remove(&kind);
                true
            }
            _ => false,
        }
    }

    /// Sets the abort token of every polling task of `kind` still running,
    /// including one whose slot a confirmed cancel has cleared. Each stops at
    /// its next wake. Returns false when no task of that kind is running.
    pub fn request_abort(&self, kind: JobKind) -> bool {
        let watchers = self.watchers.lock().unwrap_or_else(PoisonError::into_inner);
        let mut found = false;
        for w in watchers.iter().filter(|w| w.kind == kind) {
            w.abort.store(true, Ordering::Relaxed);
            found = true;
        }
        found
    }

    fn forget_watcher(&self, abort: &Arc<AtomicBool>) {
        self.watchers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|w| !Arc::ptr_eq(&w.abort, abort));
    }
}

/// Stops the polling task of one job at its next wake, without telling the
/// service. Stays usable after the job's slot has been cleared.
#[derive(Debug, Clone)]
pub struct AbandonHandle {
    abort: Arc<AtomicBool>,
}

impl AbandonHandle {
    pub fn abandon(&self) {
        self.abort.store(true, Ordering::Relaxed);
    }
}

/// A reserved slot. Dropped without [`commit`](Self::commit), it frees the slot.
#[derive(Debug)]
pub struct SlotReservation {
    slots: Arc<SessionSlots>,
    kind: JobKind,
    committed: bool,
}

impl SlotReservation {
    /// Records the service-assigned id and hands ownership of the slot to the
    /// returned guard.
    pub fn commit(mut self, id: JobId) -> ActiveSlot {
        let abort = Arc::new(AtomicBool::new(false));
        self.slots
            .watchers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Watcher {
                kind: self.kind,
                abort: Arc::clone(&abort),
            });
        self.slots
            .slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(self.kind, Slot::Active { id: id.clone() });
        self.committed = true;
        ActiveSlot {
            slots: Arc::clone(&self.slots),
            kind: self.kind,
            id,
            abort,
        }
    }
}

impl Drop for SlotReservation {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        let mut slots = self
            .slots
            .slots
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if matches!(slots.get(&self.kind), Some(Slot::Reserved)) {
            slots.remove(&self.kind);
        }
    }
}

/// Owned by a polling task. Clears the slot (if still ours) and drops the
/// task's abort token when dropped.
#[derive(Debug)]
pub struct ActiveSlot {
    slots: Arc<SessionSlots>,
    kind: JobKind,
    id: JobId,
    abort: Arc<AtomicBool>,
}

impl ActiveSlot {
    pub fn kind(&self) -> JobKind {
        self.kind
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn abort_requested(&self) -> bool {
        self.abort.load(Ordering::Relaxed)
    }

    pub fn abandon_handle(&self) -> AbandonHandle {
        AbandonHandle {
            abort: Arc::clone(&self.abort),
        }
    }

    /// Clears the slot now instead of at drop.
    pub fn release(&self) {
        self.slots.clear_if(self.kind, &self.id);
    }
}

impl Drop for ActiveSlot {
    fn drop(&mut self) {
        self.release();
        self.slots.forget_watcher(&self.abort);
    }
}
