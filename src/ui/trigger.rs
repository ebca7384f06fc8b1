//! Run-test trigger: a button that is disabled while its request is in flight

use crate::types::TriggerState;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Trigger button plus its busy spinner. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct TriggerControl {
    busy: Arc<AtomicBool>,
}

impl TriggerControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `Idle → Busy`. Returns `None` when already busy (the click is ignored).
    ///
    /// The returned guard moves the control back to `Idle` when dropped, on
    /// every exit path of the request including errors and cancellation.
    pub fn try_begin(&self) -> Option<BusyGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard {
                busy: Arc::clone(&self.busy),
            })
    }

    pub fn state(&self) -> TriggerState {
        if self.busy.load(Ordering::Acquire) {
            TriggerState::Busy
        } else {
            TriggerState::Idle
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.state() == TriggerState::Idle
    }

    pub fn spinner_visible(&self) -> bool {
        self.state() == TriggerState::Busy
    }
}

/// Held for the duration of a run request
#[derive(Debug)]
pub struct BusyGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
