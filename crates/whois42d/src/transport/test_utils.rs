//! Test helpers for the transport module.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};

use super::{ConnectionHandler, ConnectionStream};

pub(crate) struct CountingHandler {
    count: Arc<AtomicUsize>,
}

impl CountingHandler {
    pub(crate) fn new() -> (Arc<AtomicUsize>, Arc<Self>) {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = Arc::new(Self {
            count: Arc::clone(&count),
        });
        (count, handler)
    }
}

impl ConnectionHandler for CountingHandler {
    fn handle(&self, _stream: ConnectionStream) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Handler that holds every connection open until the gate is released.
pub(crate) struct GatedHandler {
    gate: Arc<(Mutex<bool>, Condvar)>,
    entered: Arc<AtomicUsize>,
    finished: Arc<AtomicUsize>,
}

impl GatedHandler {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            gate: Arc::new((Mutex::new(false), Condvar::new())),
            entered: Arc::new(AtomicUsize::new(0)),
            finished: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub(crate) fn release(&self) {
        let (open, changed) = &*self.gate;
        *open.lock().unwrap_or_else(PoisonError::into_inner) = true;
        changed.notify_all();
    }

    pub(crate) fn entered(&self) -> usize {
        self.entered.load(Ordering::SeqCst)
    }

    pub(crate) fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

impl ConnectionHandler for GatedHandler {
    fn handle(&self, _stream: ConnectionStream) {
        self.entered.fetch_add(1, Ordering::SeqCst);
        let (open, changed) = &*self.gate;
        let mut released = open.lock().unwrap_or_else(PoisonError::into_inner);
        while !*released {
            released = changed
                .wait(released)
                .unwrap_or_else(PoisonError::into_inner);
        }
        drop(released);
        self.finished.fetch_add(1, Ordering::SeqCst);
    }
}
