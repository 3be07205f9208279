//! Process collaborators driven by the test instead of the operating system.

use std::collections::VecDeque;
use std::net::TcpListener;
use std::os::fd::RawFd;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

use crate::process::{ShutdownError, ShutdownSignal};
use crate::transport::{ActivationEnv, ActivationError};

/// Shutdown signal raised by calling [`TestShutdownSignal::trigger`].
#[derive(Clone, Default)]
pub(crate) struct TestShutdownSignal {
    inner: Arc<(Mutex<Option<i32>>, Condvar)>,
}

impl TestShutdownSignal {
    pub(crate) fn trigger(&self, signal: i32) {
        let (lock, cvar) = &*self.inner;
        *lock.lock().unwrap_or_else(PoisonError::into_inner) = Some(signal);
        cvar.notify_all();
    }
}

impl ShutdownSignal for TestShutdownSignal {
    fn wait_for(&self, timeout: Duration) -> Result<Option<i32>, ShutdownError> {
        let (lock, cvar) = &*self.inner;
        let pending = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let (pending, _) = cvar
            .wait_timeout_while(pending, timeout, |pending| pending.is_none())
            .unwrap_or_else(PoisonError::into_inner);
        Ok(*pending)
    }
}

/// Activation environment announcing pre-bound loopback listeners.
///
/// An instance built with no listeners behaves like a directly started
/// process: neither variable is set.
pub(crate) struct FakeActivationEnv {
    listeners: Mutex<VecDeque<TcpListener>>,
    announced: usize,
    removed: Mutex<Vec<String>>,
}

impl FakeActivationEnv {
    pub(crate) fn standalone() -> Self {
        Self::with_listeners(Vec::new())
    }

    pub(crate) fn with_listeners(listeners: Vec<TcpListener>) -> Self {
        Self {
            announced: listeners.len(),
            listeners: Mutex::new(listeners.into()),
            removed: Mutex::new(Vec::new()),
        }
    }
}

impl ActivationEnv for FakeActivationEnv {
    fn var(&self, key: &str) -> Option<String> {
        let removed = self.removed.lock().unwrap_or_else(PoisonError::into_inner);
        if self.announced == 0 || removed.iter().any(|name| name == key) {
            return None;
        }
        match key {
            "LISTEN_PID" => Some(std::process::id().to_string()),
            "LISTEN_FDS" => Some(self.announced.to_string()),
            _ => None,
        }
    }

    fn remove(&self, key: &str) {
        self.removed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(key.to_owned());
    }

    fn pid(&self) -> u32 {
        std::process::id()
    }

    fn adopt(&self, _fd: RawFd) -> Result<Option<TcpListener>, ActivationError> {
        Ok(self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front())
    }
}
