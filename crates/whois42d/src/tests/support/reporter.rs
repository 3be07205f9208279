//! Test double for [`HealthReporter`] that records lifecycle events.

use std::net::SocketAddr;
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Duration;

use whois42d_config::Config;

use crate::bootstrap::BootstrapError;
use crate::health::HealthReporter;
use crate::process::StopReason;

/// Lifecycle events captured during scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HealthEvent {
    BootstrapStarting,
    BootstrapSucceeded,
    BootstrapFailed(String),
    Serving {
        addrs: Vec<SocketAddr>,
        activated: bool,
    },
    Stopping(StopReason),
}

/// Records health events and lets tests wait for one to appear.
#[derive(Debug, Default)]
pub(crate) struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
    changed: Condvar,
}

impl RecordingHealthReporter {
    pub(crate) fn events(&self) -> Vec<HealthEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Blocks until an event satisfies `predicate` or `timeout` passes.
    pub(crate) fn wait_for(
        &self,
        timeout: Duration,
        predicate: impl Fn(&HealthEvent) -> bool,
    ) -> Option<HealthEvent> {
        let events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        let (events, _) = self
            .changed
            .wait_timeout_while(events, timeout, |events| !events.iter().any(&predicate))
            .unwrap_or_else(PoisonError::into_inner);
        events.iter().find(|event| predicate(event)).cloned()
    }

    fn record(&self, event: HealthEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
        self.changed.notify_all();
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn bootstrap_starting(&self) {
        self.record(HealthEvent::BootstrapStarting);
    }

    fn bootstrap_succeeded(&self, _config: &Config) {
        self.record(HealthEvent::BootstrapSucceeded);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.record(HealthEvent::BootstrapFailed(error.to_string()));
    }

    fn serving(&self, addrs: &[SocketAddr], activated: bool) {
        self.record(HealthEvent::Serving {
            addrs: addrs.to_vec(),
            activated,
        });
    }

    fn stopping(&self, reason: StopReason) {
        self.record(HealthEvent::Stopping(reason));
    }
}
