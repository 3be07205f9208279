//! Termination signal delivery for the supervisor loop.

use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::{Handle, Signals};
use thiserror::Error;
use tracing::info;

use super::PROCESS_TARGET;

/// Abstraction over shutdown notification mechanisms.
pub trait ShutdownSignal: Send + Sync {
    /// Waits at most `timeout` for a termination request.
    ///
    /// Returns the signal number when one arrived, `None` on timeout.
    fn wait_for(&self, timeout: Duration) -> Result<Option<i32>, ShutdownError>;
}

/// Errors reported by shutdown signal listeners.
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// Installing signal handlers failed.
    #[error("failed to install signal handlers: {source}")]
    Install {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The signal forwarding thread exited.
    #[error("signal forwarding thread stopped unexpectedly")]
    Disconnected,
}

/// Shutdown listener fed by process signals.
///
/// Handlers are installed up front and a forwarding thread relays each
/// signal over a channel, so the supervisor can wait with a timeout.
pub struct SystemShutdownSignal {
    received: Mutex<Receiver<i32>>,
    handle: Handle,
}

impl SystemShutdownSignal {
    /// Installs handlers for `SIGTERM`, `SIGINT`, `SIGQUIT` and `SIGHUP`.
    pub fn install() -> Result<Self, ShutdownError> {
        let mut signals = Signals::new([SIGTERM, SIGINT, SIGQUIT, SIGHUP])
            .map_err(|source| ShutdownError::Install { source })?;
        let handle = signals.handle();
        let (sender, received) = mpsc::channel();
        thread::spawn(move || {
            for signal in signals.forever() {
                if sender.send(signal).is_err() {
                    break;
                }
            }
        });
        Ok(Self {
            received: Mutex::new(received),
            handle,
        })
    }
}

impl ShutdownSignal for SystemShutdownSignal {
    fn wait_for(&self, timeout: Duration) -> Result<Option<i32>, ShutdownError> {
        let received = self
            .received
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match received.recv_timeout(timeout) {
            Ok(signal) => {
                info!(
                    target: PROCESS_TARGET,
                    signal,
                    "shutdown signal received"
                );
                Ok(Some(signal))
            }
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(ShutdownError::Disconnected),
        }
    }
}

impl Drop for SystemShutdownSignal {
    fn drop(&mut self) {
        self.handle.close();
    }
}
