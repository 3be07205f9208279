//! Daemon process supervision: listener start-up, idle suspension and
//! shutdown sequencing.

use std::fmt;
use std::time::Duration;

mod errors;
mod launch;
mod shutdown;
mod supervisor;

pub use errors::LaunchError;
pub use launch::run_daemon;
pub use shutdown::{ShutdownError, ShutdownSignal, SystemShutdownSignal};

#[cfg(test)]
pub(crate) use launch::{LaunchPlan, run_daemon_with};

pub(crate) const PROCESS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::process");

/// Interval between supervisor checks for signals, idleness and failures.
pub(crate) const SUPERVISOR_TICK: Duration = Duration::from_secs(3);

/// Why the daemon left its serving loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A termination signal arrived.
    Signal(i32),
    /// A socket-activated daemon saw no connection for this long.
    Idle(Duration),
    /// An accept loop hit an unrecoverable error.
    ListenerFailure,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signal(signal) => write!(f, "signal {signal}"),
            Self::Idle(idle) => write!(f, "idle for {}s", idle.as_secs()),
            Self::ListenerFailure => f.write_str("listener failure"),
        }
    }
}
