//! TCP transport for the whois line protocol.
//!
//! Listeners come either from the service manager (socket activation) or
//! from binding the configured endpoint. Each listener runs a non-blocking
//! accept loop in its own thread and hands every connection to a
//! [`ConnectionHandler`] on a fresh worker thread. Shutdown is cooperative:
//! tripping the [`StopToken`] ends the accept loops within one poll interval
//! and [`Server::shutdown`] then waits for the [`DrainTracker`] to report
//! that every loop and worker has finished.

mod activation;
mod errors;
mod handler;
mod lifecycle;
mod listener;
#[cfg(test)]
mod test_utils;

pub(crate) use self::activation::{ActivationEnv, SystemActivationEnv, probe_with};
pub use self::errors::{ActivationError, ListenerError};
pub(crate) use self::handler::{ConnectionHandler, ConnectionStream};
pub(crate) use self::lifecycle::StopToken;
pub(crate) use self::listener::{Server, SocketListener};
#[cfg(test)]
pub(crate) use self::test_utils::{CountingHandler, GatedHandler};

const LISTENER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");
