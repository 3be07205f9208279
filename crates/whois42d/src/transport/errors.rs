//! Error types for listener setup and the accept loops.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Errors surfaced while binding or running a whois listener.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The configured host did not resolve.
    #[error("failed to resolve TCP address {host}:{port}: {source}")]
    Resolve {
        /// Configured host.
        host: String,
        /// Configured port.
        port: u16,
        /// Underlying resolver error.
        #[source]
        source: io::Error,
    },
    /// Resolution succeeded but yielded no address.
    #[error("no TCP addresses resolved for {host}:{port}")]
    ResolveEmpty {
        /// Configured host.
        host: String,
        /// Configured port.
        port: u16,
    },
    /// Binding the resolved address failed.
    #[error("failed to bind TCP listener at {addr}: {source}")]
    BindTcp {
        /// Address the bind was attempted on.
        addr: SocketAddr,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Switching the listener to non-blocking mode failed.
    #[error("failed to enable non-blocking listener: {source}")]
    NonBlocking {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Accepting a connection failed with an error other than a poll timeout.
    #[error("accept failed on {endpoint}: {source}")]
    Accept {
        /// Listener that failed.
        endpoint: String,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// An accept loop thread panicked.
    #[error("listener thread panicked")]
    ThreadPanic,
}

/// Errors raised while adopting service-manager sockets.
#[derive(Debug, Error)]
pub enum ActivationError {
    /// Marking an inherited descriptor close-on-exec failed.
    #[error("failed to set close-on-exec on descriptor {fd}: {source}")]
    CloseOnExec {
        /// Inherited descriptor.
        fd: i32,
        /// Underlying OS error.
        #[source]
        source: nix::errno::Errno,
    },
}
