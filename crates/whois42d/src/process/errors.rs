//! Defines the unified error surface for daemon launch and supervision.

use thiserror::Error;

use crate::bootstrap::BootstrapError;
use crate::http::HttpError;
use crate::transport::{ActivationError, ListenerError};

use super::shutdown::ShutdownError;

/// Errors surfaced while launching or supervising the daemon process.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Bootstrap failed.
    #[error("daemon bootstrap failed: {source}")]
    Bootstrap {
        /// Underlying bootstrap error.
        #[source]
        source: BootstrapError,
    },
    /// Adopting inherited sockets failed.
    #[error("failed to adopt activated sockets: {source}")]
    Activation {
        /// Underlying activation error.
        #[source]
        source: ActivationError,
    },
    /// The whois listener failed to start or stopped with an error.
    #[error("whois listener failed: {source}")]
    Listener {
        /// Underlying listener error.
        #[source]
        source: ListenerError,
    },
    /// The HTTP adapter failed to start or stop.
    #[error("HTTP adapter failed: {source}")]
    Http {
        /// Underlying adapter error.
        #[source]
        source: HttpError,
    },
    /// Installing or waiting on signal handlers failed.
    #[error("shutdown signal listener failed: {source}")]
    Shutdown {
        /// Underlying signal error.
        #[source]
        source: ShutdownError,
    },
}

impl From<BootstrapError> for LaunchError {
    fn from(source: BootstrapError) -> Self {
        Self::Bootstrap { source }
    }
}

impl From<ActivationError> for LaunchError {
    fn from(source: ActivationError) -> Self {
        Self::Activation { source }
    }
}

impl From<ListenerError> for LaunchError {
    fn from(source: ListenerError) -> Self {
        Self::Listener { source }
    }
}

impl From<HttpError> for LaunchError {
    fn from(source: HttpError) -> Self {
        Self::Http { source }
    }
}

impl From<ShutdownError> for LaunchError {
    fn from(source: ShutdownError) -> Self {
        Self::Shutdown { source }
    }
}
