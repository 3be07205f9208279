//! A whois directory server over a file-based registry checkout.
//!
//! The daemon answers the whois line protocol on TCP and a small read-only
//! HTTP API, both backed by the lookup engine in [`whois42d_registry`].
//! Startup loads layered configuration through [`whois42d_config`], installs
//! structured telemetry and validates the registry checkout before any socket
//! is opened.
//!
//! ## Socket activation
//!
//! When a service manager passes listening sockets through `LISTEN_PID` and
//! `LISTEN_FDS`, the daemon adopts them instead of binding its own endpoint.
//! An activated daemon exits after the configured idle timeout passes with no
//! new connection; the manager restarts it on demand.
//!
//! ## Shutdown
//!
//! `SIGTERM`, `SIGINT`, `SIGQUIT` and `SIGHUP` stop the accept loops. Queries
//! already in progress run to completion before the process exits.

mod bootstrap;
mod health;
mod http;
mod process;
mod protocol;
mod telemetry;
mod transport;

pub use bootstrap::{
    BootstrapError, ConfigLoader, Daemon, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use http::HttpError;
pub use process::{
    LaunchError, ShutdownError, ShutdownSignal, StopReason, SystemShutdownSignal, run_daemon,
};
pub use telemetry::{TelemetryError, TelemetryHandle, initialise as initialise_telemetry};
pub use transport::{ActivationError, ListenerError};

#[cfg(test)]
mod tests;
