//! Structured health reporting for daemon lifecycle events.

use std::net::SocketAddr;
use std::sync::Arc;

use whois42d_config::Config;

use crate::bootstrap::BootstrapError;
use crate::process::StopReason;

const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Observer trait used to surface lifecycle events to telemetry sinks.
pub trait HealthReporter: Send + Sync {
    /// Invoked before configuration loading begins.
    fn bootstrap_starting(&self);

    /// Invoked after bootstrap completes successfully.
    fn bootstrap_succeeded(&self, config: &Config);

    /// Invoked when bootstrap fails.
    fn bootstrap_failed(&self, error: &BootstrapError);

    /// Invoked once the whois listeners accept connections.
    fn serving(&self, addrs: &[SocketAddr], activated: bool);

    /// Invoked when the daemon decides to stop.
    fn stopping(&self, reason: StopReason);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        (**self).bootstrap_succeeded(config);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }

    fn serving(&self, addrs: &[SocketAddr], activated: bool) {
        (**self).serving(addrs, activated);
    }

    fn stopping(&self, reason: StopReason) {
        (**self).stopping(reason);
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_starting",
            "starting daemon bootstrap"
        );
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_succeeded",
            registry = %config.registry,
            whois = %config.whois_endpoint(),
            http = %config.http_endpoint(),
            log_filter = %config.log_filter(),
            log_format = %config.log_format(),
            "daemon bootstrap completed"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "bootstrap_failed",
            error = %error,
            "daemon bootstrap failed"
        );
    }

    fn serving(&self, addrs: &[SocketAddr], activated: bool) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "serving",
            listeners = ?addrs,
            activated,
            "whois service ready"
        );
    }

    fn stopping(&self, reason: StopReason) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "stopping",
            reason = %reason,
            "shutting listeners down"
        );
    }
}
