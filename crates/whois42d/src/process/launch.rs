//! Supervises daemon launch sequencing and runtime orchestration.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::StructuredHealthReporter;
use crate::bootstrap::{ConfigLoader, SystemConfigLoader, bootstrap_with};
use crate::health::HealthReporter;
use crate::http::HttpAdapter;
use crate::protocol::QueryHandler;
use crate::transport::{
    ActivationEnv, Server, SocketListener, StopToken, SystemActivationEnv, probe_with,
};

use super::errors::LaunchError;
use super::shutdown::{ShutdownSignal, SystemShutdownSignal};
use super::supervisor::{IdlePolicy, supervise};
use super::{PROCESS_TARGET, SUPERVISOR_TICK, StopReason};

/// Collaborators required to launch the daemon runtime.
pub(crate) struct LaunchPlan<L, S, A> {
    pub(crate) loader: L,
    pub(crate) reporter: Arc<dyn HealthReporter>,
    pub(crate) shutdown: S,
    pub(crate) activation: A,
    pub(crate) tick: Duration,
}

/// Runs the daemon using the production collaborators.
///
/// Returns once the daemon stopped cleanly after a signal or an idle
/// suspension. A listener that fails while serving surfaces as an error so the
/// process exits non-zero.
pub fn run_daemon() -> Result<(), LaunchError> {
    let plan = LaunchPlan {
        loader: SystemConfigLoader,
        reporter: Arc::new(StructuredHealthReporter::new()),
        shutdown: SystemShutdownSignal::install()?,
        activation: SystemActivationEnv,
        tick: SUPERVISOR_TICK,
    };
    run_daemon_with(plan)
}

/// Runs the daemon with injected collaborators.
pub(crate) fn run_daemon_with<L, S, A>(plan: LaunchPlan<L, S, A>) -> Result<(), LaunchError>
where
    L: ConfigLoader,
    S: ShutdownSignal,
    A: ActivationEnv,
{
    let LaunchPlan {
        loader,
        reporter,
        shutdown,
        activation,
        tick,
    } = plan;

    let daemon = bootstrap_with(&loader, reporter.as_ref())?;
    let config = daemon.config();

    let inherited = probe_with(&activation)?;
    let activated = !inherited.is_empty();
    let listeners = if activated {
        inherited
    } else {
        vec![SocketListener::bind(&config.whois_endpoint())?]
    };

    let stop = StopToken::new();
    let handler = Arc::new(QueryHandler::new(daemon.registry()));
    let server = Server::start(listeners, handler, stop.clone())?;
    let http = match HttpAdapter::start(&config.http_endpoint(), daemon.registry(), stop.clone())
    {
        Ok(http) => http,
        Err(error) => {
            if let Err(listener_error) = server.shutdown() {
                warn!(
                    target: PROCESS_TARGET,
                    error = %listener_error,
                    "whois listener failed while abandoning start-up"
                );
            }
            return Err(error.into());
        }
    };
    reporter.serving(server.local_addrs(), activated);

    let policy = IdlePolicy::for_mode(activated, config.idle_timeout());
    let supervised = supervise(&server, &shutdown, policy, tick);
    if let Ok(reason) = supervised {
        reporter.stopping(reason);
    }

    let listener_result = server.shutdown();
    let http_result = http.join();
    let reason = supervised?;
    listener_result?;
    http_result?;
    if reason == StopReason::ListenerFailure {
        warn!(
            target: PROCESS_TARGET,
            "listener stopped without reporting an error"
        );
    }
    info!(
        target: PROCESS_TARGET,
        reason = %reason,
        "shutdown sequence completed"
    );
    Ok(())
}
