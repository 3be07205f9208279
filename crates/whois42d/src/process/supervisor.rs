//! Periodic supervision of a running whois service.

use std::time::Duration;

use tracing::{debug, info};

use crate::transport::Server;

use super::shutdown::{ShutdownError, ShutdownSignal};
use super::{PROCESS_TARGET, StopReason};

/// Observable state of the serving side, as seen by the supervisor.
pub(crate) trait ServiceState {
    /// Whether an accept loop has already stopped with an error.
    fn has_failed(&self) -> bool;

    /// Time elapsed since the last accepted connection.
    fn idle_for(&self) -> Duration;
}

impl ServiceState for Server {
    fn has_failed(&self) -> bool {
        self.is_stopping()
    }

    fn idle_for(&self) -> Duration {
        self.activity().idle_for()
    }
}

/// Idle threshold after which the daemon suspends itself.
///
/// Only socket-activated daemons suspend; the service manager keeps the
/// listening socket open and starts a fresh process on the next connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IdlePolicy {
    threshold: Option<Duration>,
}

impl IdlePolicy {
    pub(crate) const fn for_mode(activated: bool, timeout: Duration) -> Self {
        Self {
            threshold: if activated { Some(timeout) } else { None },
        }
    }

    fn expired(self, idle: Duration) -> bool {
        self.threshold.is_some_and(|threshold| idle >= threshold)
    }
}

/// Blocks until a signal arrives, an accept loop fails, or the idle policy
/// expires. Checks run once per `tick`.
pub(crate) fn supervise(
    state: &dyn ServiceState,
    shutdown: &dyn ShutdownSignal,
    policy: IdlePolicy,
    tick: Duration,
) -> Result<StopReason, ShutdownError> {
    debug!(
        target: PROCESS_TARGET,
        ?policy,
        tick_ms = tick.as_millis(),
        "supervising listeners"
    );
    loop {
        if let Some(signal) = shutdown.wait_for(tick)? {
            return Ok(StopReason::Signal(signal));
        }
        if state.has_failed() {
            return Ok(StopReason::ListenerFailure);
        }
        let idle = state.idle_for();
        if policy.expired(idle) {
            info!(
                target: PROCESS_TARGET,
                idle_secs = idle.as_secs(),
                "no connections within the idle timeout; suspending"
            );
            return Ok(StopReason::Idle(idle));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use mockall::mock;
    use rstest::rstest;

    use super::*;

    mock! {
        Signal {}
        impl ShutdownSignal for Signal {
            fn wait_for(&self, timeout: Duration) -> Result<Option<i32>, ShutdownError>;
        }
    }

    struct FakeState {
        failed: bool,
        idle: Cell<Duration>,
        step: Duration,
    }

    impl FakeState {
        fn new(failed: bool, step: Duration) -> Self {
            Self {
                failed,
                idle: Cell::new(Duration::ZERO),
                step,
            }
        }
    }

    impl ServiceState for FakeState {
        fn has_failed(&self) -> bool {
            self.failed
        }

        fn idle_for(&self) -> Duration {
            let idle = self.idle.get() + self.step;
            self.idle.set(idle);
            idle
        }
    }

    fn quiet_signal() -> MockSignal {
        let mut signal = MockSignal::new();
        signal.expect_wait_for().returning(|_| Ok(None));
        signal
    }

    const TICK: Duration = Duration::from_secs(3);

    #[rstest]
    fn signals_stop_supervision() {
        let mut signal = MockSignal::new();
        signal
            .expect_wait_for()
            .withf(|timeout| *timeout == TICK)
            .times(1)
            .returning(|_| Ok(Some(15)));
        let state = FakeState::new(false, Duration::ZERO);
        let reason = supervise(&state, &signal, IdlePolicy::for_mode(true, TICK), TICK)
            .expect("supervise");
        assert_eq!(reason, StopReason::Signal(15));
    }

    #[rstest]
    fn listener_failures_stop_supervision() {
        let state = FakeState::new(true, Duration::ZERO);
        let reason = supervise(&state, &quiet_signal(), IdlePolicy::for_mode(false, TICK), TICK)
            .expect("supervise");
        assert_eq!(reason, StopReason::ListenerFailure);
    }

    #[rstest]
    fn activated_daemons_suspend_once_idle() {
        let state = FakeState::new(false, TICK);
        let policy = IdlePolicy::for_mode(true, Duration::from_secs(10));
        let reason = supervise(&state, &quiet_signal(), policy, TICK).expect("supervise");
        assert_eq!(reason, StopReason::Idle(Duration::from_secs(12)));
    }

    #[rstest]
    fn standalone_daemons_never_suspend() {
        let mut signal = MockSignal::new();
        let mut calls = 0;
        signal.expect_wait_for().returning(move |_| {
            calls += 1;
            Ok((calls == 5).then_some(2))
        });
        let state = FakeState::new(false, Duration::from_secs(3600));
        let policy = IdlePolicy::for_mode(false, Duration::from_secs(10));
        let reason = supervise(&state, &signal, policy, TICK).expect("supervise");
        assert_eq!(reason, StopReason::Signal(2));
    }

    #[rstest]
    fn signal_errors_propagate() {
        let mut signal = MockSignal::new();
        signal
            .expect_wait_for()
            .returning(|_| Err(ShutdownError::Disconnected));
        let state = FakeState::new(false, Duration::ZERO);
        let result = supervise(&state, &signal, IdlePolicy::for_mode(false, TICK), TICK);
        assert!(matches!(result, Err(ShutdownError::Disconnected)));
    }
}
