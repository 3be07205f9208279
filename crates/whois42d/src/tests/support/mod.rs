//! Shared fixtures and collaborator doubles for the daemon test suites.

mod config_loader;
mod doubles;
mod registry;
mod reporter;

pub(crate) use config_loader::{FailingConfigLoader, TestConfigLoader};
pub(crate) use doubles::{FakeActivationEnv, TestShutdownSignal};
pub(crate) use registry::{FIXTURE_HEADER, RegistryFixture};
pub(crate) use reporter::{HealthEvent, RecordingHealthReporter};

use std::time::Duration;

/// Upper bound for any wait on a background thread or socket.
pub(crate) const WAIT_TIMEOUT: Duration = Duration::from_secs(5);
