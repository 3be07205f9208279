//! Configuration loaders for scenarios covering success and failure paths.

use std::ffi::OsString;
use std::sync::Arc;

use camino::Utf8PathBuf;
use ortho_config::{OrthoConfig, OrthoError};

use whois42d_config::Config;

use super::registry::FIXTURE_HEADER;
use crate::bootstrap::ConfigLoader;

/// Loader binding loopback ephemeral ports over a given registry root.
#[derive(Debug, Clone)]
pub(crate) struct TestConfigLoader {
    registry: Utf8PathBuf,
    idle_timeout_secs: u64,
}

impl TestConfigLoader {
    pub(crate) fn new(registry: impl Into<Utf8PathBuf>) -> Self {
        Self {
            registry: registry.into(),
            idle_timeout_secs: 10,
        }
    }

    pub(crate) fn with_idle_timeout(mut self, secs: u64) -> Self {
        self.idle_timeout_secs = secs;
        self
    }
}

impl ConfigLoader for TestConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(Config {
            address: String::from("127.0.0.1"),
            port: 0,
            http_port: 0,
            registry: self.registry.clone(),
            idle_timeout_secs: self.idle_timeout_secs,
            header: String::from(FIXTURE_HEADER),
            ..Config::default()
        })
    }
}

/// Loader that intentionally fails by passing an invalid port on the CLI.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load_from_iter([
            OsString::from("whois42d"),
            OsString::from("--port"),
            OsString::from("not-a-port"),
        ])
    }
}
