//! Shared configuration for the whois42d daemon.
//!
//! Configuration is layered by `ortho_config`: built-in defaults, an optional
//! TOML file (`--config-path` or `WHOIS42D_CONFIG_PATH`), `WHOIS42D_*`
//! environment variables and finally command-line flags. The resolved
//! [`Config`] is immutable once loaded and is handed to the daemon bootstrap.

mod defaults;
mod listen;
mod logging;
mod registry;

use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_ADDRESS, DEFAULT_DNS_TOP_LEVEL, DEFAULT_HEADER, DEFAULT_HTTP_PORT,
    DEFAULT_IDLE_TIMEOUT_SECS, DEFAULT_LOG_FILTER, DEFAULT_PORT, DEFAULT_REGISTRY,
    DEFAULT_REGISTRY_TOP_LEVEL, WILDCARD_ADDRESS, default_log_filter, default_log_format,
};
pub use listen::ListenEndpoint;
pub use logging::{LogFormat, LogFormatParseError};
pub use registry::{RegistryPathError, RegistryPaths};

/// Daemon configuration resolved from defaults, files, environment and CLI.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "WHOIS42D")]
pub struct Config {
    /// Address the whois and HTTP listeners bind to. `*` means all interfaces.
    #[serde(default = "defaults::address")]
    #[ortho_config(default = defaults::address())]
    pub address: String,
    /// TCP port for the line protocol.
    #[serde(default = "defaults::port")]
    #[ortho_config(default = defaults::port())]
    pub port: u16,
    /// TCP port for the HTTP adapter.
    #[serde(default = "defaults::http_port")]
    #[ortho_config(default = defaults::http_port())]
    pub http_port: u16,
    /// Root of the registry checkout; records live under `<registry>/data`.
    #[serde(default = "defaults::registry")]
    #[ortho_config(default = defaults::registry())]
    pub registry: Utf8PathBuf,
    /// Seconds without a connection before a socket-activated daemon exits.
    #[serde(default = "defaults::idle_timeout_secs")]
    #[ortho_config(default = defaults::idle_timeout_secs())]
    pub idle_timeout_secs: u64,
    /// Announcement line written at the top of every whois response.
    #[serde(default = "defaults::header")]
    #[ortho_config(default = defaults::header())]
    pub header: String,
    /// DNS suffix used to recognise `dns` objects.
    #[serde(default = "defaults::dns_top_level")]
    #[ortho_config(default = defaults::dns_top_level())]
    pub dns_top_level: String,
    /// Registry suffix used to recognise `person` objects and `sources`.
    #[serde(default = "defaults::registry_top_level")]
    #[ortho_config(default = defaults::registry_top_level())]
    pub registry_top_level: String,
    /// `tracing` filter directive.
    #[serde(default = "defaults::log_filter")]
    #[ortho_config(default = defaults::log_filter())]
    pub log_filter: String,
    /// Log output format.
    #[serde(default = "defaults::default_log_format")]
    #[ortho_config(default = defaults::default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: defaults::address(),
            port: DEFAULT_PORT,
            http_port: DEFAULT_HTTP_PORT,
            registry: defaults::registry(),
            idle_timeout_secs: DEFAULT_IDLE_TIMEOUT_SECS,
            header: defaults::header(),
            dns_top_level: defaults::dns_top_level(),
            registry_top_level: defaults::registry_top_level(),
            log_filter: defaults::log_filter(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Endpoint for the whois line protocol listener.
    #[must_use]
    pub fn whois_endpoint(&self) -> ListenEndpoint {
        ListenEndpoint::new(&self.address, self.port)
    }

    /// Endpoint for the HTTP adapter.
    #[must_use]
    pub fn http_endpoint(&self) -> ListenEndpoint {
        ListenEndpoint::new(&self.address, self.http_port)
    }

    /// Idle period after which a socket-activated daemon suspends itself.
    #[must_use]
    pub const fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Returns the configured `tracing` filter.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Returns the configured log format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
