use camino::Utf8PathBuf;

use crate::logging::LogFormat;

/// Listen address meaning "all interfaces".
pub const DEFAULT_ADDRESS: &str = "*";

/// Address a wildcard host binds to. Linux accepts IPv4 on it as mapped
/// addresses unless `net.ipv6.bindv6only` is set.
pub const WILDCARD_ADDRESS: &str = "::";

/// Well-known whois port.
pub const DEFAULT_PORT: u16 = 43;

/// Port for the HTTP adapter.
pub const DEFAULT_HTTP_PORT: u16 = 80;

/// Registry checkout used when none is configured.
pub const DEFAULT_REGISTRY: &str = ".";

/// Seconds of inactivity tolerated under socket activation.
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 10;

/// Greeting written before every whois response.
pub const DEFAULT_HEADER: &str = "This is the dn42 whois query service.";

/// DNS suffix of the registry's forward zones.
pub const DEFAULT_DNS_TOP_LEVEL: &str = "dn42";

/// Registry identifier used for handles and the `sources` reply.
pub const DEFAULT_REGISTRY_TOP_LEVEL: &str = "DN42";

/// Default log filter expression used by the daemon.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default log filter expression used by the daemon.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Default logging format for the daemon.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

pub(crate) fn address() -> String {
    DEFAULT_ADDRESS.to_owned()
}

pub(crate) const fn port() -> u16 {
    DEFAULT_PORT
}

pub(crate) const fn http_port() -> u16 {
    DEFAULT_HTTP_PORT
}

pub(crate) fn registry() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_REGISTRY)
}

pub(crate) const fn idle_timeout_secs() -> u64 {
    DEFAULT_IDLE_TIMEOUT_SECS
}

pub(crate) fn header() -> String {
    DEFAULT_HEADER.to_owned()
}

pub(crate) fn dns_top_level() -> String {
    DEFAULT_DNS_TOP_LEVEL.to_owned()
}

pub(crate) fn registry_top_level() -> String {
    DEFAULT_REGISTRY_TOP_LEVEL.to_owned()
}

pub(crate) fn log_filter() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}
