//! Read-only HTTP adapter over the lookup engine.
//!
//! The adapter answers JSON and plain-text lookups for tooling that cannot
//! speak the whois line protocol. It calls the registry directly and shares
//! the daemon's stop token, polling for requests so that it notices shutdown
//! within one poll interval.

mod routes;
mod server;

pub use self::server::HttpError;
pub(crate) use self::server::HttpAdapter;

const HTTP_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::http");
