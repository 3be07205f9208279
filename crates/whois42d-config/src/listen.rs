use std::fmt;

use serde::{Deserialize, Serialize};

use crate::defaults::WILDCARD_ADDRESS;

/// TCP endpoint a daemon listener binds to.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ListenEndpoint {
    host: String,
    port: u16,
}

impl ListenEndpoint {
    /// Builds an endpoint, treating `*` or an empty host as all interfaces.
    #[must_use]
    pub fn new(host: &str, port: u16) -> Self {
        let trimmed = host.trim();
        let host = if trimmed.is_empty() || trimmed == "*" {
            WILDCARD_ADDRESS.to_owned()
        } else {
            trimmed.trim_start_matches('[').trim_end_matches(']').to_owned()
        };
        Self { host, port }
    }

    /// Host name or address literal, without IPv6 brackets.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port number.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// `host:port` form accepted by socket APIs, bracketing IPv6 literals.
    #[must_use]
    pub fn authority(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl fmt::Display for ListenEndpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "tcp://{}", self.authority())
    }
}
