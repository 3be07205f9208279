//! Test suites for the whois daemon.

pub(crate) mod support;
