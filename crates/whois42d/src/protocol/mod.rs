//! The whois line protocol.
//!
//! A client connects, receives the `% <header>` greeting, sends one line of
//! flags and terms and reads the reply until the server closes the
//! connection. There is no framing beyond the single request line; every
//! reply ends with a blank line.

mod flags;
mod reply;
mod session;

#[cfg(test)]
pub(crate) use self::reply::VERSION_LINE;
pub(crate) use self::session::QueryHandler;
#[cfg(test)]
pub(crate) use self::session::{MAX_REQUEST_BYTES, Outcome, exchange};

const PROTOCOL_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::protocol");
