//! One request/response exchange on an accepted connection.

use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{debug, info, warn};

use whois42d_registry::{Query, Registry};

use super::PROTOCOL_TARGET;
use super::flags::parse_line;
use super::reply;
use crate::transport::{ConnectionHandler, ConnectionStream};

/// Longest request line accepted, newline included.
pub(crate) const MAX_REQUEST_BYTES: usize = 64 * 1024;

/// How an exchange ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// The client went away before sending a complete line.
    Disconnected,
    /// The request line exceeded [`MAX_REQUEST_BYTES`].
    Oversized,
    /// Usage text was sent in place of a lookup.
    Usage,
    /// A server-information block was sent.
    ServerInfo,
    /// Object lookups were answered; `found` is `false` after a `% 404`.
    Objects { found: bool },
}

/// Runs the whole exchange on `stream`: greeting, one request line, reply.
pub(crate) fn exchange<S: Read + Write>(
    registry: &Registry,
    peer: SocketAddr,
    stream: &mut S,
) -> io::Result<Outcome> {
    reply::write_greeting(stream, registry.config().header())?;
    stream.flush()?;

    let line = match read_request_line(stream)? {
        RequestLine::Complete(line) => line,
        RequestLine::Closed => return Ok(Outcome::Disconnected),
        RequestLine::Oversized => {
            warn!(
                target: PROTOCOL_TARGET,
                %peer,
                limit = MAX_REQUEST_BYTES,
                "request line too long"
            );
            return Ok(Outcome::Oversized);
        }
    };
    let text = String::from_utf8_lossy(&line);

    let flags = match parse_line(&text) {
        Ok(flags) => flags,
        Err(error) => {
            debug!(target: PROTOCOL_TARGET, %peer, query = %text.trim_end(), "rejected request line");
            let mut out = BufWriter::new(&mut *stream);
            write!(out, "{error}")?;
            out.flush()?;
            return Ok(Outcome::Usage);
        }
    };
    info!(target: PROTOCOL_TARGET, %peer, query = %text.trim_end(), "query received");

    let mut out = BufWriter::new(&mut *stream);
    if let Some(topic) = flags.server_info.as_deref() {
        reply::write_server_info(&mut out, registry, topic)?;
        reply::write_footer(&mut out)?;
        out.flush()?;
        return Ok(Outcome::ServerInfo);
    }

    let query = Query::new(flags.terms.iter().map(String::as_str), flags.type_filter);
    let mut found = false;
    for term in query.terms() {
        let records = registry.resolve_term(term, query.filter());
        found |= !records.is_empty();
        for record in &records {
            reply::write_record(&mut out, record)?;
        }
    }
    if !found {
        reply::write_not_found(&mut out)?;
    }
    reply::write_footer(&mut out)?;
    out.flush()?;
    Ok(Outcome::Objects { found })
}

enum RequestLine {
    Complete(Vec<u8>),
    Closed,
    Oversized,
}

fn read_request_line(stream: &mut impl Read) -> io::Result<RequestLine> {
    let limit = u64::try_from(MAX_REQUEST_BYTES).unwrap_or(u64::MAX);
    let mut reader = BufReader::new(stream.by_ref().take(limit));
    let mut line = Vec::new();
    reader.read_until(b'\n', &mut line)?;
    if line.last() == Some(&b'\n') {
        Ok(RequestLine::Complete(line))
    } else if line.len() >= MAX_REQUEST_BYTES {
        Ok(RequestLine::Oversized)
    } else {
        Ok(RequestLine::Closed)
    }
}

/// Connection handler answering whois queries from a shared registry.
pub(crate) struct QueryHandler {
    registry: Arc<Registry>,
}

impl QueryHandler {
    pub(crate) const fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }
}

impl ConnectionHandler for QueryHandler {
    fn handle(&self, mut stream: ConnectionStream) {
        let peer = stream.peer();
        match exchange(&self.registry, peer, &mut stream) {
            Ok(outcome) => debug!(target: PROTOCOL_TARGET, %peer, ?outcome, "exchange complete"),
            Err(error) => warn!(
                target: PROTOCOL_TARGET,
                %peer,
                error = %error,
                "connection handler error"
            ),
        }
        stream.finish();
    }
}
