//! Thread running the `tiny_http` server until the stop token trips.

#[cfg(test)]
use std::net::SocketAddr;
use std::io::Cursor;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tiny_http::{Header, Method, Request, Response, Server};
use tracing::{debug, info, warn};

use whois42d_config::ListenEndpoint;
use whois42d_registry::Registry;

use super::HTTP_TARGET;
use super::routes::{HttpReply, route};
use crate::transport::StopToken;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Errors raised by the HTTP adapter.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The adapter could not listen on its endpoint.
    #[error("failed to start HTTP adapter on {endpoint}: {message}")]
    Bind {
        /// Endpoint that failed.
        endpoint: String,
        /// Error reported by the server library.
        message: String,
    },
    /// The adapter thread panicked.
    #[error("HTTP adapter thread panicked")]
    ThreadPanic,
}

/// Running HTTP adapter.
pub(crate) struct HttpAdapter {
    #[cfg(test)]
    addr: Option<SocketAddr>,
    handle: thread::JoinHandle<()>,
}

impl HttpAdapter {
    /// Binds `endpoint` and serves requests until `stop` trips.
    pub(crate) fn start(
        endpoint: &ListenEndpoint,
        registry: Arc<Registry>,
        stop: StopToken,
    ) -> Result<Self, HttpError> {
        let server = Server::http(endpoint.authority()).map_err(|error| HttpError::Bind {
            endpoint: endpoint.to_string(),
            message: error.to_string(),
        })?;
        let addr = server.server_addr().to_ip();
        info!(
            target: HTTP_TARGET,
            endpoint = %endpoint,
            bound = ?addr,
            "HTTP adapter active"
        );
        let handle = thread::spawn(move || serve(&server, &registry, &stop));
        Ok(Self {
            #[cfg(test)]
            addr,
            handle,
        })
    }

    #[cfg(test)]
    pub(crate) const fn local_addr(&self) -> Option<SocketAddr> {
        self.addr
    }

    /// Waits for the adapter thread; the caller trips the stop token first.
    pub(crate) fn join(self) -> Result<(), HttpError> {
        self.handle.join().map_err(|_| HttpError::ThreadPanic)
    }
}

fn serve(server: &Server, registry: &Registry, stop: &StopToken) {
    while !stop.is_tripped() {
        match server.recv_timeout(POLL_INTERVAL) {
            Ok(Some(request)) => respond(registry, request),
            Ok(None) => {}
            Err(error) => {
                warn!(
                    target: HTTP_TARGET,
                    error = %error,
                    "HTTP receive failed"
                );
                thread::sleep(POLL_INTERVAL);
            }
        }
    }
    info!(target: HTTP_TARGET, "HTTP adapter stopped");
}

fn respond(registry: &Registry, request: Request) {
    let is_get = *request.method() == Method::Get;
    let reply = route(registry, is_get, request.url());
    debug!(
        target: HTTP_TARGET,
        peer = ?request.remote_addr(),
        url = %request.url(),
        status = reply.status,
        "HTTP request"
    );
    if let Err(error) = request.respond(into_response(reply)) {
        warn!(
            target: HTTP_TARGET,
            error = %error,
            "HTTP response failed"
        );
    }
}

fn into_response(reply: HttpReply) -> Response<Cursor<Vec<u8>>> {
    let HttpReply {
        status,
        content_type,
        body,
    } = reply;
    let response = Response::from_data(body).with_status_code(status);
    match Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes()) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}
