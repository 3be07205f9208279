//! Accept loops for whois listeners.

use std::io;
use std::net::{SocketAddr, TcpListener, ToSocketAddrs};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{error, info};

use whois42d_config::ListenEndpoint;

use super::lifecycle::{DrainTracker, LastActivity, StopToken};
use super::{ConnectionHandler, ConnectionStream, LISTENER_TARGET, ListenerError};

const ACCEPT_BACKOFF: Duration = Duration::from_millis(25);

/// A bound TCP listener that has not started accepting yet.
#[derive(Debug)]
pub(crate) struct SocketListener {
    label: String,
    listener: TcpListener,
}

impl SocketListener {
    /// Resolves and binds the configured endpoint.
    pub(crate) fn bind(endpoint: &ListenEndpoint) -> Result<Self, ListenerError> {
        let listener = bind_tcp(endpoint.host(), endpoint.port())?;
        Ok(Self {
            label: endpoint.to_string(),
            listener,
        })
    }

    /// Wraps a listener obtained elsewhere, such as an inherited descriptor.
    pub(crate) fn adopt(listener: TcpListener, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            listener,
        }
    }

    pub(crate) fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.local_addr().ok()
    }
}

/// Running accept loops sharing one stop token and drain tracker.
pub(crate) struct Server {
    stop: StopToken,
    tracker: DrainTracker,
    activity: Arc<LastActivity>,
    loops: Vec<thread::JoinHandle<Result<(), ListenerError>>>,
    addrs: Vec<SocketAddr>,
}

impl Server {
    /// Starts one accept loop per listener.
    ///
    /// Every loop is registered with the drain tracker before its thread is
    /// spawned, so [`Server::shutdown`] cannot observe an idle tracker while a
    /// loop is still starting.
    pub(crate) fn start(
        listeners: Vec<SocketListener>,
        handler: Arc<dyn ConnectionHandler>,
        stop: StopToken,
    ) -> Result<Self, ListenerError> {
        let tracker = DrainTracker::new();
        let activity = Arc::new(LastActivity::new());
        let mut server = Self {
            stop,
            tracker,
            activity,
            loops: Vec::with_capacity(listeners.len()),
            addrs: Vec::with_capacity(listeners.len()),
        };

        for listener in listeners {
            if let Err(source) = listener.listener.set_nonblocking(true) {
                server.stop.trip();
                server.abandon();
                return Err(ListenerError::NonBlocking { source });
            }
            if let Some(addr) = listener.local_addr() {
                server.addrs.push(addr);
            }
            let context = LoopContext {
                stop: server.stop.clone(),
                tracker: server.tracker.clone(),
                activity: Arc::clone(&server.activity),
                handler: Arc::clone(&handler),
            };
            let guard = server.tracker.enter();
            server.loops.push(thread::spawn(move || {
                let _guard = guard;
                run_accept_loop(&listener, &context)
            }));
        }
        Ok(server)
    }

    /// Addresses the listeners are bound to.
    pub(crate) fn local_addrs(&self) -> &[SocketAddr] {
        &self.addrs
    }

    pub(crate) fn activity(&self) -> &LastActivity {
        &self.activity
    }

    /// Returns `true` once the stop token has been tripped, either by
    /// [`Server::shutdown`], by an external caller or by a failing loop.
    pub(crate) fn is_stopping(&self) -> bool {
        self.stop.is_tripped()
    }

    /// Stops accepting, waits for in-flight connections to finish and joins
    /// the accept loops.
    ///
    /// Returns the first error reported by any loop.
    pub(crate) fn shutdown(mut self) -> Result<(), ListenerError> {
        self.stop.trip();
        info!(
            target: LISTENER_TARGET,
            active = self.tracker.active(),
            "draining whois listeners"
        );
        self.tracker.wait_idle();
        let mut first_error = None;
        for handle in self.loops.drain(..) {
            let outcome = handle.join().unwrap_or(Err(ListenerError::ThreadPanic));
            if let Err(loop_error) = outcome
                && first_error.is_none()
            {
                first_error = Some(loop_error);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn abandon(&mut self) {
        self.tracker.wait_idle();
        for handle in self.loops.drain(..) {
            drop(handle.join());
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.stop.trip();
    }
}

struct LoopContext {
    stop: StopToken,
    tracker: DrainTracker,
    activity: Arc<LastActivity>,
    handler: Arc<dyn ConnectionHandler>,
}

fn run_accept_loop(listener: &SocketListener, context: &LoopContext) -> Result<(), ListenerError> {
    info!(
        target: LISTENER_TARGET,
        endpoint = %listener.label,
        "whois listener active"
    );
    while !context.stop.is_tripped() {
        match listener.listener.accept() {
            Ok((stream, peer)) => dispatch(stream, peer, context),
            Err(error) if error.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(ACCEPT_BACKOFF);
            }
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            Err(source) => {
                error!(
                    target: LISTENER_TARGET,
                    endpoint = %listener.label,
                    error = %source,
                    "accept failed; stopping listeners"
                );
                context.stop.trip();
                return Err(ListenerError::Accept {
                    endpoint: listener.label.clone(),
                    source,
                });
            }
        }
    }
    info!(
        target: LISTENER_TARGET,
        endpoint = %listener.label,
        "whois listener stopped"
    );
    Ok(())
}

fn dispatch(stream: std::net::TcpStream, peer: SocketAddr, context: &LoopContext) {
    context.activity.touch();
    if let Err(error) = stream.set_nonblocking(false) {
        error!(
            target: LISTENER_TARGET,
            peer = %peer,
            error = %error,
            "cannot switch connection to blocking mode"
        );
        return;
    }
    let guard = context.tracker.enter();
    let handler = Arc::clone(&context.handler);
    thread::spawn(move || {
        let _guard = guard;
        handler.handle(ConnectionStream::new(stream, peer));
    });
}

fn bind_tcp(host: &str, port: u16) -> Result<TcpListener, ListenerError> {
    let mut addrs = (host, port)
        .to_socket_addrs()
        .map_err(|source| ListenerError::Resolve {
            host: host.to_owned(),
            port,
            source,
        })?;
    let addr = addrs.next().ok_or_else(|| ListenerError::ResolveEmpty {
        host: host.to_owned(),
        port,
    })?;
    TcpListener::bind(addr).map_err(|source| ListenerError::BindTcp { addr, source })
}
