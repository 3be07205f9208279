//! Adoption of listening sockets passed in by a service manager.
//!
//! The service manager announces inherited sockets through `LISTEN_PID` and
//! `LISTEN_FDS`; descriptors start at 3. Both variables are removed after the
//! probe whatever its outcome so child processes never inherit them.
//! Announced descriptors that are closed, or are not stream sockets, are
//! skipped with a warning.

use std::env;
use std::net::TcpListener;
use std::os::fd::{FromRawFd, RawFd};

use nix::errno::Errno;
use nix::fcntl::{FcntlArg, FdFlag, fcntl};
use nix::sys::socket::{SockType, getsockopt, sockopt};
use tracing::{info, warn};

use super::{ActivationError, LISTENER_TARGET, SocketListener};

const LISTEN_PID: &str = "LISTEN_PID";
const LISTEN_FDS: &str = "LISTEN_FDS";
const LISTEN_FDS_START: RawFd = 3;

/// Process environment consulted by the activation probe.
pub(crate) trait ActivationEnv {
    /// Reads a variable, returning `None` when unset or not UTF-8.
    fn var(&self, key: &str) -> Option<String>;

    /// Removes a variable from the process environment.
    fn remove(&self, key: &str);

    /// Identifier of the current process.
    fn pid(&self) -> u32;

    /// Takes ownership of an inherited descriptor.
    fn adopt(&self, fd: RawFd) -> Result<Option<TcpListener>, ActivationError>;
}

/// The real process environment and descriptor table.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct SystemActivationEnv;

impl ActivationEnv for SystemActivationEnv {
    fn var(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }

    fn remove(&self, key: &str) {
        // SAFETY: the probe runs once during startup and no other thread
        // reads or writes the environment while it does; the signal relay
        // thread only forwards signal numbers.
        unsafe { env::remove_var(key) };
    }

    fn pid(&self) -> u32 {
        std::process::id()
    }

    fn adopt(&self, fd: RawFd) -> Result<Option<TcpListener>, ActivationError> {
        match fcntl(fd, FcntlArg::F_SETFD(FdFlag::FD_CLOEXEC)) {
            Ok(_) => {}
            Err(Errno::EBADF) => {
                warn!(
                    target: LISTENER_TARGET,
                    fd,
                    "inherited descriptor is not open; skipping"
                );
                return Ok(None);
            }
            Err(source) => return Err(ActivationError::CloseOnExec { fd, source }),
        }
        // SAFETY: the service manager hands descriptors from LISTEN_FDS_START
        // onwards to this process exclusively, and each is adopted once.
        let listener = unsafe { TcpListener::from_raw_fd(fd) };
        match getsockopt(&listener, sockopt::SockType) {
            Ok(SockType::Stream) => {}
            Ok(kind) => {
                warn!(
                    target: LISTENER_TARGET,
                    fd,
                    socket_type = ?kind,
                    "inherited descriptor is not a stream socket; skipping"
                );
                return Ok(None);
            }
            Err(error) => {
                warn!(
                    target: LISTENER_TARGET,
                    fd,
                    error = %error,
                    "inherited descriptor is not a socket; skipping"
                );
                return Ok(None);
            }
        }
        match listener.local_addr() {
            Ok(_) => Ok(Some(listener)),
            Err(error) => {
                warn!(
                    target: LISTENER_TARGET,
                    fd,
                    error = %error,
                    "inherited descriptor is not a TCP listener; skipping"
                );
                Ok(None)
            }
        }
    }
}

/// Returns the listeners handed over by the service manager.
///
/// An empty result means the daemon was started directly and should bind the
/// configured endpoint itself.
pub(crate) fn probe_with(env: &dyn ActivationEnv) -> Result<Vec<SocketListener>, ActivationError> {
    let pid = env.var(LISTEN_PID);
    let fds = env.var(LISTEN_FDS);
    env.remove(LISTEN_PID);
    env.remove(LISTEN_FDS);

    let Some(count) = announced_count(env, pid.as_deref(), fds.as_deref()) else {
        return Ok(Vec::new());
    };

    let mut listeners = Vec::with_capacity(usize::try_from(count).unwrap_or_default());
    for fd in LISTEN_FDS_START..LISTEN_FDS_START.saturating_add(count) {
        if let Some(listener) = env.adopt(fd)? {
            listeners.push(SocketListener::adopt(listener, format!("fd://{fd}")));
        }
    }
    info!(
        target: LISTENER_TARGET,
        announced = count,
        adopted = listeners.len(),
        "socket activation detected"
    );
    Ok(listeners)
}

fn announced_count(env: &dyn ActivationEnv, pid: Option<&str>, fds: Option<&str>) -> Option<RawFd> {
    let pid = pid?.trim().parse::<u32>().ok()?;
    if pid != env.pid() {
        return None;
    }
    let count = fds?.trim().parse::<RawFd>().ok()?;
    (count > 0).then_some(count)
}
