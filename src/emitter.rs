use std::{
    io,
    net::{Ipv4Addr, SocketAddr, ToSocketAddrs as _, UdpSocket},
};

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, trace};

use crate::payload;

/// Default collector address.
pub const DEFAULT_HOST: &str = "239.255.0.1";

/// Default collector port.
pub const DEFAULT_PORT: u16 = 20000;

/// Error returned when a collector host cannot be resolved during
/// reconfiguration.
///
/// This is the only failure this crate ever surfaces: reconfiguration is an
/// explicit, deliberate setup call, unlike per-event emission. When `open`
/// fails, the previously configured destination remains in effect.
#[derive(Debug, Error)]
#[error("failed to resolve collector host '{host}': {source}")]
pub struct ResolutionError {
    host: String,
    #[source]
    source: io::Error,
}

impl ResolutionError {
    /// Returns the host string that failed to resolve.
    pub fn host(&self) -> &str {
        &self.host
    }
}

/// A classified emission failure, as observed by the diagnostic hook.
///
/// Emission operations never surface these to the caller. They exist so that
/// tests (or an embedder that wants visibility) can install a hook via
/// [`StatEmitter::with_diagnostic_hook`] and observe what production code
/// silently discards.
#[derive(Debug)]
#[non_exhaustive]
pub enum EmitFailure {
    /// No destination is currently resolved.
    Unresolved,

    /// The datagram socket could not be acquired at startup, so the emitter
    /// is running degraded and every send is a no-op.
    NoTransport,

    /// The send itself failed, e.g. the payload exceeded the maximum datagram
    /// size or the network was unreachable.
    Io(io::Error),
}

type DiagnosticHook = Box<dyn Fn(&EmitFailure) + Send + Sync>;

/// A fire-and-forget emitter of KPI updates.
///
/// Holds one outbound datagram socket and one destination address for its
/// whole lifetime. Construction never fails: if the socket cannot be bound or
/// the default destination cannot be resolved, the corresponding piece of
/// state is simply absent and emission becomes a no-op until a later
/// [`open`](StatEmitter::open) succeeds.
///
/// All emission methods take `&self` and are safe to call concurrently from
/// multiple threads. Each call formats its own payload buffer, and a datagram
/// send is atomic, so in-flight packets are never corrupted. Reconfiguration
/// racing with emission is benign: a send observes either the fully-old or
/// the fully-new destination, never a mix.
pub struct StatEmitter {
    socket: Option<UdpSocket>,
    destination: RwLock<Option<SocketAddr>>,
    hook: Option<DiagnosticHook>,
}

impl StatEmitter {
    /// Creates an emitter pointed at the default collector destination,
    /// `239.255.0.1:20000`.
    pub fn new() -> Self {
        let socket = match UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)) {
            Ok(socket) => Some(socket),
            Err(e) => {
                debug!(error = %e, "Failed to acquire datagram socket; stat emission disabled.");
                None
            }
        };

        let destination = resolve(DEFAULT_HOST, DEFAULT_PORT).ok();

        StatEmitter { socket, destination: RwLock::new(destination), hook: None }
    }

    /// Installs a hook that observes every discarded emission failure.
    ///
    /// The hook exists for tests and diagnostics. Production behavior is
    /// unchanged: the failure is still discarded after the hook runs.
    #[must_use]
    pub fn with_diagnostic_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&EmitFailure) + Send + Sync + 'static,
    {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Redirects stat traffic to another collector host, keeping the current
    /// port.
    ///
    /// Either a hostname or an IP address literal can be given.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] if the host cannot be resolved. The
    /// previously configured destination stays fully in effect.
    pub fn open(&self, host: &str) -> Result<(), ResolutionError> {
        let mut addr = resolve(host, DEFAULT_PORT)?;

        // The port read and the install share one write guard, so a
        // concurrent reconfiguration cannot slip in between and have its
        // port overwritten by a stale one.
        let mut destination = self.destination.write();
        addr.set_port(destination.map_or(DEFAULT_PORT, |current| current.port()));
        *destination = Some(addr);
        drop(destination);

        debug!(%addr, "Reconfigured stat collector destination.");
        Ok(())
    }

    /// Redirects stat traffic to another collector host and port.
    ///
    /// Resolution happens before anything is stored, and the new destination
    /// is installed as a single whole-value replace, so a failure can never
    /// leave a half-applied address/port mix behind.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] if the host cannot be resolved. The
    /// previously configured destination stays fully in effect.
    pub fn open_with_port(&self, host: &str, port: u16) -> Result<(), ResolutionError> {
        let addr = resolve(host, port)?;
        *self.destination.write() = Some(addr);
        debug!(%addr, "Reconfigured stat collector destination.");
        Ok(())
    }

    /// Increments the counter `name` by 1.
    pub fn incr(&self, name: &str) {
        self.send(&payload::counter(name, 1));
    }

    /// Increments the counter `name` by `amount`.
    pub fn count(&self, name: &str, amount: i64) {
        self.send(&payload::counter(name, amount));
    }

    /// Increments the counter `name` by `amount`, with a scale factor.
    ///
    /// This is meant for sampled call sites: if you emit once every 100
    /// events, pass a scale of 100 and let the collector extrapolate. No
    /// multiplication happens client-side.
    pub fn scalecount(&self, name: &str, amount: i64, scale: i64) {
        self.send(&payload::scaled_counter(name, amount, scale));
    }

    /// Records an instantaneous sample for the gauge `name`.
    ///
    /// The collector is expected to track the minimum, average, and maximum
    /// of the samples over its own aggregation window. Useful for things like
    /// latency.
    pub fn gauge(&self, name: &str, value: i64) {
        self.send(&payload::gauge(name, value));
    }

    fn send(&self, line: &str) {
        if let Err(failure) = self.try_send(line.as_bytes()) {
            trace!(?failure, "Discarding stat emission failure.");
            if let Some(hook) = &self.hook {
                hook(&failure);
            }
        }
    }

    fn try_send(&self, payload: &[u8]) -> Result<(), EmitFailure> {
        let socket = self.socket.as_ref().ok_or(EmitFailure::NoTransport)?;
        let addr = self.destination.read().ok_or(EmitFailure::Unresolved)?;
        socket.send_to(payload, addr).map_err(EmitFailure::Io)?;
        Ok(())
    }
}

impl Default for StatEmitter {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve(host: &str, port: u16) -> Result<SocketAddr, ResolutionError> {
    match (host, port).to_socket_addrs() {
        Ok(mut addrs) => addrs.next().ok_or_else(|| ResolutionError {
            host: host.to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "host resolved to no addresses"),
        }),
        Err(e) => Err(ResolutionError { host: host.to_string(), source: e }),
    }
}
