//! A fire-and-forget client for emitting KPI measurements to a statd
//! collector daemon over UDP.
//!
//! # Usage
//!
//! The crate keeps one process-wide emitter, ready the moment it is first
//! touched. Ideally there is nothing to configure; it should just work and be
//! used immediately:
//!
//! ```no_run
//! // Counters are summed by the collector.
//! statd_client::incr("requests.total");
//! statd_client::count("bytes.sent", 1024);
//!
//! // Gauges are tracked as min/avg/max over the collector's window.
//! statd_client::gauge("latency.ms", 137);
//! ```
//!
//! Traffic goes to `239.255.0.1:20000` by default. Redirecting it elsewhere
//! is the one operation allowed to fail, since it is an explicit setup call:
//!
//! ```no_run
//! statd_client::open_with_port("stats.example.com", 9125)?;
//! statd_client::count("requests.total", 42);
//! # Ok::<(), statd_client::ResolutionError>(())
//! ```
//!
//! For sampled call sites there is [`scalecount`]: if you only emit once
//! every 100 events, pass a scale of 100 and the collector extrapolates.
//!
//! # Behavior
//!
//! This client makes one deliberate trade-off: instrumentation must never be
//! a source of application faults. Emission operations have no failure
//! channel at all. An unresolvable destination, a missing socket, an
//! oversized payload, an unreachable network -- all of it is discarded and
//! the call returns normally. UDP is lossy anyway, and a few dropped packets
//! are preferable to a crashing or stalling application. If stats stop
//! arriving at the collector, that absence is itself the signal that
//! something is wrong with the emitting component.
//!
//! Consequences worth knowing:
//!
//! - No aggregation, batching, retry, or delivery confirmation. One call, one
//!   datagram, best effort.
//! - No background threads or queues; sends happen synchronously on the
//!   calling thread and cost no more than a single outbound send.
//! - Dropped updates are silent data loss by design, not a bug. Each
//!   discarded failure does emit a [`tracing`] event at trace level, which is
//!   invisible under default filter settings; operators who want to see the
//!   drops can opt in with their subscriber's filter.
//!
//! Embedders that want their own emitter instance (or want to observe the
//! discarded failures in tests) can construct a [`StatEmitter`] directly
//! instead of going through the process-wide functions.

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![deny(missing_docs)]

use once_cell::sync::Lazy;

mod emitter;
pub use self::emitter::{EmitFailure, ResolutionError, StatEmitter, DEFAULT_HOST, DEFAULT_PORT};

mod payload;

static GLOBAL: Lazy<StatEmitter> = Lazy::new(StatEmitter::new);

/// Redirects stat traffic to another collector host, keeping the current
/// port.
///
/// Either a hostname or an IP address literal can be given.
///
/// # Errors
///
/// Returns [`ResolutionError`] if the host cannot be resolved. The previously
/// configured destination stays fully in effect.
pub fn open(host: &str) -> Result<(), ResolutionError> {
    GLOBAL.open(host)
}

/// Redirects stat traffic to another collector host and port.
///
/// # Errors
///
/// Returns [`ResolutionError`] if the host cannot be resolved. The previously
/// configured destination stays fully in effect.
pub fn open_with_port(host: &str, port: u16) -> Result<(), ResolutionError> {
    GLOBAL.open_with_port(host, port)
}

/// Increments the counter `name` by 1.
pub fn incr(name: &str) {
    GLOBAL.incr(name);
}

/// Increments the counter `name` by `amount`.
pub fn count(name: &str, amount: i64) {
    GLOBAL.count(name, amount);
}

/// Increments the counter `name` by `amount`, scaled by `scale` at the
/// collector.
pub fn scalecount(name: &str, amount: i64, scale: i64) {
    GLOBAL.scalecount(name, amount, scale);
}

/// Records an instantaneous sample for the gauge `name`.
pub fn gauge(name: &str, value: i64) {
    GLOBAL.gauge(name, value);
}
