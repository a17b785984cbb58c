//! Prometheus metrics collection for presenced.
//!
//! Metrics are exposed on the HTTP endpoint served by [`crate::http`].
//! Recording helpers are no-ops until [`init`] runs, so handler code can
//! call them unconditionally (tests never initialise the registry).
//!
//! - `presence_connections` - Attached connections (gauge)
//! - `presence_connections_rejected_total` - Connections closed by the gate
//! - `presence_events_total{event}` - Inbound events handled, by name
//! - `presence_events_dropped_total{reason}` - Inbound events ignored, by reason
//! - `presence_frames_sent_total` / `presence_frames_dropped_total` - Outbound delivery
//! - `presence_fanout` - Recipients per emitted event (histogram)
//! - `presence_registry_size{registry}` - Entries per presence registry (gauge)

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts,
    Registry, TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Counters (monotonic increasing)
// ========================================================================

/// Connections closed by the connection gate.
pub static CONNECTIONS_REJECTED: OnceLock<IntCounter> = OnceLock::new();

/// Inbound events handled, by event name.
pub static EVENTS: OnceLock<IntCounterVec> = OnceLock::new();

/// Inbound events dropped without state change, by reason.
pub static EVENTS_DROPPED: OnceLock<IntCounterVec> = OnceLock::new();

/// Frames queued for delivery.
pub static FRAMES_SENT: OnceLock<IntCounter> = OnceLock::new();

/// Frames discarded because the destination queue was full or closed.
pub static FRAMES_DROPPED: OnceLock<IntCounter> = OnceLock::new();

// ========================================================================
// Gauges (can increase/decrease)
// ========================================================================

/// Currently attached connections.
pub static CONNECTIONS: OnceLock<IntGauge> = OnceLock::new();

/// Entries per presence registry.
pub static REGISTRY_SIZE: OnceLock<IntGaugeVec> = OnceLock::new();

// ========================================================================
// Histograms
// ========================================================================

/// Recipients per emitted event.
pub static FANOUT: OnceLock<Histogram> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Must be called once at server startup before any metrics are recorded.
pub fn init() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            match $init {
                Ok(m) => {
                    if let Err(e) = r.register(Box::new(m.clone())) {
                        tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
                    }
                    let _ = $metric.set(m);
                }
                Err(e) => {
                    tracing::warn!(error = %e, concat!("Failed to create metric ", stringify!($metric)));
                }
            }
        };
    }

    register!(CONNECTIONS_REJECTED, IntCounter::new("presence_connections_rejected_total", "Connections closed by the handshake gate"));
    register!(EVENTS, IntCounterVec::new(Opts::new("presence_events_total", "Inbound events handled by name"), &["event"]));
    register!(EVENTS_DROPPED, IntCounterVec::new(Opts::new("presence_events_dropped_total", "Inbound events dropped by reason"), &["reason"]));
    register!(FRAMES_SENT, IntCounter::new("presence_frames_sent_total", "Frames queued for delivery"));
    register!(FRAMES_DROPPED, IntCounter::new("presence_frames_dropped_total", "Frames dropped on full or closed queues"));
    register!(CONNECTIONS, IntGauge::new("presence_connections", "Attached connections"));
    register!(REGISTRY_SIZE, IntGaugeVec::new(Opts::new("presence_registry_size", "Entries per presence registry"), &["registry"]));
    register!(FANOUT, Histogram::with_opts(
        HistogramOpts::new("presence_fanout", "Recipients per emitted event")
            .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0])));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

#[inline]
pub fn record_rejected_connection() {
    if let Some(c) = CONNECTIONS_REJECTED.get() {
        c.inc();
    }
}

#[inline]
pub fn record_event(event: &str) {
    if let Some(c) = EVENTS.get() {
        c.with_label_values(&[event]).inc();
    }
}

#[inline]
pub fn record_dropped_event(reason: &str) {
    if let Some(c) = EVENTS_DROPPED.get() {
        c.with_label_values(&[reason]).inc();
    }
}

#[inline]
pub fn record_frame_sent() {
    if let Some(c) = FRAMES_SENT.get() {
        c.inc();
    }
}

#[inline]
pub fn record_frame_dropped() {
    if let Some(c) = FRAMES_DROPPED.get() {
        c.inc();
    }
}

#[inline]
pub fn set_connections(count: usize) {
    if let Some(g) = CONNECTIONS.get() {
        g.set(count as i64);
    }
}

#[inline]
pub fn set_registry_size(registry: &str, count: usize) {
    if let Some(g) = REGISTRY_SIZE.get() {
        g.with_label_values(&[registry]).set(count as i64);
    }
}

/// Record how many destinations an emitted event reached.
#[inline]
pub fn record_fanout(recipients: usize) {
    if let Some(h) = FANOUT.get() {
        h.observe(recipients as f64);
    }
}
