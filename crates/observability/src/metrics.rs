//! Domain metric helpers.
//!
//! Thin wrappers over the `metrics` macros so every crate records under the
//! same names/labels. All of these are no-ops until a recorder is installed
//! (see [`crate::init_metrics_only`]).

use metrics::{counter, gauge};

/// One datagram handed to the OS for a channel.
pub fn record_datagram_sent(channel: &str) {
    counter!("trackfuse_datagrams_sent_total", "channel" => channel.to_string()).increment(1);
}

/// One datagram received on a channel, decoded or not. Mere receipt counts
/// as bus activity.
pub fn record_datagram_received(channel: &str) {
    counter!("trackfuse_datagrams_received_total", "channel" => channel.to_string()).increment(1);
}

/// One record dropped by a consumer's decode step (malformed or foreign).
pub fn record_record_dropped(consumer: &str) {
    counter!("trackfuse_records_dropped_total", "consumer" => consumer.to_string()).increment(1);
}

/// One sensor report published by an agent.
pub fn record_report_published(sensor: &str, kind: &str) {
    counter!(
        "trackfuse_reports_published_total",
        "sensor" => sensor.to_string(),
        "kind" => kind.to_string()
    )
    .increment(1);
}

/// One fused estimate produced by the reducer.
pub fn record_fused_estimate(contributing: usize) {
    counter!("trackfuse_estimates_total").increment(1);
    gauge!("trackfuse_fusion_sources").set(contributing as f64);
}

/// One restart of a managed sensor agent.
pub fn record_agent_restart(agent: &str) {
    counter!("trackfuse_agent_restarts_total", "agent" => agent.to_string()).increment(1);
}
