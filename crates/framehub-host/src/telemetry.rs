//! Telemetry sink and the default metrics implementation.
//!
//! No external metrics dependency; counters with dynamic labels are backed
//! by `DashMap` and rendered in Prometheus text exposition format. Labels
//! are flattened into sorted key vectors to keep deterministic ordering.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use framehub_core::error::ErrorCode;
use framehub_core::Origin;

/// Why an inbound message was dropped before reaching a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Text that did not parse as an envelope.
    Parse,
    /// Envelope whose event has no registered handler.
    UnknownCommand,
    /// Sender origin not on the allowlist.
    RejectedOrigin,
}

impl DropReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DropReason::Parse => "parse",
            DropReason::UnknownCommand => "unknown_command",
            DropReason::RejectedOrigin => "rejected_origin",
        }
    }
}

/// Sink the router, handlers, and heartbeat report into. Injected so tests
/// and embedders can observe protocol activity without scraping.
pub trait TelemetrySink: Send + Sync {
    /// One handled command (emitted after the handler ran, success or not).
    fn command(&self, event: &str, origin: &Origin);
    /// One dropped inbound message.
    fn dropped(&self, reason: DropReason);
    /// A handler returned an error.
    fn handler_error(&self, event: &str, code: ErrorCode);
    /// One heartbeat poll completed.
    fn heartbeat_poll(&self, ok: bool);
}

fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

#[derive(Default)]
struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    fn inc(&self, labels: &[(&str, &str)]) {
        let mut key: Vec<(String, String)> = labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        key.sort();

        let counter = self.map.entry(key).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} counter", name);
        for r in self.map.iter() {
            let label_str = r
                .key()
                .iter()
                .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
                .collect::<Vec<_>>()
                .join(",");
            let _ = writeln!(out, "{}{{{}}} {}", name, label_str, r.value().load(Ordering::Relaxed));
        }
    }
}

/// Default `TelemetrySink`: label counters rendered on demand.
#[derive(Default)]
pub struct HostMetrics {
    commands: CounterVec,
    dropped: CounterVec,
    handler_errors: CounterVec,
    heartbeat_polls: CounterVec,
}

impl HostMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prometheus text exposition format.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.commands.render("framehub_commands_total", &mut out);
        self.dropped.render("framehub_dropped_total", &mut out);
        self.handler_errors
            .render("framehub_handler_errors_total", &mut out);
        self.heartbeat_polls
            .render("framehub_heartbeat_polls_total", &mut out);
        out
    }
}

impl TelemetrySink for HostMetrics {
    fn command(&self, event: &str, origin: &Origin) {
        let origin = origin.to_string();
        self.commands.inc(&[("event", event), ("origin", origin.as_str())]);
    }

    fn dropped(&self, reason: DropReason) {
        self.dropped.inc(&[("reason", reason.as_str())]);
    }

    fn handler_error(&self, event: &str, code: ErrorCode) {
        self.handler_errors
            .inc(&[("event", event), ("code", code.as_str())]);
    }

    fn heartbeat_poll(&self, ok: bool) {
        let outcome = if ok { "ok" } else { "error" };
        self.heartbeat_polls.inc(&[("outcome", outcome)]);
    }
}
