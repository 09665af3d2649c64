//! Labelled counters for the extension service.
//!
//! Labels are flattened into sorted key vectors to keep rendering order
//! deterministic.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut key: Vec<(String, String)> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Current value for an exact label set (0 if never touched).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} counter", name);
        let mut rows: Vec<(String, u64)> = self
            .map
            .iter()
            .map(|r| {
                let labels = r
                    .key()
                    .iter()
                    .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
                    .collect::<Vec<_>>()
                    .join(",");
                (labels, r.value().load(Ordering::Relaxed))
            })
            .collect();
        rows.sort();
        for (labels, val) in rows {
            let _ = writeln!(out, "{}{{{}}} {}", name, labels, val);
        }
    }
}

/// Counters kept per service instance.
#[derive(Default)]
pub struct ServiceMetrics {
    /// `outcome` = accepted | rejected, `reason` for rejections.
    pub handshakes: CounterVec,
    /// `reason` = update reason, `outcome` = enqueued | ignored | completed.
    pub updates: CounterVec,
    /// `outcome` = delivered | cleared | no_host | failed.
    pub publishes: CounterVec,
}

impl ServiceMetrics {
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.handshakes.render("mindme_handshakes_total", &mut out);
        self.updates.render("mindme_updates_total", &mut out);
        self.publishes.render("mindme_publishes_total", &mut out);
        out
    }
}
