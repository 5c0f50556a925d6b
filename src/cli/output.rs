//! Output formatting helpers for CLI commands

use crate::poller::ChannelProbe;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde::Serialize;
use serde_json::{json, Value};

/// Outcome class of a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Ok,
    Empty,
    Error,
}

/// View model for probe display
#[derive(Debug, Clone, Serialize)]
pub struct ProbeView {
    pub channel: String,
    pub status: ProbeStatus,
    pub latency_ms: Option<u64>,
    pub detail: String,
}

impl From<&ChannelProbe> for ProbeView {
    fn from(probe: &ChannelProbe) -> Self {
        let (status, detail) = match &probe.result {
            Ok(snapshot) if snapshot.is_empty() => (ProbeStatus::Empty, "nothing to show".to_string()),
            Ok(snapshot) => (ProbeStatus::Ok, describe(snapshot.as_value())),
            Err(e) => (ProbeStatus::Error, e.to_string()),
        };

        Self {
            channel: probe.channel.clone(),
            status,
            latency_ms: probe.latency.map(|d| d.as_millis() as u64),
            detail,
        }
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Array(items) => format!("{} item(s)", items.len()),
        Value::Object(fields) => format!("{} field(s)", fields.len()),
        other => other.to_string(),
    }
}

/// Format probes as a table
pub fn format_probes_table(probes: &[ProbeView]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Channel", "Status", "Latency", "Detail"]);

    for p in probes {
        let status_str = match p.status {
            ProbeStatus::Ok => "OK".green().to_string(),
            ProbeStatus::Empty => "Empty".yellow().to_string(),
            ProbeStatus::Error => "Error".red().to_string(),
        };
        let latency = p
            .latency_ms
            .map(|ms| format!("{}ms", ms))
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![
            Cell::new(&p.channel),
            Cell::new(status_str),
            Cell::new(latency),
            Cell::new(&p.detail),
        ]);
    }

    table.to_string()
}

/// Format probes as JSON
pub fn format_probes_json(probes: &[ProbeView]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&json!({ "channels": probes }))
}
