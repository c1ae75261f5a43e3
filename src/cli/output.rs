//! Output formatting helpers for CLI commands

use crate::api::{Alert, HealthReport};
use crate::config::CameraConfig;
use crate::view::{
    alert_description, alert_priority, alert_time, alert_title, gesture_label, AlertStats,
    GestureEvent, PersonCount, Priority,
};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde::Serialize;
use std::fmt::Write;

/// Pretty-printed JSON for `--json` output.
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

fn priority_cell(priority: Priority) -> String {
    let text = priority.to_string();
    match priority {
        Priority::Critical => text.red().bold().to_string(),
        Priority::High => text.yellow().bold().to_string(),
        Priority::Medium => text.yellow().to_string(),
        Priority::Low => text.blue().to_string(),
    }
}

fn gesture_cell(alert: &Alert) -> String {
    alert.gesture.map(gesture_label).unwrap_or_else(|| "-".to_string())
}

/// Format alerts as a table
pub fn format_alerts_table(alerts: &[Alert]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Alert", "Priority", "Time (IST)", "M/F", "Gesture", "Frame"]);

    for alert in alerts {
        table.add_row(vec![
            Cell::new(alert.id),
            Cell::new(alert_title(alert.alert_type)),
            Cell::new(priority_cell(alert_priority(alert.alert_type))),
            Cell::new(alert_time(alert)),
            Cell::new(format!("{}/{}", alert.male_count, alert.female_count)),
            Cell::new(gesture_cell(alert)),
            Cell::new(if alert.has_frame() { "✓" } else { "" }),
        ]);
    }

    table.to_string()
}

/// Detailed view of one alert
pub fn format_alert_detail(alert: &Alert, image_url: &str) -> String {
    let mut output = String::new();
    let priority = alert_priority(alert.alert_type);

    let _ = writeln!(
        output,
        "{} #{}  [{}]",
        alert_title(alert.alert_type).bold(),
        alert.id,
        priority_cell(priority)
    );
    let _ = writeln!(output, "{}", alert_description(alert.alert_type));
    let _ = writeln!(output);
    let _ = writeln!(output, "Time:       {}", alert_time(alert));
    let _ = writeln!(
        output,
        "People:     {} male, {} female ({} total)",
        alert.male_count,
        alert.female_count,
        alert.total_people()
    );
    let _ = writeln!(output, "Gesture:    {}", gesture_cell(alert));
    if let Some(confidence) = alert.confidence {
        let _ = writeln!(output, "Confidence: {:.0}%", confidence * 100.0);
    }
    if let Some((lat, lon)) = alert.location() {
        let _ = writeln!(output, "Location:   {:.5}, {:.5}", lat, lon);
    }
    if alert.has_frame() {
        let _ = writeln!(output, "Frame:      {}", image_url);
    }

    output.trim_end().to_string()
}

/// Format alert stats as a table plus newest/oldest summary
pub fn format_stats(stats: &AlertStats) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Alert type", "Priority", "Count"]);

    let mut by_type: Vec<_> = stats.by_type.iter().collect();
    by_type.sort_by(|a, b| {
        alert_priority(*b.0)
            .cmp(&alert_priority(*a.0))
            .then(b.1.cmp(a.1))
    });
    for (alert_type, count) in by_type {
        table.add_row(vec![
            Cell::new(alert_title(*alert_type)),
            Cell::new(priority_cell(alert_priority(*alert_type))),
            Cell::new(count),
        ]);
    }

    let mut output = String::new();
    let _ = writeln!(output, "Total alerts: {}", stats.total);
    if stats.total > 0 {
        let _ = writeln!(output, "{}", table);
    }
    if !stats.by_gesture.is_empty() {
        let gestures: Vec<String> = stats
            .by_gesture
            .iter()
            .map(|(g, n)| format!("{} x{}", gesture_label(*g), n))
            .collect();
        let _ = writeln!(output, "Gestures: {}", gestures.join(", "));
    }
    if let Some(newest) = &stats.most_recent {
        let _ = writeln!(output, "Most recent: #{} at {}", newest.id, alert_time(newest));
    }
    if let Some(oldest) = &stats.oldest {
        let _ = writeln!(output, "Oldest:      #{} at {}", oldest.id, alert_time(oldest));
    }

    output.trim_end().to_string()
}

/// One-line headcount
pub fn format_person_count(count: &PersonCount) -> String {
    format!(
        "{} people ({} male, {} female)",
        count.total.to_string().bold(),
        count.male,
        count.female
    )
}

/// Backend health line
pub fn format_health(base_url: &str, report: &HealthReport) -> String {
    let status = if report.healthy {
        "Healthy".green()
    } else {
        "Unreachable".red()
    };
    let mut line = format!("{} {} ({}ms)", base_url, status, report.latency_ms);
    if let Some(error) = &report.error {
        line.push_str(&format!("\n  {}", error.dimmed()));
    }
    line
}

/// Cameras with resolved stream URLs
#[derive(Debug, Clone, Serialize)]
pub struct CameraView {
    pub id: String,
    pub name: String,
    pub location: String,
    pub position: String,
    pub enabled: bool,
    pub stream_url: String,
}

impl CameraView {
    pub fn new(camera: &CameraConfig, base_url: &str) -> Self {
        Self {
            id: camera.id.clone(),
            name: camera.name.clone(),
            location: camera.location.clone(),
            position: camera.position.clone(),
            enabled: camera.enabled,
            stream_url: camera.resolved_stream_url(base_url),
        }
    }
}

/// Format cameras as a table
pub fn format_cameras_table(cameras: &[CameraView]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Name", "Location", "Position", "Status", "Stream"]);

    for camera in cameras {
        let status = if camera.enabled {
            "Active".green().to_string()
        } else {
            "Offline".red().to_string()
        };
        table.add_row(vec![
            Cell::new(&camera.id),
            Cell::new(&camera.name),
            Cell::new(&camera.location),
            Cell::new(&camera.position),
            Cell::new(status),
            Cell::new(&camera.stream_url),
        ]);
    }

    table.to_string()
}

/// Gesture history, newest first
pub fn format_gesture_history<'a>(events: impl Iterator<Item = &'a GestureEvent>) -> String {
    let lines: Vec<String> = events
        .map(|event| {
            format!(
                "  {}  {}  {:.0}%  {} hand(s)",
                crate::view::format_ist(event.seen_at),
                gesture_label(event.gesture),
                event.confidence * 100.0,
                event.hands_count
            )
        })
        .collect();
    if lines.is_empty() {
        "  (no gestures detected yet)".to_string()
    } else {
        lines.join("\n")
    }
}
