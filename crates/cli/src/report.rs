// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-of-day report rendering

use clap::ValueEnum;
use lift_engine::RunReport;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Transition-log rows printed before the remainder is summarized
const LISTED_ROWS: usize = 100;

pub const REPORT_FILE: &str = "daily_report.txt";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Json,
}

pub fn render(report: &RunReport, format: Format) -> Result<String, serde_json::Error> {
    match format {
        Format::Text => Ok(render_text(report)),
        Format::Json => serde_json::to_string_pretty(report),
    }
}

pub fn render_text(report: &RunReport) -> String {
    let snapshot = &report.snapshot;
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "=== Chairlift daily report ===");
    let _ = writeln!(
        out,
        "Generated: {}",
        snapshot.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(out, "Run: {}", report.run_id);
    let _ = writeln!(out, "Elapsed: {:.1}s", snapshot.elapsed_secs);
    let _ = writeln!(out);
    let _ = writeln!(out, "Total rides: {}", snapshot.total_rides);
    let _ = writeln!(out, "Tickets sold: {}", snapshot.tickets_sold);
    let _ = writeln!(out, "Visitors: {}", snapshot.visitors_created);
    let _ = writeln!(
        out,
        "Transition log entries: {}",
        snapshot.transitions.len()
    );
    if snapshot.unrecorded_transitions > 0 {
        let _ = writeln!(
            out,
            "Unrecorded passages (log full): {}",
            snapshot.unrecorded_transitions
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<8} {:<8} {:<6} {:<6} TIME",
        "TICKET", "VISITOR", "GATE", "RIDE"
    );
    for entry in snapshot.transitions.iter().take(LISTED_ROWS) {
        let _ = writeln!(
            out,
            "{:<8} {:<8} {:<6} {:<6} {}",
            entry.ticket_id,
            entry.visitor_id,
            entry.gate_id,
            entry.ride_number,
            entry.recorded_at.format("%H:%M:%S%.3f")
        );
    }
    if snapshot.transitions.len() > LISTED_ROWS {
        let _ = writeln!(
            out,
            "... and {} more",
            snapshot.transitions.len() - LISTED_ROWS
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Rides per ticket:");
    for (ticket_id, rides) in &snapshot.rides_per_ticket {
        let _ = writeln!(out, "  ticket {ticket_id}: {rides}");
    }
    out
}

/// One-paragraph summary for stdout
pub fn summary(report: &RunReport) -> String {
    let snapshot = &report.snapshot;
    let mut out = format!(
        "Park closed after {:.1}s: {} rides, {} tickets sold, {} visitors ({} left, {} failed)",
        snapshot.elapsed_secs,
        snapshot.total_rides,
        snapshot.tickets_sold,
        snapshot.visitors_created,
        report.visitors_exited,
        report.visitors_failed,
    );
    if report.aborted > 0 {
        out.push_str(&format!("; {} actors aborted", report.aborted));
    }
    out
}

/// Write the rendered report into the log directory
pub fn write(dir: &Path, rendered: &str) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(REPORT_FILE);
    std::fs::write(&path, rendered)?;
    Ok(path)
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
