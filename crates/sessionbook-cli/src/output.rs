// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Plain-text rendering of notes and dashboard metrics.

use std::fmt::Write;

use chrono::FixedOffset;
use sessionbook_core::{DashboardMetrics, DayKey, SessionNote};

const BAR_WIDTH: u64 = 30;

/// Dates are shown on the calendar of `offset`, matching dashboard grouping.
pub fn render_note_list(notes: &[SessionNote], offset: &FixedOffset) -> String {
	if notes.is_empty() {
		return "No notes yet.\n".to_string();
	}

	let client_width = notes
		.iter()
		.map(|n| n.client_name.chars().count())
		.max()
		.unwrap_or(0)
		.max("CLIENT".len());

	let mut out = String::new();
	let _ = writeln!(
		out,
		"{:<36}  {:<client_width$}  {:<10}  {:>8}",
		"ID", "CLIENT", "DATE", "DURATION"
	);
	for note in notes {
		let _ = writeln!(
			out,
			"{:<36}  {:<client_width$}  {:<10}  {:>4} min",
			note.id,
			note.client_name,
			DayKey::from_instant(&note.session_date, offset).to_string(),
			note.duration,
		);
	}
	out
}

pub fn render_note(note: &SessionNote, offset: &FixedOffset) -> String {
	let mut out = String::new();
	let _ = writeln!(out, "ID:       {}", note.id);
	let _ = writeln!(out, "Client:   {}", note.client_name);
	let _ = writeln!(
		out,
		"Date:     {}",
		DayKey::from_instant(&note.session_date, offset)
	);
	let _ = writeln!(out, "Duration: {} min", note.duration);
	let _ = writeln!(out, "Created:  {}", note.created_at.with_timezone(offset).to_rfc3339());
	let _ = writeln!(out, "Updated:  {}", note.updated_at.with_timezone(offset).to_rfc3339());
	let _ = writeln!(out);
	let _ = writeln!(out, "{}", note.notes);
	out
}

pub fn render_dashboard(metrics: &DashboardMetrics) -> String {
	let mut out = String::new();

	let _ = writeln!(
		out,
		"Sessions this month: {} (vs last month: {})",
		metrics.total_this_month, metrics.total_last_month
	);
	let trend = metrics.trend();
	match metrics.delta_pct {
		Some(delta) => {
			let _ = writeln!(
				out,
				"Trend: {} {:.1}% compared to last month",
				trend.symbol(),
				delta
			);
		}
		None => {
			let _ = writeln!(out, "Trend: {} no baseline", trend.symbol());
		}
	}
	let _ = writeln!(
		out,
		"Average session: {} min (current month)",
		metrics.avg_duration_this_month
	);

	let _ = writeln!(out);
	let _ = writeln!(out, "Sessions per day");
	if metrics.bar_chart_data.is_empty() {
		let _ = writeln!(out, "  (no sessions)");
	}
	let peak = metrics
		.bar_chart_data
		.iter()
		.map(|d| d.sessions)
		.max()
		.unwrap_or(1);
	for day in &metrics.bar_chart_data {
		let width = (day.sessions * BAR_WIDTH).div_ceil(peak) as usize;
		let _ = writeln!(
			out,
			"  {}  {}  {} {}",
			day.date,
			day.label,
			"#".repeat(width),
			day.sessions
		);
	}

	let _ = writeln!(out);
	let _ = writeln!(out, "Session frequency by client (monthly)");
	if metrics.monthly_line_chart_data.is_empty() {
		let _ = writeln!(out, "  (no sessions)");
		return out;
	}

	let clients: Vec<&str> = metrics.monthly_client_frequency.clients().collect();
	let widths: Vec<usize> = clients
		.iter()
		.map(|c| c.chars().count().max(3))
		.collect();

	let _ = write!(out, "  {:<8}", "MONTH");
	for (client, width) in clients.iter().zip(widths.iter().copied()) {
		let _ = write!(out, "  {client:>width$}");
	}
	let _ = writeln!(out);

	for row in &metrics.monthly_line_chart_data {
		let _ = write!(out, "  {:<8}", row.label);
		for ((_, count), width) in row.counts.iter().zip(widths.iter().copied()) {
			let _ = write!(out, "  {count:>width$}");
		}
		let _ = writeln!(out);
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{DateTime, NaiveDate, TimeZone, Utc};
	use sessionbook_core::{compute_metrics, NoteId};

	fn note(client: &str, session_date: DateTime<Utc>) -> SessionNote {
		SessionNote {
			id: NoteId::new(),
			client_name: client.to_string(),
			session_date,
			notes: "Progress on goals".to_string(),
			duration: 50.0,
			created_at: session_date,
			updated_at: session_date,
		}
	}

	fn utc() -> FixedOffset {
		FixedOffset::east_opt(0).unwrap()
	}

	#[test]
	fn test_empty_dashboard_mentions_missing_baseline() {
		let metrics = compute_metrics(&[], Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap());
		let text = render_dashboard(&metrics);

		assert!(text.contains("Sessions this month: 0 (vs last month: 0)"));
		assert!(text.contains("Trend: – no baseline"));
		assert!(text.contains("Average session: 0 min"));
		assert!(text.contains("(no sessions)"));
	}

	#[test]
	fn test_dashboard_with_trend_and_table() {
		let notes = vec![
			note("Alice", Utc.with_ymd_and_hms(2024, 2, 10, 9, 0, 0).unwrap()),
			note("Alice", Utc.with_ymd_and_hms(2024, 3, 7, 9, 0, 0).unwrap()),
			note("Bob", Utc.with_ymd_and_hms(2024, 3, 7, 15, 0, 0).unwrap()),
		];
		let metrics = compute_metrics(&notes, Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap());
		let text = render_dashboard(&metrics);

		assert!(text.contains("Trend: ↑ 100.0% compared to last month"));
		assert!(text.contains("Average session: 50 min"));
		assert!(text.contains("2024-03-07  Mar 07"));
		assert!(text.contains("MONTH"));
		assert!(text.contains("Alice"));
		assert!(text.contains("Mar 2024"));
		assert!(text.contains("Feb 2024"));
	}

	#[test]
	fn test_note_list() {
		assert_eq!(render_note_list(&[], &utc()), "No notes yet.\n");

		let n = note("Alice", Utc.with_ymd_and_hms(2024, 3, 7, 9, 0, 0).unwrap());
		let text = render_note_list(std::slice::from_ref(&n), &utc());
		assert!(text.starts_with("ID"));
		assert!(text.contains(&n.id.to_string()));
		assert!(text.contains("2024-03-07"));
		assert!(text.contains("50 min"));
	}

	#[test]
	fn test_single_note() {
		let n = note("Alice", Utc.with_ymd_and_hms(2024, 3, 7, 9, 0, 0).unwrap());
		let text = render_note(&n, &utc());
		assert!(text.contains("Client:   Alice"));
		assert!(text.ends_with("Progress on goals\n"));
	}

	#[test]
	fn test_dates_use_the_dashboard_offset() {
		let offset = FixedOffset::east_opt(60 * 60).unwrap();
		let session_date = offset
			.from_local_datetime(
				&NaiveDate::from_ymd_opt(2024, 3, 7)
					.unwrap()
					.and_hms_opt(0, 0, 0)
					.unwrap(),
			)
			.single()
			.unwrap()
			.with_timezone(&Utc);
		let n = note("Alice", session_date);

		let metrics = sessionbook_core::compute_metrics_with(
			std::slice::from_ref(&n),
			&sessionbook_core::MetricsOptions {
				now: Some(session_date),
				offset,
			},
		);
		assert_eq!(metrics.bar_chart_data[0].date.to_string(), "2024-03-07");

		let list = render_note_list(std::slice::from_ref(&n), &offset);
		assert!(list.contains("2024-03-07"));
		assert!(!list.contains("2024-03-06"));

		let detail = render_note(&n, &offset);
		assert!(detail.contains("Date:     2024-03-07"));
		assert!(detail.contains("Created:  2024-03-07T00:00:00+01:00"));
	}
}
