// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Dashboard metrics derived from a collection of session notes.
//!
//! Everything here is a pure function of the notes and a reference instant:
//! no I/O, no caching, and no failure mode. Degenerate input (empty
//! collections, non-positive or non-finite durations) degrades to defined
//! defaults rather than errors.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::calendar::{local_date, DayKey, MonthKey};
use crate::note::SessionNote;

/// Inputs to a metrics computation besides the notes themselves.
#[derive(Debug, Clone, Copy)]
pub struct MetricsOptions {
	/// Reference instant; wall-clock time when `None`
	pub now: Option<DateTime<Utc>>,
	/// Offset whose calendar is used for day and month grouping
	pub offset: FixedOffset,
}

impl Default for MetricsOptions {
	fn default() -> Self {
		Self {
			now: None,
			offset: Utc.fix(),
		}
	}
}

/// Aggregate dashboard view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
	/// Sessions in the reference instant's calendar month
	pub total_this_month: u64,
	/// Sessions in the calendar month before it
	pub total_last_month: u64,
	/// Percentage change against last month; `None` when there is no baseline
	pub delta_pct: Option<f64>,
	/// Mean of positive, finite durations this month (minutes, one decimal)
	pub avg_duration_this_month: f64,
	pub bar_chart_data: Vec<DailySessions>,
	pub monthly_line_chart_data: Vec<MonthlyClientRow>,
	pub monthly_client_frequency: ClientFrequency,
}

impl DashboardMetrics {
	#[must_use]
	pub fn trend(&self) -> Trend {
		Trend::from_delta(self.delta_pct)
	}
}

/// Direction of the month-over-month change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
	Up,
	Down,
	/// No change, or no baseline to compare against
	Flat,
}

impl Trend {
	#[must_use]
	pub fn from_delta(delta_pct: Option<f64>) -> Self {
		match delta_pct {
			Some(d) if d > 0.0 => Trend::Up,
			Some(d) if d < 0.0 => Trend::Down,
			_ => Trend::Flat,
		}
	}

	#[must_use]
	pub fn symbol(&self) -> &'static str {
		match self {
			Trend::Up => "↑",
			Trend::Down => "↓",
			Trend::Flat => "–",
		}
	}
}

impl std::fmt::Display for Trend {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Trend::Up => write!(f, "up"),
			Trend::Down => write!(f, "down"),
			Trend::Flat => write!(f, "flat"),
		}
	}
}

/// Session count for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySessions {
	#[serde(rename = "dateISO")]
	pub date: DayKey,
	/// e.g. "Mar 07"
	pub label: String,
	pub sessions: u64,
}

/// Per-client session counts by month.
///
/// Clients keep the order in which they were first seen in the input.
/// A missing (client, month) pair means zero sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClientFrequency {
	entries: IndexMap<String, BTreeMap<MonthKey, u64>>,
}

impl ClientFrequency {
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn clients(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<MonthKey, u64>)> {
		self.entries.iter().map(|(client, months)| (client.as_str(), months))
	}

	#[must_use]
	pub fn get(&self, client: &str) -> Option<&BTreeMap<MonthKey, u64>> {
		self.entries.get(client)
	}

	/// Sessions for `client` in `month`, zero when absent.
	#[must_use]
	pub fn count(&self, client: &str, month: &MonthKey) -> u64 {
		self
			.get(client)
			.and_then(|months| months.get(month))
			.copied()
			.unwrap_or(0)
	}
}

/// One month of the per-client line series.
///
/// Serializes flat: `month`, `label`, then one field per client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyClientRow {
	pub month: MonthKey,
	/// e.g. "Mar 2024"
	pub label: String,
	/// Count per client, in [`ClientFrequency`] order, zero-filled
	#[serde(flatten)]
	pub counts: IndexMap<String, u64>,
}

impl MonthlyClientRow {
	#[must_use]
	pub fn count(&self, client: &str) -> Option<u64> {
		self.counts.get(client).copied()
	}
}

/// Compute dashboard metrics at an explicit reference instant, grouping by
/// the UTC calendar.
#[must_use]
pub fn compute_metrics(notes: &[SessionNote], now: DateTime<Utc>) -> DashboardMetrics {
	compute_at(notes, now, Utc.fix())
}

/// Compute dashboard metrics with the given options.
#[must_use]
pub fn compute_metrics_with(notes: &[SessionNote], options: &MetricsOptions) -> DashboardMetrics {
	let now = options.now.unwrap_or_else(Utc::now);
	compute_at(notes, now, options.offset)
}

fn compute_at(notes: &[SessionNote], now: DateTime<Utc>, offset: FixedOffset) -> DashboardMetrics {
	let today = local_date(&now, &offset);
	let current = MonthKey::of(today);
	let previous = MonthKey::preceding(today);

	let dated: Vec<(NaiveDate, &SessionNote)> = notes
		.iter()
		.map(|note| (local_date(&note.session_date, &offset), note))
		.collect();

	let this_month: Vec<&SessionNote> = dated
		.iter()
		.filter(|(date, _)| MonthKey::of(*date) == current)
		.map(|(_, note)| *note)
		.collect();
	let total_this_month = this_month.len() as u64;
	let total_last_month = dated
		.iter()
		.filter(|(date, _)| Some(MonthKey::of(*date)) == previous)
		.count() as u64;

	let delta_pct = delta_pct(total_this_month, total_last_month);
	let avg_duration_this_month = average_duration(&this_month);
	let bar_chart_data = daily_histogram(&dated);
	let monthly_client_frequency = client_frequency(&dated);
	let monthly_line_chart_data = line_series(&dated, &monthly_client_frequency);

	tracing::debug!(
		notes = notes.len(),
		month = %current,
		total_this_month,
		total_last_month,
		days = bar_chart_data.len(),
		clients = monthly_client_frequency.len(),
		"computed dashboard metrics"
	);

	DashboardMetrics {
		total_this_month,
		total_last_month,
		delta_pct,
		avg_duration_this_month,
		bar_chart_data,
		monthly_line_chart_data,
		monthly_client_frequency,
	}
}

fn delta_pct(current: u64, previous: u64) -> Option<f64> {
	if previous == 0 {
		return None;
	}
	Some((current as f64 - previous as f64) / previous as f64 * 100.0)
}

fn average_duration(notes: &[&SessionNote]) -> f64 {
	let (sum, count) = notes
		.iter()
		.map(|note| note.duration)
		.filter(|d| d.is_finite() && *d > 0.0)
		.fold((0.0_f64, 0_u64), |(sum, count), d| (sum + d, count + 1));

	if count == 0 {
		return 0.0;
	}
	(sum / count as f64 * 10.0).round() / 10.0
}

fn daily_histogram(dated: &[(NaiveDate, &SessionNote)]) -> Vec<DailySessions> {
	let per_day = dated
		.iter()
		.fold(BTreeMap::<DayKey, u64>::new(), |mut acc, (date, _)| {
			*acc.entry(DayKey::new(*date)).or_insert(0) += 1;
			acc
		});

	per_day
		.into_iter()
		.map(|(date, sessions)| DailySessions {
			date,
			label: date.label(),
			sessions,
		})
		.collect()
}

fn client_frequency(dated: &[(NaiveDate, &SessionNote)]) -> ClientFrequency {
	let mut entries: IndexMap<String, BTreeMap<MonthKey, u64>> = IndexMap::new();

	for (date, note) in dated {
		*entries
			.entry(note.client_name.clone())
			.or_default()
			.entry(MonthKey::of(*date))
			.or_insert(0) += 1;
	}

	ClientFrequency { entries }
}

fn line_series(
	dated: &[(NaiveDate, &SessionNote)],
	frequency: &ClientFrequency,
) -> Vec<MonthlyClientRow> {
	let months: BTreeSet<MonthKey> = dated.iter().map(|(date, _)| MonthKey::of(*date)).collect();

	months
		.into_iter()
		.map(|month| MonthlyClientRow {
			month,
			label: month.label(),
			counts: frequency
				.iter()
				.map(|(client, by_month)| {
					(client.to_string(), by_month.get(&month).copied().unwrap_or(0))
				})
				.collect(),
		})
		.collect()
}
