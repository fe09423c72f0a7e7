// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration layer for merging from multiple sources.

use serde::Deserialize;

/// Partial configuration layer - all fields are Option for merging.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigLayer {
	#[serde(default)]
	pub database: Option<DatabaseLayer>,
	#[serde(default)]
	pub logging: Option<LoggingLayer>,
	#[serde(default)]
	pub dashboard: Option<DashboardLayer>,
	#[serde(default)]
	pub validation: Option<ValidationLayer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseLayer {
	#[serde(default)]
	pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingLayer {
	#[serde(default)]
	pub level: Option<String>,
	#[serde(default)]
	pub format: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardLayer {
	/// Offset from UTC, in minutes, of the calendar used for grouping
	#[serde(default)]
	pub utc_offset_minutes: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidationLayer {
	#[serde(default)]
	pub max_duration_minutes: Option<f64>,
	#[serde(default)]
	pub max_notes_chars: Option<usize>,
}

impl ConfigLayer {
	/// Merge `other` into `self`; fields set in `other` win.
	pub fn merge(&mut self, other: ConfigLayer) {
		merge_option(&mut self.database, other.database, |t, s| {
			if s.url.is_some() {
				t.url = s.url;
			}
		});
		merge_option(&mut self.logging, other.logging, |t, s| {
			if s.level.is_some() {
				t.level = s.level;
			}
			if s.format.is_some() {
				t.format = s.format;
			}
		});
		merge_option(&mut self.dashboard, other.dashboard, |t, s| {
			if s.utc_offset_minutes.is_some() {
				t.utc_offset_minutes = s.utc_offset_minutes;
			}
		});
		merge_option(&mut self.validation, other.validation, |t, s| {
			if s.max_duration_minutes.is_some() {
				t.max_duration_minutes = s.max_duration_minutes;
			}
			if s.max_notes_chars.is_some() {
				t.max_notes_chars = s.max_notes_chars;
			}
		});
	}
}

fn merge_option<T, F>(target: &mut Option<T>, source: Option<T>, merge_fn: F)
where
	F: FnOnce(&mut T, T),
{
	match (target.as_mut(), source) {
		(Some(t), Some(s)) => merge_fn(t, s),
		(None, Some(s)) => *target = Some(s),
		_ => {}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_partial_toml() {
		let layer: ConfigLayer = toml::from_str(
			r#"
			[logging]
			level = "debug"

			[dashboard]
			utc_offset_minutes = -300
			"#,
		)
		.unwrap();

		assert!(layer.database.is_none());
		assert_eq!(layer.logging.unwrap().level.as_deref(), Some("debug"));
		assert_eq!(layer.dashboard.unwrap().utc_offset_minutes, Some(-300));
	}

	#[test]
	fn test_merge_overrides_only_set_fields() {
		let mut base: ConfigLayer = toml::from_str(
			r#"
			[logging]
			level = "info"
			format = "json"

			[validation]
			max_notes_chars = 800
			"#,
		)
		.unwrap();
		let overlay: ConfigLayer = toml::from_str(
			r#"
			[logging]
			level = "trace"

			[database]
			url = "sqlite::memory:"
			"#,
		)
		.unwrap();

		base.merge(overlay);

		let logging = base.logging.unwrap();
		assert_eq!(logging.level.as_deref(), Some("trace"));
		assert_eq!(logging.format.as_deref(), Some("json"));
		assert_eq!(base.database.unwrap().url.as_deref(), Some("sqlite::memory:"));
		assert_eq!(base.validation.unwrap().max_notes_chars, Some(800));
	}
}
