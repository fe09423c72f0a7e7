// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Runtime configuration types with resolved defaults.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::layer::*;
use crate::paths::PathsConfig;
use crate::ConfigError;

const MAX_OFFSET_MINUTES: i32 = 18 * 60;

/// The final, validated configuration for Sessionbook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionbookConfig {
	pub database: DatabaseConfig,
	pub logging: LoggingConfig,
	pub dashboard: DashboardConfig,
	pub validation: ValidationConfig,

	/// Resolved XDG paths (not serialized)
	#[serde(skip)]
	pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
	pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
	pub level: LogLevel,
	pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
	Error,
	Warn,
	#[default]
	Info,
	Debug,
	Trace,
}

impl LogLevel {
	pub fn as_str(&self) -> &'static str {
		match self {
			LogLevel::Error => "error",
			LogLevel::Warn => "warn",
			LogLevel::Info => "info",
			LogLevel::Debug => "debug",
			LogLevel::Trace => "trace",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Pretty,
	Json,
	#[default]
	Compact,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
	pub utc_offset_minutes: i32,
}

impl DashboardConfig {
	/// Calendar offset used for day and month grouping.
	pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
		FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
			ConfigError::invalid_value(
				"dashboard.utc_offset_minutes",
				format!("{} is out of range", self.utc_offset_minutes),
			)
		})
	}
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ValidationConfig {
	pub max_duration_minutes: f64,
	pub max_notes_chars: usize,
}

impl Default for ValidationConfig {
	fn default() -> Self {
		Self {
			max_duration_minutes: 480.0,
			max_notes_chars: 500,
		}
	}
}

impl SessionbookConfig {
	/// Resolve a merged layer into a runtime config, filling defaults.
	pub fn from_layer(layer: ConfigLayer, paths: PathsConfig) -> Result<Self, ConfigError> {
		let database = DatabaseConfig {
			url: layer
				.database
				.and_then(|d| d.url)
				.unwrap_or_else(|| format!("sqlite:{}", paths.default_database_file().display())),
		};

		let logging_layer = layer.logging.unwrap_or_default();
		let logging = LoggingConfig {
			level: parse_log_level(logging_layer.level.as_deref())?,
			format: parse_log_format(logging_layer.format.as_deref())?,
		};

		let dashboard = DashboardConfig {
			utc_offset_minutes: layer
				.dashboard
				.and_then(|d| d.utc_offset_minutes)
				.unwrap_or(0),
		};

		let defaults = ValidationConfig::default();
		let validation_layer = layer.validation.unwrap_or_default();
		let validation = ValidationConfig {
			max_duration_minutes: validation_layer
				.max_duration_minutes
				.unwrap_or(defaults.max_duration_minutes),
			max_notes_chars: validation_layer
				.max_notes_chars
				.unwrap_or(defaults.max_notes_chars),
		};

		Ok(Self {
			database,
			logging,
			dashboard,
			validation,
			paths,
		})
	}

	/// Check cross-field constraints.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.database.url.trim().is_empty() {
			return Err(ConfigError::validation("database.url must not be empty"));
		}

		if self.dashboard.utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
			return Err(ConfigError::invalid_value(
				"dashboard.utc_offset_minutes",
				format!("must be within ±{MAX_OFFSET_MINUTES}"),
			));
		}

		let max = self.validation.max_duration_minutes;
		if !max.is_finite() || max <= 0.0 {
			return Err(ConfigError::invalid_value(
				"validation.max_duration_minutes",
				"must be a positive number",
			));
		}

		if self.validation.max_notes_chars == 0 {
			return Err(ConfigError::invalid_value(
				"validation.max_notes_chars",
				"must be greater than 0",
			));
		}

		Ok(())
	}
}

fn parse_log_level(s: Option<&str>) -> Result<LogLevel, ConfigError> {
	match s.map(str::to_ascii_lowercase).as_deref() {
		None => Ok(LogLevel::default()),
		Some("error") => Ok(LogLevel::Error),
		Some("warn") => Ok(LogLevel::Warn),
		Some("info") => Ok(LogLevel::Info),
		Some("debug") => Ok(LogLevel::Debug),
		Some("trace") => Ok(LogLevel::Trace),
		Some(other) => Err(ConfigError::invalid_value(
			"logging.level",
			format!("unknown level '{other}'"),
		)),
	}
}

fn parse_log_format(s: Option<&str>) -> Result<LogFormat, ConfigError> {
	match s.map(str::to_ascii_lowercase).as_deref() {
		None => Ok(LogFormat::default()),
		Some("pretty") => Ok(LogFormat::Pretty),
		Some("json") => Ok(LogFormat::Json),
		Some("compact") => Ok(LogFormat::Compact),
		Some(other) => Err(ConfigError::invalid_value(
			"logging.format",
			format!("unknown format '{other}'"),
		)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn resolve(toml_src: &str) -> Result<SessionbookConfig, ConfigError> {
		let layer: ConfigLayer = toml::from_str(toml_src).unwrap();
		SessionbookConfig::from_layer(layer, PathsConfig::default())
	}

	proptest! {
		#[test]
		fn offsets_in_range_validate(minutes in -MAX_OFFSET_MINUTES..=MAX_OFFSET_MINUTES) {
			let config = resolve(&format!("[dashboard]\nutc_offset_minutes = {minutes}")).unwrap();
			prop_assert!(config.validate().is_ok());
			prop_assert!(config.dashboard.offset().is_ok());
		}
	}

	#[test]
	fn test_defaults() {
		let config = resolve("").unwrap();
		assert_eq!(
			config.database.url,
			"sqlite:~/.local/share/sessionbook/sessionbook.db"
		);
		assert_eq!(config.logging.level, LogLevel::Info);
		assert_eq!(config.logging.format, LogFormat::Compact);
		assert_eq!(config.dashboard.utc_offset_minutes, 0);
		assert_eq!(config.validation.max_duration_minutes, 480.0);
		assert_eq!(config.validation.max_notes_chars, 500);
		assert!(config.validate().is_ok());
	}

	#[test]
	fn test_log_settings_are_case_insensitive() {
		let config = resolve("[logging]\nlevel = \"DEBUG\"\nformat = \"Json\"").unwrap();
		assert_eq!(config.logging.level, LogLevel::Debug);
		assert_eq!(config.logging.format, LogFormat::Json);
	}

	#[test]
	fn test_unknown_log_level_is_rejected() {
		let result = resolve("[logging]\nlevel = \"loud\"");
		assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
	}

	#[test]
	fn test_validate_rejects_out_of_range_values() {
		let config = resolve("[dashboard]\nutc_offset_minutes = 1200").unwrap();
		assert!(config.validate().is_err());

		let config = resolve("[validation]\nmax_duration_minutes = 0.0").unwrap();
		assert!(config.validate().is_err());

		let config = resolve("[validation]\nmax_notes_chars = 0").unwrap();
		assert!(config.validate().is_err());

		let config = resolve("[database]\nurl = \"  \"").unwrap();
		assert!(config.validate().is_err());
	}

	#[test]
	fn test_dashboard_offset() {
		let config = resolve("[dashboard]\nutc_offset_minutes = -300").unwrap();
		assert_eq!(config.dashboard.offset().unwrap().local_minus_utc(), -300 * 60);
	}
}
