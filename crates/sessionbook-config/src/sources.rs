// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: files, environment, CLI, defaults.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::layer::*;
use crate::paths::PathsConfig;
use crate::ConfigError;

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	SystemFile = 20,
	UserFile = 30,
	Environment = 50,
	Cli = 60,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	/// Name for logging
	fn name(&self) -> &'static str;

	/// Precedence level
	fn precedence(&self) -> Precedence;

	/// Load configuration layer from this source
	fn load(&self) -> Result<ConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}
	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		debug!("loading defaults");
		// Defaults are applied when the runtime config is built
		Ok(ConfigLayer::default())
	}
}

/// File-based configuration source (TOML).
pub struct FileSource {
	path: PathBuf,
	precedence: Precedence,
	name: &'static str,
	required: bool,
}

impl FileSource {
	/// System config: /etc/sessionbook/config.toml
	pub fn system(paths: &PathsConfig) -> Self {
		Self {
			path: paths.system_config_file.clone(),
			precedence: Precedence::SystemFile,
			name: "system-config",
			required: false,
		}
	}

	/// User config: ~/.config/sessionbook/config.toml
	pub fn user(paths: &PathsConfig) -> Self {
		Self {
			path: paths.user_config_file.clone(),
			precedence: Precedence::UserFile,
			name: "user-config",
			required: false,
		}
	}

	/// File named on the command line; replaces the user config and must exist.
	pub fn explicit(path: PathBuf) -> Self {
		Self {
			path,
			precedence: Precedence::UserFile,
			name: "explicit-config",
			required: true,
		}
	}
}

impl ConfigSource for FileSource {
	fn name(&self) -> &'static str {
		self.name
	}
	fn precedence(&self) -> Precedence {
		self.precedence
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		if !self.path.exists() {
			if self.required {
				return Err(ConfigError::FileNotFound(self.path.clone()));
			}
			debug!(path = %self.path.display(), source = self.name, "config file not found, skipping");
			return Ok(ConfigLayer::default());
		}

		debug!(path = %self.path.display(), source = self.name, "loading config file");

		let content = std::fs::read_to_string(&self.path)?;
		let layer: ConfigLayer = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
			path: self.path.clone(),
			source: e,
		})?;

		trace!(source = self.name, "parsed config layer");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Recognised variables: SESSIONBOOK_DATABASE_URL, SESSIONBOOK_LOG_LEVEL,
/// SESSIONBOOK_LOG_FORMAT, SESSIONBOOK_UTC_OFFSET_MINUTES,
/// SESSIONBOOK_MAX_DURATION_MINUTES, SESSIONBOOK_MAX_NOTES_CHARS.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}
	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		debug!("loading environment variables");
		layer_from_vars(std::env::vars())
	}
}

/// Build a layer from `SESSIONBOOK_*` key/value pairs.
pub fn layer_from_vars<I>(vars: I) -> Result<ConfigLayer, ConfigError>
where
	I: IntoIterator<Item = (String, String)>,
{
	let mut layer = ConfigLayer::default();

	for (key, value) in vars {
		if !key.starts_with("SESSIONBOOK_") {
			continue;
		}

		let value = value.trim().to_string();
		if value.is_empty() {
			continue;
		}

		trace!(key = %key, "processing env var");

		match key.as_str() {
			"SESSIONBOOK_DATABASE_URL" => {
				layer
					.database
					.get_or_insert_with(DatabaseLayer::default)
					.url = Some(value);
			}
			"SESSIONBOOK_LOG_LEVEL" => {
				layer
					.logging
					.get_or_insert_with(LoggingLayer::default)
					.level = Some(value);
			}
			"SESSIONBOOK_LOG_FORMAT" => {
				layer
					.logging
					.get_or_insert_with(LoggingLayer::default)
					.format = Some(value);
			}
			"SESSIONBOOK_UTC_OFFSET_MINUTES" => {
				let minutes = value
					.parse()
					.map_err(|_| ConfigError::invalid_value(&key, "expected whole minutes"))?;
				layer
					.dashboard
					.get_or_insert_with(DashboardLayer::default)
					.utc_offset_minutes = Some(minutes);
			}
			"SESSIONBOOK_MAX_DURATION_MINUTES" => {
				let minutes = value
					.parse()
					.map_err(|_| ConfigError::invalid_value(&key, "expected a number"))?;
				layer
					.validation
					.get_or_insert_with(ValidationLayer::default)
					.max_duration_minutes = Some(minutes);
			}
			"SESSIONBOOK_MAX_NOTES_CHARS" => {
				let chars = value
					.parse()
					.map_err(|_| ConfigError::invalid_value(&key, "expected a positive integer"))?;
				layer
					.validation
					.get_or_insert_with(ValidationLayer::default)
					.max_notes_chars = Some(chars);
			}
			_ => {
				// Unknown SESSIONBOOK_ variable, ignore
			}
		}
	}

	Ok(layer)
}

/// CLI argument overrides.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
	pub database_url: Option<String>,
	pub log_level: Option<String>,
	pub log_format: Option<String>,
	pub config_file: Option<PathBuf>,
}

/// CLI override source.
pub struct CliSource {
	overrides: CliOverrides,
}

impl CliSource {
	pub fn new(overrides: CliOverrides) -> Self {
		Self { overrides }
	}
}

impl ConfigSource for CliSource {
	fn name(&self) -> &'static str {
		"cli"
	}
	fn precedence(&self) -> Precedence {
		Precedence::Cli
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		debug!("loading CLI overrides");
		let mut layer = ConfigLayer::default();

		if let Some(ref url) = self.overrides.database_url {
			layer
				.database
				.get_or_insert_with(DatabaseLayer::default)
				.url = Some(url.clone());
		}

		if let Some(ref level) = self.overrides.log_level {
			layer
				.logging
				.get_or_insert_with(LoggingLayer::default)
				.level = Some(level.clone());
		}

		if let Some(ref format) = self.overrides.log_format {
			layer
				.logging
				.get_or_insert_with(LoggingLayer::default)
				.format = Some(format.clone());
		}

		Ok(layer)
	}
}
