// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration management for Sessionbook.
//!
//! This crate provides:
//! - XDG Base Directory compliant path resolution
//! - Layered configuration from multiple sources
//! - TOML configuration file parsing
//! - Environment variable overrides
//! - Configuration validation

pub mod error;
pub mod layer;
pub mod paths;
pub mod registry;
pub mod runtime;
pub mod sources;

pub use error::ConfigError;
pub use layer::ConfigLayer;
pub use paths::PathsConfig;
pub use registry::ConfigRegistry;
pub use runtime::{
	DashboardConfig, DatabaseConfig, LogFormat, LogLevel, LoggingConfig, SessionbookConfig,
	ValidationConfig,
};
pub use sources::{CliOverrides, ConfigSource, Precedence};

/// Load configuration from all sources with CLI overrides applied last.
///
/// Precedence, lowest first: defaults, `/etc/sessionbook/config.toml`, the
/// user config file (or `cli.config_file` when given), `SESSIONBOOK_*`
/// environment variables, CLI flags.
pub fn load_config(cli: CliOverrides) -> Result<SessionbookConfig, ConfigError> {
	let paths = paths::resolve_xdg_paths()?;

	let mut registry = ConfigRegistry::new();

	registry.register(Box::new(sources::DefaultsSource));
	registry.register(Box::new(sources::FileSource::system(&paths)));
	match cli.config_file.clone() {
		Some(path) => registry.register(Box::new(sources::FileSource::explicit(path))),
		None => registry.register(Box::new(sources::FileSource::user(&paths))),
	}
	registry.register(Box::new(sources::EnvSource));
	registry.register(Box::new(sources::CliSource::new(cli)));

	registry.load(paths)
}
