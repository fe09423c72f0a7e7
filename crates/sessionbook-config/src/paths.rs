// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! XDG Base Directory compliant path resolution.

use std::path::PathBuf;

use crate::ConfigError;

/// Resolved XDG paths for Sessionbook.
#[derive(Debug, Clone)]
pub struct PathsConfig {
	/// User config file: ~/.config/sessionbook/config.toml
	pub user_config_file: PathBuf,
	/// System config file: /etc/sessionbook/config.toml
	pub system_config_file: PathBuf,
	/// Data directory: ~/.local/share/sessionbook/
	pub data_dir: PathBuf,
}

impl PathsConfig {
	/// Default location of the notes database.
	pub fn default_database_file(&self) -> PathBuf {
		self.data_dir.join("sessionbook.db")
	}
}

impl Default for PathsConfig {
	fn default() -> Self {
		Self {
			user_config_file: PathBuf::from("~/.config/sessionbook/config.toml"),
			system_config_file: PathBuf::from("/etc/sessionbook/config.toml"),
			data_dir: PathBuf::from("~/.local/share/sessionbook"),
		}
	}
}

/// Resolve XDG paths according to the Base Directory Specification.
///
/// Uses environment variables if set, otherwise falls back to defaults:
/// - XDG_CONFIG_HOME or ~/.config
/// - XDG_DATA_HOME or ~/.local/share
pub fn resolve_xdg_paths() -> Result<PathsConfig, ConfigError> {
	let home = dirs::home_dir().ok_or(ConfigError::HomeDirNotFound)?;

	let config_home = std::env::var_os("XDG_CONFIG_HOME")
		.map(PathBuf::from)
		.unwrap_or_else(|| home.join(".config"));

	let data_home = std::env::var_os("XDG_DATA_HOME")
		.map(PathBuf::from)
		.unwrap_or_else(|| home.join(".local/share"));

	tracing::debug!(
		config_home = %config_home.display(),
		data_home = %data_home.display(),
		"resolved XDG paths"
	);

	Ok(PathsConfig {
		user_config_file: config_home.join("sessionbook/config.toml"),
		system_config_file: PathBuf::from("/etc/sessionbook/config.toml"),
		data_dir: data_home.join("sessionbook"),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_resolve_xdg_paths_succeeds() {
		let paths = resolve_xdg_paths().unwrap();
		assert!(paths
			.user_config_file
			.to_string_lossy()
			.ends_with("sessionbook/config.toml"));
		assert!(paths.data_dir.to_string_lossy().ends_with("sessionbook"));
	}

	#[test]
	fn test_system_config_is_etc() {
		let paths = resolve_xdg_paths().unwrap();
		assert_eq!(
			paths.system_config_file,
			PathBuf::from("/etc/sessionbook/config.toml")
		);
	}

	#[test]
	fn test_default_database_file_lives_in_data_dir() {
		let paths = PathsConfig::default();
		assert_eq!(
			paths.default_database_file(),
			PathBuf::from("~/.local/share/sessionbook/sessionbook.db")
		);
	}
}
