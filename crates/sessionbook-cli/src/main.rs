// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod output;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use clap::{Parser, Subcommand};
use sessionbook_config::{load_config, CliOverrides, LogFormat, LoggingConfig};
use sessionbook_core::{MetricsOptions, NoteId, NoteInput, ValidationLimits};
use sessionbook_store::{
	create_pool, migrate, LocalDurationValidator, NotesService, SqliteNotesRepository,
};
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "sessionbook", version, about = "Therapy session notes and dashboard", long_about = None)]
struct Args {
	/// Config file to use instead of ~/.config/sessionbook/config.toml
	#[arg(long, global = true, env = "SESSIONBOOK_CONFIG")]
	config: Option<PathBuf>,

	/// Log level (error, warn, info, debug, trace)
	#[arg(long, global = true)]
	log_level: Option<String>,

	/// Emit logs as JSON
	#[arg(long, global = true)]
	json_logs: bool,

	/// SQLite database URL
	#[arg(long, global = true)]
	database_url: Option<String>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// List notes, most recently updated first
	List,
	/// Show a single note
	Show { id: NoteId },
	/// Record a new session note
	Add {
		#[arg(long)]
		client: String,
		/// Session date (YYYY-MM-DD)
		#[arg(long)]
		date: NaiveDate,
		/// Duration in minutes
		#[arg(long, default_value_t = 50.0)]
		duration: f64,
		#[arg(long)]
		notes: String,
	},
	/// Change fields of an existing note
	Edit {
		id: NoteId,
		#[arg(long)]
		client: Option<String>,
		#[arg(long)]
		date: Option<NaiveDate>,
		#[arg(long)]
		duration: Option<f64>,
		#[arg(long)]
		notes: Option<String>,
	},
	/// Delete a note
	Delete { id: NoteId },
	/// Monthly totals, trend, daily histogram and per-client frequency
	Dashboard {
		/// Reference date instead of today (YYYY-MM-DD)
		#[arg(long)]
		now: Option<NaiveDate>,
		/// Print the metrics as JSON
		#[arg(long)]
		json: bool,
	},
}

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();

	let config = load_config(CliOverrides {
		database_url: args.database_url.clone(),
		log_level: args.log_level.clone(),
		log_format: args.json_logs.then(|| "json".to_string()),
		config_file: args.config.clone(),
	})
	.context("failed to load configuration")?;

	init_tracing(&config.logging);
	debug!(database_url = %config.database.url, "configuration resolved");

	let offset = config.dashboard.offset()?;

	ensure_database_dir(&config.database.url)?;
	let pool = create_pool(&config.database.url)
		.await
		.with_context(|| format!("failed to open database {}", config.database.url))?;
	migrate(&pool).await?;

	let service = NotesService::new(
		SqliteNotesRepository::new(pool),
		LocalDurationValidator::new(config.validation.max_duration_minutes),
		ValidationLimits {
			max_notes_chars: config.validation.max_notes_chars,
		},
	);

	match args.command {
		Command::List => {
			let notes = service.list().await?;
			print!("{}", output::render_note_list(&notes, &offset));
		}
		Command::Show { id } => {
			let note = service.get(&id).await?;
			print!("{}", output::render_note(&note, &offset));
		}
		Command::Add {
			client,
			date,
			duration,
			notes,
		} => {
			let note = service
				.create(NoteInput {
					client_name: client,
					session_date: start_of_day(date, &offset)?,
					notes,
					duration,
				})
				.await?;
			println!("{}", note.id);
		}
		Command::Edit {
			id,
			client,
			date,
			duration,
			notes,
		} => {
			let mut input = service.get(&id).await?.to_input();
			if let Some(client) = client {
				input.client_name = client;
			}
			if let Some(date) = date {
				input.session_date = start_of_day(date, &offset)?;
			}
			if let Some(duration) = duration {
				input.duration = duration;
			}
			if let Some(notes) = notes {
				input.notes = notes;
			}
			let note = service.update(&id, input).await?;
			print!("{}", output::render_note(&note, &offset));
		}
		Command::Delete { id } => {
			service.delete(&id).await?;
			info!(note_id = %id, "deleted");
		}
		Command::Dashboard { now, json } => {
			let options = MetricsOptions {
				now: now.map(|d| start_of_day(d, &offset)).transpose()?,
				offset,
			};
			let metrics = service.dashboard(&options).await?;
			if json {
				println!("{}", serde_json::to_string_pretty(&metrics)?);
			} else {
				print!("{}", output::render_dashboard(&metrics));
			}
		}
	}

	Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(format!("{},sqlx=warn", logging.level.as_str())));

	match logging.format {
		LogFormat::Json => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().json().with_writer(std::io::stderr))
				.init();
		}
		LogFormat::Compact => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().compact().with_writer(std::io::stderr))
				.init();
		}
		LogFormat::Pretty => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().pretty().with_writer(std::io::stderr))
				.init();
		}
	}
}

/// Midnight of `date` on the calendar of `offset`, as a UTC instant.
fn start_of_day(date: NaiveDate, offset: &FixedOffset) -> Result<DateTime<Utc>> {
	offset
		.from_local_datetime(&date.and_time(chrono::NaiveTime::MIN))
		.single()
		.map(|dt| dt.with_timezone(&Utc))
		.ok_or_else(|| anyhow!("date {date} is not representable at offset {offset}"))
}

/// File path behind a `sqlite:` URL, or `None` for in-memory databases.
fn sqlite_file_path(url: &str) -> Option<&Path> {
	let rest = url
		.strip_prefix("sqlite://")
		.or_else(|| url.strip_prefix("sqlite:"))?;
	let path = rest.split('?').next().unwrap_or_default();
	if path.is_empty() || path.starts_with(":memory:") {
		return None;
	}
	Some(Path::new(path))
}

fn ensure_database_dir(url: &str) -> Result<()> {
	let Some(parent) = sqlite_file_path(url).and_then(Path::parent) else {
		return Ok(());
	};
	if parent.as_os_str().is_empty() || parent.exists() {
		return Ok(());
	}
	std::fs::create_dir_all(parent)
		.with_context(|| format!("failed to create database directory {}", parent.display()))?;
	debug!(path = %parent.display(), "created database directory");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use sessionbook_core::DayKey;

	proptest! {
		#[test]
		fn start_of_day_lands_on_the_same_calendar_day(
			days in 0i64..40_000,
			minutes in -1080i32..=1080,
		) {
			let date = NaiveDate::from_ymd_opt(1950, 1, 1).unwrap() + chrono::Duration::days(days);
			let offset = FixedOffset::east_opt(minutes * 60).unwrap();
			let instant = start_of_day(date, &offset).unwrap();
			prop_assert_eq!(DayKey::from_instant(&instant, &offset).date(), date);
		}
	}

	#[test]
	fn test_sqlite_file_path() {
		assert_eq!(
			sqlite_file_path("sqlite:/var/lib/sb/notes.db"),
			Some(Path::new("/var/lib/sb/notes.db"))
		);
		assert_eq!(
			sqlite_file_path("sqlite://data/notes.db?mode=rwc"),
			Some(Path::new("data/notes.db"))
		);
		assert_eq!(sqlite_file_path("sqlite::memory:"), None);
		assert_eq!(sqlite_file_path("sqlite:"), None);
		assert_eq!(sqlite_file_path("postgres://localhost/db"), None);
	}

	#[test]
	fn test_args_parse_dashboard() {
		let args = Args::try_parse_from([
			"sessionbook",
			"--json-logs",
			"dashboard",
			"--now",
			"2024-03-15",
			"--json",
		])
		.unwrap();
		assert!(args.json_logs);
		match args.command {
			Command::Dashboard { now, json } => {
				assert_eq!(now, NaiveDate::from_ymd_opt(2024, 3, 15));
				assert!(json);
			}
			other => panic!("unexpected command {other:?}"),
		}
	}

	#[test]
	fn test_args_parse_add_defaults_duration() {
		let args = Args::try_parse_from([
			"sessionbook",
			"add",
			"--client",
			"Alice",
			"--date",
			"2024-03-07",
			"--notes",
			"Intake",
		])
		.unwrap();
		match args.command {
			Command::Add { duration, .. } => assert_eq!(duration, 50.0),
			other => panic!("unexpected command {other:?}"),
		}
	}
}
