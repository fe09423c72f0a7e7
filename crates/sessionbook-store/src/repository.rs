// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Repository layer for session note database operations.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::SqlitePool;
use tracing::instrument;

use sessionbook_core::{NoteId, SessionNote};

use crate::error::{Result, StoreError};

/// Repository trait for note operations.
#[async_trait]
pub trait NotesRepository: Send + Sync {
	/// All notes, most recently updated first.
	async fn list_notes(&self) -> Result<Vec<SessionNote>>;
	async fn get_note(&self, id: &NoteId) -> Result<Option<SessionNote>>;
	async fn create_note(&self, note: &SessionNote) -> Result<()>;
	/// Returns `false` when no note has this id.
	async fn update_note(&self, note: &SessionNote) -> Result<bool>;
	/// Returns `false` when no note has this id.
	async fn delete_note(&self, id: &NoteId) -> Result<bool>;
}

/// SQLite implementation of the notes repository.
#[derive(Clone)]
pub struct SqliteNotesRepository {
	pool: SqlitePool,
}

impl SqliteNotesRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}
}

// Fixed-width timestamps keep text ordering chronological.
fn to_db_time(dt: &DateTime<Utc>) -> String {
	dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn from_db_time(column: &str, value: &str) -> Result<DateTime<Utc>> {
	DateTime::parse_from_rfc3339(value)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| StoreError::InvalidData(format!("invalid {column}: {e}")))
}

#[derive(sqlx::FromRow)]
struct NoteRow {
	id: String,
	client_name: String,
	session_date: String,
	notes: String,
	duration: Option<f64>,
	created_at: String,
	updated_at: String,
}

impl TryFrom<NoteRow> for SessionNote {
	type Error = StoreError;

	fn try_from(row: NoteRow) -> Result<Self> {
		Ok(SessionNote {
			id: row
				.id
				.parse()
				.map_err(|_| StoreError::InvalidData("invalid note ID".into()))?,
			client_name: row.client_name,
			session_date: from_db_time("session_date", &row.session_date)?,
			notes: row.notes,
			// SQLite stores NaN as NULL
			duration: row.duration.unwrap_or(f64::NAN),
			created_at: from_db_time("created_at", &row.created_at)?,
			updated_at: from_db_time("updated_at", &row.updated_at)?,
		})
	}
}

#[async_trait]
impl NotesRepository for SqliteNotesRepository {
	#[instrument(skip(self))]
	async fn list_notes(&self) -> Result<Vec<SessionNote>> {
		let rows = sqlx::query_as::<_, NoteRow>(
			r#"
			SELECT id, client_name, session_date, notes, duration, created_at, updated_at
			FROM session_notes
			ORDER BY updated_at DESC
			"#,
		)
		.fetch_all(&self.pool)
		.await?;

		rows.into_iter().map(TryInto::try_into).collect()
	}

	#[instrument(skip(self), fields(note_id = %id))]
	async fn get_note(&self, id: &NoteId) -> Result<Option<SessionNote>> {
		let row = sqlx::query_as::<_, NoteRow>(
			r#"
			SELECT id, client_name, session_date, notes, duration, created_at, updated_at
			FROM session_notes
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(TryInto::try_into).transpose()
	}

	#[instrument(skip(self, note), fields(note_id = %note.id))]
	async fn create_note(&self, note: &SessionNote) -> Result<()> {
		sqlx::query(
			r#"
			INSERT INTO session_notes (
				id, client_name, session_date, notes, duration, created_at, updated_at
			)
			VALUES (?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(note.id.to_string())
		.bind(&note.client_name)
		.bind(to_db_time(&note.session_date))
		.bind(&note.notes)
		.bind(note.duration)
		.bind(to_db_time(&note.created_at))
		.bind(to_db_time(&note.updated_at))
		.execute(&self.pool)
		.await?;

		Ok(())
	}

	#[instrument(skip(self, note), fields(note_id = %note.id))]
	async fn update_note(&self, note: &SessionNote) -> Result<bool> {
		let result = sqlx::query(
			r#"
			UPDATE session_notes SET
				client_name = ?,
				session_date = ?,
				notes = ?,
				duration = ?,
				updated_at = ?
			WHERE id = ?
			"#,
		)
		.bind(&note.client_name)
		.bind(to_db_time(&note.session_date))
		.bind(&note.notes)
		.bind(note.duration)
		.bind(to_db_time(&note.updated_at))
		.bind(note.id.to_string())
		.execute(&self.pool)
		.await?;

		Ok(result.rows_affected() > 0)
	}

	#[instrument(skip(self), fields(note_id = %id))]
	async fn delete_note(&self, id: &NoteId) -> Result<bool> {
		let result = sqlx::query("DELETE FROM session_notes WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}
}
