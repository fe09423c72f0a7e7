// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session note types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FieldError, NoteField, NotesError};

/// Unique identifier for a session note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteId(pub Uuid);

impl NoteId {
	#[must_use]
	pub fn new() -> Self {
		Self(Uuid::now_v7())
	}

	#[must_use]
	pub fn as_uuid(&self) -> &Uuid {
		&self.0
	}
}

impl Default for NoteId {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Display for NoteId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl std::str::FromStr for NoteId {
	type Err = NotesError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Uuid::parse_str(s)
			.map(Self)
			.map_err(|_| NotesError::InvalidNoteId(s.to_string()))
	}
}

/// A recorded therapy session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionNote {
	pub id: NoteId,
	/// Person the session was with
	pub client_name: String,
	/// When the session took place
	pub session_date: DateTime<Utc>,
	pub notes: String,
	/// Length in minutes; stored as given, not guaranteed positive
	pub duration: f64,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl SessionNote {
	/// Build a new note from validated input.
	#[must_use]
	pub fn from_input(input: NoteInput, now: DateTime<Utc>) -> Self {
		Self {
			id: NoteId::new(),
			client_name: input.client_name,
			session_date: input.session_date,
			notes: input.notes,
			duration: input.duration,
			created_at: now,
			updated_at: now,
		}
	}

	/// Replace the editable fields and bump `updated_at`.
	pub fn apply(&mut self, input: NoteInput, now: DateTime<Utc>) {
		self.client_name = input.client_name;
		self.session_date = input.session_date;
		self.notes = input.notes;
		self.duration = input.duration;
		self.updated_at = now;
	}

	/// Editable fields of this note, as a starting point for an edit.
	#[must_use]
	pub fn to_input(&self) -> NoteInput {
		NoteInput {
			client_name: self.client_name.clone(),
			session_date: self.session_date,
			notes: self.notes.clone(),
			duration: self.duration,
		}
	}
}

/// Limits applied when validating note input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationLimits {
	pub max_notes_chars: usize,
}

impl Default for ValidationLimits {
	fn default() -> Self {
		Self {
			max_notes_chars: 500,
		}
	}
}

/// User-editable fields of a note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteInput {
	pub client_name: String,
	pub session_date: DateTime<Utc>,
	pub notes: String,
	pub duration: f64,
}

impl NoteInput {
	/// Check every field, collecting all failures.
	pub fn validate(&self, limits: &ValidationLimits) -> Result<(), NotesError> {
		let mut errors = Vec::new();

		if self.client_name.trim().is_empty() {
			errors.push(FieldError {
				field: NoteField::ClientName,
				message: "Client name is required".to_string(),
			});
		}

		if self.notes.trim().is_empty() {
			errors.push(FieldError {
				field: NoteField::Notes,
				message: "Notes are required".to_string(),
			});
		} else if self.notes.chars().count() > limits.max_notes_chars {
			errors.push(FieldError {
				field: NoteField::Notes,
				message: format!(
					"Notes must be {} characters or less",
					limits.max_notes_chars
				),
			});
		}

		if !self.duration.is_finite() || self.duration <= 0.0 {
			errors.push(FieldError {
				field: NoteField::Duration,
				message: "Duration must be greater than 0".to_string(),
			});
		}

		if errors.is_empty() {
			Ok(())
		} else {
			Err(NotesError::InvalidInput(errors))
		}
	}
}
