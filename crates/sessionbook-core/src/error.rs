// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the notes domain.

use thiserror::Error;

/// Errors that can occur in the notes domain.
#[derive(Debug, Error)]
pub enum NotesError {
	/// One or more fields of a note failed validation
	#[error("invalid note: {}", format_fields(.0))]
	InvalidInput(Vec<FieldError>),

	/// Invalid note ID
	#[error("invalid note ID: {0}")]
	InvalidNoteId(String),

	/// Invalid calendar key string
	#[error("invalid calendar key: {0}")]
	InvalidKey(String),
}

impl NotesError {
	/// Message recorded for `field`, if validation flagged it.
	pub fn field_message(&self, field: NoteField) -> Option<&str> {
		match self {
			Self::InvalidInput(errors) => errors
				.iter()
				.find(|e| e.field == field)
				.map(|e| e.message.as_str()),
			_ => None,
		}
	}
}

/// Editable note field, used to attribute validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteField {
	ClientName,
	Notes,
	Duration,
}

impl std::fmt::Display for NoteField {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			NoteField::ClientName => write!(f, "client_name"),
			NoteField::Notes => write!(f, "notes"),
			NoteField::Duration => write!(f, "duration"),
		}
	}
}

/// A single field validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
	pub field: NoteField,
	pub message: String,
}

fn format_fields(errors: &[FieldError]) -> String {
	errors
		.iter()
		.map(|e| format!("{}: {}", e.field, e.message))
		.collect::<Vec<_>>()
		.join("; ")
}
