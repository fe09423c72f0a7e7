// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the notes store.

use thiserror::Error;

/// Errors that can occur in the notes store.
#[derive(Debug, Error)]
pub enum StoreError {
	/// Database error
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),

	/// Note not found
	#[error("note not found: {0}")]
	NoteNotFound(String),

	/// Stored row could not be mapped back to a note
	#[error("invalid note data: {0}")]
	InvalidData(String),

	/// Write rejected by the duration validator
	#[error("{0}")]
	Validation(String),

	/// Core error
	#[error(transparent)]
	Core(#[from] sessionbook_core::NotesError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
