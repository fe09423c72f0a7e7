// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Storage layer for Sessionbook notes.
//!
//! Notes live in a SQLite `session_notes` table behind [`NotesRepository`].
//! Writes go through [`NotesService`], which validates input and asks a
//! [`DurationValidator`] to accept the duration before touching storage.

pub mod error;
pub mod pool;
pub mod repository;
pub mod service;
pub mod validator;

pub use error::{Result, StoreError};
pub use pool::{create_pool, migrate};
pub use repository::{NotesRepository, SqliteNotesRepository};
pub use service::NotesService;
pub use validator::{DurationCheck, DurationValidator, LocalDurationValidator};
