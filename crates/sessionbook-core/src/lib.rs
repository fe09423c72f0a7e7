// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for Sessionbook, a therapy-session notes tracker.
//!
//! This crate provides:
//! - [`SessionNote`] and its input/validation types
//! - Calendar grouping keys ([`DayKey`], [`MonthKey`])
//! - The dashboard metrics engine ([`compute_metrics`])

pub mod calendar;
pub mod error;
pub mod metrics;
pub mod note;

pub use calendar::{DayKey, MonthKey};
pub use error::{FieldError, NoteField, NotesError};
pub use metrics::{
	compute_metrics, compute_metrics_with, ClientFrequency, DailySessions, DashboardMetrics,
	MetricsOptions, MonthlyClientRow, Trend,
};
pub use note::{NoteId, NoteInput, SessionNote, ValidationLimits};
