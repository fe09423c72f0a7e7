// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Note operations composed from a repository and a duration validator.

use chrono::Utc;
use tracing::{info, instrument};

use sessionbook_core::{
	compute_metrics_with, DashboardMetrics, MetricsOptions, NoteId, NoteInput, SessionNote,
	ValidationLimits,
};

use crate::error::{Result, StoreError};
use crate::repository::NotesRepository;
use crate::validator::DurationValidator;

pub struct NotesService<R, V> {
	repository: R,
	validator: V,
	limits: ValidationLimits,
}

impl<R, V> NotesService<R, V>
where
	R: NotesRepository,
	V: DurationValidator,
{
	pub fn new(repository: R, validator: V, limits: ValidationLimits) -> Self {
		Self {
			repository,
			validator,
			limits,
		}
	}

	pub async fn list(&self) -> Result<Vec<SessionNote>> {
		self.repository.list_notes().await
	}

	pub async fn get(&self, id: &NoteId) -> Result<SessionNote> {
		self
			.repository
			.get_note(id)
			.await?
			.ok_or_else(|| StoreError::NoteNotFound(id.to_string()))
	}

	#[instrument(skip(self, input), fields(client = %input.client_name))]
	pub async fn create(&self, input: NoteInput) -> Result<SessionNote> {
		self.check_input(&input).await?;

		let note = SessionNote::from_input(input, Utc::now());
		self.repository.create_note(&note).await?;

		info!(note_id = %note.id, "note created");
		Ok(note)
	}

	#[instrument(skip(self, input), fields(note_id = %id))]
	pub async fn update(&self, id: &NoteId, input: NoteInput) -> Result<SessionNote> {
		self.check_input(&input).await?;

		let mut note = self.get(id).await?;
		note.apply(input, Utc::now());
		if !self.repository.update_note(&note).await? {
			return Err(StoreError::NoteNotFound(id.to_string()));
		}

		info!("note updated");
		Ok(note)
	}

	#[instrument(skip(self), fields(note_id = %id))]
	pub async fn delete(&self, id: &NoteId) -> Result<()> {
		if !self.repository.delete_note(id).await? {
			return Err(StoreError::NoteNotFound(id.to_string()));
		}

		info!("note deleted");
		Ok(())
	}

	/// Load every note and derive the dashboard view.
	#[instrument(skip(self, options))]
	pub async fn dashboard(&self, options: &MetricsOptions) -> Result<DashboardMetrics> {
		let notes = self.repository.list_notes().await?;
		Ok(compute_metrics_with(&notes, options))
	}

	async fn check_input(&self, input: &NoteInput) -> Result<()> {
		input.validate(&self.limits)?;

		let check = self.validator.check(input.duration).await?;
		if !check.valid {
			return Err(StoreError::Validation(
				check
					.error
					.unwrap_or_else(|| "Invalid note payload".to_string()),
			));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::repository::tests::create_test_pool;
	use crate::repository::SqliteNotesRepository;
	use crate::validator::{DurationCheck, LocalDurationValidator};
	use async_trait::async_trait;
	use chrono::{DateTime, TimeZone};
	use sessionbook_core::NoteField;

	struct RejectAll;

	#[async_trait]
	impl DurationValidator for RejectAll {
		async fn check(&self, _duration: f64) -> Result<DurationCheck> {
			Ok(DurationCheck {
				valid: false,
				error: None,
			})
		}
	}

	fn input(client: &str, session_date: DateTime<Utc>, duration: f64) -> NoteInput {
		NoteInput {
			client_name: client.to_string(),
			session_date,
			notes: "Session notes".to_string(),
			duration,
		}
	}

	async fn make_service() -> NotesService<SqliteNotesRepository, LocalDurationValidator> {
		let repo = SqliteNotesRepository::new(create_test_pool().await);
		NotesService::new(
			repo,
			LocalDurationValidator::default(),
			ValidationLimits::default(),
		)
	}

	#[tokio::test]
	async fn test_create_then_get() {
		let service = make_service().await;
		let date = Utc.with_ymd_and_hms(2024, 3, 7, 10, 0, 0).unwrap();

		let created = service.create(input("Alice", date, 50.0)).await.unwrap();
		let fetched = service.get(&created.id).await.unwrap();

		assert_eq!(fetched.client_name, "Alice");
		assert_eq!(fetched.session_date, date);
		assert_eq!(fetched.duration, 50.0);
	}

	#[tokio::test]
	async fn test_create_rejects_invalid_input_before_storage() {
		let service = make_service().await;
		let date = Utc.with_ymd_and_hms(2024, 3, 7, 10, 0, 0).unwrap();

		let err = service.create(input(" ", date, 50.0)).await.unwrap_err();
		match err {
			StoreError::Core(core) => {
				assert!(core.field_message(NoteField::ClientName).is_some());
			}
			other => panic!("unexpected error: {other}"),
		}
		assert!(service.list().await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_create_rejects_duration_over_limit() {
		let service = make_service().await;
		let date = Utc.with_ymd_and_hms(2024, 3, 7, 10, 0, 0).unwrap();

		let err = service.create(input("Alice", date, 600.0)).await.unwrap_err();
		assert!(matches!(err, StoreError::Validation(ref msg) if msg.contains("480")));
		assert!(service.list().await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_rejection_without_message_uses_fallback() {
		let repo = SqliteNotesRepository::new(create_test_pool().await);
		let service = NotesService::new(repo, RejectAll, ValidationLimits::default());
		let date = Utc.with_ymd_and_hms(2024, 3, 7, 10, 0, 0).unwrap();

		let err = service.create(input("Alice", date, 50.0)).await.unwrap_err();
		assert_eq!(err.to_string(), "Invalid note payload");
	}

	#[tokio::test]
	async fn test_update_replaces_fields() {
		let service = make_service().await;
		let date = Utc.with_ymd_and_hms(2024, 3, 7, 10, 0, 0).unwrap();
		let created = service.create(input("Alice", date, 50.0)).await.unwrap();

		let later = Utc.with_ymd_and_hms(2024, 3, 9, 10, 0, 0).unwrap();
		let updated = service
			.update(&created.id, input("Alice B.", later, 45.0))
			.await
			.unwrap();

		assert_eq!(updated.id, created.id);
		assert_eq!(updated.created_at, created.created_at);
		assert!(updated.updated_at >= created.updated_at);

		let fetched = service.get(&created.id).await.unwrap();
		assert_eq!(fetched.client_name, "Alice B.");
		assert_eq!(fetched.session_date, later);
		assert_eq!(fetched.duration, 45.0);
	}

	#[tokio::test]
	async fn test_update_and_delete_unknown_note() {
		let service = make_service().await;
		let date = Utc.with_ymd_and_hms(2024, 3, 7, 10, 0, 0).unwrap();
		let missing = NoteId::new();

		let err = service
			.update(&missing, input("Alice", date, 50.0))
			.await
			.unwrap_err();
		assert!(matches!(err, StoreError::NoteNotFound(_)));

		let err = service.delete(&missing).await.unwrap_err();
		assert!(matches!(err, StoreError::NoteNotFound(_)));
	}

	#[tokio::test]
	async fn test_dashboard_reads_all_notes() {
		let service = make_service().await;
		for (client, day) in [("Alice", 3), ("Bob", 3), ("Alice", 20)] {
			let date = Utc.with_ymd_and_hms(2024, 3, day, 10, 0, 0).unwrap();
			service.create(input(client, date, 50.0)).await.unwrap();
		}
		let date = Utc.with_ymd_and_hms(2024, 2, 14, 10, 0, 0).unwrap();
		service.create(input("Alice", date, 40.0)).await.unwrap();

		let options = MetricsOptions {
			now: Some(Utc.with_ymd_and_hms(2024, 3, 25, 12, 0, 0).unwrap()),
			..MetricsOptions::default()
		};
		let metrics = service.dashboard(&options).await.unwrap();

		assert_eq!(metrics.total_this_month, 3);
		assert_eq!(metrics.total_last_month, 1);
		assert_eq!(metrics.delta_pct, Some(200.0));
		assert_eq!(metrics.avg_duration_this_month, 50.0);
		assert_eq!(metrics.bar_chart_data.len(), 3);
		assert_eq!(metrics.monthly_client_frequency.len(), 2);
	}
}
