// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Duration checks applied to every note write.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Verdict from a [`DurationValidator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationCheck {
	pub valid: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl DurationCheck {
	#[must_use]
	pub fn accepted() -> Self {
		Self {
			valid: true,
			error: None,
		}
	}

	#[must_use]
	pub fn rejected(error: impl Into<String>) -> Self {
		Self {
			valid: false,
			error: Some(error.into()),
		}
	}
}

/// Decides whether a session duration may be stored.
///
/// Implementations may call out to another service, hence async.
#[async_trait]
pub trait DurationValidator: Send + Sync {
	async fn check(&self, duration: f64) -> Result<DurationCheck>;
}

/// In-process validator accepting finite durations in `(0, max_minutes]`.
#[derive(Debug, Clone, Copy)]
pub struct LocalDurationValidator {
	max_minutes: f64,
}

impl LocalDurationValidator {
	pub fn new(max_minutes: f64) -> Self {
		Self { max_minutes }
	}
}

impl Default for LocalDurationValidator {
	fn default() -> Self {
		Self::new(480.0)
	}
}

#[async_trait]
impl DurationValidator for LocalDurationValidator {
	async fn check(&self, duration: f64) -> Result<DurationCheck> {
		let verdict = if !duration.is_finite() {
			DurationCheck::rejected("Duration must be a number")
		} else if duration <= 0.0 {
			DurationCheck::rejected("Duration must be greater than 0")
		} else if duration > self.max_minutes {
			DurationCheck::rejected(format!(
				"Duration must be at most {} minutes",
				self.max_minutes
			))
		} else {
			DurationCheck::accepted()
		};

		tracing::debug!(duration, valid = verdict.valid, "duration checked");
		Ok(verdict)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn check(validator: &LocalDurationValidator, duration: f64) -> DurationCheck {
		tokio_test::block_on(validator.check(duration)).unwrap()
	}

	proptest! {
		#[test]
		fn accepts_everything_in_range(duration in 0.001f64..=480.0) {
			let validator = LocalDurationValidator::default();
			prop_assert!(check(&validator, duration).valid);
		}
	}

	#[test]
	fn test_rejections_carry_messages() {
		let validator = LocalDurationValidator::new(120.0);

		assert_eq!(
			check(&validator, 0.0),
			DurationCheck::rejected("Duration must be greater than 0")
		);
		assert_eq!(
			check(&validator, f64::NAN),
			DurationCheck::rejected("Duration must be a number")
		);
		assert_eq!(
			check(&validator, 121.0),
			DurationCheck::rejected("Duration must be at most 120 minutes")
		);
		assert_eq!(check(&validator, 120.0), DurationCheck::accepted());
	}

	#[test]
	fn test_check_wire_shape() {
		let json = serde_json::to_string(&DurationCheck::accepted()).unwrap();
		assert_eq!(json, r#"{"valid":true}"#);

		let parsed: DurationCheck =
			serde_json::from_str(r#"{"valid":false,"error":"too long"}"#).unwrap();
		assert_eq!(parsed, DurationCheck::rejected("too long"));
	}
}
