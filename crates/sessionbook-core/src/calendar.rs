// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Calendar grouping keys.
//!
//! Session instants are reduced to a calendar date in a caller-chosen UTC
//! offset before grouping; time-of-day never takes part in a key.

use chrono::{DateTime, Datelike, FixedOffset, Months, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::NotesError;

/// Calendar date of `instant` as observed at `offset`.
#[must_use]
pub fn local_date(instant: &DateTime<Utc>, offset: &FixedOffset) -> NaiveDate {
	instant.with_timezone(offset).date_naive()
}

/// Day-granularity key, rendered as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
	#[must_use]
	pub fn new(date: NaiveDate) -> Self {
		Self(date)
	}

	#[must_use]
	pub fn from_instant(instant: &DateTime<Utc>, offset: &FixedOffset) -> Self {
		Self(local_date(instant, offset))
	}

	#[must_use]
	pub fn date(&self) -> NaiveDate {
		self.0
	}

	/// Short label such as `Mar 07`.
	#[must_use]
	pub fn label(&self) -> String {
		self.0.format("%b %d").to_string()
	}
}

impl std::fmt::Display for DayKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0.format("%Y-%m-%d"))
	}
}

impl std::str::FromStr for DayKey {
	type Err = NotesError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		NaiveDate::parse_from_str(s, "%Y-%m-%d")
			.map(Self)
			.map_err(|_| NotesError::InvalidKey(s.to_string()))
	}
}

/// Month-granularity key, rendered as `YYYY-MM`.
///
/// Ordering is chronological (year, then month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
	year: i32,
	month: u32,
}

impl MonthKey {
	/// Build a key from a year and a 1-based month.
	pub fn new(year: i32, month: u32) -> Result<Self, NotesError> {
		if !(1..=12).contains(&month) {
			return Err(NotesError::InvalidKey(format!("{year}-{month}")));
		}
		Ok(Self { year, month })
	}

	#[must_use]
	pub fn of(date: NaiveDate) -> Self {
		Self {
			year: date.year(),
			month: date.month(),
		}
	}

	#[must_use]
	pub fn from_instant(instant: &DateTime<Utc>, offset: &FixedOffset) -> Self {
		Self::of(local_date(instant, offset))
	}

	/// Month of `date` minus one calendar month.
	///
	/// Day-of-month is clamped (March 31 steps back to the end of February),
	/// so only the year and month of `date` matter. `None` only at the lower
	/// bound of the supported date range.
	#[must_use]
	pub fn preceding(date: NaiveDate) -> Option<Self> {
		date.checked_sub_months(Months::new(1)).map(Self::of)
	}

	#[must_use]
	pub fn year(&self) -> i32 {
		self.year
	}

	#[must_use]
	pub fn month(&self) -> u32 {
		self.month
	}

	#[must_use]
	pub fn first_day(&self) -> Option<NaiveDate> {
		NaiveDate::from_ymd_opt(self.year, self.month, 1)
	}

	/// Label such as `Mar 2024`.
	#[must_use]
	pub fn label(&self) -> String {
		match self.first_day() {
			Some(day) => day.format("%b %Y").to_string(),
			None => self.to_string(),
		}
	}
}

impl std::fmt::Display for MonthKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:04}-{:02}", self.year, self.month)
	}
}

impl std::str::FromStr for MonthKey {
	type Err = NotesError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let invalid = || NotesError::InvalidKey(s.to_string());
		let (year, month) = s.split_once('-').ok_or_else(invalid)?;
		if month.len() != 2 {
			return Err(invalid());
		}
		let year: i32 = year.parse().map_err(|_| invalid())?;
		let month: u32 = month.parse().map_err(|_| invalid())?;
		Self::new(year, month)
	}
}

macro_rules! string_serde {
	($ty:ty) => {
		impl Serialize for $ty {
			fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
				serializer.collect_str(self)
			}
		}

		impl<'de> Deserialize<'de> for $ty {
			fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
				let s = String::deserialize(deserializer)?;
				s.parse().map_err(serde::de::Error::custom)
			}
		}
	};
}

string_serde!(DayKey);
string_serde!(MonthKey);
