//! Wall-clock access for projections that depend on "today".

use chrono::{DateTime, NaiveDate, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
	fn now(&self) -> DateTime<Utc>;

	fn today(&self) -> NaiveDate {
		self.now().date_naive()
	}
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> DateTime<Utc> {
		Utc::now()
	}
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
	/// Freezes the clock at midnight UTC of the given date.
	pub fn at_date(date: NaiveDate) -> Self {
		Self(date.and_time(chrono::NaiveTime::default()).and_utc())
	}
}

impl Clock for FixedClock {
	fn now(&self) -> DateTime<Utc> {
		self.0
	}
}
