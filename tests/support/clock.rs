use std::sync::Mutex;

use studio_booking::domain::clock::Clock;
use time::{Duration, OffsetDateTime};

/// Clock that only moves when a test says so.
pub struct ManualClock(Mutex<OffsetDateTime>);

impl ManualClock {
	pub fn new() -> Self {
		ManualClock(Mutex::new(OffsetDateTime::now_utc()))
	}

	pub fn advance(&self, by: Duration) {
		*self.0.lock().unwrap() += by;
	}
}

impl Clock for ManualClock {
	fn now(&self) -> OffsetDateTime {
		*self.0.lock().unwrap()
	}
}
