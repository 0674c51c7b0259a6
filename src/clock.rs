//! Run-scoped wall clock.

use chrono::{DateTime, Utc};

/// Hands out "now" timestamps that never decrease within a run.
///
/// Entries without any timestamp are stamped from here, so an undated entry
/// processed later never sorts below one processed earlier, even if the
/// system clock steps back mid-run.
#[derive(Debug, Default)]
pub struct RunClock {
    last: Option<DateTime<Utc>>,
}

impl RunClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&mut self) -> DateTime<Utc> {
        self.observe(Utc::now())
    }

    fn observe(&mut self, wall: DateTime<Utc>) -> DateTime<Utc> {
        let stamped = match self.last {
            Some(last) if last > wall => last,
            _ => wall,
        };
        self.last = Some(stamped);
        stamped
    }
}
