use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};

/// Length of a lesson when the tutor does not give an explicit end time.
pub const DEFAULT_LESSON_MINUTES: i64 = 60;

/// A tutor-published unit of bookable time.
///
/// `is_available` is `false` while a lesson holds the slot. Slots are never
/// deleted, only flipped between open and held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: Uuid,
    pub tutor_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
}

/// Date and time window for a slot that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewTimeSlot {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
}

impl NewTimeSlot {
    pub fn new(date: NaiveDate, start_time: NaiveTime) -> Self {
        Self {
            date,
            start_time,
            end_time: None,
        }
    }

    pub fn with_end(mut self, end_time: NaiveTime) -> Self {
        self.end_time = Some(end_time);
        self
    }

    /// Returns the end of the window, falling back to `start + duration`.
    ///
    /// A window must end after it starts on the same calendar day.
    pub fn resolve_end(&self, duration: Duration) -> BookingResult<NaiveTime> {
        let end = match self.end_time {
            Some(end) => end,
            None => {
                let (end, wrapped) = self.start_time.overflowing_add_signed(duration);
                if wrapped != 0 {
                    return Err(BookingError::Validation(format!(
                        "a lesson starting at {} would run past midnight",
                        self.start_time
                    )));
                }
                end
            }
        };

        if end <= self.start_time {
            return Err(BookingError::Validation(format!(
                "end time {} must be after start time {}",
                end, self.start_time
            )));
        }

        Ok(end)
    }
}
